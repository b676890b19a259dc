//! Property tests for flatten map construction.

use std::collections::BTreeSet;

use hypatia_core::{FieldDef, ModelDef, ParamSource, SignatureError, TypeRef};
use hypatia_signature::{build_flatten_map, resolve_leaf, FuncParam};
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
    "[a-m][a-z0-9_]{0,8}"
}

/// A model whose leaf names are `leaves`, split between the top level and
/// one nested model.
fn model_with_leaves(leaves: &[String], split: usize) -> TypeRef {
    let split = split.min(leaves.len());
    let nested = leaves[split..]
        .iter()
        .fold(ModelDef::new("Nested"), |model, name| {
            model.field(FieldDef::new(name.clone(), TypeRef::Int))
        })
        .into_type();

    leaves[..split]
        .iter()
        .fold(ModelDef::new("Top"), |model, name| {
            model.field(FieldDef::new(name.clone(), TypeRef::list(TypeRef::Str)))
        })
        .field(FieldDef::new("nested", nested))
        .into_type()
}

proptest! {
    #[test]
    fn distinct_leaves_flatten_without_error(
        leaves in prop::collection::btree_set(ident(), 1..8),
        split in 0usize..8,
    ) {
        let leaves: Vec<String> = leaves.into_iter().collect();
        let model = model_with_leaves(&leaves, split);
        let params = vec![FuncParam::new("root", ParamSource::query(), model)];
        let map = build_flatten_map(&params).unwrap();

        prop_assert_eq!(map.len(), leaves.len());
        prop_assert_eq!(map.reverse().len(), leaves.len());
        for (wire_name, path) in map.iter() {
            prop_assert_eq!(path.leaf(), wire_name);
            prop_assert_eq!(path.root(), "root");
            prop_assert_eq!(map.wire_name_for(path), Some(wire_name));
            prop_assert!(resolve_leaf(&params, path).is_some());
        }
    }

    #[test]
    fn shared_leaf_names_clash(
        left in prop::collection::btree_set(ident(), 1..5),
        right in prop::collection::btree_set(ident(), 1..5),
    ) {
        let left: Vec<String> = left.into_iter().collect();
        let right: Vec<String> = right.into_iter().collect();
        let overlap: BTreeSet<&String> = left.iter().filter(|n| right.contains(n)).collect();

        let params = vec![
            FuncParam::new("a", ParamSource::query(), model_with_leaves(&left, left.len())),
            FuncParam::new("b", ParamSource::query(), model_with_leaves(&right, 0)),
        ];

        match build_flatten_map(&params) {
            Ok(map) => {
                prop_assert!(overlap.is_empty());
                prop_assert_eq!(map.len(), left.len() + right.len());
            }
            Err(SignatureError::DuplicateWireName { name, first, second }) => {
                prop_assert!(overlap.contains(&name));
                prop_assert_eq!(first, "a");
                prop_assert_eq!(second, "b");
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

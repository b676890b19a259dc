//! Type classification predicates and collection detection.
//!
//! Query strings, form bodies and header maps hand every value over as a list
//! of strings. The dispatcher needs to know which wire names should be kept as
//! lists and which collapsed to a single value; [`detect_collection_fields`]
//! answers that once per schema.

use hypatia_core::TypeRef;
use indexmap::IndexSet;

use crate::flatten::{FlattenMap, FlattenPath};
use crate::infer::FuncParam;

/// True iff `ty` is a structured model.
#[must_use]
pub fn is_structured_model(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::Model(_))
}

/// True iff `ty` is a list, set or tuple.
///
/// `Optional[list[T]]` is not a collection here; field-level checks strip the
/// optional wrapper first (see [`detect_collection_fields`]).
#[must_use]
pub fn is_collection_type(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::List(_) | TypeRef::Set(_) | TypeRef::Tuple(_))
}

/// True iff `ty` is the upload type or a collection of it.
#[must_use]
pub fn is_upload_file(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::UploadedFile => true,
        other if is_collection_type(other) => {
            matches!(other.element_type(), Some(TypeRef::UploadedFile))
        }
        _ => false,
    }
}

/// A flattened leaf resolved back to its declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf<'a> {
    /// The parameter the path starts from.
    pub param: &'a FuncParam,
    /// The leaf's outer declared type.
    pub ty: &'a TypeRef,
    /// Whether the leaf must be present (root and every step required).
    pub required: bool,
}

/// Walks a flatten path from its root parameter down to the leaf field.
///
/// Each step is looked up by alias first, then by attribute name. Returns
/// `None` if the root alias is unknown or a step does not resolve.
#[must_use]
pub fn resolve_leaf<'a>(params: &'a [FuncParam], path: &FlattenPath) -> Option<Leaf<'a>> {
    let param = params.iter().find(|p| p.alias == path.root())?;
    let mut ty = &param.annotation;
    let mut required = param.source.default().is_required();

    for attr in path.nested_steps() {
        let model = ty.innermost().as_model()?;
        let field = model.lookup(attr)?;
        ty = field.outer_type();
        required &= field.required;
    }

    Some(Leaf {
        param,
        ty,
        required,
    })
}

/// Returns the wire names that must be read as repeated values.
///
/// This is the union of every collection-typed parameter's alias and every
/// nested flattened wire name whose leaf field is a collection.
#[must_use]
pub fn detect_collection_fields(
    params: &[FuncParam],
    flatten_map: Option<&FlattenMap>,
) -> IndexSet<String> {
    let mut result: IndexSet<String> = params
        .iter()
        .filter(|p| p.is_collection)
        .map(|p| p.alias.clone())
        .collect();

    if let Some(flatten_map) = flatten_map {
        for (wire_name, path) in flatten_map.iter().filter(|(_, p)| p.is_nested()) {
            let is_collection =
                resolve_leaf(params, path).is_some_and(|leaf| is_collection_type(leaf.ty));
            if is_collection {
                result.insert(wire_name.to_string());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::build_flatten_map;
    use hypatia_core::{fixtures, FieldDef, ModelDef, ParamSource};

    fn query_param(name: &str, ty: TypeRef) -> FuncParam {
        FuncParam::new(name, ParamSource::query(), ty)
    }

    #[test]
    fn test_is_structured_model() {
        assert!(is_structured_model(&fixtures::item_model()));
        assert!(!is_structured_model(&TypeRef::Str));
        assert!(!is_structured_model(&TypeRef::list(fixtures::item_model())));
        assert!(!is_structured_model(&TypeRef::Any));
    }

    #[test]
    fn test_is_collection_type() {
        assert!(is_collection_type(&TypeRef::list(TypeRef::Int)));
        assert!(is_collection_type(&TypeRef::set(TypeRef::Str)));
        assert!(is_collection_type(&TypeRef::tuple([TypeRef::Int, TypeRef::Str])));
        assert!(is_collection_type(&TypeRef::list(TypeRef::Any)));
        assert!(!is_collection_type(&TypeRef::Dict));
        assert!(!is_collection_type(&TypeRef::Str));
        assert!(!is_collection_type(&TypeRef::optional(TypeRef::list(TypeRef::Int))));
    }

    #[test]
    fn test_is_upload_file() {
        assert!(is_upload_file(&TypeRef::UploadedFile));
        assert!(is_upload_file(&TypeRef::list(TypeRef::UploadedFile)));
        assert!(!is_upload_file(&TypeRef::optional(TypeRef::UploadedFile)));
        assert!(!is_upload_file(&TypeRef::Bytes));
    }

    #[test]
    fn test_collection_params_use_wire_alias() {
        let mut ids = query_param("ids", TypeRef::list(TypeRef::Int));
        ids.alias = "id".to_string();
        let params = vec![ids, query_param("q", TypeRef::Str)];

        let fields = detect_collection_fields(&params, None);
        assert_eq!(fields.into_iter().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_nested_repeated_leaf_detected() {
        let params = vec![query_param("customer", fixtures::customer_model())];
        let map = build_flatten_map(&params).unwrap();

        let fields = detect_collection_fields(&params, Some(&map));
        assert!(fields.contains("zip"));
        assert!(!fields.contains("city"));
        assert!(!fields.contains("name"));
    }

    #[test]
    fn test_resolve_leaf_round_trip() {
        let params = vec![query_param("filters", fixtures::filters_model())];
        let map = build_flatten_map(&params).unwrap();

        let tag = resolve_leaf(&params, map.get("tag").unwrap()).unwrap();
        assert_eq!(tag.ty, &TypeRef::list(TypeRef::Str));

        // Optional wrapper is stripped from the leaf.
        let q = resolve_leaf(&params, map.get("q").unwrap()).unwrap();
        assert_eq!(q.ty, &TypeRef::Str);
        assert!(!q.required);

        let min = resolve_leaf(&params, map.get("min").unwrap()).unwrap();
        assert_eq!(min.ty, &TypeRef::Float);
    }

    #[test]
    fn test_resolve_leaf_falls_back_to_attribute_name() {
        let model = ModelDef::new("M")
            .field(FieldDef::new("page_size", TypeRef::list(TypeRef::Int)).alias("pageSize"))
            .into_type();
        let params = vec![query_param("m", model)];

        let path = FlattenPath::new(["m", "page_size"]);
        let leaf = resolve_leaf(&params, &path).unwrap();
        assert_eq!(leaf.ty, &TypeRef::list(TypeRef::Int));
    }

    #[test]
    fn test_resolve_leaf_unknown_root() {
        let params = vec![query_param("m", fixtures::item_model())];
        assert!(resolve_leaf(&params, &FlattenPath::new(["other", "name"])).is_none());
        assert!(resolve_leaf(&params, &FlattenPath::new(["m", "missing"])).is_none());
    }
}

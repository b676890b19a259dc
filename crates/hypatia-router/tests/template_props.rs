//! Property tests for path template name extraction.

use hypatia_router::{path_param_names, PathTemplate};
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn names_follow_declaration_order(names in prop::collection::vec(ident(), 0..6)) {
        let template: String = names
            .iter()
            .map(|n| format!("/seg/{{{n}}}"))
            .collect();

        let mut expected: Vec<String> = Vec::new();
        for n in &names {
            if !expected.contains(n) {
                expected.push(n.clone());
            }
        }

        prop_assert_eq!(path_param_names(&template).unwrap(), expected);
    }

    #[test]
    fn converter_prefix_is_not_part_of_name(conv in ident(), name in ident()) {
        let template = format!("/items/{{{conv}:{name}}}");
        prop_assert_eq!(path_param_names(&template).unwrap(), vec![name]);
    }

    #[test]
    fn static_templates_have_no_params(parts in prop::collection::vec("[a-z0-9-]{1,8}", 0..6)) {
        let template = format!("/{}", parts.join("/"));
        let parsed = PathTemplate::parse(&template).unwrap();
        prop_assert!(!parsed.has_params());
        prop_assert_eq!(parsed.segments().len(), parts.len());
    }
}

//! Source inference.
//!
//! Every handler parameter that does not name its source explicitly is bound
//! by the first matching rule of [`RULES`]:
//!
//! | # | Rule | Decides |
//! |---|------|---------|
//! | 1 | [`RuleId::Request`] | `request` object |
//! | 2 | [`RuleId::MissingAnnotation`] | rewrites the annotation from the default |
//! | 3 | [`RuleId::NoneCollapse`] | rewrites `None` / `...` annotations to `str` |
//! | 4 | [`RuleId::AutoFile`] | uploaded files without an explicit marker |
//! | 5 | [`RuleId::ExplicitMarker`] | `= Query(...)`, `= Header(...)`, ... |
//! | 6 | [`RuleId::PathMatch`] | names declared in the path template |
//! | 7 | [`RuleId::StructuredBody`] | models and collections |
//! | 8 | [`RuleId::QueryFallback`] | everything else |

use std::fmt;

use hypatia_core::{ParamDefault, ParamSource, SignatureError, SignatureResult, SourceKind, TypeRef};
use serde_json::Value;

use crate::classify::{is_collection_type, is_structured_model, is_upload_file};
use crate::reflect::{ArgDefault, ContributedParam, Parameter};

/// A handler parameter bound to its source.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncParam {
    /// Identifier as declared.
    pub name: String,
    /// Wire name: the marker alias, or `name`.
    pub alias: String,
    /// Where the value is read from.
    pub source: ParamSource,
    /// Declared type after inference.
    pub annotation: TypeRef,
    /// Whether the value is repeated on the wire.
    pub is_collection: bool,
}

impl FuncParam {
    /// Binds `name` to `source`, computing alias and collection-ness.
    #[must_use]
    pub fn new(name: impl Into<String>, source: ParamSource, annotation: TypeRef) -> Self {
        let name = name.into();
        let alias = source
            .alias_name()
            .map_or_else(|| name.clone(), str::to_string);
        let is_collection = is_collection_type(&annotation);
        Self {
            name,
            alias,
            source,
            annotation,
            is_collection,
        }
    }

    /// Binds a parameter contributed by an extension. These are never treated
    /// as collections.
    #[must_use]
    pub fn contributed(param: &ContributedParam) -> Self {
        Self {
            is_collection: false,
            ..Self::new(param.name.clone(), param.source.clone(), param.ty.clone())
        }
    }

    /// The source kind.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.source.kind()
    }
}

/// Identifies an inference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    /// The request object.
    Request,
    /// Annotation inferred from the default.
    MissingAnnotation,
    /// `None` / `...` annotations collapsed to `str`.
    NoneCollapse,
    /// Upload annotations bound to files.
    AutoFile,
    /// Marker given as default.
    ExplicitMarker,
    /// Name declared in the path template.
    PathMatch,
    /// Models and collections read from the body.
    StructuredBody,
    /// Query string.
    QueryFallback,
}

impl RuleId {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::MissingAnnotation => "missing_annotation",
            Self::NoneCollapse => "none_collapse",
            Self::AutoFile => "auto_file",
            Self::ExplicitMarker => "explicit_marker",
            Self::PathMatch => "path_match",
            Self::StructuredBody => "structured_body",
            Self::QueryFallback => "query_fallback",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler-wide facts the rules consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferContext<'a> {
    path_params: &'a [String],
}

impl<'a> InferContext<'a> {
    /// Creates a context for a handler whose path declares `path_params`.
    #[must_use]
    pub const fn new(path_params: &'a [String]) -> Self {
        Self { path_params }
    }

    fn is_path_param(&self, name: &str) -> bool {
        self.path_params.iter().any(|p| p == name)
    }
}

/// The parameter under inference.
struct Candidate<'a> {
    position: usize,
    param: &'a Parameter,
    annotation: TypeRef,
    annotated: bool,
}

impl Candidate<'_> {
    fn bind(&self, source: ParamSource) -> FuncParam {
        FuncParam::new(self.param.name.clone(), source, self.annotation.clone())
    }

    fn query(&self) -> FuncParam {
        self.bind(ParamSource::query().with_param_default(declared_default(&self.param.default)))
    }
}

type RuleFn = fn(&mut Candidate<'_>, &InferContext<'_>) -> SignatureResult<Option<FuncParam>>;

/// An entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Rule identity.
    pub id: RuleId,
    apply: RuleFn,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish_non_exhaustive()
    }
}

/// The rule table, in evaluation order.
pub const RULES: [Rule; 8] = [
    Rule {
        id: RuleId::Request,
        apply: request_rule,
    },
    Rule {
        id: RuleId::MissingAnnotation,
        apply: missing_annotation_rule,
    },
    Rule {
        id: RuleId::NoneCollapse,
        apply: none_collapse_rule,
    },
    Rule {
        id: RuleId::AutoFile,
        apply: auto_file_rule,
    },
    Rule {
        id: RuleId::ExplicitMarker,
        apply: explicit_marker_rule,
    },
    Rule {
        id: RuleId::PathMatch,
        apply: path_match_rule,
    },
    Rule {
        id: RuleId::StructuredBody,
        apply: structured_body_rule,
    },
    Rule {
        id: RuleId::QueryFallback,
        apply: query_fallback_rule,
    },
];

/// The outcome of inference for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// The rule that decided.
    pub rule: RuleId,
    /// The bound parameter.
    pub param: FuncParam,
}

/// Binds the parameter at `position` to a source.
///
/// # Errors
///
/// Returns [`SignatureError::PathParamDefault`] if a path-template parameter
/// declares a default without an explicit marker.
pub fn infer_source(
    position: usize,
    param: &Parameter,
    ctx: &InferContext<'_>,
) -> SignatureResult<Classified> {
    let mut candidate = Candidate {
        position,
        param,
        annotation: param.annotation.clone().unwrap_or(TypeRef::Any),
        annotated: param.annotation.is_some(),
    };

    for rule in &RULES {
        if let Some(bound) = (rule.apply)(&mut candidate, ctx)? {
            return Ok(Classified {
                rule: rule.id,
                param: bound,
            });
        }
    }

    Ok(Classified {
        rule: RuleId::QueryFallback,
        param: candidate.query(),
    })
}

/// The marker default for a plain declared default.
fn declared_default(default: &ArgDefault) -> ParamDefault {
    match default {
        ArgDefault::Value(value) => ParamDefault::Value(value.clone()),
        ArgDefault::Source(source) => source.default().clone(),
        ArgDefault::Empty | ArgDefault::Ellipsis => ParamDefault::Required,
    }
}

fn request_rule(c: &mut Candidate<'_>, _: &InferContext<'_>) -> SignatureResult<Option<FuncParam>> {
    let annotated_request = c.annotated && c.annotation == TypeRef::Request;
    let bare_request = !c.annotated
        && c.position == 0
        && c.param.name == "request"
        && c.param.default.is_empty();

    if annotated_request || bare_request {
        return Ok(Some(FuncParam::new(
            c.param.name.clone(),
            ParamSource::request(),
            TypeRef::Any,
        )));
    }
    Ok(None)
}

fn missing_annotation_rule(
    c: &mut Candidate<'_>,
    _: &InferContext<'_>,
) -> SignatureResult<Option<FuncParam>> {
    if !c.annotated {
        c.annotation = match &c.param.default {
            ArgDefault::Empty => TypeRef::Str,
            ArgDefault::Ellipsis => TypeRef::Ellipsis,
            ArgDefault::Value(value) => TypeRef::of_value(value),
            ArgDefault::Source(source) => match source.default() {
                ParamDefault::Required => TypeRef::Ellipsis,
                ParamDefault::Value(value) => TypeRef::of_value(value),
            },
        };
        c.annotated = true;
    }
    Ok(None)
}

fn none_collapse_rule(
    c: &mut Candidate<'_>,
    _: &InferContext<'_>,
) -> SignatureResult<Option<FuncParam>> {
    if matches!(c.annotation, TypeRef::None | TypeRef::Ellipsis) {
        c.annotation = TypeRef::Str;
    }
    Ok(None)
}

fn auto_file_rule(c: &mut Candidate<'_>, _: &InferContext<'_>) -> SignatureResult<Option<FuncParam>> {
    if !is_upload_file(&c.annotation) {
        return Ok(None);
    }
    let default = match &c.param.default {
        ArgDefault::Empty => ParamDefault::Required,
        ArgDefault::Value(Value::Null) => ParamDefault::Value(Value::Null),
        _ => return Ok(None),
    };
    Ok(Some(c.bind(ParamSource::file().with_param_default(default))))
}

fn explicit_marker_rule(
    c: &mut Candidate<'_>,
    _: &InferContext<'_>,
) -> SignatureResult<Option<FuncParam>> {
    Ok(c.param.default.as_source().map(|source| c.bind(source.clone())))
}

fn path_match_rule(c: &mut Candidate<'_>, ctx: &InferContext<'_>) -> SignatureResult<Option<FuncParam>> {
    if !ctx.is_path_param(&c.param.name) {
        return Ok(None);
    }
    if !c.param.default.is_empty() {
        return Err(SignatureError::path_param_default(c.param.name.clone()));
    }
    Ok(Some(c.bind(ParamSource::path())))
}

fn structured_body_rule(
    c: &mut Candidate<'_>,
    _: &InferContext<'_>,
) -> SignatureResult<Option<FuncParam>> {
    if is_collection_type(&c.annotation) || is_structured_model(&c.annotation) {
        let source = ParamSource::body().with_param_default(declared_default(&c.param.default));
        return Ok(Some(c.bind(source)));
    }
    Ok(None)
}

fn query_fallback_rule(
    c: &mut Candidate<'_>,
    _: &InferContext<'_>,
) -> SignatureResult<Option<FuncParam>> {
    Ok(Some(c.query()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypatia_core::fixtures;
    use serde_json::json;

    fn infer(param: &Parameter) -> Classified {
        infer_at(0, param, &[])
    }

    fn infer_at(position: usize, param: &Parameter, path: &[&str]) -> Classified {
        let path: Vec<String> = path.iter().map(ToString::to_string).collect();
        infer_source(position, param, &InferContext::new(&path)).unwrap()
    }

    #[test]
    fn test_rule_table_order() {
        let ids: Vec<_> = RULES.iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                RuleId::Request,
                RuleId::MissingAnnotation,
                RuleId::NoneCollapse,
                RuleId::AutoFile,
                RuleId::ExplicitMarker,
                RuleId::PathMatch,
                RuleId::StructuredBody,
                RuleId::QueryFallback,
            ]
        );
    }

    #[test]
    fn test_request_by_annotation() {
        let param = Parameter::new("req").annotated(TypeRef::Request);
        let out = infer_at(3, &param, &[]);

        assert_eq!(out.rule, RuleId::Request);
        assert_eq!(out.param.kind(), SourceKind::Request);
        assert_eq!(out.param.annotation, TypeRef::Any);
        assert!(!out.param.is_collection);
    }

    #[test]
    fn test_request_by_convention() {
        let out = infer(&Parameter::new("request"));
        assert_eq!(out.rule, RuleId::Request);
        assert_eq!(out.param.kind(), SourceKind::Request);
    }

    #[test]
    fn test_request_convention_needs_first_position() {
        let out = infer_at(1, &Parameter::new("request"), &[]);
        assert_eq!(out.rule, RuleId::QueryFallback);
        assert_eq!(out.param.annotation, TypeRef::Str);
    }

    #[test]
    fn test_request_convention_needs_no_default() {
        let param = Parameter::new("request").default_value(json!("x"));
        assert_eq!(infer(&param).param.kind(), SourceKind::Query);
    }

    #[test]
    fn test_request_annotation_beats_marker() {
        let param = Parameter::new("req")
            .annotated(TypeRef::Request)
            .default_source(ParamSource::header());
        assert_eq!(infer(&param).param.kind(), SourceKind::Request);
    }

    #[test]
    fn test_missing_annotation_from_value() {
        let out = infer_at(1, &Parameter::new("limit").default_value(json!(10)), &[]);
        assert_eq!(out.param.annotation, TypeRef::Int);
        assert_eq!(out.param.source.default(), &ParamDefault::Value(json!(10)));

        let out = infer_at(1, &Parameter::new("ids").default_value(json!([1, 2])), &[]);
        assert_eq!(out.rule, RuleId::StructuredBody);
        assert!(out.param.is_collection);
    }

    #[test]
    fn test_missing_annotation_from_marker_default() {
        let param = Parameter::new("flag").default_source(ParamSource::query().with_default(json!(true)));
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.param.annotation, TypeRef::Bool);

        // Required marker: ellipsis collapses to str.
        let param = Parameter::new("token").default_source(ParamSource::header());
        assert_eq!(infer_at(1, &param, &[]).param.annotation, TypeRef::Str);
    }

    #[test]
    fn test_none_collapse() {
        let param = Parameter::new("x").annotated(TypeRef::None);
        assert_eq!(infer_at(1, &param, &[]).param.annotation, TypeRef::Str);

        let param = Parameter::new("y").default_value(Value::Null);
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.param.annotation, TypeRef::Str);
        assert_eq!(out.param.source.default(), &ParamDefault::Value(Value::Null));

        let param = Parameter::new("z").ellipsis_default();
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.param.annotation, TypeRef::Str);
        assert!(out.param.source.default().is_required());
    }

    #[test]
    fn test_auto_file() {
        let param = Parameter::new("upload").annotated(TypeRef::UploadedFile);
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.rule, RuleId::AutoFile);
        assert_eq!(out.param.kind(), SourceKind::File);
        assert!(out.param.source.default().is_required());

        let param = Parameter::new("uploads")
            .annotated(TypeRef::list(TypeRef::UploadedFile))
            .default_value(Value::Null);
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.param.kind(), SourceKind::File);
        assert_eq!(out.param.source.default(), &ParamDefault::Value(Value::Null));
        assert!(out.param.is_collection);
    }

    #[test]
    fn test_auto_file_defers_to_marker() {
        let param = Parameter::new("upload")
            .annotated(TypeRef::UploadedFile)
            .default_source(ParamSource::form());
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.rule, RuleId::ExplicitMarker);
        assert_eq!(out.param.kind(), SourceKind::Form);
    }

    #[test]
    fn test_explicit_marker_wins() {
        let item = fixtures::item_model();
        let param = Parameter::new("id")
            .annotated(item.clone())
            .default_source(ParamSource::query().alias("item"));
        let out = infer_at(1, &param, &["id"]);

        assert_eq!(out.rule, RuleId::ExplicitMarker);
        assert_eq!(out.param.kind(), SourceKind::Query);
        assert_eq!(out.param.alias, "item");
        assert_eq!(out.param.annotation, item);
    }

    #[test]
    fn test_path_match() {
        let param = Parameter::new("id").annotated(TypeRef::Int);
        let out = infer_at(1, &param, &["id"]);
        assert_eq!(out.rule, RuleId::PathMatch);
        assert_eq!(out.param.kind(), SourceKind::Path);
        assert!(out.param.source.default().is_required());
    }

    #[test]
    fn test_path_match_rejects_default() {
        let path = vec!["id".to_string()];
        let ctx = InferContext::new(&path);

        for param in [
            Parameter::new("id").annotated(TypeRef::Int).default_value(json!(1)),
            Parameter::new("id").annotated(TypeRef::Int).ellipsis_default(),
        ] {
            let err = infer_source(1, &param, &ctx).unwrap_err();
            assert_eq!(err, SignatureError::path_param_default("id"));
        }
    }

    #[test]
    fn test_structured_body() {
        let param = Parameter::new("item").annotated(fixtures::item_model());
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.rule, RuleId::StructuredBody);
        assert_eq!(out.param.kind(), SourceKind::Body);
        assert!(!out.param.is_collection);

        let param = Parameter::new("ids")
            .annotated(TypeRef::set(TypeRef::Int))
            .default_value(json!([]));
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.param.kind(), SourceKind::Body);
        assert_eq!(out.param.source.default(), &ParamDefault::Value(json!([])));
        assert!(out.param.is_collection);
    }

    #[test]
    fn test_optional_collection_is_query() {
        let param = Parameter::new("tags").annotated(TypeRef::optional(TypeRef::list(TypeRef::Str)));
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.rule, RuleId::QueryFallback);
        assert!(!out.param.is_collection);
    }

    #[test]
    fn test_query_fallback() {
        let param = Parameter::new("q").annotated(TypeRef::Str).default_value(json!("x"));
        let out = infer_at(1, &param, &[]);
        assert_eq!(out.rule, RuleId::QueryFallback);
        assert_eq!(out.param.alias, "q");
        assert_eq!(out.param.source.default().value(), Some(&json!("x")));
    }

    #[test]
    fn test_contributed_is_never_collection() {
        let contributed = ContributedParam {
            name: "roles".to_string(),
            ty: TypeRef::list(TypeRef::Str),
            source: ParamSource::header().alias("X-Roles"),
        };
        let param = FuncParam::contributed(&contributed);
        assert_eq!(param.alias, "X-Roles");
        assert!(!param.is_collection);
    }
}

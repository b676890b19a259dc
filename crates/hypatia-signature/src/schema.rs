//! Synthesized per-source schemas.
//!
//! One [`SynthesizedSchema`] is produced for every source kind a handler
//! reads from. The validation layer turns it into a concrete model; the
//! dispatcher uses the shape data (flatten map, single attribute, body
//! parameters) to pick values out of the request.

use hypatia_core::{
    ParamSource, SignatureError, SignatureOptions, SignatureResult, SourceKind, TypeRef,
};
use indexmap::{IndexMap, IndexSet};

use crate::classify::detect_collection_fields;
use crate::flatten::{build_flatten_map, FlattenMap};
use crate::infer::FuncParam;

/// One field of a synthesized schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Attribute name (the handler parameter name).
    pub name: String,
    /// Wire alias.
    pub alias: String,
    /// Declared type.
    pub annotation: TypeRef,
    /// Marker carrying default, alias and description.
    pub source: ParamSource,
}

impl From<&FuncParam> for SchemaField {
    fn from(param: &FuncParam) -> Self {
        Self {
            name: param.name.clone(),
            alias: param.alias.clone(),
            annotation: param.annotation.clone(),
            source: param.source.clone(),
        }
    }
}

/// Per-kind data attached to a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaShape {
    /// The request object; `single_attr` is the parameter receiving it.
    Request {
        /// Parameter name.
        single_attr: String,
    },
    /// Uploaded files, read by parameter name.
    File,
    /// Path segments.
    Path(FlattenMap),
    /// Query string.
    Query(FlattenMap),
    /// Headers.
    Header(FlattenMap),
    /// Cookies.
    Cookie(FlattenMap),
    /// Form fields.
    Form(FlattenMap),
    /// JSON body. With `single_attr` set the whole body binds to that field.
    Body {
        /// Field bound to the whole body, if any.
        single_attr: Option<String>,
    },
    /// JSON parts of a multipart body.
    MultipartBody {
        /// Wire alias to declared type.
        body_params: IndexMap<String, TypeRef>,
    },
}

impl SchemaShape {
    /// The source kind this shape belongs to.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Request { .. } => SourceKind::Request,
            Self::File => SourceKind::File,
            Self::Path(_) => SourceKind::Path,
            Self::Query(_) => SourceKind::Query,
            Self::Header(_) => SourceKind::Header,
            Self::Cookie(_) => SourceKind::Cookie,
            Self::Form(_) => SourceKind::Form,
            Self::Body { .. } => SourceKind::Body,
            Self::MultipartBody { .. } => SourceKind::MultipartBody,
        }
    }

    /// The flatten map of a flat-source shape.
    #[must_use]
    pub const fn flatten_map(&self) -> Option<&FlattenMap> {
        match self {
            Self::Path(map)
            | Self::Query(map)
            | Self::Header(map)
            | Self::Cookie(map)
            | Self::Form(map) => Some(map),
            _ => None,
        }
    }

    fn flat(kind: SourceKind, map: FlattenMap) -> Self {
        match kind {
            SourceKind::Path => Self::Path(map),
            SourceKind::Header => Self::Header(map),
            SourceKind::Cookie => Self::Cookie(map),
            SourceKind::Form => Self::Form(map),
            _ => Self::Query(map),
        }
    }
}

/// The schema for one source group.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedSchema {
    name: &'static str,
    fields: Vec<SchemaField>,
    collection_fields: IndexSet<String>,
    shape: SchemaShape,
}

impl SynthesizedSchema {
    /// Builds the schema for `params`, all bound to `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`hypatia_core::SignatureError::DuplicateWireName`] if two
    /// parameters (or, for flat groups, two flattened leaves) share a wire
    /// name.
    pub fn synthesize(
        kind: SourceKind,
        params: &[FuncParam],
        options: &SignatureOptions,
    ) -> SignatureResult<Self> {
        if !kind.is_flat() {
            ensure_unique_aliases(params)?;
        }

        let shape = match kind {
            SourceKind::Request => SchemaShape::Request {
                single_attr: params.first().map(|p| p.name.clone()).unwrap_or_default(),
            },
            SourceKind::File => SchemaShape::File,
            SourceKind::Body => {
                let single_attr = match params {
                    [only] if options.body_shortcut.applies(only.is_collection) => {
                        Some(only.name.clone())
                    }
                    _ => None,
                };
                SchemaShape::Body { single_attr }
            }
            SourceKind::MultipartBody => SchemaShape::MultipartBody {
                body_params: params
                    .iter()
                    .map(|p| (p.alias.clone(), p.annotation.clone()))
                    .collect(),
            },
            flat => SchemaShape::flat(flat, build_flatten_map(params)?),
        };

        let collection_fields = detect_collection_fields(params, shape.flatten_map());

        Ok(Self {
            name: kind.schema_name(),
            fields: params.iter().map(SchemaField::from).collect(),
            collection_fields,
            shape,
        })
    }

    /// Schema class name, e.g. `QueryParams`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The source kind.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.shape.kind()
    }

    /// The dispatcher tag for the source kind.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    /// Fields in parameter order.
    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Looks up a field by attribute name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wire names read as repeated values.
    #[must_use]
    pub const fn collection_fields(&self) -> &IndexSet<String> {
        &self.collection_fields
    }

    /// Per-kind data.
    #[must_use]
    pub const fn shape(&self) -> &SchemaShape {
        &self.shape
    }

    /// The flatten map, for flat sources.
    #[must_use]
    pub const fn flatten_map(&self) -> Option<&FlattenMap> {
        self.shape.flatten_map()
    }

    /// The field bound to the whole value, for request and body schemas.
    #[must_use]
    pub fn single_attr(&self) -> Option<&str> {
        match &self.shape {
            SchemaShape::Request { single_attr } => Some(single_attr),
            SchemaShape::Body { single_attr } => single_attr.as_deref(),
            _ => None,
        }
    }

    /// Alias to type map, for multipart body schemas.
    #[must_use]
    pub const fn body_params(&self) -> Option<&IndexMap<String, TypeRef>> {
        match &self.shape {
            SchemaShape::MultipartBody { body_params } => Some(body_params),
            _ => None,
        }
    }
}

/// Rejects a wire alias used by two parameters of a non-flat group.
fn ensure_unique_aliases(params: &[FuncParam]) -> SignatureResult<()> {
    let mut owners: IndexMap<&str, &str> = IndexMap::with_capacity(params.len());
    for param in params {
        if let Some(first) = owners.insert(param.alias.as_str(), param.name.as_str()) {
            return Err(SignatureError::duplicate_wire_name(
                param.alias.clone(),
                first,
                param.name.clone(),
            ));
        }
    }
    Ok(())
}

//! Annotation model.
//!
//! Handlers declare their parameters with type annotations. Hypatia never
//! inspects live types; it works on [`TypeRef`], a closed description of the
//! annotations a handler can declare, plus [`ModelDef`] for structured models
//! provided by the validation layer.
//!
//! # Example
//!
//! ```
//! use hypatia_core::{FieldDef, ModelDef, TypeRef};
//!
//! let filters = ModelDef::new("Filters")
//!     .field(FieldDef::new("q", TypeRef::Str).optional())
//!     .field(FieldDef::new("tags", TypeRef::list(TypeRef::Str)).alias("tag"))
//!     .into_type();
//!
//! let model = filters.as_model().unwrap();
//! assert_eq!(model.lookup("tag").unwrap().name, "tags");
//! assert_eq!(filters.to_string(), "Filters");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A declared type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// Untyped; accepted as-is.
    Any,
    /// The none-type (`type(None)`).
    None,
    /// The "required" sentinel type (`type(...)`).
    Ellipsis,
    /// Text.
    Str,
    /// Integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean.
    Bool,
    /// Raw bytes.
    Bytes,
    /// Untyped mapping.
    Dict,
    /// Any other scalar class, by name (e.g. `date`, `uuid`).
    Named(String),
    /// The live request object.
    Request,
    /// An uploaded file.
    UploadedFile,
    /// `list[T]`
    List(Box<TypeRef>),
    /// `set[T]`
    Set(Box<TypeRef>),
    /// `tuple[T, ...]`
    Tuple(Vec<TypeRef>),
    /// `Optional[T]`
    Optional(Box<TypeRef>),
    /// A structured model.
    Model(Arc<ModelDef>),
}

impl TypeRef {
    /// `list[item]`
    #[must_use]
    pub fn list(item: TypeRef) -> Self {
        Self::List(Box::new(item))
    }

    /// `set[item]`
    #[must_use]
    pub fn set(item: TypeRef) -> Self {
        Self::Set(Box::new(item))
    }

    /// `tuple[items...]`
    #[must_use]
    pub fn tuple(items: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    /// `Optional[inner]`
    #[must_use]
    pub fn optional(inner: TypeRef) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Opaque named scalar.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The runtime type of a literal default value.
    ///
    /// `null` maps to [`TypeRef::None`]; arrays become `list[Any]` and objects
    /// become [`TypeRef::Dict`].
    #[must_use]
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Int,
            Value::String(_) => Self::Str,
            Value::Array(_) => Self::list(Self::Any),
            Value::Object(_) => Self::Dict,
        }
    }

    /// Returns the model definition if this is directly a model type.
    #[must_use]
    pub fn as_model(&self) -> Option<&ModelDef> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Returns the first type argument of a list, set or tuple.
    #[must_use]
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            Self::List(item) | Self::Set(item) => Some(item),
            Self::Tuple(items) => items.first(),
            _ => None,
        }
    }

    /// Strips any number of `Optional` wrappers.
    #[must_use]
    pub fn strip_optional(&self) -> &TypeRef {
        let mut current = self;
        while let Self::Optional(inner) = current {
            current = inner;
        }
        current
    }

    /// Strips `Optional` and collection wrappers down to the element type.
    #[must_use]
    pub fn innermost(&self) -> &TypeRef {
        let mut current = self.strip_optional();
        while let Some(item) = current.element_type() {
            current = item.strip_optional();
        }
        current
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::None => write!(f, "None"),
            Self::Ellipsis => write!(f, "ellipsis"),
            Self::Str => write!(f, "str"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Bytes => write!(f, "bytes"),
            Self::Dict => write!(f, "dict"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Request => write!(f, "HttpRequest"),
            Self::UploadedFile => write!(f, "UploadedFile"),
            Self::List(item) => write!(f, "List[{item}]"),
            Self::Set(item) => write!(f, "Set[{item}]"),
            Self::Tuple(items) => {
                write!(f, "Tuple[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Model(model) => write!(f, "{}", model.name),
        }
    }
}

impl From<ModelDef> for TypeRef {
    fn from(model: ModelDef) -> Self {
        Self::Model(Arc::new(model))
    }
}

/// A structured model: a named, ordered set of fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    /// Model class name.
    pub name: String,
    fields: Vec<FieldDef>,
}

impl ModelDef {
    /// Creates an empty model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Finds a field by wire alias, falling back to its declared name.
    #[must_use]
    pub fn lookup(&self, attr: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.wire_name() == attr)
            .or_else(|| self.fields.iter().find(|f| f.name == attr))
    }

    /// Wraps the model into a [`TypeRef`].
    #[must_use]
    pub fn into_type(self) -> TypeRef {
        TypeRef::from(self)
    }
}

/// One field of a [`ModelDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Attribute name.
    pub name: String,
    /// Wire alias, if different from `name`.
    pub alias: Option<String>,
    /// Declared type, including any `Optional` wrapper.
    pub ty: TypeRef,
    /// Whether the field must be present.
    pub required: bool,
}

impl FieldDef {
    /// Creates a required field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            alias: None,
            ty,
            required: true,
        }
    }

    /// Sets the wire alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Marks the field as not required.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Alias if set, otherwise the attribute name.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// The declared type with the `Optional` wrapper removed.
    #[must_use]
    pub fn outer_type(&self) -> &TypeRef {
        self.ty.strip_optional()
    }

    /// The element type: `Optional` and collection wrappers removed.
    #[must_use]
    pub fn inner_type(&self) -> &TypeRef {
        self.ty.innermost()
    }
}

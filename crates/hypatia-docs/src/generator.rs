//! OpenAPI generation from analysed handler signatures.
//!
//! Every [`ViewSignature`] becomes one [`Operation`]: flat sources turn into
//! parameters (one per flattened wire name), body-like sources into a single
//! request body, and structured models into reusable component schemas.

use std::sync::Arc;

use hypatia_core::{ModelDef, SourceKind, TypeRef};
use hypatia_router::{PathTemplate, Placeholder, SegmentKind};
use hypatia_signature::{resolve_leaf, FuncParam, SynthesizedSchema, ViewSignature};
use indexmap::IndexMap;

use crate::error::{DocsError, DocsResult};
use crate::openapi::{
    Components, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem,
    RequestBody, Response, Schema,
};

/// Media type of JSON bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";
/// Media type of urlencoded forms.
pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
/// Media type of forms carrying files or JSON parts.
pub const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

const COMPONENT_PREFIX: &str = "#/components/schemas/";

/// Collects structured models as component schemas while converting types.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
    models: IndexMap<String, Arc<ModelDef>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a declared type to a schema.
    ///
    /// Models are registered once under their name and returned as `$ref`
    /// schemas. `Optional` wrappers become `nullable`.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::SchemaConversionError`] for the request object
    /// and the ellipsis marker, which have no wire representation, and for a
    /// model whose name is already taken by a different model.
    pub fn schema_for(&mut self, ty: &TypeRef) -> DocsResult<Schema> {
        let schema = match ty {
            TypeRef::Any => Schema::default(),
            TypeRef::None => Schema::null(),
            TypeRef::Str => Schema::string(),
            TypeRef::Int => Schema::integer(),
            TypeRef::Float => Schema::number(),
            TypeRef::Bool => Schema::boolean(),
            TypeRef::Bytes | TypeRef::UploadedFile => Schema::binary(),
            TypeRef::Dict => Schema::object(),
            TypeRef::Named(name) => named_schema(name),
            TypeRef::List(item) => Schema::array(self.schema_for(item)?),
            TypeRef::Set(item) => Schema {
                unique_items: true,
                ..Schema::array(self.schema_for(item)?)
            },
            TypeRef::Tuple(items) => {
                let prefix_items = items
                    .iter()
                    .map(|item| self.schema_for(item))
                    .collect::<DocsResult<Vec<_>>>()?;
                Schema {
                    items: None,
                    prefix_items,
                    ..Schema::array(Schema::default())
                }
            }
            TypeRef::Optional(inner) => Schema {
                nullable: true,
                ..self.schema_for(inner)?
            },
            TypeRef::Model(model) => {
                if let Some(existing) = self.models.get(&model.name) {
                    if !Arc::ptr_eq(existing, model) && **existing != **model {
                        return Err(DocsError::schema_conversion(format!(
                            "two different models are named '{}'",
                            model.name
                        )));
                    }
                } else {
                    self.models.insert(model.name.clone(), Arc::clone(model));
                    // Placeholder first so self-referencing models terminate.
                    self.schemas.insert(model.name.clone(), Schema::object());
                    let mut object = Schema::object();
                    for field in model.fields() {
                        let property = self.schema_for(&field.ty)?;
                        object = object.property(field.wire_name(), property);
                        if field.required {
                            object = object.required_property(field.wire_name());
                        }
                    }
                    self.schemas.insert(model.name.clone(), object);
                }
                Schema::reference(format!("{COMPONENT_PREFIX}{}", model.name))
            }
            TypeRef::Request | TypeRef::Ellipsis => {
                return Err(DocsError::schema_conversion(format!(
                    "type '{ty}' has no schema"
                )));
            }
        };
        Ok(schema)
    }

    /// Registered component schemas, in first-seen order.
    #[must_use]
    pub fn schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    /// The registered schemas as components, or `None` if there are none.
    #[must_use]
    pub fn components(&self) -> Option<Components> {
        if self.schemas.is_empty() {
            None
        } else {
            Some(Components {
                schemas: self.schemas.clone(),
            })
        }
    }
}

fn named_schema(name: &str) -> Schema {
    match name.to_ascii_lowercase().as_str() {
        "decimal" => Schema::number(),
        "datetime" | "date-time" => Schema::string().with_format("date-time"),
        other => Schema::string().with_format(other),
    }
}

/// Describe one analysed handler as an operation.
///
/// Component schemas for any models reached are added to `registry`.
///
/// # Errors
///
/// Returns an error if a flattened wire name does not resolve back to a
/// declared field or a type has no schema.
pub fn describe_operation(
    view: &ViewSignature,
    registry: &mut SchemaRegistry,
) -> DocsResult<Operation> {
    let (summary, description) = split_docstring(view.docstring());

    let mut parameters = Vec::new();
    for schema in view.models() {
        let location = match schema.kind() {
            SourceKind::Path => ParameterIn::Path,
            SourceKind::Query => ParameterIn::Query,
            SourceKind::Header => ParameterIn::Header,
            SourceKind::Cookie => ParameterIn::Cookie,
            _ => continue,
        };
        for (name, property) in flat_properties(view, schema, registry)? {
            parameters.push(Parameter {
                name,
                location,
                description: property.schema.description.clone(),
                required: location == ParameterIn::Path || property.required,
                schema: Some(property.schema),
            });
        }
    }

    let mut responses = IndexMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: "Successful response".to_string(),
        },
    );

    Ok(Operation {
        operation_id: view.handler().to_string(),
        summary,
        description,
        parameters,
        request_body: request_body(view, registry)?,
        responses,
    })
}

/// Split a cleaned docstring into a summary (first line) and description.
#[must_use]
pub fn split_docstring(doc: &str) -> (Option<String>, Option<String>) {
    let doc = doc.trim();
    if doc.is_empty() {
        return (None, None);
    }
    let (first, rest) = doc.split_once('\n').unwrap_or((doc, ""));
    let rest = rest.trim();
    (
        Some(first.trim().to_string()),
        (!rest.is_empty()).then(|| rest.to_string()),
    )
}

/// Rewrite a route template into OpenAPI form by dropping converter prefixes.
///
/// # Errors
///
/// Returns [`DocsError::InvalidOperation`] if the template does not parse.
pub fn openapi_path(template: &str) -> DocsResult<String> {
    let parsed = PathTemplate::parse(template).map_err(|e| DocsError::InvalidOperation {
        operation_id: template.to_string(),
        reason: e.to_string(),
    })?;

    let mut out = String::new();
    for segment in parsed.segments() {
        out.push('/');
        match &segment.kind {
            SegmentKind::Static => out.push_str(&segment.raw),
            SegmentKind::Param(placeholders) => {
                out.push_str(&rewrite_placeholders(&segment.raw, placeholders));
            }
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    Ok(out)
}

fn rewrite_placeholders(raw: &str, placeholders: &[Placeholder]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    for placeholder in placeholders {
        let Some(open) = rest.find('{') else { break };
        let Some(len) = rest[open..].find('}') else { break };
        out.push_str(&rest[..open]);
        out.push('{');
        out.push_str(&placeholder.name);
        out.push('}');
        rest = &rest[open + len + 1..];
    }
    out.push_str(rest);
    out
}

struct FlatProperty {
    schema: Schema,
    required: bool,
}

/// One property per flattened wire name of a flat-source schema.
fn flat_properties(
    view: &ViewSignature,
    schema: &SynthesizedSchema,
    registry: &mut SchemaRegistry,
) -> DocsResult<Vec<(String, FlatProperty)>> {
    let Some(map) = schema.flatten_map() else {
        return Ok(Vec::new());
    };
    let group: Vec<FuncParam> = view
        .params()
        .iter()
        .filter(|p| p.kind() == schema.kind())
        .cloned()
        .collect();

    let mut properties = Vec::with_capacity(map.len());
    for (wire_name, path) in map.iter() {
        let leaf = resolve_leaf(&group, path)
            .ok_or_else(|| DocsError::unresolved_field(schema.name(), wire_name))?;

        let mut property = registry.schema_for(leaf.ty)?;
        if schema.collection_fields().contains(wire_name) && !property.is_array() {
            property = Schema::array(property);
        }
        if !path.is_nested() {
            let source = &leaf.param.source;
            if let Some(text) = source.description_text() {
                property.description = Some(text.to_string());
            }
            property.default = source
                .default()
                .value()
                .filter(|v| !v.is_null())
                .cloned();
        }

        properties.push((
            wire_name.to_string(),
            FlatProperty {
                schema: property,
                required: leaf.required,
            },
        ));
    }
    Ok(properties)
}

fn request_body(
    view: &ViewSignature,
    registry: &mut SchemaRegistry,
) -> DocsResult<Option<RequestBody>> {
    let multipart = view.model(SourceKind::File).is_some()
        || view.model(SourceKind::MultipartBody).is_some();

    let mut object = Schema::object();
    let mut media_type = None;

    for schema in view.models() {
        match schema.kind() {
            SourceKind::Body => {
                let (body, required) = json_body(schema, registry)?;
                return Ok(Some(single_content(JSON_MEDIA_TYPE, body, required)));
            }
            SourceKind::Form => {
                for (name, property) in flat_properties(view, schema, registry)? {
                    object = add_property(object, name, property);
                }
                media_type = Some(FORM_MEDIA_TYPE);
            }
            SourceKind::File => {
                for field in schema.fields() {
                    let property = FlatProperty {
                        schema: registry.schema_for(&field.annotation)?,
                        required: field.source.default().is_required(),
                    };
                    object = add_property(object, field.alias.clone(), property);
                }
            }
            SourceKind::MultipartBody => {
                let Some(body_params) = schema.body_params() else { continue };
                for (alias, ty) in body_params {
                    let required = schema
                        .fields()
                        .iter()
                        .find(|f| &f.alias == alias)
                        .is_some_and(|f| f.source.default().is_required());
                    let property = FlatProperty {
                        schema: registry.schema_for(ty)?,
                        required,
                    };
                    object = add_property(object, alias.clone(), property);
                }
            }
            _ => {}
        }
    }

    if multipart {
        media_type = Some(MULTIPART_MEDIA_TYPE);
    }
    Ok(media_type.map(|media_type| {
        let required = !object.required.is_empty();
        single_content(media_type, object, required)
    }))
}

/// The JSON body schema: the lone field's own schema under the single-field
/// shortcut, otherwise an object keyed by alias.
fn json_body(
    schema: &SynthesizedSchema,
    registry: &mut SchemaRegistry,
) -> DocsResult<(Schema, bool)> {
    if let Some(field) = schema.single_attr().and_then(|attr| schema.field(attr)) {
        let body = registry.schema_for(&field.annotation)?;
        return Ok((body, field.source.default().is_required()));
    }

    let mut object = Schema::object();
    for field in schema.fields() {
        let mut property = registry.schema_for(&field.annotation)?;
        if let Some(text) = field.source.description_text() {
            property.description = Some(text.to_string());
        }
        let property = FlatProperty {
            schema: property,
            required: field.source.default().is_required(),
        };
        object = add_property(object, field.alias.clone(), property);
    }
    let required = !object.required.is_empty();
    Ok((object, required))
}

fn add_property(object: Schema, name: String, property: FlatProperty) -> Schema {
    let object = object.property(name.clone(), property.schema);
    if property.required {
        object.required_property(name)
    } else {
        object
    }
}

fn single_content(media_type: &str, schema: Schema, required: bool) -> RequestBody {
    let mut content = IndexMap::new();
    content.insert(
        media_type.to_string(),
        MediaType {
            schema: Some(schema),
        },
    );
    RequestBody {
        description: None,
        required,
        content,
    }
}

/// Builds an OpenAPI document from analysed handlers.
///
/// # Example
///
/// ```
/// use hypatia_core::ParamSource;
/// use hypatia_docs::OpenApiGenerator;
/// use hypatia_signature::{Parameter, Signature, ViewSignature};
///
/// let view = ViewSignature::new(
///     "/items/{int:item_id}",
///     Signature::new("get_item")
///         .param(Parameter::new("item_id"))
///         .param(Parameter::new("q").default_source(ParamSource::query())),
/// )
/// .unwrap();
///
/// let mut generator = OpenApiGenerator::new().title("Items").version("1.0.0");
/// generator.add_route("GET", &view).unwrap();
///
/// let doc = generator.generate();
/// assert!(doc.paths.contains_key("/items/{item_id}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenApiGenerator {
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    paths: IndexMap<String, PathItem>,
    registry: SchemaRegistry,
}

impl OpenApiGenerator {
    /// Create a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the API description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Document `view` as the `method` operation on its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation cannot be described or the method
    /// is unknown.
    pub fn add_route(&mut self, method: &str, view: &ViewSignature) -> DocsResult<()> {
        let path = openapi_path(view.path())?;
        let operation = describe_operation(view, &mut self.registry)?;
        self.paths
            .entry(path)
            .or_default()
            .set_operation(method, operation)
    }

    /// Generate the OpenAPI document.
    #[must_use]
    pub fn generate(&self) -> OpenApi {
        OpenApi {
            openapi: "3.1.0".to_string(),
            info: Info {
                title: self.title.clone().unwrap_or_else(|| "API".to_string()),
                version: self.version.clone().unwrap_or_else(|| "0.1.0".to_string()),
                description: self.description.clone(),
            },
            paths: self.paths.clone(),
            components: self.registry.components(),
        }
    }

    /// Generate the OpenAPI document as JSON.
    pub fn generate_json(&self) -> DocsResult<String> {
        self.generate().to_json()
    }
}

//! OpenAPI specification types.
//!
//! The subset of the OpenAPI 3.1 object model needed to document how a
//! handler reads its arguments: operations, parameters, request bodies and
//! schemas.
//!
//! ## OpenAPI 3.1 Compliance
//!
//! The types in this module follow the OpenAPI 3.1 specification:
//! <https://spec.openapis.org/oas/v3.1.0>

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};

/// OpenAPI document root object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApi {
    /// OpenAPI version (should be "3.1.0").
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// API paths and operations.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl OpenApi {
    /// Serialize the document as pretty-printed JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        serde_json::to_string_pretty(self).map_err(DocsError::from)
    }
}

/// API metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Operations available on a single path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Assign `operation` to the slot for `method` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::InvalidOperation`] for an unknown method.
    pub fn set_operation(&mut self, method: &str, operation: Operation) -> DocsResult<()> {
        let slot = match method.to_uppercase().as_str() {
            "GET" => &mut self.get,
            "PUT" => &mut self.put,
            "POST" => &mut self.post,
            "DELETE" => &mut self.delete,
            "OPTIONS" => &mut self.options,
            "HEAD" => &mut self.head,
            "PATCH" => &mut self.patch,
            _ => {
                return Err(DocsError::InvalidOperation {
                    operation_id: operation.operation_id,
                    reason: format!("unknown HTTP method: {method}"),
                });
            }
        };
        *slot = Some(operation);
        Ok(())
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation identifier.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Operation parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    /// Possible responses.
    pub responses: IndexMap<String, Response>,
}

impl Operation {
    /// Find a parameter by wire name and location.
    #[must_use]
    pub fn parameter(&self, name: &str, location: ParameterIn) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.name == name && p.location == location)
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Query parameter.
    Query,
    /// Path parameter.
    Path,
    /// Header parameter.
    Header,
    /// Cookie parameter.
    Cookie,
}

/// Operation parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Parameter schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Content by media type.
    pub content: IndexMap<String, MediaType>,
}

/// Media type content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    /// Schema for the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Operation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Description (required).
    pub description: String,
}

/// Reusable components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    /// Reusable schemas.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

/// JSON Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// Null type.
    Null,
}

/// JSON Schema object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Schema format (e.g., "date-time", "binary").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to another schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Positional item schemas of a fixed-length array.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde(rename = "prefixItems")]
    pub prefix_items: Vec<Schema>,
    /// Whether array items must be distinct.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    #[serde(rename = "uniqueItems")]
    pub unique_items: bool,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Whether nullable.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl Schema {
    fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String)
    }

    /// Create an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::typed(SchemaType::Integer)
    }

    /// Create a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::typed(SchemaType::Number)
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(SchemaType::Boolean)
    }

    /// Create a null schema.
    #[must_use]
    pub fn null() -> Self {
        Self::typed(SchemaType::Null)
    }

    /// Create a binary string schema, as used for uploaded files.
    #[must_use]
    pub fn binary() -> Self {
        Self::string().with_format("binary")
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array)
        }
    }

    /// Create an empty object schema.
    #[must_use]
    pub fn object() -> Self {
        Self::typed(SchemaType::Object)
    }

    /// Create a reference schema.
    #[must_use]
    pub fn reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    /// Set the format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property as required.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Returns true for array schemas.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.schema_type == Some(SchemaType::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builders() {
        let string = Schema::string();
        assert_eq!(string.schema_type, Some(SchemaType::String));

        let array = Schema::array(Schema::integer());
        assert!(array.is_array());
        assert_eq!(array.items.as_deref(), Some(&Schema::integer()));

        let object = Schema::object()
            .property("name", Schema::string())
            .required_property("name");
        assert_eq!(object.schema_type, Some(SchemaType::Object));
        assert!(object.properties.contains_key("name"));
        assert!(object.required.contains(&"name".to_string()));

        assert_eq!(Schema::binary().format.as_deref(), Some("binary"));
    }

    #[test]
    fn test_schema_reference_serialization() {
        let schema = Schema::reference("#/components/schemas/Item");
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, serde_json::json!({"$ref": "#/components/schemas/Item"}));
    }

    #[test]
    fn test_parameter_in_serialization() {
        let param = Parameter {
            name: "X-Token".to_string(),
            location: ParameterIn::Header,
            description: None,
            required: false,
            schema: None,
        };

        let json = serde_json::to_string(&param).unwrap();
        assert!(json.contains("\"in\":\"header\""));
    }

    #[test]
    fn test_path_item_methods() {
        let operation = Operation {
            operation_id: "list_items".to_string(),
            summary: None,
            description: None,
            parameters: vec![],
            request_body: None,
            responses: IndexMap::new(),
        };

        let mut item = PathItem::default();
        item.set_operation("get", operation.clone()).unwrap();
        assert!(item.get.is_some());

        let err = item.set_operation("FETCH", operation).unwrap_err();
        assert!(matches!(err, DocsError::InvalidOperation { .. }));
    }

    #[test]
    fn test_skips_empty_fields() {
        let json = serde_json::to_value(Schema::string()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "string"}));
    }
}

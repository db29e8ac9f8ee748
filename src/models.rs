#![allow(non_snake_case)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Root of a generated OpenAPI document
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externalDocs: Option<ExternalDocs>,
    /// `security`, `webhooks` and anything else the pipeline never touches
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

impl Document {
    /// Finds a tag by name, ignoring case
    pub fn tag_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.tags
            .iter_mut()
            .find(|tag| tag.name.eq_ignore_ascii_case(name))
    }

    /// Iterates over every operation together with its route and method
    pub fn operations(&self) -> impl Iterator<Item = (&str, &'static str, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, operation)| (path.as_str(), method, operation))
        })
    }

    pub fn operation_by_id_mut(&mut self, operation_id: &str) -> Option<&mut Operation> {
        self.paths
            .values_mut()
            .flat_map(PathItem::operations_mut)
            .map(|(_, operation)| operation)
            .find(|operation| operation.operationId.as_deref() == Some(operation_id))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Server {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reusable components; only schemas are rewritten by the pipeline
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub securitySchemes: IndexMap<String, Value>,
    // parameters, responses, requestBodies, examples, headers, links, callbacks
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

/// Information about the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termsOfService: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(flatten, default)]
    pub extensions: IndexMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
}

/// Tag information for API operations
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externalDocs: Option<ExternalDocs>,
}

/// A single path item with all its operations
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Value>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

impl PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut Operation)> {
        [
            ("get", &mut self.get),
            ("put", &mut self.put),
            ("post", &mut self.post),
            ("delete", &mut self.delete),
            ("options", &mut self.options),
            ("head", &mut self.head),
            ("patch", &mut self.patch),
            ("trace", &mut self.trace),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.as_mut().map(|op| (method, op)))
    }
}

/// Identity of the handler method that owns an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    /// Type (controller) declaring the method
    pub type_name: String,
    pub method: String,
}

impl HandlerRef {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }
}

/// An operation (endpoint) of the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operationId: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestBody: Option<Value>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    /// `x-` vendor extensions plus `callbacks`, `servers`, `externalDocs`
    #[serde(flatten, default)]
    pub extensions: IndexMap<String, Value>,
    // Bound by the base generator or the annotation manifest, never serialized
    #[serde(skip)]
    pub handler: Option<HandlerRef>,
}

/// API response
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Response {
    // Absent on `$ref` responses, which keep their reference in `extra`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub headers: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

/// Media type object
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

/// Schema object, limited to the keywords the pipeline reads or rewrites.
/// Everything else is carried through untouched in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Value>, // Can be a string or array of strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allOf: Option<Vec<Schema>>,
    #[serde(flatten, default)]
    pub extra: IndexMap<String, Value>,
}

impl Schema {
    pub fn reference(id: &str) -> Self {
        Self {
            ref_: Some(format!("{}{}", SCHEMA_REF_PREFIX, id)),
            ..Default::default()
        }
    }

    /// Id of the component schema this node points at, either directly or
    /// through a single-entry `allOf` wrapper
    pub fn reference_id(&self) -> Option<&str> {
        let reference = match (&self.ref_, &self.allOf) {
            (Some(reference), _) => reference,
            (None, Some(all_of)) if all_of.len() == 1 => all_of[0].ref_.as_ref()?,
            _ => return None,
        };
        Some(reference.strip_prefix(SCHEMA_REF_PREFIX).unwrap_or(reference))
    }

    /// Appends text to the description, never replacing what is there
    pub fn append_description(&mut self, text: &str) {
        match &mut self.description {
            Some(existing) if !existing.is_empty() => {
                if !text.starts_with('\n') {
                    existing.push('\n');
                }
                existing.push_str(text);
            }
            _ => self.description = Some(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_id_strips_component_prefix() {
        assert_eq!(Schema::reference("Widget").reference_id(), Some("Widget"));

        let wrapped = Schema {
            allOf: Some(vec![Schema::reference("Gadget")]),
            nullable: Some(true),
            ..Default::default()
        };
        assert_eq!(wrapped.reference_id(), Some("Gadget"));
        assert_eq!(Schema::default().reference_id(), None);
    }

    #[test]
    fn test_append_description_concatenates() {
        let mut schema = Schema::default();
        schema.append_description("first");
        schema.append_description("\n * second");
        schema.append_description("third");
        assert_eq!(schema.description.as_deref(), Some("first\n * second\nthird"));
    }

    #[test]
    fn test_operation_extensions_round_trip() {
        let json = r#"{
            "operationId": "getWidget",
            "responses": {"200": {"description": "ok"}},
            "x-codeSamples": [{"lang": "go", "source": "x"}]
        }"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.operationId.as_deref(), Some("getWidget"));
        assert!(operation.extensions.contains_key("x-codeSamples"));

        let value = serde_json::to_value(&operation).unwrap();
        assert_eq!(value["x-codeSamples"][0]["lang"], "go");
    }

    #[test]
    fn test_unmodelled_sections_pass_through() {
        let json = serde_json::json!({
            "openapi": "3.0.1",
            "info": { "title": "Widgets", "version": "1.0" },
            "security": [{ "apiKey": [] }],
            "paths": {
                "/widgets/{id}": {
                    "parameters": [{ "$ref": "#/components/parameters/Id" }],
                    "servers": [{ "url": "https://edge.example.com" }],
                    "get": {
                        "responses": {
                            "200": {
                                "description": "ok",
                                "links": { "self": { "operationId": "getWidget" } },
                                "content": {
                                    "application/json": {
                                        "examples": { "bolt": { "$ref": "#/components/examples/Bolt" } }
                                    }
                                }
                            },
                            "404": { "$ref": "#/components/responses/NotFound" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {},
                "parameters": { "Id": { "name": "id", "in": "path", "required": true } },
                "responses": { "NotFound": { "description": "missing" } },
                "examples": { "Bolt": { "value": { "name": "bolt" } } }
            }
        });

        // Parse and serialize again: nothing outside the modelled keywords may be lost
        let document: Document = serde_json::from_value(json.clone()).unwrap();
        assert!(document.components.extra.contains_key("parameters"));
        let not_found = &document.paths["/widgets/{id}"].get.as_ref().unwrap().responses["404"];
        assert_eq!(not_found.description, None);

        assert_eq!(serde_json::to_value(&document).unwrap(), json);
    }
}

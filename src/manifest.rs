//! File-backed annotation provider.
//!
//! Hosts that cannot hand over their type metadata directly describe it in
//! a YAML or JSON manifest:
//!
//! ```yaml
//! types:
//!   Order:
//!     example: { status: Active, note: "Leave at door" }
//!     members:
//!       - name: Note
//!         serializedNames: [{ convention: json, name: memo }]
//!         annotations:
//!           - { kind: conditionalRequirement, targetMember: Status, matchValue: Active }
//! controllers:
//!   OrderController:
//!     annotations:
//!       - { kind: markdownRef, path: docs/orders.md, tag: Orders }
//!     methods:
//!       get_order:
//!         operationId: getOrder
//!         annotations:
//!           - { kind: codeExampleRef, language: go, path: samples/get_order.go }
//! ```

use std::{fs, path::Path};

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotations::{Annotation, AnnotationProvider, Member};
use crate::error::{DocsError, DocsResult};
use crate::example::ExampleRegistry;
use crate::models::{Document, HandlerRef};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeManifest {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub members: Vec<Member>,
    /// Literal example payload for responses of this type
    #[serde(default)]
    pub example: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MethodManifest {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerManifest {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodManifest>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationManifest {
    #[serde(default)]
    pub types: IndexMap<String, TypeManifest>,
    #[serde(default)]
    pub controllers: IndexMap<String, ControllerManifest>,
}

impl AnnotationManifest {
    pub fn from_file(path: impl AsRef<Path>) -> DocsResult<Self> {
        let path = path.as_ref();
        debug!("Loading annotation manifest from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> DocsResult<Self> {
        serde_yaml::from_str(content).map_err(|e| DocsError::Manifest(e.to_string()))
    }

    /// Sets the owning handler of every operation named by `operationId`
    pub fn bind(&self, document: &mut Document) -> usize {
        let mut bound = 0;
        for (type_name, controller) in &self.controllers {
            for (method, manifest) in &controller.methods {
                let operation_id = match &manifest.operation_id {
                    Some(id) => id,
                    None => continue,
                };
                match document.operation_by_id_mut(operation_id) {
                    Some(operation) => {
                        operation.handler = Some(HandlerRef::new(type_name, method));
                        bound += 1;
                    }
                    None => warn!(
                        "Operation {} declared by {}::{} is not in the document",
                        operation_id, type_name, method
                    ),
                }
            }
        }
        bound
    }

    /// Example table built from the literal payloads in the manifest
    pub fn examples(&self) -> ExampleRegistry {
        let mut registry = ExampleRegistry::new();
        for (type_name, manifest) in &self.types {
            if let Some(example) = &manifest.example {
                registry.register_value(type_name.clone(), example.clone());
            }
        }
        registry
    }
}

impl AnnotationProvider for AnnotationManifest {
    fn type_annotations(&self, type_name: &str) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        if let Some(manifest) = self.types.get(type_name) {
            annotations.extend(manifest.annotations.iter().cloned());
        }
        if let Some(controller) = self.controllers.get(type_name) {
            annotations.extend(controller.annotations.iter().cloned());
        }
        annotations
    }

    fn members(&self, type_name: &str) -> Option<Vec<Member>> {
        self.types.get(type_name).map(|manifest| manifest.members.clone())
    }

    fn method_annotations(&self, handler: &HandlerRef) -> Vec<Annotation> {
        self.controllers
            .get(&handler.type_name)
            .and_then(|controller| controller.methods.get(&handler.method))
            .map(|method| method.annotations.clone())
            .unwrap_or_default()
    }
}

//! Representative response payloads.
//!
//! Types opt in explicitly: either through [`ExampleProvider`] or by being
//! registered with a zero-argument factory (`Default`). There is no
//! reflective construction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DocsError, DocsResult};

/// A type that describes itself with a representative instance
pub trait ExampleProvider {
    fn example() -> Self;
}

/// Example instance captured as data, rendered per content type on demand
#[derive(Debug, Clone, PartialEq)]
pub struct ExamplePayload {
    root: String,
    value: Value,
}

impl ExamplePayload {
    /// Captures an instance; `root` names the XML root element
    pub fn new<T: Serialize + ?Sized>(root: &str, instance: &T) -> DocsResult<Self> {
        let value = serde_json::to_value(instance)
            .map_err(|e| DocsError::Serialization(e.to_string()))?;
        Ok(Self {
            root: xml_root_name(root),
            value,
        })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn json(&self) -> DocsResult<String> {
        serde_json::to_string_pretty(&self.value).map_err(|e| DocsError::Serialization(e.to_string()))
    }

    pub fn xml(&self) -> DocsResult<String> {
        let mut xml = String::new();
        let mut serializer = quick_xml::se::Serializer::with_root(&mut xml, Some(self.root.as_str()))
            .map_err(|e| DocsError::Serialization(e.to_string()))?;
        serializer.indent(' ', 2);
        self.value
            .serialize(serializer)
            .map_err(|e| DocsError::Serialization(e.to_string()))?;
        Ok(xml)
    }

    /// Rendering that fits a content type, XML for anything mentioning `xml`
    pub fn for_content_type(&self, content_type: &str) -> DocsResult<String> {
        if content_type.to_lowercase().contains("xml") {
            self.xml()
        } else {
            self.json()
        }
    }
}

/// Element name for a type name: `Page<Widget>` becomes `PageOfWidget`
fn xml_root_name(type_name: &str) -> String {
    let mut name = String::with_capacity(type_name.len());
    for c in type_name.chars() {
        match c {
            '<' => name.push_str("Of"),
            c if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' => name.push(c),
            _ => {}
        }
    }
    let first = name.chars().next();
    match first {
        Some(first) if first.is_alphabetic() || first == '_' => name,
        _ => format!("_{}", name),
    }
}

/// Builds the example of `T`, preferring its own example
pub fn build_example<T: ExampleProvider + Serialize>(root: &str) -> DocsResult<ExamplePayload> {
    ExamplePayload::new(root, &T::example())
}

/// Builds the example of a default-constructed `T`
pub fn build_default_example<T: Default + Serialize>(root: &str) -> DocsResult<ExamplePayload> {
    ExamplePayload::new(root, &T::default())
}

type ExampleFactory = Arc<dyn Fn(&str) -> DocsResult<ExamplePayload> + Send + Sync>;

/// Type name to example factory table
#[derive(Clone, Default)]
pub struct ExampleRegistry {
    factories: HashMap<String, ExampleFactory>,
}

impl fmt::Debug for ExampleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ExampleRegistry").field("types", &names).finish()
    }
}

impl ExampleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `name`, built from `T::default()`
    pub fn register<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: Default + Serialize + 'static,
    {
        self.factories.insert(name.into(), Arc::new(build_default_example::<T>));
        self
    }

    /// Registers `T` under `name`, built from its own example
    pub fn register_provider<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: ExampleProvider + Serialize + 'static,
    {
        self.factories.insert(name.into(), Arc::new(build_example::<T>));
        self
    }

    /// Registers a literal payload, as read from an annotation manifest
    pub fn register_value(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.factories
            .insert(name.into(), Arc::new(move |root: &str| ExamplePayload::new(root, &value)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn build(&self, name: &str) -> DocsResult<ExamplePayload> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DocsError::UnknownExampleType(name.to_string()))?;
        factory(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
    struct Widget {
        id: u32,
        name: String,
        tags: Vec<String>,
        price: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Gadget {
        serial: String,
        active: bool,
    }

    impl ExampleProvider for Gadget {
        fn example() -> Self {
            Gadget {
                serial: "GX-1".to_string(),
                active: true,
            }
        }
    }

    #[test]
    fn test_default_example_parses_back() {
        let example = build_default_example::<Widget>("Widget").unwrap();
        let json = example.json().unwrap();

        // Pretty-printed, and structurally the default instance
        assert!(json.contains('\n'));
        let parsed: Widget = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Widget::default());
    }

    #[test]
    fn test_provider_example_is_used() {
        let example = build_example::<Gadget>("Gadget").unwrap();
        let parsed: Gadget = serde_json::from_str(&example.json().unwrap()).unwrap();
        assert_eq!(parsed, Gadget::example());

        let xml = example.xml().unwrap();
        assert!(xml.starts_with("<Gadget>"));
        assert!(xml.contains("<serial>GX-1</serial>"));
        assert!(xml.contains("<active>true</active>"));
    }

    #[test]
    fn test_registry_builds_by_name() {
        let mut registry = ExampleRegistry::new();
        registry
            .register::<Widget>("Widget")
            .register_provider::<Gadget>("Gadget")
            .register_value("Sprocket", json!({"teeth": 12}));

        assert!(registry.contains("Widget"));
        let sprocket = registry.build("Sprocket").unwrap();
        assert_eq!(sprocket.value(), &json!({"teeth": 12}));

        // Content type picks the rendering, ignoring case
        let xml = sprocket.for_content_type("application/XML").unwrap();
        assert!(xml.contains("<teeth>12</teeth>"));
        assert_eq!(
            sprocket.for_content_type("application/json").unwrap(),
            sprocket.json().unwrap()
        );

        match registry.build("Unknown") {
            Err(DocsError::UnknownExampleType(name)) => assert_eq!(name, "Unknown"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_json_rendering_ignores_xml_naming_rules() {
        // Neither the key nor the generic type name is a valid XML name as written
        let example = ExamplePayload::new("Page<Widget>", &json!({"2fa": true, "name": "bolt"})).unwrap();

        let json = example.for_content_type("application/json").unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&json).unwrap(),
            json!({"2fa": true, "name": "bolt"})
        );

        // XML is only attempted when asked for, and fails there alone
        assert!(matches!(example.xml(), Err(DocsError::Serialization(_))));
    }

    #[test]
    fn test_generic_type_names_become_xml_roots() {
        assert_eq!(xml_root_name("Page<Widget>"), "PageOfWidget");
        assert_eq!(xml_root_name("Map<String, Widget>"), "MapOfStringWidget");
        assert_eq!(xml_root_name("1Widget"), "_1Widget");

        let example = ExamplePayload::new("Page<Widget>", &json!({"total": 1})).unwrap();
        assert!(example.xml().unwrap().starts_with("<PageOfWidget>"));
    }
}

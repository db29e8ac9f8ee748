//! Declarative documentation rules and the capability that discovers them.
//!
//! Annotations are attached statically to a type, to one of its members, or
//! to a handler method. The pipeline never inspects types itself; it asks an
//! [`AnnotationProvider`] supplied by the host binding layer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::loader::ContentRef;
use crate::models::HandlerRef;

/// Member `X` is required when `target_member` equals `match_value`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRequirement {
    pub target_member: String,
    #[serde(default)]
    pub match_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Member `X` is required when both `X` and `target_member` are empty
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRequirementOnEmpty {
    pub target_member: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Markdown merged into a tag (type level) or an operation description (method level)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute: Option<bool>,
}

impl MarkdownRef {
    pub fn content_ref(&self) -> ContentRef {
        content_ref(&self.path, self.absolute)
    }
}

/// Labeled code sample attached to an operation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeExampleRef {
    pub language: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute: Option<bool>,
}

impl CodeExampleRef {
    pub fn content_ref(&self) -> ContentRef {
        content_ref(&self.path, self.absolute)
    }
}

fn content_ref(path: &str, absolute: Option<bool>) -> ContentRef {
    ContentRef {
        path: path.to_string(),
        is_absolute: absolute.unwrap_or_else(|| Path::new(path).is_absolute()),
    }
}

/// Explicit response for one status code, one example per content type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOverride {
    #[serde(rename = "type")]
    pub type_name: String,
    pub status_code: u16,
    #[serde(default)]
    pub content_types: Vec<String>,
}

/// Accepted request body type and content types
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOverride {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub content_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Annotation {
    ConditionalRequirement(ConditionalRequirement),
    ConditionalRequirementOnEmpty(ConditionalRequirementOnEmpty),
    Suppress,
    MarkdownRef(MarkdownRef),
    CodeExampleRef(CodeExampleRef),
    ResponseOverride(ResponseOverride),
    AcceptOverride(AcceptOverride),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    ConditionalRequirement,
    ConditionalRequirementOnEmpty,
    Suppress,
    MarkdownRef,
    CodeExampleRef,
    ResponseOverride,
    AcceptOverride,
}

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::ConditionalRequirement(_) => AnnotationKind::ConditionalRequirement,
            Self::ConditionalRequirementOnEmpty(_) => AnnotationKind::ConditionalRequirementOnEmpty,
            Self::Suppress => AnnotationKind::Suppress,
            Self::MarkdownRef(_) => AnnotationKind::MarkdownRef,
            Self::CodeExampleRef(_) => AnnotationKind::CodeExampleRef,
            Self::ResponseOverride(_) => AnnotationKind::ResponseOverride,
            Self::AcceptOverride(_) => AnnotationKind::AcceptOverride,
        }
    }
}

/// Serialization format a member name override applies to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum NamingConvention {
    Json,
    XmlElement,
    XmlAttribute,
    XmlArray,
    XmlArrayItem,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SerializedName {
    pub convention: NamingConvention,
    pub name: String,
}

/// A field or property of a type, as reported by the host
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub serialized_names: Vec<SerializedName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn renamed(mut self, convention: NamingConvention, name: impl Into<String>) -> Self {
        self.serialized_names.push(SerializedName {
            convention,
            name: name.into(),
        });
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Declared name followed by every format override, in declaration order
    pub fn name_variants(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.serialized_names.iter().map(|n| n.name.as_str()))
    }
}

/// What an annotation is attached to
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Type(&'a str),
    Member(&'a Member),
    Method(&'a HandlerRef),
}

/// Host capability for reading statically declared annotations.
///
/// Implementations must report annotations in declaration order and keep
/// repeated annotations of the same kind.
pub trait AnnotationProvider: Send + Sync {
    /// Annotations declared on the type itself
    fn type_annotations(&self, type_name: &str) -> Vec<Annotation>;

    /// Members of a type, `None` when the type is unknown to the host
    fn members(&self, type_name: &str) -> Option<Vec<Member>>;

    /// Annotations declared on a handler method
    fn method_annotations(&self, handler: &HandlerRef) -> Vec<Annotation>;

    fn annotations_of(&self, target: Target<'_>, kind: AnnotationKind) -> Vec<Annotation> {
        let all = match target {
            Target::Type(type_name) => self.type_annotations(type_name),
            Target::Member(member) => member.annotations.clone(),
            Target::Method(handler) => self.method_annotations(handler),
        };
        all.into_iter().filter(|a| a.kind() == kind).collect()
    }
}

/// Request body types a handler documents as accepted
pub fn accepted_content(provider: &dyn AnnotationProvider, handler: &HandlerRef) -> Vec<AcceptOverride> {
    provider
        .annotations_of(Target::Method(handler), AnnotationKind::AcceptOverride)
        .into_iter()
        .filter_map(|annotation| match annotation {
            Annotation::AcceptOverride(accept) => Some(accept),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticProvider {
        methods: HashMap<HandlerRef, Vec<Annotation>>,
    }

    impl AnnotationProvider for StaticProvider {
        fn type_annotations(&self, _type_name: &str) -> Vec<Annotation> {
            Vec::new()
        }

        fn members(&self, _type_name: &str) -> Option<Vec<Member>> {
            None
        }

        fn method_annotations(&self, handler: &HandlerRef) -> Vec<Annotation> {
            self.methods.get(handler).cloned().unwrap_or_default()
        }
    }

    #[test]
    fn test_annotations_of_keeps_declaration_order() {
        let member = Member::new("Email")
            .annotated(Annotation::ConditionalRequirementOnEmpty(ConditionalRequirementOnEmpty {
                target_member: "Phone".into(),
                description: None,
                error_message: None,
            }))
            .annotated(Annotation::Suppress)
            .annotated(Annotation::ConditionalRequirementOnEmpty(ConditionalRequirementOnEmpty {
                target_member: "Fax".into(),
                description: None,
                error_message: None,
            }));
        let provider = StaticProvider { methods: HashMap::new() };

        let found = provider.annotations_of(
            Target::Member(&member),
            AnnotationKind::ConditionalRequirementOnEmpty,
        );
        let targets: Vec<_> = found
            .iter()
            .map(|a| match a {
                Annotation::ConditionalRequirementOnEmpty(rule) => rule.target_member.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(targets, vec!["Phone", "Fax"]);
    }

    #[test]
    fn test_accepted_content_reads_method_annotations() {
        let handler = HandlerRef::new("WidgetController", "create");
        let mut methods = HashMap::new();
        methods.insert(
            handler.clone(),
            vec![
                Annotation::MarkdownRef(MarkdownRef {
                    path: "create.md".into(),
                    tag: None,
                    absolute: None,
                }),
                Annotation::AcceptOverride(AcceptOverride {
                    type_name: "Widget".into(),
                    content_types: vec!["application/json".into()],
                }),
            ],
        );
        let provider = StaticProvider { methods };

        let accepted = accepted_content(&provider, &handler);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].type_name, "Widget");
    }

    #[test]
    fn test_deserializes_tagged_annotations() {
        let yaml = r#"
- kind: conditionalRequirement
  targetMember: Status
  matchValue: Active
- kind: suppress
- kind: responseOverride
  type: Widget
  statusCode: 200
  contentTypes: [application/json]
"#;
        let annotations: Vec<Annotation> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[1], Annotation::Suppress);
        match &annotations[0] {
            Annotation::ConditionalRequirement(rule) => {
                assert_eq!(rule.match_value, Value::String("Active".into()))
            }
            other => panic!("unexpected annotation: {:?}", other),
        }
    }

    #[test]
    fn test_content_ref_detects_absolute_paths() {
        let relative = CodeExampleRef {
            language: "go".into(),
            path: "samples/b.go".into(),
            absolute: None,
        };
        assert!(!relative.content_ref().is_absolute);

        let forced = MarkdownRef {
            path: "/docs/intro.md".into(),
            tag: None,
            absolute: Some(false),
        };
        assert!(!forced.content_ref().is_absolute);
    }
}

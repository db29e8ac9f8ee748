//! Conditional requirement rules.
//!
//! The same predicate drives two consumers: the schema filters render it as
//! description text, and [`validate`] enforces it against instance data.
//! Neither touches a schema's `required` list.

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::annotations::{
    Annotation, ConditionalRequirement, ConditionalRequirementOnEmpty, Member,
};
use crate::error::{DocsError, DocsResult};
use crate::models::Schema;
use crate::reconcile;

/// Renders a match value for humans: `Null` for null, `String.Empty` for
/// blank strings, the plain text of anything else
pub fn render_match_value(value: &Value) -> String {
    match value {
        Value::Null => "Null".to_string(),
        Value::String(text) if text.trim().is_empty() => "String.Empty".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

impl ConditionalRequirement {
    /// Text documenting the rule; `member` and `target` are the names to show
    pub fn describe(&self, member: &str, target: &str) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!(
                "\n * `{}` is **required** when `{}` is equal to `{}`",
                member,
                target,
                render_match_value(&self.match_value)
            )
        })
    }

    pub fn error_message(&self, member: &str) -> String {
        self.error_message.clone().unwrap_or_else(|| {
            format!(
                "{} is required when {} is equal to {}",
                member,
                self.target_member,
                render_match_value(&self.match_value)
            )
        })
    }

    /// Whether the target value triggers the requirement
    pub fn applies_to(&self, target: Option<&Value>) -> bool {
        match &self.match_value {
            Value::Null => matches!(target, None | Some(Value::Null)),
            Value::String(text) if text.trim().is_empty() => {
                matches!(target, Some(Value::String(t)) if t.trim().is_empty())
            }
            expected => target == Some(expected),
        }
    }

    pub fn is_violated(&self, value: Option<&Value>, target: Option<&Value>) -> bool {
        self.applies_to(target) && is_empty(value)
    }
}

impl ConditionalRequirementOnEmpty {
    pub fn describe(&self, member: &str, target: &str) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!(
                "\n * `{}` is **required** when `{}` is `null` or `String.Empty`",
                member, target
            )
        })
    }

    pub fn error_message(&self, member: &str) -> String {
        self.error_message.clone().unwrap_or_else(|| {
            format!("{} is required when {} is null or empty", member, self.target_member)
        })
    }

    pub fn is_violated(&self, value: Option<&Value>, target: Option<&Value>) -> bool {
        is_empty(value) && is_empty(target)
    }
}

/// Name the rule's target member shows under in the schema.
///
/// A target removed by suppression keeps its declared name; any other
/// target missing from the schema is an authoring error.
fn target_key(
    schema_id: &str,
    schema: &Schema,
    members: &[Member],
    target_member: &str,
) -> DocsResult<String> {
    let member = reconcile::member_named(members, target_member);
    let key = match member {
        Some(member) => reconcile::find_key(member, schema.properties.keys()),
        None => reconcile::find_name(target_member, schema.properties.keys()),
    };
    if let Some(key) = key {
        return Ok(key);
    }

    match member {
        Some(member) if is_suppressed(member) => {
            debug!("Target {} of schema {} is suppressed, using its declared name", member.name, schema_id);
            Ok(member.name.clone())
        }
        _ => Err(DocsError::SchemaMemberNotFound {
            member: target_member.to_string(),
            schema: schema_id.to_string(),
        }),
    }
}

fn is_suppressed(member: &Member) -> bool {
    member
        .annotations
        .iter()
        .any(|annotation| matches!(annotation, Annotation::Suppress))
}

/// Appends rule text to a property, or to the schema it references
pub fn append_property_description(
    schemas: &mut IndexMap<String, Schema>,
    schema_id: &str,
    property_key: &str,
    text: &str,
) -> DocsResult<()> {
    let reference = schemas
        .get(schema_id)
        .and_then(|schema| schema.properties.get(property_key))
        .and_then(|property| property.reference_id().map(str::to_string));

    let target = match reference {
        Some(reference) => schemas.get_mut(&reference).ok_or_else(|| {
            DocsError::UnresolvedReference {
                reference: reference.clone(),
                schema: schema_id.to_string(),
            }
        })?,
        None => schemas
            .get_mut(schema_id)
            .and_then(|schema| schema.properties.get_mut(property_key))
            .ok_or_else(|| DocsError::SchemaMemberNotFound {
                member: property_key.to_string(),
                schema: schema_id.to_string(),
            })?,
    };
    target.append_description(text);
    Ok(())
}

/// Documents every rule of one kind declared on the type's members.
///
/// Members missing from the schema are skipped; a rule whose target member
/// cannot be found is an authoring error.
fn document_rules<R>(
    schemas: &mut IndexMap<String, Schema>,
    schema_id: &str,
    members: &[Member],
    select: impl Fn(&Annotation) -> Option<&R>,
    rule_target: impl Fn(&R) -> &str,
    describe: impl Fn(&R, &str, &str) -> String,
) -> DocsResult<usize> {
    let mut documented = 0;

    for member in members {
        let rules: Vec<&R> = member.annotations.iter().filter_map(&select).collect();
        if rules.is_empty() {
            continue;
        }

        let schema = match schemas.get(schema_id) {
            Some(schema) => schema,
            None => return Ok(documented),
        };
        let key = match reconcile::find_key(member, schema.properties.keys()) {
            Some(key) => key,
            None => {
                debug!("Member {} is not part of schema {}, skipping its rules", member.name, schema_id);
                continue;
            }
        };

        let mut texts = Vec::with_capacity(rules.len());
        for rule in rules {
            let target = target_key(schema_id, schema, members, rule_target(rule))?;
            texts.push(describe(rule, &key, &target));
        }

        for text in texts {
            append_property_description(schemas, schema_id, &key, &text)?;
            documented += 1;
        }
    }

    Ok(documented)
}

pub fn document_conditional(
    schemas: &mut IndexMap<String, Schema>,
    schema_id: &str,
    members: &[Member],
) -> DocsResult<usize> {
    document_rules(
        schemas,
        schema_id,
        members,
        |annotation| match annotation {
            Annotation::ConditionalRequirement(rule) => Some(rule),
            _ => None,
        },
        |rule: &ConditionalRequirement| rule.target_member.as_str(),
        |rule: &ConditionalRequirement, member, target| rule.describe(member, target),
    )
}

pub fn document_on_empty(
    schemas: &mut IndexMap<String, Schema>,
    schema_id: &str,
    members: &[Member],
) -> DocsResult<usize> {
    document_rules(
        schemas,
        schema_id,
        members,
        |annotation| match annotation {
            Annotation::ConditionalRequirementOnEmpty(rule) => Some(rule),
            _ => None,
        },
        |rule: &ConditionalRequirementOnEmpty| rule.target_member.as_str(),
        |rule: &ConditionalRequirementOnEmpty, member, target| rule.describe(member, target),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementViolation {
    pub member: String,
    pub message: String,
}

fn member_value<'v>(
    members: &[Member],
    name: &str,
    object: &'v serde_json::Map<String, Value>,
) -> Option<&'v Value> {
    let key = match reconcile::member_named(members, name) {
        Some(member) => reconcile::find_key(member, object.keys()),
        None => reconcile::find_name(name, object.keys()),
    }?;
    object.get(&key)
}

/// Checks an instance against the conditional requirements of its type
pub fn validate(members: &[Member], instance: &Value) -> Vec<RequirementViolation> {
    let empty = serde_json::Map::new();
    let object = instance.as_object().unwrap_or(&empty);
    let mut violations = Vec::new();

    for member in members {
        let value = member_value(members, &member.name, object);
        for annotation in &member.annotations {
            let message = match annotation {
                Annotation::ConditionalRequirement(rule) => {
                    let target = member_value(members, &rule.target_member, object);
                    rule.is_violated(value, target)
                        .then(|| rule.error_message(&member.name))
                }
                Annotation::ConditionalRequirementOnEmpty(rule) => {
                    let target = member_value(members, &rule.target_member, object);
                    rule.is_violated(value, target)
                        .then(|| rule.error_message(&member.name))
                }
                _ => None,
            };
            if let Some(message) = message {
                violations.push(RequirementViolation {
                    member: member.name.clone(),
                    message,
                });
            }
        }
    }

    violations
}

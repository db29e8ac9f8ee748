use log::debug;
use serde_json::{json, Value};

use crate::annotations::{Annotation, AnnotationKind};
use crate::error::DocsResult;
use crate::models::{MediaType, Operation, Schema};
use crate::normalize::normalize;

use super::{OperationContext, OperationFilter};

pub const CODE_SAMPLES_EXTENSION: &str = "x-codeSamples";

/// Attaches code samples as `x-codeSamples`, in declaration order
pub struct CodeSampleFilter;

impl OperationFilter for CodeSampleFilter {
    fn name(&self) -> &'static str {
        "code-samples"
    }

    fn apply(&self, operation: &mut Operation, ctx: &OperationContext<'_>) -> DocsResult<()> {
        let mut samples = Vec::new();
        for annotation in ctx.method_annotations(AnnotationKind::CodeExampleRef) {
            if let Annotation::CodeExampleRef(sample) = annotation {
                let source = ctx.loader.load(&sample.content_ref())?;
                samples.push(json!({
                    "lang": sample.language,
                    "source": source,
                }));
            }
        }

        if samples.is_empty() {
            return Ok(());
        }
        debug!("Attaching {} code samples to {} {}", samples.len(), ctx.method, ctx.path);
        operation
            .extensions
            .insert(CODE_SAMPLES_EXTENSION.to_string(), Value::Array(samples));
        Ok(())
    }
}

/// Moves the summary into the description and shows the route as summary
pub struct DisplayNameFilter;

impl OperationFilter for DisplayNameFilter {
    fn name(&self) -> &'static str {
        "display-name"
    }

    fn apply(&self, operation: &mut Operation, ctx: &OperationContext<'_>) -> DocsResult<()> {
        if let Some(summary) = operation.summary.take() {
            if !summary.trim().is_empty() {
                operation.description = Some(summary);
            }
        }
        operation.summary = Some(normalize(&[ctx.path]));
        Ok(())
    }
}

/// Appends method-level markdown to the operation description
pub struct MarkdownDescriptionFilter;

impl OperationFilter for MarkdownDescriptionFilter {
    fn name(&self) -> &'static str {
        "markdown-description"
    }

    fn apply(&self, operation: &mut Operation, ctx: &OperationContext<'_>) -> DocsResult<()> {
        for annotation in ctx.method_annotations(AnnotationKind::MarkdownRef) {
            let markdown = match annotation {
                Annotation::MarkdownRef(markdown) => markdown,
                _ => continue,
            };
            let content = ctx.loader.load(&markdown.content_ref())?;
            operation.description = Some(match operation.description.take() {
                Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, content),
                _ => content,
            });
        }
        Ok(())
    }
}

/// Replaces generated responses with explicitly declared ones
pub struct ResponseOverrideFilter;

impl OperationFilter for ResponseOverrideFilter {
    fn name(&self) -> &'static str {
        "response-overrides"
    }

    fn apply(&self, operation: &mut Operation, ctx: &OperationContext<'_>) -> DocsResult<()> {
        let overrides: Vec<_> = ctx
            .method_annotations(AnnotationKind::ResponseOverride)
            .into_iter()
            .filter_map(|annotation| match annotation {
                Annotation::ResponseOverride(response) => Some(response),
                _ => None,
            })
            .collect();

        if overrides.is_empty() {
            return Ok(());
        }

        debug!(
            "Replacing {} generated responses of {} {}",
            operation.responses.len(),
            ctx.method,
            ctx.path
        );
        operation.responses.clear();

        for response_override in overrides {
            let example = ctx.examples.build(&response_override.type_name)?;
            let schema = ctx
                .schemas
                .contains_key(&response_override.type_name)
                .then(|| Schema::reference(&response_override.type_name));

            // Repeated status codes merge their content types into one response
            let response = operation
                .responses
                .entry(response_override.status_code.to_string())
                .or_default();
            response.description.get_or_insert_with(String::new);
            for content_type in &response_override.content_types {
                response.content.insert(
                    content_type.clone(),
                    MediaType {
                        schema: schema.clone(),
                        example: Some(Value::String(example.for_content_type(content_type)?)),
                        ..Default::default()
                    },
                );
            }
        }

        Ok(())
    }
}

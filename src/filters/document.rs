use log::debug;

use crate::annotations::{Annotation, AnnotationKind, Target};
use crate::error::DocsResult;
use crate::models::{Document, Tag};

use super::{DocumentContext, DocumentFilter};

/// Merges type-level markdown into the tag it names.
///
/// Only types that own at least one operation are considered. A matching
/// tag (ignoring case) has its description replaced; otherwise a new tag is
/// appended.
pub struct MarkdownTagFilter;

impl DocumentFilter for MarkdownTagFilter {
    fn name(&self) -> &'static str {
        "markdown-tags"
    }

    fn apply(&self, document: &mut Document, ctx: &DocumentContext<'_>) -> DocsResult<()> {
        let mut owners: Vec<String> = Vec::new();
        for (_, _, operation) in document.operations() {
            if let Some(handler) = &operation.handler {
                if !owners.contains(&handler.type_name) {
                    owners.push(handler.type_name.clone());
                }
            }
        }

        for owner in &owners {
            let annotations = ctx
                .provider
                .annotations_of(Target::Type(owner), AnnotationKind::MarkdownRef);

            for annotation in annotations {
                let markdown = match annotation {
                    Annotation::MarkdownRef(markdown) => markdown,
                    _ => continue,
                };
                let tag_name = match markdown.tag.as_deref().map(str::trim) {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                };

                let content = ctx.loader.load(&markdown.content_ref())?;
                match document.tag_mut(&tag_name) {
                    Some(tag) => {
                        debug!("Replacing description of tag {} from {}", tag.name, markdown.path);
                        tag.description = Some(content);
                    }
                    None => {
                        debug!("Adding tag {} from {}", tag_name, markdown.path);
                        document.tags.push(Tag {
                            name: tag_name,
                            description: Some(content),
                            externalDocs: None,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

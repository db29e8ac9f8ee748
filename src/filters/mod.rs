//! Stage filters run by the pipeline.
//!
//! Each filter reads annotations through the [`AnnotationProvider`] and
//! mutates the shared document in place. Filters never talk to each other
//! except through the document.

use indexmap::IndexMap;

use crate::annotations::{Annotation, AnnotationKind, AnnotationProvider, Member, Target};
use crate::error::DocsResult;
use crate::example::ExampleRegistry;
use crate::loader::ContentLoader;
use crate::models::{Document, HandlerRef, Operation, Schema};

pub mod document;
pub mod operation;
pub mod schema;

pub use document::MarkdownTagFilter;
pub use operation::{
    CodeSampleFilter, DisplayNameFilter, MarkdownDescriptionFilter, ResponseOverrideFilter,
};
pub use schema::{ConditionalRequirementFilter, OnEmptyRequirementFilter, SuppressFilter};

pub struct DocumentContext<'a> {
    pub provider: &'a dyn AnnotationProvider,
    pub loader: &'a ContentLoader,
}

pub struct OperationContext<'a> {
    /// Route template, e.g. `/widgets/{id}`
    pub path: &'a str,
    pub method: &'a str,
    pub handler: Option<&'a HandlerRef>,
    pub provider: &'a dyn AnnotationProvider,
    pub loader: &'a ContentLoader,
    pub examples: &'a ExampleRegistry,
    /// Read-only view of the schema repository
    pub schemas: &'a IndexMap<String, Schema>,
}

impl OperationContext<'_> {
    /// Annotations of one kind on the owning handler, empty when unbound
    pub fn method_annotations(&self, kind: AnnotationKind) -> Vec<Annotation> {
        match self.handler {
            Some(handler) => self.provider.annotations_of(Target::Method(handler), kind),
            None => Vec::new(),
        }
    }
}

pub struct SchemaContext<'a> {
    pub schema_id: &'a str,
    pub members: &'a [Member],
    pub provider: &'a dyn AnnotationProvider,
}

pub trait DocumentFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, document: &mut Document, ctx: &DocumentContext<'_>) -> DocsResult<()>;
}

pub trait OperationFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, operation: &mut Operation, ctx: &OperationContext<'_>) -> DocsResult<()>;
}

pub trait SchemaFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(
        &self,
        schemas: &mut IndexMap<String, Schema>,
        ctx: &SchemaContext<'_>,
    ) -> DocsResult<()>;
}

use indexmap::IndexMap;
use log::{debug, info};
use serde_json::json;

use crate::annotations::AnnotationProvider;
use crate::config::DocumentationConfig;
use crate::error::DocsResult;
use crate::example::ExampleRegistry;
use crate::filters::{
    CodeSampleFilter, ConditionalRequirementFilter, DisplayNameFilter, DocumentContext,
    DocumentFilter, MarkdownDescriptionFilter, MarkdownTagFilter, OnEmptyRequirementFilter,
    OperationContext, OperationFilter, ResponseOverrideFilter, SchemaContext, SchemaFilter,
    SuppressFilter,
};
use crate::loader::ContentLoader;
use crate::models::{Document, Schema};

const DEFAULT_OPENAPI_VERSION: &str = "3.0.1";

/// Collects filters before the first generation pass
pub struct PipelineBuilder {
    config: DocumentationConfig,
    loader: Option<ContentLoader>,
    examples: ExampleRegistry,
    document_filters: Vec<Box<dyn DocumentFilter>>,
    operation_filters: Vec<Box<dyn OperationFilter>>,
    schema_filters: Vec<Box<dyn SchemaFilter>>,
}

impl PipelineBuilder {
    pub fn new(config: DocumentationConfig) -> Self {
        Self {
            config,
            loader: None,
            examples: ExampleRegistry::new(),
            document_filters: Vec::new(),
            operation_filters: Vec::new(),
            schema_filters: Vec::new(),
        }
    }

    /// Registers the standard filters in their fixed order.
    ///
    /// Operation stage: code samples, display name, markdown, explicit
    /// responses. Schema stage: suppression, then conditional requirements.
    pub fn with_default_filters(self) -> Self {
        self.document_filter(MarkdownTagFilter)
            .operation_filter(CodeSampleFilter)
            .operation_filter(DisplayNameFilter)
            .operation_filter(MarkdownDescriptionFilter)
            .operation_filter(ResponseOverrideFilter)
            .schema_filter(SuppressFilter)
            .schema_filter(ConditionalRequirementFilter)
            .schema_filter(OnEmptyRequirementFilter)
    }

    pub fn loader(mut self, loader: ContentLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn examples(mut self, examples: ExampleRegistry) -> Self {
        self.examples = examples;
        self
    }

    pub fn document_filter(mut self, filter: impl DocumentFilter + 'static) -> Self {
        self.document_filters.push(Box::new(filter));
        self
    }

    pub fn operation_filter(mut self, filter: impl OperationFilter + 'static) -> Self {
        self.operation_filters.push(Box::new(filter));
        self
    }

    pub fn schema_filter(mut self, filter: impl SchemaFilter + 'static) -> Self {
        self.schema_filters.push(Box::new(filter));
        self
    }

    pub fn build(self) -> Pipeline {
        let loader = self
            .loader
            .unwrap_or_else(|| ContentLoader::new(self.config.content_root()));
        Pipeline {
            config: self.config,
            loader,
            examples: self.examples,
            document_filters: self.document_filters,
            operation_filters: self.operation_filters,
            schema_filters: self.schema_filters,
        }
    }
}

/// Runs the document, operation and schema stages over a generated document.
///
/// The filter lists are fixed once built; one pipeline may serve concurrent
/// generation passes over independent documents.
pub struct Pipeline {
    config: DocumentationConfig,
    loader: ContentLoader,
    examples: ExampleRegistry,
    document_filters: Vec<Box<dyn DocumentFilter>>,
    operation_filters: Vec<Box<dyn OperationFilter>>,
    schema_filters: Vec<Box<dyn SchemaFilter>>,
}

impl Pipeline {
    pub fn builder(config: DocumentationConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    /// Pipeline with the standard filters only
    pub fn standard(config: DocumentationConfig) -> Self {
        PipelineBuilder::new(config).with_default_filters().build()
    }

    pub fn config(&self) -> &DocumentationConfig {
        &self.config
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.document_filters
            .iter()
            .map(|f| f.name())
            .chain(self.operation_filters.iter().map(|f| f.name()))
            .chain(self.schema_filters.iter().map(|f| f.name()))
            .collect()
    }

    pub fn generate(
        &self,
        mut document: Document,
        provider: &dyn AnnotationProvider,
    ) -> DocsResult<Document> {
        info!("Enriching API document '{}'", self.config.title());

        self.apply_info(&mut document)?;
        self.run_document_stage(&mut document, provider)?;
        self.run_operation_stage(&mut document, provider)?;
        self.run_schema_stage(&mut document.components.schemas, provider)?;

        Ok(document)
    }

    fn apply_info(&self, document: &mut Document) -> DocsResult<()> {
        if document.openapi.is_empty() {
            document.openapi = DEFAULT_OPENAPI_VERSION.to_string();
        }

        let title = self.config.title();
        let info = &mut document.info;
        info.title = title.clone();
        info.version = self.config.version();
        if let Some(description) = self.config.description_text()? {
            info.description = Some(description);
        }
        info.license = Some(self.config.license.to_license());
        if let Some(terms) = self.config.terms_of_service() {
            info.termsOfService = Some(terms.to_string());
        }
        if let Some(logo) = self.config.logo() {
            info.extensions.insert(
                "x-logo".to_string(),
                json!({ "url": logo, "altText": title }),
            );
        }
        Ok(())
    }

    fn run_document_stage(
        &self,
        document: &mut Document,
        provider: &dyn AnnotationProvider,
    ) -> DocsResult<()> {
        let ctx = DocumentContext {
            provider,
            loader: &self.loader,
        };
        for filter in &self.document_filters {
            debug!("Running document filter {}", filter.name());
            filter.apply(document, &ctx)?;
        }
        Ok(())
    }

    fn run_operation_stage(
        &self,
        document: &mut Document,
        provider: &dyn AnnotationProvider,
    ) -> DocsResult<()> {
        let Document {
            paths, components, ..
        } = document;
        let schemas = &components.schemas;

        for (path, item) in paths.iter_mut() {
            for (method, operation) in item.operations_mut() {
                let handler = operation.handler.clone();
                let ctx = OperationContext {
                    path,
                    method,
                    handler: handler.as_ref(),
                    provider,
                    loader: &self.loader,
                    examples: &self.examples,
                    schemas,
                };
                for filter in &self.operation_filters {
                    debug!("Running operation filter {} on {} {}", filter.name(), method, path);
                    filter.apply(operation, &ctx)?;
                }
            }
        }
        Ok(())
    }

    fn run_schema_stage(
        &self,
        schemas: &mut IndexMap<String, Schema>,
        provider: &dyn AnnotationProvider,
    ) -> DocsResult<()> {
        let ids: Vec<String> = schemas.keys().cloned().collect();
        for id in &ids {
            let members = match provider.members(id) {
                Some(members) => members,
                None => continue,
            };
            let ctx = SchemaContext {
                schema_id: id,
                members: &members,
                provider,
            };
            for filter in &self.schema_filters {
                debug!("Running schema filter {} on {}", filter.name(), id);
                filter.apply(schemas, &ctx)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Annotation, Member};
    use crate::models::{HandlerRef, Operation, PathItem};
    use pretty_assertions::assert_eq;

    struct NoAnnotations;

    impl AnnotationProvider for NoAnnotations {
        fn type_annotations(&self, _type_name: &str) -> Vec<Annotation> {
            Vec::new()
        }

        fn members(&self, _type_name: &str) -> Option<Vec<Member>> {
            None
        }

        fn method_annotations(&self, _handler: &HandlerRef) -> Vec<Annotation> {
            Vec::new()
        }
    }

    struct StampFilter;

    impl OperationFilter for StampFilter {
        fn name(&self) -> &'static str {
            "stamp"
        }

        fn apply(&self, operation: &mut Operation, ctx: &OperationContext<'_>) -> DocsResult<()> {
            operation
                .extensions
                .insert("x-stamp".to_string(), json!(format!("{} {}", ctx.method, ctx.path)));
            Ok(())
        }
    }

    #[test]
    fn test_standard_filters_run_in_fixed_order() {
        let pipeline = Pipeline::standard(DocumentationConfig::default());
        assert_eq!(
            pipeline.filter_names(),
            vec![
                "markdown-tags",
                "code-samples",
                "display-name",
                "markdown-description",
                "response-overrides",
                "suppress",
                "conditional-requirement",
                "on-empty-requirement",
            ]
        );
    }

    #[test]
    fn test_custom_filters_run_after_standard_ones() {
        let pipeline = Pipeline::builder(DocumentationConfig::default())
            .with_default_filters()
            .operation_filter(StampFilter)
            .build();

        let mut document = Document::default();
        document.paths.insert(
            "/widgets".into(),
            PathItem {
                post: Some(Operation {
                    summary: Some("Creates a widget".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );

        let document = pipeline.generate(document, &NoAnnotations).unwrap();
        let operation = document.paths["/widgets"].post.as_ref().unwrap();

        // The display-name filter already ran when the stamp was applied
        assert_eq!(operation.extensions["x-stamp"], json!("post /widgets"));
        assert_eq!(operation.summary.as_deref(), Some("/widgets"));
        assert_eq!(document.openapi, DEFAULT_OPENAPI_VERSION);
        assert_eq!(document.info.license.as_ref().map(|l| l.name.as_str()), Some("Proprietary"));
    }
}

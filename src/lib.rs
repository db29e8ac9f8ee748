pub mod annotations;
pub mod config;
pub mod error;
pub mod example;
pub mod filters;
pub mod generator;
pub mod license;
pub mod loader;
pub mod manifest;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod requirement;

pub use annotations::{Annotation, AnnotationKind, AnnotationProvider, Member, NamingConvention};
pub use config::DocumentationConfig;
pub use error::{DocsError, DocsResult};
pub use example::{ExamplePayload, ExampleProvider, ExampleRegistry};
pub use license::DocumentationLicense;
pub use loader::{ContentLoader, ContentRef};
pub use manifest::AnnotationManifest;
pub use models::Document;
pub use pipeline::{Pipeline, PipelineBuilder};

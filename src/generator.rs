use anyhow::{Context, Result};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::config::DocumentationConfig;
use crate::models::Document;

/// Writes an enriched document and its documentation page to disk.
///
/// Files are laid out under the output directory the way they are served:
/// the document at `{path}/{version}/swagger.json` and the page at
/// `{routePrefix or path}/index.html`.
pub struct Generator<'a> {
    document: &'a Document,
    config: &'a DocumentationConfig,
}

impl<'a> Generator<'a> {
    pub fn new(document: &'a Document, config: &'a DocumentationConfig) -> Self {
        Self { document, config }
    }

    /// Generate the requested output types (json, yaml, ui)
    pub fn generate(&self, output_dir: impl AsRef<Path>, output_types: &[String]) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();

        fs::create_dir_all(output_dir)
            .context(format!("Failed to create output directory: {:?}", output_dir))?;

        let mut written = Vec::new();
        for output_type in output_types {
            match output_type.as_str() {
                "json" => written.push(self.generate_json(output_dir)?),
                "yaml" => written.push(self.generate_yaml(output_dir)?),
                "ui" => written.push(self.generate_index(output_dir)?),
                _ => debug!("Unknown output type: {}", output_type),
            }
        }

        Ok(written)
    }

    /// Location of the document relative to the output directory
    fn document_path(&self, output_dir: &Path, extension: &str) -> PathBuf {
        let route = self.config.get_full_path();
        let route = Path::new(route.trim_start_matches('/'));
        output_dir.join(route).with_extension(extension)
    }

    fn generate_json(&self, output_dir: &Path) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(self.document)
            .context("Failed to serialize OpenAPI document to JSON")?;

        let path = self.document_path(output_dir, "json");
        write_file(&path, &json)?;

        info!("Generated OpenAPI JSON output at {:?}", path);
        Ok(path)
    }

    fn generate_yaml(&self, output_dir: &Path) -> Result<PathBuf> {
        let yaml = serde_yaml::to_string(self.document)
            .context("Failed to serialize OpenAPI document to YAML")?;

        let path = self.document_path(output_dir, "yaml");
        write_file(&path, &yaml)?;

        info!("Generated OpenAPI YAML output at {:?}", path);
        Ok(path)
    }

    fn generate_index(&self, output_dir: &Path) -> Result<PathBuf> {
        let html = self
            .config
            .documentation_index()
            .context("Failed to read the documentation index page")?;

        let route = self.config.ui_path();
        let path = output_dir
            .join(route.trim_start_matches('/'))
            .join("index.html");
        write_file(&path, &html)?;

        info!("Generated documentation page at {:?}", path);
        Ok(path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {:?}", parent))?;
    }
    let mut file = File::create(path).context(format!("Failed to create file: {:?}", path))?;
    file.write_all(content.as_bytes())
        .context(format!("Failed to write file: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Info;
    use tempfile::tempdir;

    fn document() -> Document {
        Document {
            openapi: "3.0.1".into(),
            info: Info {
                title: "Widget API".into(),
                version: "1.0".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_writes_outputs_along_served_routes() {
        let dir = tempdir().unwrap();
        let config = DocumentationConfig {
            title: Some("Widget API".into()),
            version: Some("1.0".into()),
            ..Default::default()
        };
        let document = document();

        // Unknown output types are skipped
        let written = Generator::new(&document, &config)
            .generate(dir.path(), &["json".into(), "yaml".into(), "ui".into(), "go".into()])
            .unwrap();
        assert_eq!(written.len(), 3);

        // Verify each file sits on its served route

        let json = fs::read_to_string(dir.path().join("swagger/1.0/swagger.json")).unwrap();
        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, document);

        let yaml = fs::read_to_string(dir.path().join("swagger/1.0/swagger.yaml")).unwrap();
        assert!(yaml.contains("title: Widget API"));

        let html = fs::read_to_string(dir.path().join("swagger/index.html")).unwrap();
        assert!(html.contains("/swagger/1.0/swagger.json"));
        assert!(html.contains("Widget API"));
    }

    #[test]
    fn test_custom_index_page_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let config = DocumentationConfig {
            route_prefix: "docs".into(),
            documentation_index: Some("<html>custom</html>".into()),
            ..Default::default()
        };
        let document = document();

        Generator::new(&document, &config)
            .generate(dir.path(), &["ui".into()])
            .unwrap();

        let html = fs::read_to_string(dir.path().join("docs/index.html")).unwrap();
        assert_eq!(html, "<html>custom</html>");
    }
}

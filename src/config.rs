use std::{fs, path::Path, path::PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocsError, DocsResult};
use crate::license::DocumentationLicense;
use crate::normalize::{build_url, normalize};

static SWAGGER_PATH_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\$\{SWAGGER_PATH\}").unwrap());

static SWAGGER_URL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\$\{SWAGGER_URL\}").unwrap());

const SPEC_FILE_NAME: &str = "swagger.json";

/// Longer values are inline content, never a file path
const MAX_PATH_LENGTH: usize = 4096;

const DEFAULT_INDEX_HTML: &str = r###"<!DOCTYPE html>
<html lang="en">
<head>
    <base target="_blank">
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <link rel="stylesheet" href="https://fonts.googleapis.com/css?family=Montserrat:300,400,700|Roboto:300,400,700" />
    <style>body { margin: 0; padding: 0; }</style>
    <title>%(DocumentTitle)</title>
</head>
<body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="documentation-container"></div>
    <script src="https://cdn.jsdelivr.net/npm/redoc@next/bundles/redoc.standalone.js"></script>
    <script type="text/javascript">
        (function() {
            Redoc.init('%(SpecUrl)', {
                enumSkipQuotes: true,
                expandDefaultServerVariables: true,
                hideDownloadButton: true,
                requiredPropsFirst: true,
                sortPropsAlphabetically: true
            }, document.getElementById('documentation-container'));
        })();
    </script>
</body>
</html>
"###;

fn default_path() -> String {
    "/swagger".to_string()
}

fn default_host_url() -> String {
    "http://localhost".to_string()
}

/// Documentation settings, immutable once loaded
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationConfig {
    /// Route the documentation UI is served under
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_host_url")]
    pub host_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub license: DocumentationLicense,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub terms_of_service: Option<String>,
    #[serde(default)]
    pub route_prefix: String,
    /// Handed to the base generator, which owns comment extraction
    #[serde(default)]
    pub include_xml_comments: bool,
    /// File path or inline HTML for the documentation page
    #[serde(default)]
    pub documentation_index: Option<String>,
    /// File path or inline markdown for the document description
    #[serde(default)]
    pub description: Option<String>,
    /// Base directory for markdown and code samples
    #[serde(default)]
    pub content_root: Option<PathBuf>,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            host_url: default_host_url(),
            title: None,
            version: None,
            license: DocumentationLicense::default(),
            logo: None,
            terms_of_service: None,
            route_prefix: String::new(),
            include_xml_comments: false,
            documentation_index: None,
            description: None,
            content_root: None,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl DocumentationConfig {
    /// Loads a YAML or JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> DocsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> DocsResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| DocsError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DocsResult<()> {
        Url::parse(&self.host_url).map_err(|e| {
            DocsError::InvalidConfiguration(format!("hostUrl '{}': {}", self.host_url, e))
        })?;
        if let Some(terms) = non_blank(&self.terms_of_service) {
            Url::parse(terms).map_err(|e| {
                DocsError::InvalidConfiguration(format!("termsOfService '{}': {}", terms, e))
            })?;
        }
        Ok(())
    }

    pub fn title(&self) -> String {
        non_blank(&self.title)
            .map(str::to_string)
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
    }

    pub fn version(&self) -> String {
        non_blank(&self.version)
            .map(str::to_string)
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    pub fn logo(&self) -> Option<&str> {
        non_blank(&self.logo)
    }

    pub fn terms_of_service(&self) -> Option<&str> {
        non_blank(&self.terms_of_service)
    }

    /// Route of the documentation UI
    pub fn get_path(&self) -> String {
        normalize(&[self.path.as_str()])
    }

    /// Route of the generated specification file
    pub fn get_full_path(&self) -> String {
        normalize(&[self.get_path(), self.version(), SPEC_FILE_NAME.to_string()])
    }

    /// Route of the documentation page, `routePrefix` when one is set
    pub fn ui_path(&self) -> String {
        match self.route_prefix.trim() {
            "" => self.get_path(),
            prefix => normalize(&[prefix]),
        }
    }

    pub fn get_url(&self) -> String {
        self.get_url_for(&self.host_url)
    }

    pub fn get_url_for(&self, host: &str) -> String {
        normalize(&[build_url(host, &self.get_path())])
    }

    pub fn get_full_url(&self) -> String {
        self.get_full_url_for(&self.host_url)
    }

    pub fn get_full_url_for(&self, host: &str) -> String {
        normalize(&[build_url(host, &self.get_full_path())])
    }

    pub fn license_url(&self) -> Option<Url> {
        self.license.to_url()
    }

    /// Replaces `${SWAGGER_PATH}` and `${SWAGGER_URL}`, ignoring case
    pub fn substitute(&self, text: &str) -> String {
        let full_path = self.get_full_path();
        let full_url = self.get_full_url();
        let text = SWAGGER_PATH_TOKEN.replace_all(text, NoExpand(&full_path));
        SWAGGER_URL_TOKEN
            .replace_all(&text, NoExpand(&full_url))
            .into_owned()
    }

    /// Document description with its template tokens resolved
    pub fn description_text(&self) -> DocsResult<Option<String>> {
        match non_blank(&self.description) {
            Some(value) => Ok(Some(self.substitute(&self.file_or_inline(value)?))),
            None => Ok(None),
        }
    }

    /// Page that hosts the documentation UI
    pub fn documentation_index(&self) -> DocsResult<String> {
        match non_blank(&self.documentation_index) {
            Some(value) => self.file_or_inline(value),
            None => Ok(DEFAULT_INDEX_HTML
                .replace("%(DocumentTitle)", &self.title())
                .replace("%(SpecUrl)", &self.get_full_path())),
        }
    }

    /// Reads `value` as a file when it names one under the content root,
    /// otherwise returns it verbatim
    fn file_or_inline(&self, value: &str) -> DocsResult<String> {
        if value.len() >= MAX_PATH_LENGTH || value.contains('\n') {
            return Ok(value.to_string());
        }

        let candidate = Path::new(value);
        let candidate = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.content_root().join(candidate)
        };
        if candidate.is_file() {
            debug!("Reading documentation text from {:?}", candidate);
            return Ok(fs::read_to_string(candidate)?);
        }
        Ok(value.to_string())
    }

    pub fn content_root(&self) -> PathBuf {
        self.content_root.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

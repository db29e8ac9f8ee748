use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::License;

const LICENSE_BASE_URL: &str = "https://opensource.org/licenses";

/// Licenses the documentation can advertise
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentationLicense {
    #[serde(rename = "Apache-2.0", alias = "Apache20")]
    Apache20,
    #[serde(rename = "BSD-2-Clause", alias = "Bsd2Clause")]
    Bsd2Clause,
    #[serde(rename = "BSD-3-Clause", alias = "Bsd3Clause")]
    Bsd3Clause,
    #[serde(rename = "CDDL-1.0", alias = "CDDL10")]
    Cddl10,
    #[serde(rename = "EPL-2.0", alias = "EPL20")]
    Epl20,
    #[serde(rename = "GPL")]
    Gpl,
    #[serde(rename = "LGPL")]
    Lgpl,
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "MPL-2.0", alias = "MPL20")]
    Mpl20,
    #[default]
    Proprietary,
}

impl DocumentationLicense {
    /// Display name used in the document's info block
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apache20 => "Apache-2.0",
            Self::Bsd2Clause => "BSD-2-Clause",
            Self::Bsd3Clause => "BSD-3-Clause",
            Self::Cddl10 => "CDDL-1.0",
            Self::Epl20 => "EPL-2.0",
            Self::Gpl => "GPL",
            Self::Lgpl => "LGPL",
            Self::Mit => "MIT",
            Self::Mpl20 => "MPL-2.0",
            Self::Proprietary => "Proprietary",
        }
    }

    fn url_key(&self) -> Option<&'static str> {
        match self {
            Self::Apache20 => Some("Apache-2.0"),
            Self::Bsd2Clause => Some("BSD-2-Clause"),
            Self::Bsd3Clause => Some("BSD-3-Clause"),
            Self::Cddl10 => Some("CDDL-1.0"),
            Self::Epl20 => Some("EPL-2.0"),
            Self::Gpl => Some("gpl-license"),
            Self::Lgpl => Some("lgpl-license"),
            Self::Mit => Some("MIT"),
            Self::Mpl20 => Some("MPL-2.0"),
            Self::Proprietary => None,
        }
    }

    /// Canonical URL of the license text, `None` for proprietary software
    pub fn to_url(&self) -> Option<Url> {
        let key = self.url_key()?;
        Url::parse(&format!("{}/{}", LICENSE_BASE_URL, key)).ok()
    }

    pub fn to_license(&self) -> License {
        License {
            name: self.name().to_string(),
            url: self.to_url().map(|url| url.to_string()),
            identifier: None,
        }
    }
}

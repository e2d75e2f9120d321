//! `Chart.yaml` metadata parsing.
//!
//! Every packaged chart carries a `Chart.yaml` with at least a name and a
//! version. The remaining fields are optional and passed through as-is.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Parsed contents of a chart's `Chart.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart API version (`v1` or `v2`).
    #[serde(default)]
    pub api_version: Option<String>,
    /// Chart name (required).
    pub name: String,
    /// Chart version (required).
    pub version: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Version of the packaged application.
    #[serde(default)]
    pub app_version: Option<String>,
    /// Chart type (`application` or `library`).
    #[serde(default, rename = "type")]
    pub chart_type: Option<String>,
    /// Search keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Project home page.
    #[serde(default)]
    pub home: Option<String>,
    /// Source code locations.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Maintainer list.
    #[serde(default)]
    pub maintainers: Vec<Maintainer>,
    /// Icon URL.
    #[serde(default)]
    pub icon: Option<String>,
    /// Whether the chart is deprecated.
    #[serde(default)]
    pub deprecated: bool,
}

/// A chart maintainer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    /// Maintainer name.
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ChartMetadata {
    /// Parse chart metadata from a YAML string.
    pub fn parse(input: &str) -> Result<Self> {
        let metadata: ChartMetadata = serde_yaml_ng::from_str(input)?;

        if metadata.name.trim().is_empty() {
            return Err(ChartError::InvalidMetadata {
                detail: "name is required".to_string(),
            });
        }

        if metadata.version.trim().is_empty() {
            return Err(ChartError::InvalidMetadata {
                detail: format!("version is required for chart '{}'", metadata.name),
            });
        }

        Ok(metadata)
    }

    /// Serialize this metadata back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

//! The decoded chart model.

use serde::{Deserialize, Serialize};

use crate::metadata::ChartMetadata;

/// A decoded chart, owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Contents of `Chart.yaml`.
    pub metadata: ChartMetadata,
    /// Raw contents of `values.yaml`, if present.
    #[serde(default)]
    pub values: Option<String>,
    /// Files under `templates/`, in archive order.
    #[serde(default)]
    pub templates: Vec<Template>,
    /// All other files, in archive order.
    #[serde(default)]
    pub files: Vec<ChartFile>,
    /// Subcharts found under `charts/`.
    #[serde(default)]
    pub dependencies: Vec<Chart>,
}

/// A template file. `name` is relative to the chart root, e.g.
/// `templates/deployment.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub data: Vec<u8>,
}

/// A non-template file carried in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFile {
    /// Path relative to the chart root.
    pub name: String,
    pub data: Vec<u8>,
}

impl Chart {
    /// Create a chart with metadata only.
    pub fn new(metadata: ChartMetadata) -> Self {
        Chart {
            metadata,
            values: None,
            templates: Vec::new(),
            files: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Chart name from its metadata.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Chart version from its metadata.
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Look up a template by its chart-relative name.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Look up a plain file by its chart-relative name.
    pub fn file(&self, name: &str) -> Option<&ChartFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Look up a direct subchart by name.
    pub fn dependency(&self, name: &str) -> Option<&Chart> {
        self.dependencies.iter().find(|c| c.name() == name)
    }

    /// Count this chart plus all nested subcharts.
    pub fn chart_count(&self) -> usize {
        1 + self
            .dependencies
            .iter()
            .map(Chart::chart_count)
            .sum::<usize>()
    }
}

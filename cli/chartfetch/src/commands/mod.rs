//! CLI command implementations.

pub mod coordinates;
pub mod inspect;
pub mod resolve;

use anyhow::{bail, Result};
use chartfetch_chart::Chart;
use serde::Serialize;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn parse(name: Option<&str>) -> Result<Self> {
        match name {
            Some("human") | None => Ok(OutputFormat::Human),
            Some("json") => Ok(OutputFormat::Json),
            Some(other) => bail!("unknown output format: '{other}'. Choose: human, json"),
        }
    }
}

/// The printable view of a decoded chart. File contents are left out.
#[derive(Debug, Serialize)]
pub struct ChartSummary {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub has_values: bool,
    pub templates: Vec<String>,
    pub files: Vec<String>,
    pub dependencies: Vec<ChartSummary>,
}

impl ChartSummary {
    pub fn of(chart: &Chart) -> Self {
        ChartSummary {
            name: chart.name().to_string(),
            version: chart.version().to_string(),
            app_version: chart.metadata.app_version.clone(),
            description: chart.metadata.description.clone(),
            has_values: chart.values.is_some(),
            templates: chart.templates.iter().map(|t| t.name.clone()).collect(),
            files: chart.files.iter().map(|f| f.name.clone()).collect(),
            dependencies: chart.dependencies.iter().map(ChartSummary::of).collect(),
        }
    }

    fn write_human(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{indent}{} {}\n", self.name, self.version));
        if let Some(app_version) = &self.app_version {
            out.push_str(&format!("{indent}  app version: {app_version}\n"));
        }
        if let Some(description) = &self.description {
            out.push_str(&format!("{indent}  {description}\n"));
        }
        out.push_str(&format!(
            "{indent}  values.yaml: {}\n",
            if self.has_values { "yes" } else { "no" }
        ));
        out.push_str(&format!("{indent}  templates ({}):\n", self.templates.len()));
        for template in &self.templates {
            out.push_str(&format!("{indent}    {template}\n"));
        }
        if !self.files.is_empty() {
            out.push_str(&format!("{indent}  files ({}):\n", self.files.len()));
            for file in &self.files {
                out.push_str(&format!("{indent}    {file}\n"));
            }
        }
        if !self.dependencies.is_empty() {
            out.push_str(&format!("{indent}  dependencies:\n"));
            for dependency in &self.dependencies {
                dependency.write_human(out, depth + 2);
            }
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Human => {
                let mut out = String::new();
                self.write_human(&mut out, 0);
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartfetch_chart::{ChartMetadata, Template};

    fn chart() -> Chart {
        let metadata =
            ChartMetadata::parse("name: app\nversion: 0.1.0\nappVersion: \"2.4\"\ndescription: Demo\n").unwrap();
        let mut chart = Chart::new(metadata);
        chart.templates.push(Template {
            name: "templates/svc.yaml".to_string(),
            data: b"kind: Service".to_vec(),
        });
        let sub = Chart::new(ChartMetadata::parse("name: redis\nversion: 7.2.0\n").unwrap());
        chart.dependencies.push(sub);
        chart
    }

    #[test]
    fn output_formats() {
        assert_eq!(OutputFormat::parse(None).unwrap(), OutputFormat::Human);
        assert_eq!(OutputFormat::parse(Some("json")).unwrap(), OutputFormat::Json);
        assert!(OutputFormat::parse(Some("yaml")).is_err());
    }

    #[test]
    fn human_summary_lists_contents() {
        let text = ChartSummary::of(&chart()).render(OutputFormat::Human).unwrap();
        assert!(text.starts_with("app 0.1.0\n"));
        assert!(text.contains("app version: 2.4"));
        assert!(text.contains("templates/svc.yaml"));
        assert!(text.contains("    redis 7.2.0"));
    }

    #[test]
    fn json_summary_nests_dependencies() {
        let json = ChartSummary::of(&chart()).render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "app");
        assert_eq!(value["templates"][0], "templates/svc.yaml");
        assert_eq!(value["dependencies"][0]["name"], "redis");
        assert!(value["dependencies"][0].get("app_version").is_none());
    }
}

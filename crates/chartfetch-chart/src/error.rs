//! Chart decoding error types.

/// Errors that can occur while decoding a chart archive.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The archive has no `Chart.yaml` at its top level.
    #[error("chart archive has no Chart.yaml{}", location(.chart))]
    MissingChartYaml { chart: Option<String> },

    /// `Chart.yaml` parsed but is not usable.
    #[error("invalid chart metadata: {detail}")]
    InvalidMetadata { detail: String },

    /// An archive entry path escapes the chart root or is otherwise unusable.
    #[error("invalid archive entry path: {path}")]
    InvalidEntryPath { path: String },

    /// A text entry is not valid UTF-8.
    #[error("entry {path} is not valid UTF-8")]
    NotUtf8 { path: String },

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Zip container error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn location(chart: &Option<String>) -> String {
    match chart {
        Some(name) => format!(" (in {name})"),
        None => String::new(),
    }
}

/// Result type alias for chart decoding.
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_chart_yaml_message() {
        let err = ChartError::MissingChartYaml { chart: None };
        assert_eq!(err.to_string(), "chart archive has no Chart.yaml");

        let err = ChartError::MissingChartYaml {
            chart: Some("charts/redis".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "chart archive has no Chart.yaml (in charts/redis)"
        );
    }

    #[test]
    fn io_error_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: ChartError = io.into();
        assert_eq!(err.to_string(), "I/O error: truncated");
    }
}

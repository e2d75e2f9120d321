//! Assembles a [`Chart`] from the file entries of an archive.
//!
//! Both decoders walk their container and feed each regular file to a
//! [`ChartAssembler`]; the assembler owns the layout rules shared by every
//! packaging format.

use std::io::Cursor;

use flate2::read::GzDecoder;

use crate::chart::{Chart, ChartFile, Template};
use crate::error::{ChartError, Result};
use crate::loader::ChartLoader;
use crate::metadata::ChartMetadata;
use crate::tape_archive::TapeArchiveChartLoader;

const CHART_YAML: &str = "Chart.yaml";
const VALUES_YAML: &str = "values.yaml";
const TEMPLATES_DIR: &str = "templates/";
const CHARTS_DIR: &str = "charts/";

/// Upper bound on buffer space reserved from an entry's declared size.
/// Archive headers are untrusted; larger entries grow the buffer as read.
const PREALLOC_LIMIT: u64 = 1 << 20;

/// Buffer for an entry whose header declares `declared` bytes.
pub(crate) fn entry_buffer(declared: u64) -> Vec<u8> {
    Vec::with_capacity(declared.min(PREALLOC_LIMIT) as usize)
}

/// Collects archive entries and builds the chart tree once the archive has
/// been read to the end.
#[derive(Debug, Default)]
pub struct ChartAssembler {
    /// Location of this chart inside its parent, for error messages.
    label: Option<String>,
    /// Entries keyed by path relative to the chart root, in archive order.
    entries: Vec<(String, Vec<u8>)>,
}

impl ChartAssembler {
    /// Create an assembler for a top-level chart.
    pub fn new() -> Self {
        Self::default()
    }

    fn nested(label: String) -> Self {
        ChartAssembler {
            label: Some(label),
            entries: Vec::new(),
        }
    }

    /// Number of entries collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a file entry by its archive path. The first path component is
    /// the chart's base directory and is stripped.
    pub fn add_entry(&mut self, archive_path: &str, data: Vec<u8>) -> Result<()> {
        let relative = strip_base_dir(archive_path)?;
        tracing::trace!(entry = %relative, size = data.len(), "chart entry");
        self.entries.push((relative, data));
        Ok(())
    }

    /// Build the chart from the collected entries.
    pub fn finish(self) -> Result<Chart> {
        let mut metadata = None;
        let mut values = None;
        let mut templates = Vec::new();
        let mut files = Vec::new();
        let mut dependencies = Vec::new();
        let mut subcharts: Vec<(String, ChartAssembler)> = Vec::new();

        for (path, data) in self.entries {
            if path == CHART_YAML {
                let text = utf8(&path, data)?;
                metadata = Some(ChartMetadata::parse(&text)?);
            } else if path == VALUES_YAML {
                values = Some(utf8(&path, data)?);
            } else if path.starts_with(TEMPLATES_DIR) {
                templates.push(Template { name: path, data });
            } else if let Some(rest) = path.strip_prefix(CHARTS_DIR) {
                match rest.split_once('/') {
                    Some((sub, _)) => {
                        let index = match subcharts.iter().position(|(name, _)| name == sub) {
                            Some(index) => index,
                            None => {
                                let label = format!("{CHARTS_DIR}{sub}");
                                subcharts.push((sub.to_string(), ChartAssembler::nested(label)));
                                subcharts.len() - 1
                            }
                        };
                        // `rest` still starts with the subchart directory,
                        // which the nested assembler strips as its base.
                        subcharts[index].1.add_entry(rest, data)?;
                    }
                    None if is_packed_chart(rest) => {
                        tracing::debug!(subchart = %rest, "decoding packed subchart");
                        let mut input = GzDecoder::new(Cursor::new(data));
                        dependencies.push(TapeArchiveChartLoader::new().load(&mut input)?);
                    }
                    None => files.push(ChartFile { name: path, data }),
                }
            } else {
                files.push(ChartFile { name: path, data });
            }
        }

        let metadata = metadata.ok_or(ChartError::MissingChartYaml {
            chart: self.label,
        })?;

        for (_, assembler) in subcharts {
            dependencies.push(assembler.finish()?);
        }

        Ok(Chart {
            metadata,
            values,
            templates,
            files,
            dependencies,
        })
    }
}

fn is_packed_chart(name: &str) -> bool {
    name.ends_with(".tgz") || name.ends_with(".tar.gz")
}

fn utf8(path: &str, data: Vec<u8>) -> Result<String> {
    String::from_utf8(data).map_err(|_| ChartError::NotUtf8 {
        path: path.to_string(),
    })
}

/// Normalize an archive path and drop its base directory.
///
/// Absolute paths, `..` components, and files sitting next to (rather than
/// inside) the base directory are rejected.
fn strip_base_dir(archive_path: &str) -> Result<String> {
    let invalid = || ChartError::InvalidEntryPath {
        path: archive_path.to_string(),
    };

    let normalized = archive_path.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(invalid());
    }

    let mut components = Vec::new();
    for component in normalized.split('/') {
        match component {
            "" | "." => continue,
            ".." => return Err(invalid()),
            other => components.push(other),
        }
    }

    if components.len() < 2 {
        return Err(invalid());
    }
    Ok(components[1..].join("/"))
}

//! `chartfetch inspect`: decode a chart archive on disk.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chartfetch_chart::Chart;
use chartfetch_maven::packaging::packaging_tag_for;
use chartfetch_maven::{load_chart, StandardLoaders};

use crate::commands::{ChartSummary, OutputFormat};

/// Decode `file`. Without an explicit tag the packaging is guessed from the
/// file name.
pub fn load(file: &Path, packaging: Option<&str>) -> Result<Chart> {
    if !file.is_file() {
        bail!("chart archive not found: {}", file.display());
    }
    let tag = match packaging {
        Some(tag) => tag,
        None => packaging_tag_for(file).with_context(|| {
            format!(
                "cannot tell the packaging of {} from its name; pass --packaging",
                file.display()
            )
        })?,
    };
    Ok(load_chart(file, tag, &StandardLoaders)?)
}

/// Run `chartfetch inspect`.
pub fn run(file: &Path, packaging: Option<&str>, format: Option<&str>) -> Result<()> {
    let format = OutputFormat::parse(format)?;
    let chart = load(file, packaging)?;
    print!("{}", ChartSummary::of(&chart).render(format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

//! `chartfetch coordinates`: show how a coordinate string is understood.

use anyhow::Result;
use chartfetch_maven::local::artifact_path;
use chartfetch_maven::{parse_coordinates, Artifact};

pub fn describe(artifact: &Artifact) -> String {
    let mut out = String::new();
    out.push_str(&format!("group:      {}\n", artifact.group_id()));
    out.push_str(&format!("artifact:   {}\n", artifact.artifact_id()));
    out.push_str(&format!("packaging:  {}\n", artifact.extension()));
    out.push_str(&format!(
        "classifier: {}\n",
        artifact.classifier().unwrap_or("(none)")
    ));
    out.push_str(&format!("version:    {}\n", artifact.version()));
    if !artifact.is_metaversion() {
        out.push_str(&format!("path:       {}\n", artifact_path(artifact).display()));
    }
    out
}

/// Run `chartfetch coordinates`.
pub fn run(coordinates: &str, version: Option<&str>) -> Result<()> {
    let artifact = parse_coordinates(coordinates, version)?;
    print!("{}", describe(&artifact));
    Ok(())
}

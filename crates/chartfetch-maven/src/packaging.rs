//! Packaging dispatch.
//!
//! Maps an artifact's packaging tag to the decoder for its archive format
//! and runs that decoder over the resolved file.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use chartfetch_chart::{Chart, ChartError, ChartLoader, TapeArchiveChartLoader, ZipChartLoader};
use flate2::read::GzDecoder;

use crate::error::{ChartResolverError, Result};

/// Archive families a chart can be packaged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Packaging {
    /// Gzip-compressed tar (`tgz`, `tar.gz`, `helm.tar.gz`).
    TapeArchive,
    /// Zip container (`zip`, `jar`).
    Zip,
}

/// A packaging tag that names no known archive family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPackaging(pub String);

impl fmt::Display for UnknownPackaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown packaging '{}'", self.0)
    }
}

impl std::error::Error for UnknownPackaging {}

impl FromStr for Packaging {
    type Err = UnknownPackaging;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "tgz" | "tar.gz" | "helm.tar.gz" => Ok(Packaging::TapeArchive),
            "zip" | "jar" => Ok(Packaging::Zip),
            _ => Err(UnknownPackaging(tag.to_string())),
        }
    }
}

impl Packaging {
    /// Canonical tag for this family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::TapeArchive => "tgz",
            Packaging::Zip => "zip",
        }
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the packaging tag from a file name, e.g. `mychart-1.0.0.tar.gz`
/// gives `tar.gz`. Longest known suffix wins.
pub fn packaging_tag_for(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    ["helm.tar.gz", "tar.gz", "tgz", "zip", "jar"]
        .into_iter()
        .find(|tag| {
            name.strip_suffix(tag)
                .is_some_and(|stem| stem.ends_with('.'))
        })
}

/// Supplies a fresh decoder for each load.
pub trait LoaderProvider: Send + Sync {
    fn loader_for(&self, packaging: Packaging) -> Box<dyn ChartLoader>;
}

/// The bundled tar and zip decoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLoaders;

impl LoaderProvider for StandardLoaders {
    fn loader_for(&self, packaging: Packaging) -> Box<dyn ChartLoader> {
        match packaging {
            Packaging::TapeArchive => Box::new(TapeArchiveChartLoader::new()),
            Packaging::Zip => Box::new(ZipChartLoader::new()),
        }
    }
}

/// Decode the chart stored in `file`, choosing the decoder from `packaging`.
///
/// The tag is matched case-insensitively. The decoder and the open file live
/// only for the duration of this call.
pub fn load_chart(file: &Path, packaging: &str, loaders: &dyn LoaderProvider) -> Result<Chart> {
    let family = packaging
        .parse::<Packaging>()
        .map_err(|_| ChartResolverError::UnsupportedPackaging {
            file: file.to_path_buf(),
            packaging: packaging.to_string(),
        })?;

    let load_error = |source: ChartError| ChartResolverError::Load {
        file: file.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(file).map_err(|e| load_error(ChartError::Io(e)))?);
    tracing::debug!(file = %file.display(), packaging = %family, "decoding chart");

    let mut loader = loaders.loader_for(family);
    let loaded = match family {
        Packaging::TapeArchive => loader.load(&mut GzDecoder::new(reader)),
        Packaging::Zip => {
            let mut reader = reader;
            loader.load(&mut reader)
        }
    };
    drop(loader);

    loaded.map_err(load_error)
}

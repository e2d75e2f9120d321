//! Zip (and jar) chart decoder.
//!
//! Entries are read sequentially from the stream through the local file
//! headers, so the input does not need to be seekable.

use std::io::Read;

use zip::read::read_zipfile_from_stream;

use crate::assemble::{entry_buffer, ChartAssembler};
use crate::chart::Chart;
use crate::error::Result;
use crate::loader::ChartLoader;

/// Decodes charts packaged as zip or jar streams.
#[derive(Debug, Default)]
pub struct ZipChartLoader {
    entries_read: usize,
}

impl ZipChartLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of file entries read by the last `load`.
    pub fn entries_read(&self) -> usize {
        self.entries_read
    }
}

impl ChartLoader for ZipChartLoader {
    fn load(&mut self, mut input: &mut dyn Read) -> Result<Chart> {
        let mut assembler = ChartAssembler::new();

        while let Some(mut file) = read_zipfile_from_stream(&mut input)? {
            if file.is_dir() {
                continue;
            }
            // Jar manifests live outside the chart directory.
            if file.name().starts_with("META-INF/") {
                continue;
            }
            let path = file.name().to_string();
            let mut data = entry_buffer(file.size());
            file.read_to_end(&mut data)?;
            assembler.add_entry(&path, data)?;
        }

        self.entries_read = assembler.len();
        tracing::debug!(entries = self.entries_read, "read zip archive");
        assembler.finish()
    }
}

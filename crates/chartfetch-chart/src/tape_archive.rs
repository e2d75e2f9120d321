//! Tape archive (tar) chart decoder.
//!
//! The input must already be decompressed; callers wrap `.tgz` files in a
//! gzip decoder before handing them over.

use std::io::Read;

use tar::{Archive, EntryType};

use crate::assemble::{entry_buffer, ChartAssembler};
use crate::chart::Chart;
use crate::error::{ChartError, Result};
use crate::loader::ChartLoader;

/// Decodes charts packaged as tar streams.
#[derive(Debug, Default)]
pub struct TapeArchiveChartLoader {
    entries_read: usize,
}

impl TapeArchiveChartLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of file entries read by the last `load`.
    pub fn entries_read(&self) -> usize {
        self.entries_read
    }
}

impl ChartLoader for TapeArchiveChartLoader {
    fn load(&mut self, input: &mut dyn Read) -> Result<Chart> {
        let mut archive = Archive::new(input);
        let mut assembler = ChartAssembler::new();

        for entry in archive.entries()? {
            let mut entry = entry?;
            match entry.header().entry_type() {
                EntryType::Regular | EntryType::Continuous => {}
                _ => continue,
            }

            let path = {
                let path = entry.path()?;
                path.to_str()
                    .ok_or_else(|| ChartError::InvalidEntryPath {
                        path: path.to_string_lossy().into_owned(),
                    })?
                    .to_string()
            };

            let mut data = entry_buffer(entry.size());
            entry.read_to_end(&mut data)?;
            assembler.add_entry(&path, data)?;
        }

        self.entries_read = assembler.len();
        tracing::debug!(entries = self.entries_read, "read tape archive");
        assembler.finish()
    }
}

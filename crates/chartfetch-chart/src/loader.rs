//! The decoder abstraction.

use std::io::Read;

use crate::chart::Chart;
use crate::error::Result;

/// Decodes one packaging family into a [`Chart`].
///
/// A loader is acquired for a single decode and dropped afterwards; any
/// resources it holds are released by its `Drop` implementation, so they are
/// freed on every exit path including a failed `load`.
pub trait ChartLoader {
    /// Decode a chart from `input`, consuming it to the end of the archive.
    fn load(&mut self, input: &mut dyn Read) -> Result<Chart>;
}

impl<L: ChartLoader + ?Sized> ChartLoader for Box<L> {
    fn load(&mut self, input: &mut dyn Read) -> Result<Chart> {
        (**self).load(input)
    }
}

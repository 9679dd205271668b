//! In-memory bar feed adapter.

use crate::domain::bar::Bar;
use crate::domain::error::BackonautError;
use crate::ports::data_feed::DataFeed;

/// Replays a pre-materialized bar sequence exactly as supplied, one bar per
/// call. No sorting, no seeking, no rewinding.
pub struct MemoryFeed {
    bars: Vec<Bar>,
    cursor: usize,
}

impl MemoryFeed {
    pub fn new(bars: Vec<Bar>) -> Self {
        MemoryFeed { bars, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl DataFeed for MemoryFeed {
    fn next_bar(&mut self) -> Result<Option<Bar>, BackonautError> {
        let bar = self.bars.get(self.cursor).cloned();
        if bar.is_some() {
            self.cursor += 1;
        }
        Ok(bar)
    }
}

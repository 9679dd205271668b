//! Bar stream port trait.

use crate::domain::bar::Bar;
use crate::domain::error::BackonautError;

/// Forward-only, single-consumer producer of bars in non-decreasing
/// timestamp order. `Ok(None)` is the normal end-of-stream signal, not an
/// error. Any fetching or parsing must complete before the feed is
/// constructed; implementations only hand out already-materialized bars.
pub trait DataFeed {
    fn next_bar(&mut self) -> Result<Option<Bar>, BackonautError>;
}

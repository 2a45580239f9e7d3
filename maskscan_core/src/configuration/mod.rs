use crate::{DEFAULT_BATCH_SIZE, DEFAULT_MIN_PARALLEL_ROWS};

/// Tuning knobs for the row-range parallel scan.
///
/// Every field is optional; `None` falls back to the crate defaults.
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub batch_size: Option<usize>,
    pub concurrent_threads: Option<usize>,
    pub min_parallel_rows: Option<usize>,
}

impl Configuration {
    /// Rows handed to one worker at a time. Never zero.
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1)
    }

    /// Below this many rows the scan stays on the calling thread.
    pub fn min_parallel_rows(&self) -> usize {
        self.min_parallel_rows.unwrap_or(DEFAULT_MIN_PARALLEL_ROWS)
    }
}

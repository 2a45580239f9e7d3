// Number of rows handed to one parallel worker at a time.
pub const DEFAULT_BATCH_SIZE: usize = 1024 * 64;

// Row count below which the parallel scan stays on the calling thread.
pub const DEFAULT_MIN_PARALLEL_ROWS: usize = 1024 * 256;

pub mod configuration;
pub mod core;
pub mod error;
pub mod ffi;
pub mod simds;

pub use crate::core::columns::{LineItemColumns, OwnedColumns};
pub use crate::core::kernel::{filter, filter_rows_scalar, filter_unchecked, filter_with_backend};
pub use crate::core::params::FilterParams;
pub use crate::error::{FilterError, Result};
pub use crate::simds::Backend;

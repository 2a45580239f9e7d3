//! Row-range parallel scan.
//!
//! `[0, count)` is cut into `batch_size` ranges; each worker owns one disjoint
//! slice of `result` and runs the dispatched kernel on the matching column
//! ranges. No locking is needed because no row reads another row's output.

use log::debug;

#[cfg(feature = "enable_parallelism")]
use rayon::prelude::*;

use crate::{
    configuration::Configuration,
    core::{
        columns::{LineItemColumns, check_len},
        params::FilterParams,
    },
    error::Result,
    simds::{Backend, run_backend},
};

#[cfg(feature = "enable_parallelism")]
use crate::error::FilterError;

/// Parallel form of [`crate::filter`]. Output is identical to the sequential scan.
pub fn filter_parallel(
    count: usize,
    columns: &LineItemColumns<'_>,
    params: &FilterParams,
    result: &mut [u8],
    config: &Configuration,
) -> Result<()> {
    columns.validate(count)?;
    check_len("result", count, result.len())?;

    let backend = Backend::detect();
    let (ship_date, discount, quantity) = columns.head(count);
    let result = &mut result[..count];

    if !cfg!(feature = "enable_parallelism") || count < config.min_parallel_rows() {
        run_backend(backend, ship_date, discount, quantity, params, result);
        return Ok(());
    }

    let batch_size = config.batch_size();
    debug!(
        "Parallel filter over {} rows in {} batches of {} with backend {}",
        count,
        count.div_ceil(batch_size),
        batch_size,
        backend.name()
    );

    run_batches(backend, batch_size, ship_date, discount, quantity, params, result);
    Ok(())
}

#[cfg(feature = "enable_parallelism")]
fn run_batches(
    backend: Backend,
    batch_size: usize,
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    params: &FilterParams,
    result: &mut [u8],
) {
    result
        .par_chunks_mut(batch_size)
        .enumerate()
        .for_each(|(batch, out)| {
            let start = batch * batch_size;
            let end = start + out.len();
            run_backend(
                backend,
                &ship_date[start..end],
                &discount[start..end],
                &quantity[start..end],
                params,
                out,
            );
        });
}

#[cfg(not(feature = "enable_parallelism"))]
fn run_batches(
    backend: Backend,
    _batch_size: usize,
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    params: &FilterParams,
    result: &mut [u8],
) {
    run_backend(backend, ship_date, discount, quantity, params, result);
}

/// Builds a dedicated pool sized by `config.concurrent_threads`
/// (rayon's default when unset). Run scans inside it with `pool.install`.
#[cfg(feature = "enable_parallelism")]
pub fn build_thread_pool(config: &Configuration) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("maskscan-{i}"));
    if let Some(threads) = config.concurrent_threads {
        builder = builder.num_threads(threads);
    }

    let pool = builder
        .build()
        .map_err(|e| FilterError::ThreadPool(e.to_string()))?;

    debug!("Built filter thread pool with {} threads", pool.current_num_threads());
    Ok(pool)
}

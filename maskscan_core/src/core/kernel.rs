//! The lineitem filter kernel.
//!
//! Every entry point writes `result[i] = 1` when row `i` satisfies
//! [`FilterParams::matches`] and `0` otherwise, for `i` in `0..count`, and
//! touches nothing else. Rows are independent, so any sub-range can be
//! computed on its own.

use std::slice;

use crate::{
    core::{
        columns::{LineItemColumns, check_len},
        params::FilterParams,
    },
    error::{FilterError, Result},
    simds::{Backend, run_backend},
};

/// Portable branchless loop over the common prefix of the given slices.
///
/// There is no control flow inside the loop body, so with `opt-level = 3` and
/// a native `target-cpu` the compiler lowers it to packed compares and masks.
#[inline]
pub fn filter_rows_scalar(
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    params: &FilterParams,
    result: &mut [u8],
) {
    let params = *params;
    let rows = result.iter_mut().zip(ship_date).zip(discount).zip(quantity);

    for (((out, &d), &x), &q) in rows {
        *out = params.matches(d, x, q);
    }
}

/// Unchecked kernel entry with the same shape as the C `filter` symbol.
///
/// `selected_positions` is accepted for call-site compatibility and never
/// read; it may be null.
///
/// # Safety
///
/// `ship_date`, `discount` and `quantity` must be valid for reads of `count`
/// `i32`s and `result` valid for writes of `count` bytes, none of them
/// overlapping `result`. Nothing is checked.
pub unsafe fn filter_unchecked(
    count: usize,
    selected_positions: *const i32,
    ship_date: *const i32,
    discount: *const i32,
    quantity: *const i32,
    result: *mut u8,
    params: &FilterParams,
) {
    let _ = selected_positions;

    if count == 0 {
        return;
    }

    let (ship_date, discount, quantity, result) = unsafe {
        (
            slice::from_raw_parts(ship_date, count),
            slice::from_raw_parts(discount, count),
            slice::from_raw_parts(quantity, count),
            slice::from_raw_parts_mut(result, count),
        )
    };

    run_backend(Backend::detect(), ship_date, discount, quantity, params, result);
}

/// Checked kernel entry: fills `result[..count]` using the best backend for this CPU.
///
/// Fails with [`FilterError::InvalidLength`] before touching `result` when any
/// column or `result` itself is shorter than `count`.
pub fn filter(
    count: usize,
    columns: &LineItemColumns<'_>,
    params: &FilterParams,
    result: &mut [u8],
) -> Result<()> {
    filter_with_backend(Backend::detect(), count, columns, params, result)
}

/// Same as [`filter`] with an explicit backend.
pub fn filter_with_backend(
    backend: Backend,
    count: usize,
    columns: &LineItemColumns<'_>,
    params: &FilterParams,
    result: &mut [u8],
) -> Result<()> {
    if !backend.is_available() {
        return Err(FilterError::UnsupportedBackend(backend.name()));
    }

    columns.validate(count)?;
    check_len("result", count, result.len())?;

    let (ship_date, discount, quantity) = columns.head(count);
    run_backend(backend, ship_date, discount, quantity, params, &mut result[..count]);

    Ok(())
}

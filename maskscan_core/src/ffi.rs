//! C ABI export matching
//!
//! ```c
//! void filter(int count, int* selectedPositions, int* shipDate, int* discount,
//!             int* quantity, char* result, int minDate, int maxDate,
//!             long minDiscount, long maxDiscount, long maxQuantity);
//! ```
//!
//! so the `cdylib` can be loaded in place of a shared library built from that
//! declaration.

use std::ffi::{c_char, c_int, c_long};

use crate::core::{kernel::filter_unchecked, params::FilterParams};

/// # Safety
///
/// `ship_date`, `discount` and `quantity` must point to at least `count`
/// readable ints and `result` to at least `count` writable bytes.
/// `selected_positions` is never read. A `count <= 0` writes nothing.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn filter(
    count: c_int,
    selected_positions: *const c_int,
    ship_date: *const c_int,
    discount: *const c_int,
    quantity: *const c_int,
    result: *mut c_char,
    min_date: c_int,
    max_date: c_int,
    min_discount: c_long,
    max_discount: c_long,
    max_quantity: c_long,
) {
    let Ok(count) = usize::try_from(count) else {
        return;
    };

    let params = FilterParams::new(
        min_date,
        max_date,
        i64::from(min_discount),
        i64::from(max_discount),
        i64::from(max_quantity),
    );

    unsafe {
        filter_unchecked(
            count,
            selected_positions,
            ship_date,
            discount,
            quantity,
            result as *mut u8,
            &params,
        );
    }
}

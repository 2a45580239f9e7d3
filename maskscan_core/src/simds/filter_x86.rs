//! AVX2 and AVX-512F versions of the lineitem filter.
//!
//! Both compare in 32-bit lanes against [`LaneBounds`], which is the `i64`
//! threshold set folded into inclusive `i32` ranges, so no column value is ever
//! widened inside the loop. Rows that do not fill a whole vector go through the
//! scalar loop.

use std::arch::x86_64::*;

use crate::core::{
    kernel::filter_rows_scalar,
    params::{FilterParams, LaneBounds},
};

/// Rows consumed per AVX2 iteration (four 8-lane vectors packed into 32 bytes).
pub const AVX2_ROWS: usize = 32;

/// Rows consumed per AVX-512 iteration.
pub const AVX512_ROWS: usize = 16;

struct Avx2Bounds {
    date_lo: __m256i,
    date_hi: __m256i,
    discount_lo: __m256i,
    discount_hi: __m256i,
    quantity_hi: __m256i,
    one: __m256i,
}

#[allow(unsafe_op_in_unsafe_fn)]
#[target_feature(enable = "avx2")]
unsafe fn avx2_bounds(bounds: &LaneBounds) -> Avx2Bounds {
    Avx2Bounds {
        date_lo: _mm256_set1_epi32(bounds.date_lo),
        date_hi: _mm256_set1_epi32(bounds.date_hi),
        discount_lo: _mm256_set1_epi32(bounds.discount_lo),
        discount_hi: _mm256_set1_epi32(bounds.discount_hi),
        quantity_hi: _mm256_set1_epi32(bounds.quantity_hi),
        one: _mm256_set1_epi32(1),
    }
}

/// 0/1 per lane for 8 rows starting at the given pointers.
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
#[target_feature(enable = "avx2")]
unsafe fn avx2_pass_lanes(
    ship_date: *const i32,
    discount: *const i32,
    quantity: *const i32,
    b: &Avx2Bounds,
) -> __m256i {
    let d = _mm256_loadu_si256(ship_date as *const __m256i);
    let x = _mm256_loadu_si256(discount as *const __m256i);
    let q = _mm256_loadu_si256(quantity as *const __m256i);

    // x < lo  <=>  lo > x ;  x > hi
    let date_out = _mm256_or_si256(_mm256_cmpgt_epi32(b.date_lo, d), _mm256_cmpgt_epi32(d, b.date_hi));
    let discount_out = _mm256_or_si256(
        _mm256_cmpgt_epi32(b.discount_lo, x),
        _mm256_cmpgt_epi32(x, b.discount_hi),
    );
    let quantity_out = _mm256_cmpgt_epi32(q, b.quantity_hi);

    let reject = _mm256_or_si256(_mm256_or_si256(date_out, discount_out), quantity_out);
    _mm256_andnot_si256(reject, b.one)
}

/// Caller must ensure AVX2 is available and all slices have `result.len()` rows.
#[allow(unsafe_op_in_unsafe_fn)]
#[target_feature(enable = "avx2")]
pub unsafe fn filter_avx2(
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    params: &FilterParams,
    result: &mut [u8],
) {
    let len = result.len();
    let bounds = params.lane_bounds();
    if bounds.empty {
        result.fill(0);
        return;
    }

    let b = avx2_bounds(&bounds);

    // packs_epi32 / packs_epi16 interleave the 128-bit halves; this restores row order.
    let order = _mm256_setr_epi32(0, 4, 1, 5, 2, 6, 3, 7);

    let ship_ptr = ship_date.as_ptr();
    let discount_ptr = discount.as_ptr();
    let quantity_ptr = quantity.as_ptr();
    let out_ptr = result.as_mut_ptr();

    let mut i = 0usize;
    while i + AVX2_ROWS <= len {
        let r0 = avx2_pass_lanes(ship_ptr.add(i), discount_ptr.add(i), quantity_ptr.add(i), &b);
        let r1 = avx2_pass_lanes(ship_ptr.add(i + 8), discount_ptr.add(i + 8), quantity_ptr.add(i + 8), &b);
        let r2 = avx2_pass_lanes(ship_ptr.add(i + 16), discount_ptr.add(i + 16), quantity_ptr.add(i + 16), &b);
        let r3 = avx2_pass_lanes(ship_ptr.add(i + 24), discount_ptr.add(i + 24), quantity_ptr.add(i + 24), &b);

        let words01 = _mm256_packs_epi32(r0, r1);
        let words23 = _mm256_packs_epi32(r2, r3);
        let bytes = _mm256_permutevar8x32_epi32(_mm256_packs_epi16(words01, words23), order);

        _mm256_storeu_si256(out_ptr.add(i) as *mut __m256i, bytes);
        i += AVX2_ROWS;
    }

    filter_rows_scalar(
        &ship_date[i..len],
        &discount[i..len],
        &quantity[i..len],
        params,
        &mut result[i..],
    );
}

/// Caller must ensure AVX-512F is available and all slices have `result.len()` rows.
#[allow(unsafe_op_in_unsafe_fn)]
#[target_feature(enable = "avx512f")]
pub unsafe fn filter_avx512(
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    params: &FilterParams,
    result: &mut [u8],
) {
    let len = result.len();
    let bounds = params.lane_bounds();
    if bounds.empty {
        result.fill(0);
        return;
    }

    let date_lo = _mm512_set1_epi32(bounds.date_lo);
    let date_hi = _mm512_set1_epi32(bounds.date_hi);
    let discount_lo = _mm512_set1_epi32(bounds.discount_lo);
    let discount_hi = _mm512_set1_epi32(bounds.discount_hi);
    let quantity_hi = _mm512_set1_epi32(bounds.quantity_hi);
    let one = _mm512_set1_epi32(1);

    let ship_ptr = ship_date.as_ptr();
    let discount_ptr = discount.as_ptr();
    let quantity_ptr = quantity.as_ptr();
    let out_ptr = result.as_mut_ptr();

    let mut i = 0usize;
    while i + AVX512_ROWS <= len {
        let d = _mm512_loadu_si512(ship_ptr.add(i) as *const _);
        let x = _mm512_loadu_si512(discount_ptr.add(i) as *const _);
        let q = _mm512_loadu_si512(quantity_ptr.add(i) as *const _);

        let keep: __mmask16 = _mm512_cmpge_epi32_mask(d, date_lo)
            & _mm512_cmple_epi32_mask(d, date_hi)
            & _mm512_cmpge_epi32_mask(x, discount_lo)
            & _mm512_cmple_epi32_mask(x, discount_hi)
            & _mm512_cmple_epi32_mask(q, quantity_hi);

        let bytes = _mm512_cvtepi32_epi8(_mm512_maskz_mov_epi32(keep, one));
        _mm_storeu_si128(out_ptr.add(i) as *mut __m128i, bytes);
        i += AVX512_ROWS;
    }

    filter_rows_scalar(
        &ship_date[i..len],
        &discount[i..len],
        &quantity[i..len],
        params,
        &mut result[i..],
    );
}

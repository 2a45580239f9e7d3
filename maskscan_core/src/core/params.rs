//! Threshold set for the five-condition lineitem predicate.
//!
//! A row passes when
//!
//! ```text
//! min_date <= ship_date < max_date
//! min_discount <= discount < max_discount
//! quantity < max_quantity
//! ```
//!
//! Columns are `i32`; the discount and quantity thresholds are `i64`, so the
//! column value is widened before it is compared.

/// 1994-01-01 as days since 1970-01-01.
pub const TPCH_Q6_MIN_DATE: i32 = 8766;
/// 1995-01-01 as days since 1970-01-01.
pub const TPCH_Q6_MAX_DATE: i32 = 9131;
pub const TPCH_Q6_MIN_DISCOUNT: i64 = 5;
pub const TPCH_Q6_MAX_DISCOUNT: i64 = 7;
pub const TPCH_Q6_MAX_QUANTITY: i64 = 2400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterParams {
    pub min_date: i32,
    pub max_date: i32,
    pub min_discount: i64,
    pub max_discount: i64,
    pub max_quantity: i64,
}

impl FilterParams {
    pub const fn new(
        min_date: i32,
        max_date: i32,
        min_discount: i64,
        max_discount: i64,
        max_quantity: i64,
    ) -> Self {
        Self {
            min_date,
            max_date,
            min_discount,
            max_discount,
            max_quantity,
        }
    }

    /// The TPC-H Q6 thresholds (discount in percent, quantity scaled by 100).
    pub const fn tpch_q6() -> Self {
        Self::new(
            TPCH_Q6_MIN_DATE,
            TPCH_Q6_MAX_DATE,
            TPCH_Q6_MIN_DISCOUNT,
            TPCH_Q6_MAX_DISCOUNT,
            TPCH_Q6_MAX_QUANTITY,
        )
    }

    /// Evaluates the predicate for one row and returns `1` or `0`.
    ///
    /// All five comparisons are always evaluated and folded with `&`. Keep it
    /// that way: `&&` introduces a branch per term and the scan loop stops
    /// vectorizing.
    #[inline(always)]
    pub fn matches(&self, ship_date: i32, discount: i32, quantity: i32) -> u8 {
        let discount = i64::from(discount);
        let quantity = i64::from(quantity);

        (ship_date >= self.min_date) as u8
            & (ship_date < self.max_date) as u8
            & (discount >= self.min_discount) as u8
            & (discount < self.max_discount) as u8
            & (quantity < self.max_quantity) as u8
    }

    /// Thresholds folded into inclusive `i32` ranges for 32-bit SIMD lanes.
    pub fn lane_bounds(&self) -> LaneBounds {
        LaneBounds::from_params(self)
    }
}

/// Inclusive `i32` bounds equivalent to a [`FilterParams`] for every `i32` input.
///
/// `empty` is set when some condition cannot hold for any `i32` value (for
/// example `max_date == i32::MIN`, or `min_discount > i32::MAX`); the other
/// fields are then meaningless and the whole mask is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneBounds {
    pub date_lo: i32,
    pub date_hi: i32,
    pub discount_lo: i32,
    pub discount_hi: i32,
    pub quantity_hi: i32,
    pub empty: bool,
}

impl LaneBounds {
    pub fn from_params(params: &FilterParams) -> Self {
        let date_hi = params.max_date.checked_sub(1);
        let discount_lo = lower_bound_i32(params.min_discount);
        let discount_hi = exclusive_upper_bound_i32(params.max_discount);
        let quantity_hi = exclusive_upper_bound_i32(params.max_quantity);

        let empty = date_hi.is_none()
            || discount_lo.is_none()
            || discount_hi.is_none()
            || quantity_hi.is_none();

        Self {
            date_lo: params.min_date,
            date_hi: date_hi.unwrap_or(i32::MIN),
            discount_lo: discount_lo.unwrap_or(i32::MAX),
            discount_hi: discount_hi.unwrap_or(i32::MIN),
            quantity_hi: quantity_hi.unwrap_or(i32::MIN),
            empty,
        }
    }

    /// Scalar form of the lane comparison. Must agree with [`FilterParams::matches`].
    #[inline(always)]
    pub fn matches(&self, ship_date: i32, discount: i32, quantity: i32) -> u8 {
        (!self.empty) as u8
            & (ship_date >= self.date_lo) as u8
            & (ship_date <= self.date_hi) as u8
            & (discount >= self.discount_lo) as u8
            & (discount <= self.discount_hi) as u8
            & (quantity <= self.quantity_hi) as u8
    }
}

// `x >= min` for i32 x, as `x >= lo`. None when no i32 qualifies.
fn lower_bound_i32(min: i64) -> Option<i32> {
    if min > i64::from(i32::MAX) {
        None
    } else {
        Some(min.max(i64::from(i32::MIN)) as i32)
    }
}

// `x < max` for i32 x, as `x <= hi`. None when no i32 qualifies.
fn exclusive_upper_bound_i32(max: i64) -> Option<i32> {
    if max <= i64::from(i32::MIN) {
        None
    } else {
        Some((max - 1).min(i64::from(i32::MAX)) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [i32; 9] = [i32::MIN, i32::MIN + 1, -7, -1, 0, 1, 7, i32::MAX - 1, i32::MAX];

    fn threshold_edges() -> Vec<i64> {
        let mut out: Vec<i64> = EDGES.iter().map(|&v| i64::from(v)).collect();
        out.extend_from_slice(&[
            i64::MIN,
            i64::MIN + 1,
            i64::from(i32::MIN) - 1,
            i64::from(i32::MAX) + 1,
            i64::MAX - 1,
            i64::MAX,
        ]);
        out
    }

    #[test]
    fn q6_thresholds() {
        let p = FilterParams::tpch_q6();
        assert_eq!(p.matches(TPCH_Q6_MIN_DATE, 5, 2399), 1);
        assert_eq!(p.matches(TPCH_Q6_MAX_DATE, 5, 2399), 0);
        assert_eq!(p.matches(TPCH_Q6_MIN_DATE, 7, 2399), 0);
        assert_eq!(p.matches(TPCH_Q6_MIN_DATE, 6, 2400), 0);
    }

    #[test]
    fn matches_is_zero_or_one() {
        let p = FilterParams::new(-5, 5, -5, 5, 5);
        for &d in &EDGES {
            for &x in &EDGES {
                let m = p.matches(d, x, x);
                assert!(m == 0 || m == 1);
            }
        }
    }

    #[test]
    fn wide_thresholds_are_not_truncated() {
        // 2^32 + 10 would wrap to 10 if narrowed to i32
        let wrapped = (1i64 << 32) + 10;
        let p = FilterParams::new(i32::MIN, i32::MAX, wrapped, i64::MAX, i64::MAX);
        assert_eq!(p.matches(0, 20, 0), 0);

        let p = FilterParams::new(i32::MIN, i32::MAX, i64::MIN, i64::MAX, wrapped);
        assert_eq!(p.matches(0, 0, 20), 1);
    }

    #[test]
    fn lane_bounds_agree_with_widened_comparisons() {
        let thresholds = threshold_edges();
        for &min_date in &EDGES {
            for &max_date in &EDGES {
                let p = FilterParams::new(min_date, max_date, i64::MIN, i64::MAX, i64::MAX);
                let lanes = p.lane_bounds();
                for &d in &EDGES {
                    assert_eq!(lanes.matches(d, 0, 0), p.matches(d, 0, 0), "{p:?} d={d}");
                }
            }
        }

        for &lo in &thresholds {
            for &hi in &thresholds {
                let p = FilterParams::new(i32::MIN, i32::MAX, lo, hi, hi);
                let lanes = p.lane_bounds();
                for &d in &EDGES {
                    for &x in &EDGES {
                        assert_eq!(lanes.matches(d, x, x), p.matches(d, x, x), "{p:?} d={d} x={x}");
                    }
                }
            }
        }
    }

    #[test]
    fn unsatisfiable_bounds_mark_empty() {
        let p = FilterParams::new(0, i32::MIN, 0, 10, 10);
        assert!(p.lane_bounds().empty);

        let p = FilterParams::new(0, 10, i64::from(i32::MAX) + 1, i64::MAX, 10);
        assert!(p.lane_bounds().empty);

        let p = FilterParams::new(0, 10, 0, 10, i64::from(i32::MIN));
        assert!(p.lane_bounds().empty);

        assert!(!FilterParams::tpch_q6().lane_bounds().empty);
    }
}

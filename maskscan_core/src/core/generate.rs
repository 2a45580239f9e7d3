use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::core::columns::OwnedColumns;

/// 1992-01-02, the first TPC-H ship date.
pub const FIRST_SHIP_DATE: i32 = 8036;
/// 1998-12-01, the last TPC-H ship date.
pub const LAST_SHIP_DATE: i32 = 10561;

pub const MAX_DISCOUNT_PERCENT: i32 = 10;
/// Quantities are 1.00 to 50.00 scaled by 100.
pub const MIN_QUANTITY: i32 = 100;
pub const MAX_QUANTITY: i32 = 5000;

/// Deterministic TPC-H-like lineitem columns. The same `seed` always yields the same rows.
pub fn generate_lineitem(rows: usize, seed: u64) -> OwnedColumns {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns = OwnedColumns::with_capacity(rows);

    for _ in 0..rows {
        columns.push(
            rng.random_range(FIRST_SHIP_DATE..=LAST_SHIP_DATE),
            rng.random_range(0..=MAX_DISCOUNT_PERCENT),
            rng.random_range(MIN_QUANTITY..=MAX_QUANTITY),
        );
    }

    debug!("Generated {} lineitem rows with seed {}", rows, seed);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::parse_date;

    #[test]
    fn ship_date_range_matches_calendar() {
        assert_eq!(parse_date("1992-01-02").unwrap(), FIRST_SHIP_DATE);
        assert_eq!(parse_date("1998-12-01").unwrap(), LAST_SHIP_DATE);
    }

    #[test]
    fn same_seed_same_rows() {
        assert_eq!(generate_lineitem(1000, 42), generate_lineitem(1000, 42));
        assert_ne!(generate_lineitem(1000, 42), generate_lineitem(1000, 43));
    }

    #[test]
    fn values_stay_in_range() {
        let columns = generate_lineitem(5000, 7);
        assert_eq!(columns.len(), 5000);
        assert!(columns.ship_date.iter().all(|d| (FIRST_SHIP_DATE..=LAST_SHIP_DATE).contains(d)));
        assert!(columns.discount.iter().all(|d| (0..=MAX_DISCOUNT_PERCENT).contains(d)));
        assert!(columns.quantity.iter().all(|q| (MIN_QUANTITY..=MAX_QUANTITY).contains(q)));
    }
}

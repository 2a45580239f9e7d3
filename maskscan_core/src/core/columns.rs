use crate::error::{FilterError, Result};

/// Borrowed view over the three columns the kernel reads.
#[derive(Debug, Clone, Copy)]
pub struct LineItemColumns<'a> {
    pub ship_date: &'a [i32],
    pub discount: &'a [i32],
    pub quantity: &'a [i32],
}

impl<'a> LineItemColumns<'a> {
    pub fn new(ship_date: &'a [i32], discount: &'a [i32], quantity: &'a [i32]) -> Self {
        Self {
            ship_date,
            discount,
            quantity,
        }
    }

    /// Number of complete rows, i.e. the length of the shortest column.
    pub fn len(&self) -> usize {
        self.ship_date
            .len()
            .min(self.discount.len())
            .min(self.quantity.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails with [`FilterError::InvalidLength`] unless every column holds at least `count` rows.
    pub fn validate(&self, count: usize) -> Result<()> {
        check_len("ship_date", count, self.ship_date.len())?;
        check_len("discount", count, self.discount.len())?;
        check_len("quantity", count, self.quantity.len())
    }

    /// The first `count` rows of every column. Callers validate first.
    #[inline]
    pub(crate) fn head(&self, count: usize) -> (&'a [i32], &'a [i32], &'a [i32]) {
        (
            &self.ship_date[..count],
            &self.discount[..count],
            &self.quantity[..count],
        )
    }
}

#[inline]
pub(crate) fn check_len(column: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(FilterError::InvalidLength {
            column,
            required,
            actual,
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_max_len(column: &'static str, max: usize, actual: usize) -> Result<()> {
    if actual > max {
        return Err(FilterError::TooManyRows {
            column,
            max,
            actual,
        });
    }
    Ok(())
}

/// Owned column storage, as produced by the generator or a column file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedColumns {
    pub ship_date: Vec<i32>,
    pub discount: Vec<i32>,
    pub quantity: Vec<i32>,
}

impl OwnedColumns {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            ship_date: Vec::with_capacity(rows),
            discount: Vec::with_capacity(rows),
            quantity: Vec::with_capacity(rows),
        }
    }

    #[inline]
    pub fn push(&mut self, ship_date: i32, discount: i32, quantity: i32) {
        self.ship_date.push(ship_date);
        self.discount.push(discount);
        self.quantity.push(quantity);
    }

    pub fn len(&self) -> usize {
        self.as_columns().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_columns(&self) -> LineItemColumns<'_> {
        LineItemColumns::new(&self.ship_date, &self.discount, &self.quantity)
    }
}

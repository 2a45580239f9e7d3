//! Consumers of the 0/1 selection mask the kernel produces.
//!
//! The kernel only classifies rows. Turning a mask into row positions or
//! counting matches happens here, in a separate pass.

use crate::{
    core::columns::{check_len, check_max_len},
    error::Result,
};

/// Number of selected rows. Assumes every byte is 0 or 1.
pub fn count_selected(mask: &[u8]) -> usize {
    mask.iter().map(|&m| m as usize).sum()
}

/// Fraction of selected rows, `0.0` for an empty mask.
pub fn selectivity(mask: &[u8]) -> f64 {
    if mask.is_empty() {
        return 0.0;
    }
    count_selected(mask) as f64 / mask.len() as f64
}

/// Dense to sparse: writes the index of every selected row to the front of
/// `positions` and returns how many were written.
///
/// Branchless: every index is stored and the cursor only advances on a 1, so
/// `positions` must be at least `mask.len()` long even at low selectivity.
pub fn mask_to_positions(mask: &[u8], positions: &mut [i32]) -> Result<usize> {
    check_len("positions", mask.len(), positions.len())?;
    check_max_len("mask", i32::MAX as usize, mask.len())?;

    let mut selected = 0usize;
    for (row, &m) in mask.iter().enumerate() {
        positions[selected] = row as i32;
        selected += (m & 1) as usize;
    }

    Ok(selected)
}

/// Allocating form of [`mask_to_positions`].
pub fn selected_positions(mask: &[u8]) -> Result<Vec<i32>> {
    let mut positions = vec![0i32; mask.len()];
    let selected = mask_to_positions(mask, &mut positions)?;
    positions.truncate(selected);
    Ok(positions)
}

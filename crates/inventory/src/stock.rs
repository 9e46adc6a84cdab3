//! Stock arithmetic shared by every inventory backend.
//!
//! Backends apply [`remaining_after`] inside their own atomic primitive (a CAS
//! loop, a conditional SQL update); callers never read, compute and write back.

use crate::product::Quantity;

/// Stock left after taking `amount` from `available`, or `None` if that would
/// oversell.
pub fn remaining_after(available: i64, amount: Quantity) -> Option<i64> {
    available.checked_sub(amount.get()).filter(|left| *left >= 0)
}

/// Advisory check against a possibly stale read.
pub fn covers(available: i64, amount: Quantity) -> bool {
    remaining_after(available, amount).is_some()
}

//! Canonical ordering of (degree, order) pairs
//!
//! Coefficient vectors carry no labels: position `j` means the `j`-th pair in
//! degree-major order with the order ascending from `-l` to `l`. Basis
//! construction and every consumer of coefficients go through this module so
//! the two sides cannot drift apart.

use serde::{Deserialize, Serialize};

/// A harmonic degree `l >= 0` and order `m` in `[-l, l]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DegreeOrder {
    pub l: usize,
    pub m: isize,
}

impl DegreeOrder {
    /// Create a pair, returning `None` when `|m| > l`
    pub fn new(l: usize, m: isize) -> Option<Self> {
        (m.unsigned_abs() <= l).then_some(Self { l, m })
    }

    /// Position of this pair in a coefficient vector
    pub fn index(&self) -> usize {
        self.l * self.l + (self.l as isize + self.m) as usize
    }

    /// Inverse of [`DegreeOrder::index`]
    pub fn from_index(index: usize) -> Self {
        let mut l = (index as f64).sqrt() as usize;
        while (l + 1) * (l + 1) <= index {
            l += 1;
        }
        while l * l > index {
            l -= 1;
        }
        let m = index as isize - (l * l + l) as isize;
        Self { l, m }
    }
}

/// Number of coefficients in an expansion truncated at `l_max`
pub fn num_coefficients(l_max: usize) -> usize {
    (l_max + 1) * (l_max + 1)
}

/// All pairs up to `l_max` in canonical order
pub fn degree_orders(l_max: usize) -> impl Iterator<Item = DegreeOrder> {
    (0..=l_max).flat_map(|l| {
        let l_signed = l as isize;
        (-l_signed..=l_signed).map(move |m| DegreeOrder { l, m })
    })
}

/// Largest `l_max` whose expansion has exactly `count` coefficients, if any
pub fn l_max_for_coefficients(count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let side = DegreeOrder::from_index(count - 1).l;
    (num_coefficients(side) == count).then_some(side)
}

//! Fully normalized associated Legendre functions
//!
//! Values are scaled so that `P(l, m, cos theta) * exp(i m phi)` is the
//! orthonormal complex spherical harmonic `Y_l^m`, Condon-Shortley phase
//! included. They are produced by the standard three-term recurrence in `l`,
//! which stays stable without ever forming factorials.

use std::f64::consts::PI;

/// Triangular table of `P(l, m)` for `0 <= m <= l <= l_max` at one angle
#[derive(Debug, Clone)]
pub struct LegendreTable {
    l_max: usize,
    values: Vec<f64>,
}

#[inline]
fn slot(l: usize, m: usize) -> usize {
    l * (l + 1) / 2 + m
}

impl LegendreTable {
    pub fn new(l_max: usize) -> Self {
        Self {
            l_max,
            values: vec![0.0; slot(l_max, l_max) + 1],
        }
    }

    pub fn l_max(&self) -> usize {
        self.l_max
    }

    /// Fill the table for zenith angle `theta`
    pub fn compute(&mut self, theta: f64) {
        let x = theta.cos();
        // |sin theta| rather than sqrt(1 - x^2), which loses precision near the poles.
        let s = theta.sin().abs();
        let values = &mut self.values;

        values[0] = 0.5 / PI.sqrt();

        for m in 1..=self.l_max {
            let mf = m as f64;
            values[slot(m, m)] =
                -((2.0 * mf + 1.0) / (2.0 * mf)).sqrt() * s * values[slot(m - 1, m - 1)];
        }

        for m in 0..self.l_max {
            values[slot(m + 1, m)] = (2.0 * m as f64 + 3.0).sqrt() * x * values[slot(m, m)];
        }

        for m in 0..=self.l_max {
            let m2 = (m * m) as f64;
            for l in (m + 2)..=self.l_max {
                let lf = l as f64;
                let a = ((4.0 * lf * lf - 1.0) / (lf * lf - m2)).sqrt();
                let lp = lf - 1.0;
                let b = ((lp * lp - m2) / (4.0 * lp * lp - 1.0)).sqrt();
                values[slot(l, m)] = a * (x * values[slot(l - 1, m)] - b * values[slot(l - 2, m)]);
            }
        }
    }

    /// Value for degree `l` and order `m`
    ///
    /// Panics if `m > l` or `l > l_max`.
    #[inline]
    pub fn get(&self, l: usize, m: usize) -> f64 {
        assert!(m <= l && l <= self.l_max, "({}, {}) outside table", l, m);
        self.values[slot(l, m)]
    }
}

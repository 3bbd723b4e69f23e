//! # Embedded Runge-Kutta pairs
//!
//! Coefficients of the explicit pairs available to the
//! [`Integrator`](crate::integrator::Integrator). For a step `h` from `(t, y)`:
//!
//! ```text
//! k_i   = f(t + c_i h, y + h Σ_j a_ij k_j)
//! y_new = y + h Σ_i b_i k_i
//! δ     = h Σ_i (b_i - b̂_i) k_i
//! ```
//!
//! Row `i` of `a` holds the `i` coefficients of stage `i` (row 0 is empty).

/// Coefficients of an embedded explicit Runge-Kutta pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButcherTableau {
    pub a: &'static [&'static [f64]],
    /// Weights of the propagated solution
    pub b: &'static [f64],
    /// Weights of the embedded solution used for the error estimate
    pub b_hat: &'static [f64],
    pub c: &'static [f64],
    /// Order of the propagated solution
    pub order: u32,
    /// The last stage is evaluated at `(t + h, y_new)` and is reused as the first stage of the
    /// next step (first same as last).
    pub fsal: bool,
}

impl ButcherTableau {
    pub fn stages(&self) -> usize {
        self.c.len()
    }

    /// `b - b̂`, the weights of the local error estimate.
    pub fn error_weights(&self) -> Vec<f64> {
        self.b
            .iter()
            .zip(self.b_hat)
            .map(|(b, b_hat)| b - b_hat)
            .collect()
    }
}

/// Runge-Kutta-Fehlberg 4(5), 6 stages, propagating the fifth-order solution.
pub const RKF45: ButcherTableau = ButcherTableau {
    a: &[
        &[],
        &[1.0 / 4.0],
        &[3.0 / 32.0, 9.0 / 32.0],
        &[1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0],
        &[439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0],
        &[-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
    ],
    b: &[
        16.0 / 135.0,
        0.0,
        6656.0 / 12825.0,
        28561.0 / 56430.0,
        -9.0 / 50.0,
        2.0 / 55.0,
    ],
    b_hat: &[
        25.0 / 216.0,
        0.0,
        1408.0 / 2565.0,
        2197.0 / 4104.0,
        -1.0 / 5.0,
        0.0,
    ],
    c: &[0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0],
    order: 5,
    fsal: false,
};

/// Dormand-Prince 5(4), 7 stages with first-same-as-last.
pub const DOP45: ButcherTableau = ButcherTableau {
    a: &[
        &[],
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
        ],
        &[
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
        ],
        &[
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
        ],
    ],
    b: &[
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
    b_hat: &[
        5179.0 / 57600.0,
        0.0,
        7571.0 / 16695.0,
        393.0 / 640.0,
        -92097.0 / 339200.0,
        187.0 / 2100.0,
        1.0 / 40.0,
    ],
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0],
    order: 5,
    fsal: true,
};

/// Runge-Kutta-Fehlberg 7(8), 13 stages, propagating the seventh-order solution.
///
/// The error estimate reduces to `41/840 (k_0 + k_10 - k_11 - k_12)`.
pub const RKF78: ButcherTableau = ButcherTableau {
    a: &[
        &[],
        &[2.0 / 27.0],
        &[1.0 / 36.0, 1.0 / 12.0],
        &[1.0 / 24.0, 0.0, 1.0 / 8.0],
        &[5.0 / 12.0, 0.0, -25.0 / 16.0, 25.0 / 16.0],
        &[1.0 / 20.0, 0.0, 0.0, 1.0 / 4.0, 1.0 / 5.0],
        &[
            -25.0 / 108.0,
            0.0,
            0.0,
            125.0 / 108.0,
            -65.0 / 27.0,
            125.0 / 54.0,
        ],
        &[
            31.0 / 300.0,
            0.0,
            0.0,
            0.0,
            61.0 / 225.0,
            -2.0 / 9.0,
            13.0 / 900.0,
        ],
        &[
            2.0,
            0.0,
            0.0,
            -53.0 / 6.0,
            704.0 / 45.0,
            -107.0 / 9.0,
            67.0 / 90.0,
            3.0,
        ],
        &[
            -91.0 / 108.0,
            0.0,
            0.0,
            23.0 / 108.0,
            -976.0 / 135.0,
            311.0 / 54.0,
            -19.0 / 60.0,
            17.0 / 6.0,
            -1.0 / 12.0,
        ],
        &[
            2383.0 / 4100.0,
            0.0,
            0.0,
            -341.0 / 164.0,
            4496.0 / 1025.0,
            -301.0 / 82.0,
            2133.0 / 4100.0,
            45.0 / 82.0,
            45.0 / 164.0,
            18.0 / 41.0,
        ],
        &[
            3.0 / 205.0,
            0.0,
            0.0,
            0.0,
            0.0,
            -6.0 / 41.0,
            -3.0 / 205.0,
            -3.0 / 41.0,
            3.0 / 41.0,
            6.0 / 41.0,
            0.0,
        ],
        &[
            -1777.0 / 4100.0,
            0.0,
            0.0,
            -341.0 / 164.0,
            4496.0 / 1025.0,
            -289.0 / 82.0,
            2193.0 / 4100.0,
            51.0 / 82.0,
            33.0 / 164.0,
            12.0 / 41.0,
            0.0,
            1.0,
        ],
    ],
    b: &[
        41.0 / 840.0,
        0.0,
        0.0,
        0.0,
        0.0,
        34.0 / 105.0,
        9.0 / 35.0,
        9.0 / 35.0,
        9.0 / 280.0,
        9.0 / 280.0,
        41.0 / 840.0,
        0.0,
        0.0,
    ],
    b_hat: &[
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        34.0 / 105.0,
        9.0 / 35.0,
        9.0 / 35.0,
        9.0 / 280.0,
        9.0 / 280.0,
        0.0,
        41.0 / 840.0,
        41.0 / 840.0,
    ],
    c: &[
        0.0,
        2.0 / 27.0,
        1.0 / 9.0,
        1.0 / 6.0,
        5.0 / 12.0,
        1.0 / 2.0,
        5.0 / 6.0,
        1.0 / 6.0,
        2.0 / 3.0,
        1.0 / 3.0,
        1.0,
        0.0,
        1.0,
    ],
    order: 7,
    fsal: false,
};

#[cfg(test)]
mod butcher_tableau_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn check_consistency(tableau: &ButcherTableau) {
        let n = tableau.stages();
        assert_eq!(tableau.a.len(), n);
        assert_eq!(tableau.b.len(), n);
        assert_eq!(tableau.b_hat.len(), n);
        for (i, row) in tableau.a.iter().enumerate() {
            assert_eq!(row.len(), i);
            // c_i = Σ_j a_ij
            assert_abs_diff_eq!(row.iter().sum::<f64>(), tableau.c[i], epsilon = 1e-14);
        }
        assert_abs_diff_eq!(tableau.b.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(tableau.b_hat.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        // second order condition Σ b_i c_i = 1/2 holds for both solutions
        let bc: f64 = tableau.b.iter().zip(tableau.c).map(|(b, c)| b * c).sum();
        let bc_hat: f64 = tableau.b_hat.iter().zip(tableau.c).map(|(b, c)| b * c).sum();
        assert_abs_diff_eq!(bc, 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(bc_hat, 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_consistency() {
        check_consistency(&RKF45);
        check_consistency(&DOP45);
        check_consistency(&RKF78);
    }

    #[test]
    fn test_dop45_fsal_row() {
        assert!(DOP45.fsal);
        assert_eq!(DOP45.a[6], &DOP45.b[..6]);
        assert_eq!(DOP45.c[6], 1.0);
    }

    #[test]
    fn test_rkf78_error_weights() {
        let w = RKF78.error_weights();
        let k = 41.0 / 840.0;
        for (i, wi) in w.iter().enumerate() {
            let expected = match i {
                0 | 10 => k,
                11 | 12 => -k,
                _ => 0.0,
            };
            assert_abs_diff_eq!(*wi, expected, epsilon = 1e-16);
        }
    }
}

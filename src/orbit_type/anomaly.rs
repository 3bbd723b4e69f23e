//! # Angle normalization and anomaly conversions
//!
//! Helpers shared by the element sets:
//!
//! - [`principal_angle`] and [`angle_diff`] keep angles in their canonical ranges,
//! - true ↔ eccentric ↔ mean anomaly conversions for elliptic and hyperbolic orbits,
//! - [`mean_to_eccentric`] solves Kepler's equation with a Newton–Raphson iteration
//!   (`roots` crate).
use std::f64::consts::PI;

use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{constants::DPI, propagation_errors::PropagationError};

/// Normalize an angle to `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    let wrapped = a.rem_euclid(DPI);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `a - b` folded into `[-π, π]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let diff = principal_angle(a) - principal_angle(b);
    if diff > PI {
        diff - DPI
    } else if diff < -PI {
        diff + DPI
    } else {
        diff
    }
}

/// Eccentric (e < 1) or hyperbolic (e > 1) anomaly from the true anomaly.
pub fn true_to_eccentric(true_anomaly: f64, eccentricity: f64) -> f64 {
    let half = 0.5 * true_anomaly;
    if eccentricity < 1.0 {
        2.0 * (((1.0 - eccentricity) / (1.0 + eccentricity)).sqrt() * half.tan()).atan()
    } else {
        2.0 * (((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt() * half.tan()).atanh()
    }
}

/// True anomaly from the eccentric (e < 1) or hyperbolic (e > 1) anomaly.
pub fn eccentric_to_true(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = 0.5 * eccentric_anomaly;
    if eccentricity < 1.0 {
        2.0 * (((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt() * half.tan()).atan()
    } else {
        2.0 * (((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt() * half.tanh()).atan()
    }
}

/// Kepler's equation, `M = E - e sin E` (or `M = e sinh F - F` when hyperbolic).
pub fn eccentric_to_mean(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    if eccentricity < 1.0 {
        eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
    } else {
        eccentricity * eccentric_anomaly.sinh() - eccentric_anomaly
    }
}

/// Solve Kepler's equation for the eccentric (or hyperbolic) anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly (rad)
/// * `eccentricity`: orbit eccentricity, any value but 1
///
/// Return
/// ------
/// * the eccentric anomaly (rad), or `PropagationError::KeplerSolverFailed` if the Newton
///   iteration does not converge.
pub fn mean_to_eccentric(mean_anomaly: f64, eccentricity: f64) -> Result<f64, PropagationError> {
    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 50,
    };

    if eccentricity < 1.0 {
        let f = |ea: f64| -> f64 { ea - eccentricity * ea.sin() - mean_anomaly };
        let df = |ea: f64| -> f64 { 1.0 - eccentricity * ea.cos() };
        let x0 = if eccentricity > 0.8 { PI } else { mean_anomaly };
        Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
    } else {
        let f = |fa: f64| -> f64 { eccentricity * fa.sinh() - fa - mean_anomaly };
        let df = |fa: f64| -> f64 { eccentricity * fa.cosh() - 1.0 };
        let x0 = (2.0 * mean_anomaly.abs() / eccentricity + 1.8)
            .ln()
            .copysign(mean_anomaly);
        Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
    }
}

/// Mean anomaly from the true anomaly. Elliptic results are normalized to `[0, 2π)`.
pub fn true_to_mean(true_anomaly: f64, eccentricity: f64) -> f64 {
    let mean = eccentric_to_mean(true_to_eccentric(true_anomaly, eccentricity), eccentricity);
    if eccentricity < 1.0 {
        principal_angle(mean)
    } else {
        mean
    }
}

/// True anomaly from the mean anomaly, normalized to `[0, 2π)`.
pub fn mean_to_true(mean_anomaly: f64, eccentricity: f64) -> Result<f64, PropagationError> {
    let m = if eccentricity < 1.0 {
        principal_angle(mean_anomaly)
    } else {
        mean_anomaly
    };
    let ea = mean_to_eccentric(m, eccentricity)?;
    Ok(principal_angle(eccentric_to_true(ea, eccentricity)))
}

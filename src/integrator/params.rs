use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{integrator::StepMethod, propagation_errors::PropagationError};

/// Configuration of the [`Integrator`](crate::integrator::Integrator).
///
/// Fields
/// -----------------
/// * `abs_tol`, `rel_tol`: error tolerances of the adaptive step control.
/// * `step_method`: Runge-Kutta pair used for each step.
/// * `initial_time_step`: first trial step (s).
/// * `max_iterations`: ceiling on the number of accepted steps of one propagation.
/// * `max_step_retries`: rejected trials allowed before a step fails.
/// * `fixed_time_step`, `use_fixed_step`: take unchecked steps of constant size instead.
/// * `min_time_step`, `max_time_step`: bounds on the magnitude of an adaptive step (s).
/// * `max_growth_ratio`: maximum ratio between two consecutive adaptive steps.
///
/// Missing fields fall back to their default when deserializing, so a configuration file only
/// needs to list what it overrides.
///
/// See also
/// -----------------
/// * [`IntegratorParams::builder`] – Validated construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorParams {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub step_method: StepMethod,
    pub initial_time_step: f64,
    pub max_iterations: u64,
    pub max_step_retries: u32,
    pub fixed_time_step: f64,
    pub use_fixed_step: bool,
    pub min_time_step: f64,
    pub max_time_step: f64,
    pub max_growth_ratio: f64,
}

impl IntegratorParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent, validated construction of [`IntegratorParams`].
    ///
    /// ```rust
    /// use orbitflow::integrator::{params::IntegratorParams, StepMethod};
    ///
    /// let params = IntegratorParams::builder()
    ///     .step_method(StepMethod::Rkf78)
    ///     .abs_tol(1e-10)
    ///     .rel_tol(1e-10)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.initial_time_step, 300.0);
    /// ```
    pub fn builder() -> IntegratorParamsBuilder {
        IntegratorParamsBuilder::new()
    }

    /// Run the builder checks on an existing set of parameters, e.g. after deserialization.
    pub fn validate(self) -> Result<Self, PropagationError> {
        IntegratorParamsBuilder { params: self }.build()
    }
}

impl Default for IntegratorParams {
    fn default() -> Self {
        IntegratorParams {
            abs_tol: 1.0e-13,
            rel_tol: 1.0e-13,
            step_method: StepMethod::Dop45,
            initial_time_step: 300.0,
            max_iterations: 100_000_000,
            max_step_retries: 1000,
            fixed_time_step: 1.0,
            use_fixed_step: false,
            min_time_step: 1.0e-10,
            max_time_step: 1.0e6,
            max_growth_ratio: 10.0,
        }
    }
}

/// Builder for [`IntegratorParams`], with validation.
#[derive(Debug, Clone)]
pub struct IntegratorParamsBuilder {
    params: IntegratorParams,
}

impl Default for IntegratorParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegratorParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: IntegratorParams::default(),
        }
    }

    pub fn abs_tol(mut self, v: f64) -> Self {
        self.params.abs_tol = v;
        self
    }
    pub fn rel_tol(mut self, v: f64) -> Self {
        self.params.rel_tol = v;
        self
    }
    pub fn step_method(mut self, v: StepMethod) -> Self {
        self.params.step_method = v;
        self
    }
    pub fn initial_time_step(mut self, v: f64) -> Self {
        self.params.initial_time_step = v;
        self
    }
    pub fn max_iterations(mut self, v: u64) -> Self {
        self.params.max_iterations = v;
        self
    }
    pub fn max_step_retries(mut self, v: u32) -> Self {
        self.params.max_step_retries = v;
        self
    }
    pub fn fixed_time_step(mut self, v: f64) -> Self {
        self.params.fixed_time_step = v;
        self
    }
    pub fn use_fixed_step(mut self, v: bool) -> Self {
        self.params.use_fixed_step = v;
        self
    }
    pub fn min_time_step(mut self, v: f64) -> Self {
        self.params.min_time_step = v;
        self
    }
    pub fn max_time_step(mut self, v: f64) -> Self {
        self.params.max_time_step = v;
        self
    }
    pub fn max_growth_ratio(mut self, v: f64) -> Self {
        self.params.max_growth_ratio = v;
        self
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x > 0.0
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// -----------------
    /// * `Err(PropagationError::InvalidIntegratorParameter)` when a tolerance or a step bound is
    ///   not strictly positive and finite, when `min_time_step > max_time_step`, when
    ///   `max_growth_ratio <= 1`, or when an iteration count is zero.
    pub fn build(self) -> Result<IntegratorParams, PropagationError> {
        let p = &self.params;

        if !Self::gt0(p.abs_tol) || !Self::gt0(p.rel_tol) {
            return Err(PropagationError::InvalidIntegratorParameter(
                "abs_tol and rel_tol must be > 0".into(),
            ));
        }
        if !Self::gt0(p.initial_time_step) || !Self::gt0(p.fixed_time_step) {
            return Err(PropagationError::InvalidIntegratorParameter(
                "initial_time_step and fixed_time_step must be > 0".into(),
            ));
        }
        if !Self::gt0(p.min_time_step) || !Self::gt0(p.max_time_step) {
            return Err(PropagationError::InvalidIntegratorParameter(
                "min_time_step and max_time_step must be > 0".into(),
            ));
        }
        if p.min_time_step > p.max_time_step {
            return Err(PropagationError::InvalidIntegratorParameter(
                "require min_time_step <= max_time_step".into(),
            ));
        }
        if !(p.max_growth_ratio.is_finite() && p.max_growth_ratio > 1.0) {
            return Err(PropagationError::InvalidIntegratorParameter(
                "max_growth_ratio must be > 1".into(),
            ));
        }
        if p.max_iterations == 0 || p.max_step_retries == 0 {
            return Err(PropagationError::InvalidIntegratorParameter(
                "max_iterations and max_step_retries must be >= 1".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for IntegratorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 40;
            writeln!(f, "Integrator Parameters")?;
            writeln!(f, "---------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Step control]")?;
            line!("step_method       = {}", self.step_method, "Runge-Kutta pair")?;
            line!("abs_tol           = {:.1e}", self.abs_tol, "Absolute error tolerance")?;
            line!("rel_tol           = {:.1e}", self.rel_tol, "Relative error tolerance")?;
            line!(
                "initial_time_step = {:.3} s",
                self.initial_time_step,
                "First trial step"
            )?;
            line!("min_time_step     = {:.1e} s", self.min_time_step, "Smallest adaptive step")?;
            line!("max_time_step     = {:.1e} s", self.max_time_step, "Largest adaptive step")?;
            line!(
                "max_growth_ratio  = {:.1}",
                self.max_growth_ratio,
                "Max ratio between consecutive steps"
            )?;

            writeln!(f, "\n[Fixed step]")?;
            line!("use_fixed_step    = {}", self.use_fixed_step, "Disable error control")?;
            line!("fixed_time_step   = {:.3} s", self.fixed_time_step, "Constant step size")?;

            writeln!(f, "\n[Limits]")?;
            line!("max_iterations    = {}", self.max_iterations, "Accepted steps ceiling")?;
            line!(
                "max_step_retries  = {}",
                self.max_step_retries,
                "Rejected trials per step"
            )?;
            Ok(())
        } else {
            write!(
                f,
                "IntegratorParams(method={}, abs_tol={:.1e}, rel_tol={:.1e}, h0={} s, fixed={})",
                self.step_method,
                self.abs_tol,
                self.rel_tol,
                self.initial_time_step,
                self.use_fixed_step
            )
        }
    }
}

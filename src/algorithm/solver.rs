//! Conjugate gradient for symmetric positive definite operators
//!
//! The operator is only touched through [`LinearOperator::apply`]. All dot
//! products are sequential, so identical inputs give bit-identical results.

use log::{debug, trace, warn};

use crate::algorithm::diffusion::LinearOperator;
use crate::io::configuration::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::io::error::{
    InpaintError, Result, computation_error, ensure_same_shape, invalid_parameter,
};
use crate::math::vector::{axpy, difference, dot, norm, xpby};
use crate::spatial::grid::allocate;

/// Progress snapshot handed to observers after every iteration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationReport {
    /// Iterations completed so far
    pub iteration: usize,
    /// Euclidean norm of the current residual
    pub residual_norm: f64,
    /// Iteration budget of the solve
    pub max_iterations: usize,
}

/// Outcome of a solve
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Approximate solution vector
    pub x: Vec<f64>,
    /// Iterations performed
    pub iterations: usize,
    /// Residual norm `|b - A x|` at termination
    pub residual_norm: f64,
    /// Whether the residual dropped below the tolerance
    pub converged: bool,
    /// Tolerance that was requested
    pub tolerance: f64,
}

impl Solution {
    /// Keep the solution only if the solve converged
    ///
    /// # Errors
    ///
    /// Returns `NonConvergence` when the iteration budget ran out first
    pub fn into_converged(self) -> Result<Vec<f64>> {
        if self.converged {
            Ok(self.x)
        } else {
            Err(InpaintError::NonConvergence {
                iterations: self.iterations,
                residual: self.residual_norm,
                tolerance: self.tolerance,
            })
        }
    }
}

/// Conjugate gradient settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConjugateGradient {
    /// Iteration budget; reaching it ends the solve unconverged
    pub max_iterations: usize,
    /// Absolute residual norm below which the solve is converged
    pub tolerance: f64,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE)
    }
}

impl ConjugateGradient {
    /// Solver with the given budget and tolerance
    pub const fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Solve `A x = b`, starting from zero unless a guess is given
    ///
    /// # Errors
    ///
    /// See [`ConjugateGradient::solve_observed`]
    pub fn solve(
        &self,
        operator: &impl LinearOperator,
        b: &[f64],
        initial_guess: Option<&[f64]>,
    ) -> Result<Solution> {
        self.solve_observed(operator, b, initial_guess, &mut |_| {})
    }

    /// Solve `A x = b`, reporting every iteration to `observer`
    ///
    /// Running out of iterations is not an error: the returned solution has
    /// `converged == false`. Use [`Solution::into_converged`] to treat it as
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a negative or non-finite tolerance,
    /// `DimensionMismatch` if `b` or the guess does not match the operator's
    /// order and `Computation` if the operator turns out not to be positive
    /// definite
    pub fn solve_observed(
        &self,
        operator: &impl LinearOperator,
        b: &[f64],
        initial_guess: Option<&[f64]>,
        observer: &mut dyn FnMut(&IterationReport),
    ) -> Result<Solution> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(invalid_parameter(
                "tolerance",
                &self.tolerance,
                &"must be a non-negative finite number",
            ));
        }

        let order = operator.order();
        ensure_same_shape((order, 1), (b.len(), 1))?;

        let mut x = match initial_guess {
            Some(guess) => {
                ensure_same_shape((order, 1), (guess.len(), 1))?;
                guess.to_vec()
            }
            None => allocate(order, 0.0)?,
        };

        let mut product = allocate(order, 0.0)?;
        let mut residual = allocate(order, 0.0)?;
        operator.apply(&x, &mut product)?;
        difference(b, &product, &mut residual);

        let mut direction = residual.clone();
        let mut residual_squared = dot(&residual, &residual);
        let mut iterations = 0;

        let tolerance = self.tolerance;
        let settled = |squared: f64| squared == 0.0 || squared.sqrt() < tolerance;

        while !settled(residual_squared) && iterations < self.max_iterations {
            operator.apply(&direction, &mut product)?;
            let curvature = dot(&direction, &product);
            if curvature <= 0.0 || !curvature.is_finite() {
                return Err(computation_error(
                    "conjugate gradient",
                    &format!(
                        "non-positive curvature {curvature:e} at iteration {iterations}; operator is not positive definite"
                    ),
                ));
            }

            let alpha = residual_squared / curvature;
            axpy(alpha, &direction, &mut x);
            axpy(-alpha, &product, &mut residual);

            let next_squared = dot(&residual, &residual);
            let beta = next_squared / residual_squared;
            xpby(&residual, beta, &mut direction);
            residual_squared = next_squared;
            iterations += 1;

            let report = IterationReport {
                iteration: iterations,
                residual_norm: residual_squared.sqrt(),
                max_iterations: self.max_iterations,
            };
            trace!(
                "CG iteration {}: residual {:e}",
                report.iteration, report.residual_norm
            );
            observer(&report);
        }

        let residual_norm = norm(&residual);
        let converged = settled(residual_squared);
        if converged {
            debug!("CG converged in {iterations} iterations (residual {residual_norm:e})");
        } else {
            warn!(
                "CG stopped after {iterations} iterations with residual {residual_norm:e} above tolerance {:e}",
                self.tolerance
            );
        }

        Ok(Solution {
            x,
            iterations,
            residual_norm,
            converged,
            tolerance: self.tolerance,
        })
    }
}

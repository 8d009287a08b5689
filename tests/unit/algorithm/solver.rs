//! Tests for the conjugate gradient solver

#[cfg(test)]
mod tests {
    use pdeinpaint::InpaintError;
    use pdeinpaint::algorithm::diffusion::LinearOperator;
    use pdeinpaint::algorithm::solver::{ConjugateGradient, IterationReport};

    struct Diagonal(Vec<f64>);

    impl LinearOperator for Diagonal {
        fn order(&self) -> usize {
            self.0.len()
        }

        fn apply(&self, x: &[f64], out: &mut [f64]) -> pdeinpaint::Result<()> {
            for ((target, value), scale) in out.iter_mut().zip(x).zip(&self.0) {
                *target = value * scale;
            }
            Ok(())
        }
    }

    // Tests the identity operator is solved exactly in one step
    #[test]
    fn test_identity_one_iteration() -> pdeinpaint::Result<()> {
        let b = [3.0, -1.0, 2.5, 0.0];
        let solution = ConjugateGradient::new(10, 1e-12).solve(&Diagonal(vec![1.0; 4]), &b, None)?;

        assert!(solution.converged);
        assert_eq!(solution.iterations, 1);
        assert_eq!(solution.x, b.to_vec());
        assert_eq!(solution.residual_norm, 0.0);
        Ok(())
    }

    // Tests a zero right-hand side from a zero start needs no iterations
    #[test]
    fn test_zero_rhs_returns_immediately() -> pdeinpaint::Result<()> {
        let solution = ConjugateGradient::new(10, 0.0).solve(&Diagonal(vec![2.0; 3]), &[0.0; 3], None)?;
        assert!(solution.converged);
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x, vec![0.0; 3]);
        Ok(())
    }

    // Tests an exact initial guess is accepted without iterating
    #[test]
    fn test_exact_guess() -> pdeinpaint::Result<()> {
        let operator = Diagonal(vec![2.0, 4.0]);
        let solution = ConjugateGradient::default().solve(&operator, &[2.0, 8.0], Some(&[1.0, 2.0]))?;
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.x, vec![1.0, 2.0]);
        Ok(())
    }

    // Tests convergence on a positive definite diagonal system within its order
    // Verified by dropping the beta term from the direction update
    #[test]
    fn test_distinct_eigenvalues_converge() -> pdeinpaint::Result<()> {
        let operator = Diagonal(vec![1.0, 2.0, 3.0, 4.0]);
        let b = [1.0, 1.0, 1.0, 1.0];
        let solution = ConjugateGradient::new(20, 1e-10).solve(&operator, &b, None)?;

        assert!(solution.converged);
        assert!(solution.iterations <= 5);
        for (x, scale) in solution.x.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!((x - 1.0 / scale).abs() < 1e-9);
        }
        Ok(())
    }

    // Tests running out of iterations is reported, not raised
    #[test]
    fn test_budget_exhaustion() -> pdeinpaint::Result<()> {
        let operator = Diagonal(vec![1.0, 10.0, 100.0]);
        let solution = ConjugateGradient::new(1, 1e-12).solve(&operator, &[1.0; 3], None)?;

        assert!(!solution.converged);
        assert_eq!(solution.iterations, 1);
        assert!(matches!(
            solution.into_converged(),
            Err(InpaintError::NonConvergence { iterations: 1, .. })
        ));
        Ok(())
    }

    // Tests the observer sees every iteration in order
    #[test]
    fn test_observer_receives_reports() -> pdeinpaint::Result<()> {
        let operator = Diagonal(vec![1.0, 2.0, 3.0]);
        let mut reports: Vec<IterationReport> = Vec::new();
        let solution = ConjugateGradient::new(50, 1e-10).solve_observed(
            &operator,
            &[1.0; 3],
            None,
            &mut |report| reports.push(*report),
        )?;

        assert_eq!(reports.len(), solution.iterations);
        for (expected, report) in (1..).zip(&reports) {
            assert_eq!(report.iteration, expected);
            assert_eq!(report.max_iterations, 50);
        }
        Ok(())
    }

    // Tests an indefinite operator is detected
    #[test]
    fn test_indefinite_operator_fails() {
        let operator = Diagonal(vec![-1.0, -2.0]);
        assert!(matches!(
            ConjugateGradient::default().solve(&operator, &[1.0, 1.0], None),
            Err(InpaintError::Computation { .. })
        ));
    }

    // Tests argument validation
    #[test]
    fn test_argument_validation() {
        let operator = Diagonal(vec![1.0; 3]);
        assert!(matches!(
            ConjugateGradient::new(10, -1.0).solve(&operator, &[1.0; 3], None),
            Err(InpaintError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ConjugateGradient::default().solve(&operator, &[1.0; 2], None),
            Err(InpaintError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            ConjugateGradient::default().solve(&operator, &[1.0; 3], Some(&[0.0; 4])),
            Err(InpaintError::DimensionMismatch { .. })
        ));
    }
}

//! Tests for solver progress display

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pdeinpaint::algorithm::solver::IterationReport;
    use pdeinpaint::io::configuration::PROGRESS_REFRESH_INTERVAL;
    use pdeinpaint::io::progress::SolverProgress;

    fn report(iteration: usize) -> IterationReport {
        IterationReport {
            iteration,
            residual_norm: 1.0 / iteration as f64,
            max_iterations: 100,
        }
    }

    // Tests the bar only moves on refresh boundaries
    // Verified by updating on every iteration
    #[test]
    fn test_refresh_interval() {
        let mut progress = SolverProgress::hidden();

        progress.observe(&report(1));
        assert_eq!(progress.position(), 1);

        progress.observe(&report(2));
        assert_eq!(progress.position(), 1);

        progress.observe(&report(PROGRESS_REFRESH_INTERVAL));
        assert_eq!(progress.position(), PROGRESS_REFRESH_INTERVAL as u64);
    }

    // Tests finishing records the final iteration count
    #[test]
    fn test_finish_sets_final_position() {
        let progress = SolverProgress::new(Path::new("dir/image.pgm"), 100);
        progress.finish(37, true);
        assert_eq!(progress.position(), 37);

        let hidden = SolverProgress::hidden();
        hidden.finish(100, false);
        assert_eq!(hidden.position(), 100);
    }
}

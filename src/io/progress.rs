//! Terminal progress display for conjugate gradient solves

use std::path::Path;
use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};

use crate::algorithm::solver::IterationReport;
use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_REFRESH_INTERVAL};

static SOLVER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Iteration bar for one solve, fed from the solver's observer callback
///
/// The bar advances every [`PROGRESS_REFRESH_INTERVAL`] iterations and shows
/// the latest residual norm.
pub struct SolverProgress {
    bar: ProgressBar,
}

impl SolverProgress {
    /// Visible bar labelled with the file being processed
    pub fn new(path: &Path, max_iterations: usize) -> Self {
        let bar = ProgressBar::new(max_iterations as u64);
        bar.set_style(SOLVER_STYLE.clone());
        bar.set_prefix(
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );
        Self { bar }
    }

    /// Bar that draws nothing, for quiet runs
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record a solver iteration
    pub fn observe(&mut self, report: &IterationReport) {
        if report.iteration % PROGRESS_REFRESH_INTERVAL == 0 || report.iteration == 1 {
            self.bar.set_position(report.iteration as u64);
            self.bar
                .set_message(format!("residual {:.3e}", report.residual_norm));
        }
    }

    /// Iterations shown so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Stop the bar, noting whether the solve converged
    pub fn finish(&self, iterations: usize, converged: bool) {
        self.bar.set_position(iterations as u64);
        let outcome = if converged { "converged" } else { "not converged" };
        self.bar.finish_with_message(outcome);
    }
}

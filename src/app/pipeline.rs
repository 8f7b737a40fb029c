//! Shared "curve pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! solve parameters -> select root -> integrate cost bounds -> sample grid
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{CostEstimate, CurveConfig, FitResult};
use crate::error::AppError;
use crate::models::sample_curve;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub fit: FitResult,
    pub costs: Vec<CostEstimate>,
    /// `config.samples` evenly spaced `(x, y)` points over `[0, domain_max]`.
    pub grid: Vec<(f64, f64)>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_pipeline(config: &CurveConfig) -> Result<RunOutput, AppError> {
    if !(config.domain_max.is_finite() && config.domain_max > 0.0) {
        return Err(AppError::input(format!(
            "Domain limit must be positive (got {}).",
            config.domain_max
        )));
    }

    // 1) Solve and select parameters.
    let fit = crate::fit::fit_and_select(config)?;

    // 2) Integrate each bound.
    let costs = crate::pricing::cost_table(&fit.params, &config.bounds, config.scale, &config.quadrature)?;
    for c in costs.iter().filter(|c| !c.converged) {
        tracing::warn!(tokens = c.tokens, abs_error = c.abs_error, "cost integral did not converge");
    }

    // 3) Sample the curve for plotting.
    let grid = sample_curve(&fit.params, 0.0, config.domain_max, config.samples);

    Ok(RunOutput { fit, costs, grid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveFamily, DEFAULT_COST_BOUNDS, DEFAULT_SAMPLES, DOMAIN_MAX};

    #[test]
    fn default_run_produces_every_stage() {
        let run = run_pipeline(&CurveConfig::default()).unwrap();
        assert_eq!(run.costs.len(), DEFAULT_COST_BOUNDS.len());
        assert_eq!(run.grid.len(), DEFAULT_SAMPLES);
        assert_eq!(run.grid[0].0, 0.0);
        assert_eq!(run.grid[DEFAULT_SAMPLES - 1].0, DOMAIN_MAX);
        assert!(run.costs.iter().all(|c| c.converged));
    }

    #[test]
    fn exponential_grid_ends_at_upper_boundary() {
        let config = CurveConfig {
            family: CurveFamily::Exponential,
            ..CurveConfig::default()
        };
        let run = run_pipeline(&config).unwrap();
        assert!((run.grid[0].1 - config.lower.y).abs() <= 1e-9 * config.lower.y);
        assert!((run.grid.last().unwrap().1 - config.upper.y).abs() <= 1e-9 * config.upper.y);
    }

    #[test]
    fn rejects_bad_domain() {
        let config = CurveConfig {
            domain_max: 0.0,
            ..CurveConfig::default()
        };
        assert!(run_pipeline(&config).is_err());
    }
}

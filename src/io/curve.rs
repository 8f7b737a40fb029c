//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - family + solved parameters
//! - the boundary conditions it was solved from
//! - the cost table of the run
//! - a precomputed sampled grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::app::pipeline::RunOutput;
use crate::domain::{CurveConfig, CurveFile, CurveGrid};
use crate::error::AppError;

/// Build the serializable form of a run.
pub fn curve_file_from_run(run: &RunOutput, config: &CurveConfig) -> CurveFile {
    let (x, y) = run.grid.iter().copied().unzip();
    CurveFile {
        tool: "bc".to_string(),
        generated_at: Utc::now(),
        lower: run.fit.lower,
        upper: run.fit.upper,
        params: run.fit.params,
        scale: config.scale,
        costs: run.costs.clone(),
        grid: CurveGrid { x, y },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, run: &RunOutput, config: &CurveConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = curve_file_from_run(run, config);
    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::input(format!("Failed to write curve JSON: {e}")))?;

    tracing::info!(path = %path.display(), points = curve.grid.x.len(), "wrote curve JSON");
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid curve JSON: {e}")))?;

    if curve.grid.x.len() != curve.grid.y.len() {
        return Err(AppError::input(format!(
            "Invalid curve JSON: grid has {} x values but {} y values.",
            curve.grid.x.len(),
            curve.grid.y.len()
        )));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_pipeline;
    use crate::domain::CurveFamily;

    #[test]
    fn curve_json_survives_write_and_read() {
        let config = CurveConfig {
            family: CurveFamily::Exponential,
            ..CurveConfig::default()
        };
        let run = run_pipeline(&config).unwrap();

        let path = std::env::temp_dir().join(format!("bc_curve_{}.json", std::process::id()));
        write_curve_json(&path, &run, &config).unwrap();
        let back = read_curve_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, "bc");
        assert_eq!(back.params, run.fit.params);
        assert_eq!(back.grid.x.len(), config.samples);
        assert_eq!(back.costs.len(), config.bounds.len());
    }

    #[test]
    fn params_are_tagged_by_family() {
        let config = CurveConfig::default();
        let run = run_pipeline(&config).unwrap();
        let json = serde_json::to_value(curve_file_from_run(&run, &config)).unwrap();
        assert_eq!(json["params"]["family"], "quadratic");
        assert!(json["params"]["a"].is_number());
        assert!(json["params"]["b"].is_number());
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = read_curve_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}

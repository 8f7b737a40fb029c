//! Export the cost table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{CostEstimate, CurveParams};
use crate::error::AppError;

/// Write one CSV row per cost bound.
pub fn write_costs_csv(path: &Path, costs: &[CostEstimate], params: &CurveParams) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_costs(&mut file, costs, params)
        .map_err(|e| AppError::input(format!("Failed to write export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = costs.len(), "wrote cost CSV");
    Ok(())
}

fn write_costs<W: Write>(out: &mut W, costs: &[CostEstimate], params: &CurveParams) -> std::io::Result<()> {
    writeln!(
        out,
        "family,tokens,lower_units,upper_units,integral,abs_error,converged,cost,exact_cost"
    )?;

    let family = params.family().display_name();
    for c in costs {
        writeln!(
            out,
            "{},{},{:e},{:e},{:.17e},{:.6e},{},{:.17e},{:.17e}",
            family,
            c.tokens,
            c.lower,
            c.upper,
            c.integral,
            c.abs_error,
            c.converged,
            c.cost,
            c.exact_cost,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_rows() {
        let costs = vec![CostEstimate {
            tokens: 1_000_000.0,
            lower: 0.0,
            upper: 1e24,
            integral: 1.5e33,
            abs_error: 1.0e19,
            converged: true,
            cost: 0.0015,
            exact_cost: 0.0015,
        }];
        let params = CurveParams::Exponential { k: 1.0, a: 1.0 };

        let mut buf = Vec::new();
        write_costs(&mut buf, &costs, &params).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("family,tokens,"));
        assert!(lines[1].starts_with("exponential,1000000,0e0,1e24,"));
        assert!(lines[1].contains(",true,"));
    }
}

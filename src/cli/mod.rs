//! Command-line parsing for the bonding curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the solving/integration code.
//!
//! Curve options can also come from the environment (`BC_*`), which in turn may
//! be populated from a `.env` file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    COST_SCALE, CurveFamily, DEFAULT_RECIPROCAL_OFFSET, DEFAULT_SAMPLES, DEFAULT_Y0, DEFAULT_Y1,
    DOMAIN_MAX,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bc", version, about = "Bonding curve solver, cost integrator and plotter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve parameters, print costs for every bound, and plot (the full analysis).
    Run(RunArgs),
    /// Solve the boundary system and print every solution.
    Fit(CurveArgs),
    /// Print the cost of buying each token quantity from zero supply.
    Cost(CostArgs),
    /// Quote a buy, a sell, or the amount a budget buys at a given supply.
    Quote(QuoteArgs),
    /// Render an ASCII plot of the fitted curve or of a saved curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive chart window.
    ///
    /// This uses the same underlying pipeline as `bc run`, but renders the
    /// curve in a terminal UI using Ratatui; press `q` to close it.
    Tui(CurveArgs),
}

/// Curve definition shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Curve family to fit.
    #[arg(long, value_enum, env = "BC_FAMILY", default_value_t = CurveFamily::Quadratic)]
    pub family: CurveFamily,

    /// Supply (base units) of the lower boundary condition.
    #[arg(long, env = "BC_X0", default_value_t = 0.0)]
    pub x0: f64,

    /// Price at the lower boundary.
    #[arg(long, env = "BC_Y0", default_value_t = DEFAULT_Y0)]
    pub y0: f64,

    /// Supply (base units) of the upper boundary condition.
    #[arg(long, env = "BC_X1", default_value_t = DOMAIN_MAX)]
    pub x1: f64,

    /// Price at the upper boundary.
    #[arg(long, env = "BC_Y1", default_value_t = DEFAULT_Y1)]
    pub y1: f64,

    /// Offset `c` of the reciprocal family.
    #[arg(long, default_value_t = DEFAULT_RECIPROCAL_OFFSET)]
    pub offset: f64,

    /// Force a solution by index instead of the first valid one.
    #[arg(long)]
    pub root: Option<usize>,

    /// Divisor applied to raw integrals to get a cost.
    #[arg(long, default_value_t = COST_SCALE)]
    pub scale: f64,

    /// Number of evenly spaced plot samples.
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,

    /// Right edge of the plotted domain (base units).
    #[arg(long, default_value_t = DOMAIN_MAX)]
    pub domain_max: f64,

    /// Absolute quadrature tolerance.
    #[arg(long, default_value_t = 1.49e-8)]
    pub epsabs: f64,

    /// Relative quadrature tolerance.
    #[arg(long, default_value_t = 1.49e-8)]
    pub epsrel: f64,

    /// Maximum number of quadrature subintervals.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

/// Options for the full analysis run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Token quantities to price (whole tokens); repeat to override the defaults.
    #[arg(long = "bound", value_name = "TOKENS")]
    pub bounds: Vec<f64>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the cost table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (params + costs + sampled grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for the cost table.
#[derive(Debug, Parser, Clone)]
pub struct CostArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Token quantities to price (whole tokens); repeat to override the defaults.
    #[arg(long = "bound", value_name = "TOKENS")]
    pub bounds: Vec<f64>,

    /// Export the cost table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for trade quotes.
#[derive(Debug, Parser, Clone)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    #[command(subcommand)]
    pub kind: QuoteCommand,
}

#[derive(Debug, Subcommand, Clone)]
pub enum QuoteCommand {
    /// Cost of buying `--amount` tokens on top of `--supply`.
    Buy {
        #[arg(long, value_name = "TOKENS")]
        supply: f64,
        #[arg(long, value_name = "TOKENS")]
        amount: f64,
    },
    /// Proceeds of selling `--amount` tokens off `--supply`.
    Sell {
        #[arg(long, value_name = "TOKENS")]
        supply: f64,
        #[arg(long, value_name = "TOKENS")]
        amount: f64,
    },
    /// Number of tokens `--value` buys at `--supply`.
    Amount {
        #[arg(long, value_name = "TOKENS")]
        supply: f64,
        #[arg(long)]
        value: f64,
    },
}

/// Options for plotting.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Curve JSON file produced by `bc run --export-curve` (skips solving).
    #[arg(long = "curve", value_name = "JSON")]
    pub curve_file: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cost_with_repeated_bounds() {
        let cli = Cli::try_parse_from([
            "bc", "cost", "--family", "exponential", "--bound", "1000000", "--bound", "2e6",
        ])
        .unwrap();
        let Command::Cost(args) = cli.command else {
            panic!("expected cost subcommand");
        };
        assert_eq!(args.curve.family, CurveFamily::Exponential);
        assert_eq!(args.bounds, vec![1_000_000.0, 2_000_000.0]);
        assert_eq!(args.curve.y0, DEFAULT_Y0);
    }

    #[test]
    fn parses_quote_subcommand() {
        let cli = Cli::try_parse_from([
            "bc", "quote", "sell", "--supply", "100000000", "--amount", "5000000",
        ])
        .unwrap();
        let Command::Quote(args) = cli.command else {
            panic!("expected quote subcommand");
        };
        match args.kind {
            QuoteCommand::Sell { supply, amount } => {
                assert_eq!(supply, 100_000_000.0);
                assert_eq!(amount, 5_000_000.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn root_index_is_optional() {
        let cli = Cli::try_parse_from(["bc", "fit", "--root", "1"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit subcommand");
        };
        assert_eq!(args.root, Some(1));
    }
}

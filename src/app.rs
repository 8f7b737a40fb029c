//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - solves the curve parameters
//! - integrates cost bounds and quotes
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{CostArgs, Command, CurveArgs, PlotArgs, QuoteArgs, QuoteCommand, RunArgs};
use crate::domain::{CurveConfig, DEFAULT_COST_BOUNDS, RootSelection};
use crate::error::AppError;
use crate::math::QuadratureOptions;
use crate::report::QuoteKind;

pub mod pipeline;

/// Entry point for the `bc` binary.
pub fn run() -> Result<(), AppError> {
    // We want `bc` and `bc --family exponential` to behave like `bc tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Fit(args) => handle_fit(args),
        Command::Cost(args) => handle_cost(args),
        Command::Quote(args) => handle_quote(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(config_from_args(&args)),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.curve);
    if !args.bounds.is_empty() {
        config.bounds = args.bounds.clone();
    }
    config.plot = !args.no_plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.export_costs = args.export.clone();
    config.export_curve = args.export_curve.clone();

    let run = pipeline::run_pipeline(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.fit, &config));
    println!("{}", crate::report::format_cost_table(&run.costs));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.fit,
            config.domain_max,
            config.samples,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_costs {
        crate::io::export::write_costs_csv(path, &run.costs, &run.fit.params)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_fit(args: CurveArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    let fit = crate::fit::fit_and_select(&config)?;
    println!("{}", crate::report::format_fit_summary(&fit, &config));
    Ok(())
}

fn handle_cost(args: CostArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.curve);
    if !args.bounds.is_empty() {
        config.bounds = args.bounds.clone();
    }

    let fit = crate::fit::fit_and_select(&config)?;
    let costs = crate::pricing::cost_table(&fit.params, &config.bounds, config.scale, &config.quadrature)?;
    println!("{}", crate::report::format_cost_table(&costs));

    if let Some(path) = &args.export {
        crate::io::export::write_costs_csv(path, &costs, &fit.params)?;
    }
    Ok(())
}

fn handle_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.curve);
    let fit = crate::fit::fit_and_select(&config)?;
    let params = &fit.params;
    let opts = &config.quadrature;

    let (kind, quote) = match args.kind {
        QuoteCommand::Buy { supply, amount } => (
            QuoteKind::Buy,
            crate::pricing::buy_cost(params, supply, amount, config.scale, opts)?,
        ),
        QuoteCommand::Sell { supply, amount } => (
            QuoteKind::Sell,
            crate::pricing::sell_proceeds(params, supply, amount, config.scale, opts)?,
        ),
        QuoteCommand::Amount { supply, value } => (
            QuoteKind::Amount,
            crate::pricing::buy_amount_by_value(params, supply, value, config.domain_max, config.scale, opts)?,
        ),
    };

    print!("{}", crate::report::format_quote(kind, &quote));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let plot = match &args.curve_file {
        Some(path) => {
            let curve = crate::io::curve::read_curve_json(path)?;
            crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height)
        }
        None => {
            let config = config_from_args(&args.curve);
            let fit = crate::fit::fit_and_select(&config)?;
            crate::plot::render_ascii_plot(&fit, config.domain_max, config.samples, args.width, args.height)
        }
    };

    println!("{plot}");
    Ok(())
}

pub fn config_from_args(args: &CurveArgs) -> CurveConfig {
    CurveConfig {
        family: args.family,
        lower: crate::domain::BoundaryCondition::new(args.x0, args.y0),
        upper: crate::domain::BoundaryCondition::new(args.x1, args.y1),
        offset: args.offset,
        root: args.root.map_or(RootSelection::FirstValid, RootSelection::Index),
        scale: args.scale,
        samples: args.samples,
        domain_max: args.domain_max,
        bounds: DEFAULT_COST_BOUNDS.to_vec(),
        quadrature: QuadratureOptions {
            epsabs: args.epsabs,
            epsrel: args.epsrel,
            limit: args.limit,
        },
        ..CurveConfig::default()
    }
}

/// Rewrite argv so `bc` defaults to `bc tui`.
///
/// Rules:
/// - `bc`                      -> `bc tui`
/// - `bc --family exponential` -> `bc tui --family exponential`
/// - `bc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fit" | "cost" | "quote" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["bc"])), argv(&["bc", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["bc", "--family", "exponential"])),
            argv(&["bc", "tui", "--family", "exponential"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(argv(&["bc", "cost"])), argv(&["bc", "cost"]));
        assert_eq!(rewrite_args(argv(&["bc", "--help"])), argv(&["bc", "--help"]));
    }

    #[test]
    fn root_flag_maps_to_forced_index() {
        let cli = crate::cli::Cli::try_parse_from(["bc", "fit", "--root", "1"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit subcommand");
        };
        let config = config_from_args(&args);
        assert_eq!(config.root, RootSelection::Index(1));
        assert_eq!(config.bounds, DEFAULT_COST_BOUNDS.to_vec());
    }
}

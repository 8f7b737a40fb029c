//! Formatted terminal output: solved parameters, cost tables, and quotes.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{CostEstimate, CurveConfig, FitResult, Quote};
use crate::models::formula;
use crate::pricing::token_label;

/// Which side of a quote is being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Buy,
    Sell,
    Amount,
}

/// Format the solver output (boundaries, every candidate, chosen parameters).
pub fn format_fit_summary(fit: &FitResult, config: &CurveConfig) -> String {
    let mut out = String::new();

    out.push_str("=== bc - Bonding Curve Fit ===\n");
    out.push_str(&format!(
        "Family: {} ({})\n",
        fit.family.display_name(),
        fit.family.formula()
    ));
    out.push_str(&format!(
        "Boundaries: y({:e}) = {:e} | y({:e}) = {:e}\n",
        fit.lower.x, fit.lower.y, fit.upper.x, fit.upper.y
    ));
    out.push_str(&format!(
        "Domain: [0, {:e}] | scale: {:e}\n",
        config.domain_max, config.scale
    ));

    out.push_str("\nSolutions:\n");
    for (idx, c) in fit.candidates.iter().enumerate() {
        let chosen = if idx == fit.selected { "*" } else { " " };
        let status = match &c.rejection {
            None => "ok".to_string(),
            Some(reason) => format!("rejected: {reason}"),
        };
        out.push_str(&format!(
            "{chosen} [{idx}] {} ({status})\n",
            fmt_params(&c.params.named_values())
        ));
    }

    out.push_str("\nChosen curve:\n");
    out.push_str(&format!("- {}\n", formula(&fit.params)));
    out.push('\n');

    out
}

/// Format the cost table, one row per bound.
pub fn format_cost_table(costs: &[CostEstimate]) -> String {
    let mut out = String::new();

    out.push_str(
        format!(
            "{:>10} {:>22} {:>12} {:>22} {:>4}",
            "tokens", "cost", "rel_err", "closed_form", "ok"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<22} {:-<12} {:-<22} {:-<4}", "", "", "", "", "").trim_end());
    out.push('\n');

    for c in costs {
        let rel = if c.integral != 0.0 {
            c.abs_error / c.integral.abs()
        } else {
            0.0
        };
        out.push_str(
            format!(
                "{:>10} {:>22.15} {:>12.3e} {:>22.15} {:>4}",
                token_label(c.tokens),
                c.cost,
                rel,
                c.exact_cost,
                if c.converged { "yes" } else { "NO" }
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format a single quote.
pub fn format_quote(kind: QuoteKind, quote: &Quote) -> String {
    let supply = token_label(quote.supply_tokens);
    match kind {
        QuoteKind::Buy => format!(
            "Buying {} tokens at supply {supply} costs {:.15} (±{:.3e})\n",
            token_label(quote.amount_tokens),
            quote.value,
            quote.error
        ),
        QuoteKind::Sell => format!(
            "Selling {} tokens at supply {supply} returns {:.15} (±{:.3e})\n",
            token_label(quote.amount_tokens),
            quote.value,
            quote.error
        ),
        QuoteKind::Amount => format!(
            "A value of {} at supply {supply} buys {:.6} tokens (repriced gap {:.3e})\n",
            quote.value, quote.amount_tokens, quote.error
        ),
    }
}

fn fmt_params(values: &[(&str, f64)]) -> String {
    let parts: Vec<String> = values.iter().map(|(name, v)| format!("{name}={v:.15e}")).collect();
    parts.join(", ")
}

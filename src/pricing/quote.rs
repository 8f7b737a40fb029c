//! Buy/sell quotes against a fitted curve at an arbitrary supply.
//!
//! - buy: cost of issuing `amount` more tokens on top of `supply`
//! - sell: proceeds of burning `amount` tokens off `supply`
//! - amount-by-value: how many tokens a given budget buys at `supply`
//!
//! Supplies and amounts are in whole tokens; values are in the scaled cost unit.

use crate::domain::{CurveParams, Quote, TOKEN_UNIT};
use crate::error::AppError;
use crate::math::{QuadratureOptions, bisect};
use crate::models::exact_integral;
use crate::pricing::cost::integrate_cost;

/// Cost of buying `amount` tokens when `supply` tokens are already issued.
pub fn buy_cost(
    params: &CurveParams,
    supply: f64,
    amount: f64,
    scale: f64,
    opts: &QuadratureOptions,
) -> Result<Quote, AppError> {
    check_quantity("supply", supply)?;
    check_quantity("amount", amount)?;

    let lower = supply * TOKEN_UNIT;
    let upper = (supply + amount) * TOKEN_UNIT;
    let est = integrate_cost(params, lower, upper, scale, opts)?;

    Ok(Quote {
        supply_tokens: supply,
        amount_tokens: amount,
        value: est.cost,
        error: est.abs_error / scale,
    })
}

/// Proceeds of selling `amount` tokens back when `supply` tokens are issued.
pub fn sell_proceeds(
    params: &CurveParams,
    supply: f64,
    amount: f64,
    scale: f64,
    opts: &QuadratureOptions,
) -> Result<Quote, AppError> {
    check_quantity("supply", supply)?;
    check_quantity("amount", amount)?;
    if amount > supply {
        return Err(AppError::input(format!(
            "Cannot sell {amount} tokens from a supply of {supply}."
        )));
    }

    let lower = (supply - amount) * TOKEN_UNIT;
    let upper = supply * TOKEN_UNIT;
    let est = integrate_cost(params, lower, upper, scale, opts)?;

    Ok(Quote {
        supply_tokens: supply,
        amount_tokens: amount,
        value: est.cost,
        error: est.abs_error / scale,
    })
}

/// Number of tokens that `value` buys at `supply`, capped by the domain edge.
///
/// The cumulative cost is strictly increasing for valid curves, so the amount is
/// found by bisection on the closed-form integral and then re-priced with
/// quadrature; `error` is the gap between that re-priced cost and `value`.
pub fn buy_amount_by_value(
    params: &CurveParams,
    supply: f64,
    value: f64,
    domain_max: f64,
    scale: f64,
    opts: &QuadratureOptions,
) -> Result<Quote, AppError> {
    check_quantity("supply", supply)?;
    if !(value.is_finite() && value >= 0.0) {
        return Err(AppError::input(format!("Value must be non-negative (got {value}).")));
    }

    let start = supply * TOKEN_UNIT;
    let room = domain_max - start;
    if room <= 0.0 {
        return Err(AppError::input(format!(
            "Supply {supply} tokens is already at or beyond the curve limit."
        )));
    }

    let capacity = exact_integral(params, start, domain_max) / scale;
    if value > capacity {
        return Err(AppError::input(format!(
            "Value {value} exceeds the {capacity} needed to buy out the rest of the curve."
        )));
    }

    let target = |units: f64| exact_integral(params, start, start + units) / scale - value;
    let units = bisect(target, 0.0, room, room * 1e-15, 200)
        .ok_or_else(|| AppError::runtime("Failed to invert the cumulative cost curve."))?;

    let amount = units / TOKEN_UNIT;
    let repriced = integrate_cost(params, start, start + units, scale, opts)?;
    tracing::debug!(supply, value, amount, repriced = repriced.cost, "inverted buy cost");

    Ok(Quote {
        supply_tokens: supply,
        amount_tokens: amount,
        value,
        error: (repriced.cost - value).abs(),
    })
}

fn check_quantity(name: &str, v: f64) -> Result<(), AppError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(AppError::input(format!("{name} must be a non-negative token count (got {v}).")))
    }
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during solving and integration
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::QuadratureOptions;

/// Base units per whole token (18 decimals).
pub const TOKEN_UNIT: f64 = 1e18;

/// Divisor that turns a raw price integral into a cost in the quote currency.
///
/// Prices are quoted per base unit and the integral runs over base units, so
/// one factor of `TOKEN_UNIT` comes from each side.
pub const COST_SCALE: f64 = 1e36;

/// Right edge of the curve: 650M tokens in base units.
pub const DOMAIN_MAX: f64 = 6.5e26;

/// Price at zero supply.
pub const DEFAULT_Y0: f64 = 1_400_000_000.0;

/// Price once the full domain has been issued.
pub const DEFAULT_Y1: f64 = 20_000_000_000.0;

/// Number of evenly spaced samples used for plotting.
pub const DEFAULT_SAMPLES: usize = 500;

/// Offset `c` of the reciprocal family `y = a - b / (x + c)`.
pub const DEFAULT_RECIPROCAL_OFFSET: f64 = 2e26;

/// Token quantities (whole tokens) priced by default.
pub const DEFAULT_COST_BOUNDS: [f64; 8] = [
    1_000_000.0,
    2_000_000.0,
    5_000_000.0,
    10_000_000.0,
    20_000_000.0,
    100_000_000.0,
    200_000_000.0,
    650_000_000.0,
];

/// Parametric shape of the price curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CurveFamily {
    /// `y = (x + b)^2 / a`
    Quadratic,
    /// `y = k * e^(x / a)`
    Exponential,
    /// `y = a - b / (x + c)` with a fixed offset `c`.
    Reciprocal,
}

impl CurveFamily {
    pub const ALL: [CurveFamily; 3] = [
        CurveFamily::Quadratic,
        CurveFamily::Exponential,
        CurveFamily::Reciprocal,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            CurveFamily::Quadratic => "quadratic",
            CurveFamily::Exponential => "exponential",
            CurveFamily::Reciprocal => "reciprocal",
        }
    }

    /// Symbolic form of the family.
    pub fn formula(self) -> &'static str {
        match self {
            CurveFamily::Quadratic => "y = (x + b)^2 / a",
            CurveFamily::Exponential => "y = k * e^(x / a)",
            CurveFamily::Reciprocal => "y = a - b / (x + c)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            CurveFamily::Quadratic => CurveFamily::Exponential,
            CurveFamily::Exponential => CurveFamily::Reciprocal,
            CurveFamily::Reciprocal => CurveFamily::Quadratic,
        }
    }
}

/// A known `(x, y)` pair the fitted curve must pass through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    /// Cumulative supply in base units.
    pub x: f64,
    /// Unit price at that supply.
    pub y: f64,
}

impl BoundaryCondition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Solved curve parameters, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum CurveParams {
    Quadratic { a: f64, b: f64 },
    Exponential { k: f64, a: f64 },
    Reciprocal { a: f64, b: f64, c: f64 },
}

impl CurveParams {
    pub fn family(&self) -> CurveFamily {
        match self {
            CurveParams::Quadratic { .. } => CurveFamily::Quadratic,
            CurveParams::Exponential { .. } => CurveFamily::Exponential,
            CurveParams::Reciprocal { .. } => CurveFamily::Reciprocal,
        }
    }

    /// Named parameter values in display order.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        match *self {
            CurveParams::Quadratic { a, b } => vec![("a", a), ("b", b)],
            CurveParams::Exponential { k, a } => vec![("k", k), ("a", a)],
            CurveParams::Reciprocal { a, b, c } => vec![("a", a), ("b", b), ("c", c)],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.named_values().iter().all(|(_, v)| v.is_finite())
    }
}

/// One algebraic solution of the boundary system and whether it was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCandidate {
    pub params: CurveParams,
    /// Why the candidate failed the validity check, if it did.
    pub rejection: Option<String>,
}

impl RootCandidate {
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }
}

/// How to choose among multiple algebraic solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSelection {
    /// First candidate that passes the validity check.
    FirstValid,
    /// Fixed position in the candidate list, validity notwithstanding.
    Index(usize),
}

/// Output of the parameter solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub family: CurveFamily,
    pub lower: BoundaryCondition,
    pub upper: BoundaryCondition,
    pub candidates: Vec<RootCandidate>,
    /// Index into `candidates`.
    pub selected: usize,
    pub params: CurveParams,
}

/// Cost of buying the supply range `[lower, upper]` (base units).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Width of the range in whole tokens.
    pub tokens: f64,
    pub lower: f64,
    pub upper: f64,
    /// Raw quadrature value of the price integral.
    pub integral: f64,
    /// Quadrature absolute error estimate (raw units).
    pub abs_error: f64,
    pub converged: bool,
    /// `integral / scale`.
    pub cost: f64,
    /// Antiderivative-based cost for cross-checking.
    pub exact_cost: f64,
}

/// A buy/sell quote against the curve at a given supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub supply_tokens: f64,
    pub amount_tokens: f64,
    pub value: f64,
    /// Quadrature error estimate, scaled like `value`.
    pub error: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env` overrides).
#[derive(Debug, Clone)]
pub struct CurveConfig {
    pub family: CurveFamily,
    pub lower: BoundaryCondition,
    pub upper: BoundaryCondition,
    /// Offset `c` for the reciprocal family.
    pub offset: f64,
    pub root: RootSelection,

    pub scale: f64,
    pub samples: usize,
    pub domain_max: f64,
    /// Cost bounds in whole tokens.
    pub bounds: Vec<f64>,
    pub quadrature: QuadratureOptions,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_costs: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            family: CurveFamily::Quadratic,
            lower: BoundaryCondition::new(0.0, DEFAULT_Y0),
            upper: BoundaryCondition::new(DOMAIN_MAX, DEFAULT_Y1),
            offset: DEFAULT_RECIPROCAL_OFFSET,
            root: RootSelection::FirstValid,
            scale: COST_SCALE,
            samples: DEFAULT_SAMPLES,
            domain_max: DOMAIN_MAX,
            bounds: DEFAULT_COST_BOUNDS.to_vec(),
            quadrature: QuadratureOptions::default(),
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_costs: None,
            export_curve: None,
        }
    }
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub lower: BoundaryCondition,
    pub upper: BoundaryCondition,
    pub params: CurveParams,
    pub scale: f64,
    pub costs: Vec<CostEstimate>,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

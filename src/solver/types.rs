//! Solver type definitions

use rug::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step budgets, caps and tolerances for one solve
///
/// Digit counts are upper bounds: every tolerance is additionally capped by
/// what the working precision can resolve (see [`crate::solver::depth`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Forward iterations tried before falling back to Newton (default: 2000)
    pub direct_iteration_limit: usize,

    /// Successive-iterate agreement for direct iteration (default: 20)
    pub direct_convergence_digits: u32,

    /// |u| above this aborts direct iteration (default: 1e12)
    pub divergence_threshold: f64,

    /// Newton steps on z - b^z (default: 100)
    pub newton_step_limit: usize,

    /// Lower bound on Koenigs depth K (default: 8)
    pub min_depth: usize,

    /// Hard cap on Koenigs depth K (default: 2000)
    pub max_depth: usize,

    /// Newton steps when inverting the Koenigs map (default: 80)
    pub inversion_step_limit: usize,

    /// Residual digits required by the inversion (default: 40)
    pub inversion_tolerance_digits: u32,

    /// |b - 1| below 10^-digits means constant base (default: 30)
    pub unit_base_digits: u32,

    /// Distance to the nearest integer accepted as an integer height (default: 30)
    pub integer_height_digits: u32,

    /// |λ| below 10^-digits is degenerate (default: 30)
    pub multiplier_floor_digits: u32,

    /// Digits held back from the working precision for rounding noise (default: 8)
    pub guard_digits: u32,

    /// Largest height the integer tower will iterate (default: 1_000_000)
    pub max_tower_height: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            direct_iteration_limit: 2000,
            direct_convergence_digits: 20,
            divergence_threshold: 1e12,
            newton_step_limit: 100,
            min_depth: 8,
            max_depth: 2000,
            inversion_step_limit: 80,
            inversion_tolerance_digits: 40,
            unit_base_digits: 30,
            integer_height_digits: 30,
            multiplier_floor_digits: 30,
            guard_digits: 8,
            max_tower_height: 1_000_000,
        }
    }
}

impl SolverConfig {
    /// Check budgets and caps; returns a description of the first problem
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.direct_iteration_limit == 0 {
            return Err("direct_iteration_limit must be greater than 0".to_string());
        }
        if self.newton_step_limit == 0 {
            return Err("newton_step_limit must be greater than 0".to_string());
        }
        if self.inversion_step_limit == 0 {
            return Err("inversion_step_limit must be greater than 0".to_string());
        }
        if self.min_depth == 0 {
            return Err("min_depth must be greater than 0".to_string());
        }
        if self.min_depth > self.max_depth {
            return Err(format!(
                "min_depth ({}) must not exceed max_depth ({})",
                self.min_depth, self.max_depth
            ));
        }
        if !(self.divergence_threshold > 1.0) {
            return Err("divergence_threshold must be greater than 1".to_string());
        }
        Ok(())
    }
}

/// Outcome of a bounded iterative loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Convergence {
    /// Tolerance met after `steps` steps
    Converged { steps: usize },
    /// Budget spent (or iterate left the finite range) after `steps` steps
    Exhausted { steps: usize },
}

impl Convergence {
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    pub fn steps(&self) -> usize {
        match self {
            Convergence::Converged { steps } | Convergence::Exhausted { steps } => *steps,
        }
    }
}

/// How the fixed point was located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedPointStrategy {
    /// Forward iteration converged; Newton only polished the result
    DirectIteration,
    /// Forward iteration failed; Newton from z = 1 found the point
    Newton,
}

/// Attracting fixed point z* = b^z* with multiplier λ = ln(b)·z*
#[derive(Debug, Clone)]
pub struct FixedPoint {
    pub z_star: Complex,
    pub lambda: Complex,
    pub strategy: FixedPointStrategy,
    /// Newton stage outcome
    pub convergence: Convergence,
}

/// Method that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Schroeder,
    IntegerTower,
    ConstantBase,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Schroeder => "Schröder (Koenigs) fractional iteration",
            Method::IntegerTower => "integer tower fallback",
            Method::ConstantBase => "constant base=1",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the linearization path did on the way to its result
#[derive(Debug, Clone)]
pub struct SchroederDiagnostics {
    pub fixed_point: FixedPoint,
    /// Koenigs depth K
    pub depth: usize,
    /// Newton inversion outcome
    pub inversion: Convergence,
    /// |φ_K(w) - y| at the returned iterate
    pub residual: f64,
}

/// T_b(h) together with how it was obtained
#[derive(Debug, Clone)]
pub struct Tetration {
    pub value: Complex,
    pub method: Method,
    pub precision: u32,
    pub diagnostics: Option<SchroederDiagnostics>,
}

impl Tetration {
    /// False only when the Newton inversion spent its budget
    pub fn is_converged(&self) -> bool {
        self.diagnostics
            .as_ref()
            .map_or(true, |d| d.inversion.is_converged())
    }
}

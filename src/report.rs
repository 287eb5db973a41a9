//! Result reports for the command line
//!
//! Each report is plain data (serializable for `--json`) with a colored
//! text rendering.

use crate::numeric::{self, complex_fixed, complex_scientific, imag_fixed, real_fixed};
use crate::solver::{Convergence, FixedPointStrategy, Tetration};
use crate::sweep::SweepEntry;
use colored::Colorize;
use rug::Complex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How complex values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum NumberFormat {
    /// d.ddde±XX per component
    #[default]
    #[serde(rename = "sci")]
    #[value(name = "sci")]
    Scientific,
    /// Fixed number of fractional digits
    #[serde(rename = "fixed")]
    #[value(name = "fixed")]
    Fixed,
}

impl NumberFormat {
    pub fn render(&self, z: &Complex, digits: usize) -> String {
        match self {
            NumberFormat::Scientific => complex_scientific(z, digits),
            NumberFormat::Fixed => complex_fixed(z, digits),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumberFormat::Scientific => "scientific",
            NumberFormat::Fixed => "fixed",
        }
    }
}

/// Linearization details carried into a report
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub fixed_point: String,
    pub multiplier_abs: f64,
    pub fixed_point_strategy: FixedPointStrategy,
    pub depth: usize,
    pub inversion: Convergence,
    pub residual: f64,
}

/// One solve, rendered
#[derive(Debug, Clone, Serialize)]
pub struct TetrationReport {
    pub method: String,
    pub base: String,
    pub height: String,
    pub precision: u32,
    pub digits: usize,
    pub result: String,
    pub re: String,
    pub im: String,
    /// b^T(h), which should equal T(h+1)
    pub sanity: String,
    pub converged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsReport>,
}

impl TetrationReport {
    pub fn new(
        tetration: &Tetration,
        base: &Complex,
        height: &Complex,
        digits: usize,
        format: NumberFormat,
    ) -> Self {
        let bits = tetration.precision;
        let sanity = numeric::pow(base, &tetration.value, bits);
        let diagnostics = tetration.diagnostics.as_ref().map(|d| DiagnosticsReport {
            fixed_point: complex_scientific(&d.fixed_point.z_star, digits.min(20)),
            multiplier_abs: numeric::magnitude(&d.fixed_point.lambda),
            fixed_point_strategy: d.fixed_point.strategy,
            depth: d.depth,
            inversion: d.inversion,
            residual: d.residual,
        });

        Self {
            method: tetration.method.to_string(),
            base: complex_scientific(base, digits),
            height: complex_scientific(height, digits),
            precision: bits,
            digits,
            result: format.render(&tetration.value, digits),
            re: real_fixed(&tetration.value, 0),
            im: imag_fixed(&tetration.value, 0),
            sanity: complex_scientific(&sanity, digits),
            converged: tetration.is_converged(),
            diagnostics,
        }
    }

    /// Text form; `detailed` adds the linearization diagnostics line
    pub fn render_text(&self, detailed: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", "method:".bold(), self.method.cyan());
        let _ = writeln!(out, "T_b(h) with b={}, h={}", self.base, self.height);
        let _ = writeln!(
            out,
            "precision={} bits, printing ~{} significant digits",
            self.precision, self.digits
        );
        let _ = writeln!(out, "{} {}", "result:".bold(), self.result);
        let _ = writeln!(out, "Re: {}", self.re);
        let _ = writeln!(out, "Im: {}", self.im);
        let _ = writeln!(out, "b^(T(h)) (sanity): {}", self.sanity);
        if let Some(d) = self.diagnostics.as_ref().filter(|_| detailed) {
            let _ = writeln!(
                out,
                "{}",
                format!(
                    "fixed point {} (|λ| = {:.6}, {:?}), depth {}, inversion {} after {} steps, residual {:.3e}",
                    d.fixed_point,
                    d.multiplier_abs,
                    d.fixed_point_strategy,
                    d.depth,
                    if d.inversion.is_converged() { "converged" } else { "exhausted" },
                    d.inversion.steps(),
                    d.residual
                )
                .dimmed()
            );
        }
        if !self.converged {
            let _ = writeln!(
                out,
                "{}",
                "warning: Koenigs inversion did not converge; result is the last iterate".yellow()
            );
        }
        out
    }
}

/// z^n, rendered
#[derive(Debug, Clone, Serialize)]
pub struct PowerReport {
    pub z: String,
    pub n: String,
    pub precision: u32,
    pub digits: usize,
    pub format: NumberFormat,
    pub result: String,
    pub re: String,
    pub im: String,
}

impl PowerReport {
    pub fn new(z: &Complex, n: &Complex, bits: u32, digits: usize, format: NumberFormat) -> Self {
        let value = numeric::pow(z, n, bits);
        Self {
            z: complex_scientific(z, digits),
            n: complex_scientific(n, digits),
            precision: bits,
            digits,
            format,
            result: format.render(&value, digits),
            re: real_fixed(&value, digits),
            im: imag_fixed(&value, digits),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "z = {}", self.z);
        let _ = writeln!(out, "n = {}", self.n);
        let _ = writeln!(
            out,
            "precision = {} bits, print digits ≈ {}",
            self.precision, self.digits
        );
        let _ = writeln!(
            out,
            "{} {}",
            format!("z^n ({}, {} digits):", self.format.label(), self.digits).bold(),
            self.result
        );
        let _ = writeln!(out, "Re(z^n): {}", self.re);
        let _ = writeln!(out, "Im(z^n): {}", self.im);
        out
    }
}

/// One row per height; failures are shown in place
pub fn render_sweep_table(entries: &[SweepEntry], digits: usize, format: NumberFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24}  {:<8}  {}", "height".bold(), "method".bold(), "T_b(h)".bold());
    for entry in entries {
        let height = complex_scientific(&entry.height, 6);
        match &entry.outcome {
            Ok(t) => {
                let tag = match t.method {
                    crate::solver::Method::Schroeder => "koenigs",
                    crate::solver::Method::IntegerTower => "tower",
                    crate::solver::Method::ConstantBase => "constant",
                };
                let value = format.render(&t.value, digits);
                let value = if t.is_converged() {
                    value.normal()
                } else {
                    value.yellow()
                };
                let _ = writeln!(out, "{:<24}  {:<8}  {}", height, tag, value);
            }
            Err(e) => {
                let _ = writeln!(out, "{:<24}  {:<8}  {}", height, "error", e.to_string().red());
            }
        }
    }
    out
}

/// Sweep rows for `--json`
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub height: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn sweep_rows(entries: &[SweepEntry], digits: usize, format: NumberFormat) -> Vec<SweepRow> {
    entries
        .iter()
        .map(|entry| {
            let height = complex_scientific(&entry.height, digits);
            match &entry.outcome {
                Ok(t) => SweepRow {
                    height,
                    method: Some(t.method.to_string()),
                    value: Some(format.render(&t.value, digits)),
                    error: None,
                },
                Err(e) => SweepRow {
                    height,
                    method: None,
                    value: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

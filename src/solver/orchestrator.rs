//! Solve orchestration
//!
//! Constant base → fixed point → Koenigs linearization and inversion, with
//! the integer power tower as the fallback whenever linearization is not
//! available.

use crate::errors::{Result, TetrationError};
use crate::numeric::{self, complex_fixed, complex_scientific};
use crate::solver::depth::{select_depth, Tolerances};
use crate::solver::fixed_point::locate;
use crate::solver::inverse::invert;
use crate::solver::koenigs::{multiplier_power, KoenigsMap};
use crate::solver::map::ExpMap;
use crate::solver::tower::{integer_height, power_tower};
use crate::solver::types::{Method, SchroederDiagnostics, SolverConfig, Tetration};
use rug::Complex;
use tracing::{debug, info, warn};

/// Fractional tetration solver
///
/// Holds only configuration; every call to [`Tetrator::solve`] owns its
/// values, so one instance can serve concurrent solves.
#[derive(Debug, Clone, Default)]
pub struct Tetrator {
    config: SolverConfig,
}

impl Tetrator {
    /// Solver for `config`; rejected configurations never reach a solve
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate().map_err(TetrationError::ConfigError)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// T_b(h) at `bits` of precision
    ///
    /// Inputs are re-rounded to `bits`. An inversion that exhausts its step
    /// budget still yields a value; check [`Tetration::is_converged`].
    pub fn solve(&self, base: &Complex, height: &Complex, bits: u32) -> Result<Tetration> {
        let bits = numeric::check_precision(bits)?;
        let tolerances = Tolerances::for_precision(&self.config, bits);
        let base = numeric::at_precision(base, bits);
        let height = numeric::at_precision(height, bits);

        for (what, z) in [("base", &base), ("height", &height)] {
            if !numeric::is_finite(z) {
                return Err(TetrationError::parse(
                    &complex_scientific(z, 6),
                    format!("{} must be finite", what),
                ));
            }
        }

        let one = numeric::one(bits);
        if numeric::is_close(&base, &one, tolerances.unit_base_digits) {
            debug!("base is 1 within tolerance; tower is constant");
            return Ok(Tetration {
                value: one,
                method: Method::ConstantBase,
                precision: bits,
                diagnostics: None,
            });
        }
        if base.eq0() {
            return Err(TetrationError::degenerate("base is zero"));
        }

        let map = ExpMap::new(&base, bits);
        match self.linearize(&map, &height, &tolerances) {
            Ok(result) => Ok(result),
            Err(err) => {
                debug!(error = %err, "linearization unavailable; trying integer tower");
                self.integer_fallback(&map, &height, &tolerances, err)
            }
        }
    }

    /// Parse both literals at `bits` and solve
    pub fn solve_literals(&self, base: &str, height: &str, bits: u32) -> Result<Tetration> {
        let bits = numeric::check_precision(bits)?;
        let base = numeric::parse_complex(base, bits)?;
        let height = numeric::parse_complex(height, bits)?;
        self.solve(&base, &height, bits)
    }

    fn linearize(
        &self,
        map: &ExpMap,
        height: &Complex,
        tolerances: &Tolerances,
    ) -> Result<Tetration> {
        let bits = map.bits();
        let fixed_point =
            locate(map, &self.config, tolerances).ok_or(TetrationError::NonAttractingRegime)?;

        let lambda_abs = numeric::magnitude(&fixed_point.lambda);
        let depth = select_depth(lambda_abs, bits, &self.config)?;
        debug!(
            z_star = %complex_fixed(&fixed_point.z_star, 12),
            lambda_abs,
            depth,
            "Koenigs depth selected"
        );

        let koenigs = KoenigsMap::new(map, &fixed_point, depth);
        let phi_one = koenigs.eval(&numeric::one(bits));
        let target = Complex::with_val(
            bits,
            multiplier_power(&fixed_point.lambda, height, bits) * &phi_one,
        );

        let inversion = invert(
            &koenigs,
            &target,
            &self.config,
            tolerances.inversion_digits,
            bits,
        );
        if !inversion.convergence.is_converged() {
            warn!(
                residual = inversion.residual,
                "returning unconverged Schröder result"
            );
        }

        let diagnostics = SchroederDiagnostics {
            fixed_point,
            depth,
            inversion: inversion.convergence,
            residual: inversion.residual,
        };
        Ok(Tetration {
            value: inversion.value,
            method: Method::Schroeder,
            precision: bits,
            diagnostics: Some(diagnostics),
        })
    }

    fn integer_fallback(
        &self,
        map: &ExpMap,
        height: &Complex,
        tolerances: &Tolerances,
        cause: TetrationError,
    ) -> Result<Tetration> {
        let Some(n) = integer_height(height, tolerances.integer_digits) else {
            return Err(match cause {
                TetrationError::DegenerateDerivative { .. } => cause,
                _ => TetrationError::NonAttractingRegime,
            });
        };

        info!(height = n, "evaluating integer power tower");
        let value = power_tower(map, n, self.config.max_tower_height)?;
        Ok(Tetration {
            value,
            method: Method::IntegerTower,
            precision: map.bits(),
            diagnostics: None,
        })
    }
}

/// One-shot solve with the default configuration
pub fn tetrate(base: &Complex, height: &Complex, bits: u32) -> Result<Tetration> {
    Tetrator::default().solve(base, height, bits)
}

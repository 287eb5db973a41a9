//! Precision-adaptive depth and tolerance selection
//!
//! K = ceil((D/2) / -log10|λ|), D = bits·log10(2), so that |λ|^K is about
//! 10^(-D/2). Bounded: min_depth <= K <= max_depth, monotone in |λ|.

use crate::errors::{Result, TetrationError};
use crate::numeric::{decimal_digits, tolerance};
use crate::solver::types::SolverConfig;

/// Tolerances for one solve, derived from the configuration and precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerances {
    /// Direct iteration: successive iterates agree to this many digits
    pub direct_digits: u32,
    /// Fixed-point Newton: |z - b^z| below 10^-digits
    pub fixed_point_digits: u32,
    /// Koenigs inversion: residual below 10^-digits
    pub inversion_digits: u32,
    /// Constant-base shortcut
    pub unit_base_digits: u32,
    /// Integer-height detection
    pub integer_digits: u32,
}

fn resolvable(available: f64, guard: u32) -> u32 {
    let digits = available.floor() - f64::from(guard);
    if digits < 1.0 {
        1
    } else {
        digits as u32
    }
}

impl Tolerances {
    /// Cap every configured digit count by what `bits` can resolve
    ///
    /// The fixed point is solved to full working precision: the Koenigs map
    /// multiplies its error by |λ|^-K ≈ 10^(D/2). The inversion residual can
    /// only be resolved to about D/2 digits for the same reason.
    pub fn for_precision(config: &SolverConfig, bits: u32) -> Self {
        let digits = decimal_digits(bits);
        let full = resolvable(digits, config.guard_digits);
        let half = resolvable(digits / 2.0, config.guard_digits / 2);
        Self {
            direct_digits: config.direct_convergence_digits.min(full).max(1),
            fixed_point_digits: full,
            inversion_digits: config.inversion_tolerance_digits.min(half).max(1),
            unit_base_digits: config.unit_base_digits.min(full).max(1),
            integer_digits: config.integer_height_digits.min(full).max(1),
        }
    }
}

/// Koenigs depth for a multiplier of magnitude `lambda_abs`
pub fn select_depth(lambda_abs: f64, bits: u32, config: &SolverConfig) -> Result<usize> {
    if !lambda_abs.is_finite() || lambda_abs < tolerance(config.multiplier_floor_digits) {
        return Err(TetrationError::degenerate(format!(
            "invalid derivative magnitude |λ| = {:e}",
            lambda_abs
        )));
    }
    if lambda_abs >= 1.0 {
        return Err(TetrationError::NonAttractingRegime);
    }

    let target = decimal_digits(bits) / 2.0;
    let raw = (target / -lambda_abs.log10()).ceil();
    let depth = if raw.is_finite() && raw < config.max_depth as f64 {
        raw as usize
    } else {
        config.max_depth
    };
    Ok(depth.max(config.min_depth).min(config.max_depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_depth_for_half_base() {
        // b = 0.5: |λ| ≈ 0.4444; 2048 bits → ceil(308.25 / 0.3522) = 876
        let config = SolverConfig::default();
        let depth = select_depth(0.4444, 2048, &config).unwrap();
        assert!((870..=880).contains(&depth), "depth {}", depth);
    }

    #[test]
    fn test_depth_minimum() {
        let config = SolverConfig::default();
        assert_eq!(select_depth(1e-10, 64, &config).unwrap(), 8);
    }

    #[test]
    fn test_depth_hard_cap() {
        let config = SolverConfig::default();
        assert_eq!(select_depth(0.999999, 4096, &config).unwrap(), 2000);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let config = SolverConfig {
            min_depth: 50,
            max_depth: 10,
            ..SolverConfig::default()
        };
        assert_eq!(select_depth(0.444, 2048, &config).unwrap(), 10);
    }

    #[test]
    fn test_non_attracting_rejected() {
        let config = SolverConfig::default();
        assert!(matches!(
            select_depth(1.0, 256, &config),
            Err(TetrationError::NonAttractingRegime)
        ));
        assert!(matches!(
            select_depth(1.7, 256, &config),
            Err(TetrationError::NonAttractingRegime)
        ));
    }

    #[test]
    fn test_degenerate_multiplier() {
        let config = SolverConfig::default();
        for bad in [0.0, 1e-40, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                select_depth(bad, 256, &config),
                Err(TetrationError::DegenerateDerivative { .. })
            ));
        }
    }

    #[test]
    fn test_tolerances_follow_precision() {
        let config = SolverConfig::default();

        let high = Tolerances::for_precision(&config, 2048);
        assert_eq!(high.direct_digits, 20);
        assert_eq!(high.inversion_digits, 40);
        assert_eq!(high.fixed_point_digits, 608);

        let low = Tolerances::for_precision(&config, 64);
        assert_eq!(low.fixed_point_digits, 11);
        assert_eq!(low.direct_digits, 11);
        assert_eq!(low.inversion_digits, 5);
        assert_eq!(low.unit_base_digits, 11);
    }

    #[quickcheck]
    fn depth_is_monotone_and_bounded(a: f64, b: f64, bits: u16) -> TestResult {
        let (lo, hi) = (a.abs().fract(), b.abs().fract());
        if !(lo > 1e-20 && hi > 1e-20 && lo < hi) || bits == 0 {
            return TestResult::discard();
        }
        let config = SolverConfig::default();
        let k_lo = select_depth(lo, u32::from(bits), &config).unwrap();
        let k_hi = select_depth(hi, u32::from(bits), &config).unwrap();
        TestResult::from_bool(
            k_lo <= k_hi && k_lo >= config.min_depth && k_hi <= config.max_depth,
        )
    }
}

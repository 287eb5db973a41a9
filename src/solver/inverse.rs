//! Newton inversion of the Koenigs map
//!
//! φ has no closed-form inverse, so w with φ_K(w) = y is found by Newton
//! from w₀ = z* + y (φ is close to w - z* near the fixed point).

use crate::numeric;
use crate::solver::koenigs::KoenigsMap;
use crate::solver::types::{Convergence, SolverConfig};
use rug::Complex;
use tracing::{debug, warn};

/// Result of inverting φ_K at one target value
#[derive(Debug, Clone)]
pub struct Inversion {
    pub value: Complex,
    pub convergence: Convergence,
    /// |φ_K(w) - y| at the last residual check
    pub residual: f64,
}

/// First-order inverse of φ near the fixed point
pub fn initial_guess(koenigs: &KoenigsMap<'_>, target: &Complex, bits: u32) -> Complex {
    Complex::with_val(bits, &koenigs.fixed_point().z_star + target)
}

/// Solve φ_K(w) = `target`
///
/// Exhausting the step budget is not an error: the last iterate is
/// returned tagged [`Convergence::Exhausted`].
pub fn invert(
    koenigs: &KoenigsMap<'_>,
    target: &Complex,
    config: &SolverConfig,
    tolerance_digits: u32,
    bits: u32,
) -> Inversion {
    let mut w = initial_guess(koenigs, target, bits);
    let mut residual_abs = f64::INFINITY;

    for step in 1..=config.inversion_step_limit {
        let (phi, phi_prime) = koenigs.eval_with_derivative(&w);
        let residual = Complex::with_val(bits, &phi - target);
        residual_abs = numeric::magnitude(&residual);

        let delta = Complex::with_val(bits, &residual / &phi_prime);
        let next = Complex::with_val(bits, &w - &delta);
        if !numeric::is_finite(&next) {
            warn!(step, "Koenigs inversion left the finite range");
            return Inversion {
                value: w,
                convergence: Convergence::Exhausted { steps: step },
                residual: residual_abs,
            };
        }
        w = next;

        if numeric::is_below(&residual, tolerance_digits) {
            debug!(step, residual = residual_abs, "Koenigs inversion converged");
            return Inversion {
                value: w,
                convergence: Convergence::Converged { steps: step },
                residual: residual_abs,
            };
        }
    }

    warn!(
        steps = config.inversion_step_limit,
        residual = residual_abs,
        "Koenigs inversion exhausted its step budget; returning last iterate"
    );
    Inversion {
        value: w,
        convergence: Convergence::Exhausted {
            steps: config.inversion_step_limit,
        },
        residual: residual_abs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{is_close, parse_complex};
    use crate::solver::depth::{select_depth, Tolerances};
    use crate::solver::fixed_point::locate;
    use crate::solver::map::ExpMap;

    #[test]
    fn test_inverts_phi_at_known_point() {
        let bits = 256;
        let config = SolverConfig::default();
        let tolerances = Tolerances::for_precision(&config, bits);
        let map = ExpMap::new(&parse_complex("0.5", bits).unwrap(), bits);
        let fp = locate(&map, &config, &tolerances).unwrap();
        let depth = select_depth(numeric::magnitude(&fp.lambda), bits, &config).unwrap();
        let koenigs = KoenigsMap::new(&map, &fp, depth);

        let point = parse_complex("0.9+0.05i", bits).unwrap();
        let target = koenigs.eval(&point);
        let inversion = invert(&koenigs, &target, &config, tolerances.inversion_digits, bits);

        assert!(inversion.convergence.is_converged());
        assert!(is_close(&inversion.value, &point, 25));
    }

    #[test]
    fn test_budget_exhaustion_returns_last_iterate() {
        let bits = 256;
        let config = SolverConfig {
            inversion_step_limit: 1,
            ..SolverConfig::default()
        };
        let tolerances = Tolerances::for_precision(&config, bits);
        let map = ExpMap::new(&parse_complex("0.5", bits).unwrap(), bits);
        let fp = locate(&map, &config, &tolerances).unwrap();
        let depth = select_depth(numeric::magnitude(&fp.lambda), bits, &config).unwrap();
        let koenigs = KoenigsMap::new(&map, &fp, depth);

        let target = koenigs.eval(&parse_complex("1", bits).unwrap());
        let inversion = invert(&koenigs, &target, &config, tolerances.inversion_digits, bits);

        assert_eq!(inversion.convergence, Convergence::Exhausted { steps: 1 });
        assert!(numeric::is_finite(&inversion.value));
        assert!(inversion.residual > 0.0);
    }
}

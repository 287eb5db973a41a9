//! Attracting fixed point location for f(z) = b^z
//!
//! Forward iteration from z = 1 finds the attracting point whenever 1 lies
//! in its basin; the result only seeds Newton, which then solves
//! z - b^z = 0 to full working precision. When forward iteration fails,
//! Newton starts from z = 1 instead. A candidate is accepted only if Newton
//! converged and |λ| < 1.

use crate::numeric::{self, magnitude};
use crate::solver::depth::Tolerances;
use crate::solver::map::ExpMap;
use crate::solver::types::{Convergence, FixedPoint, FixedPointStrategy, SolverConfig};
use rug::Complex;
use tracing::debug;

/// Forward iteration u <- f(u) from 1 until successive iterates agree
pub fn iterate_to_fixed_point(
    map: &ExpMap,
    config: &SolverConfig,
    tolerances: &Tolerances,
) -> Option<(Complex, Convergence)> {
    let mut u = numeric::one(map.bits());
    for step in 1..=config.direct_iteration_limit {
        let next = map.apply(&u);
        if numeric::is_close(&next, &u, tolerances.direct_digits) {
            return Some((next, Convergence::Converged { steps: step }));
        }
        let size = magnitude(&next);
        if !size.is_finite() || size > config.divergence_threshold {
            debug!(step, "forward iteration diverged");
            return None;
        }
        u = next;
    }
    debug!(
        steps = config.direct_iteration_limit,
        "forward iteration did not settle"
    );
    None
}

/// Newton on g(z) = z - f(z), g'(z) = 1 - ln(b)·f(z)
///
/// Returns the last iterate; the step that met the tolerance is still
/// applied, so a converged result is accurate well past the threshold.
pub fn newton_fixed_point(
    map: &ExpMap,
    start: &Complex,
    config: &SolverConfig,
    tolerances: &Tolerances,
) -> (Complex, Convergence) {
    let bits = map.bits();
    let one = numeric::one(bits);
    let mut z = numeric::at_precision(start, bits);

    for step in 1..=config.newton_step_limit {
        let fz = map.apply(&z);
        let g = Complex::with_val(bits, &z - &fz);
        let g_prime = Complex::with_val(bits, &one - map.derivative_from_value(&fz));
        let delta = Complex::with_val(bits, &g / &g_prime);
        let next = Complex::with_val(bits, &z - &delta);

        if !numeric::is_finite(&next) {
            return (z, Convergence::Exhausted { steps: step });
        }
        z = next;
        if numeric::is_below(&g, tolerances.fixed_point_digits) {
            return (z, Convergence::Converged { steps: step });
        }
    }
    (
        z,
        Convergence::Exhausted {
            steps: config.newton_step_limit,
        },
    )
}

/// Locate an attracting fixed point, or `None` if no candidate qualifies
pub fn locate(map: &ExpMap, config: &SolverConfig, tolerances: &Tolerances) -> Option<FixedPoint> {
    let mut attempts = Vec::with_capacity(2);

    if let Some((seed, _)) = iterate_to_fixed_point(map, config, tolerances) {
        if magnitude(&map.multiplier(&seed)) < 1.0 {
            attempts.push((seed, FixedPointStrategy::DirectIteration));
        } else {
            debug!("forward iteration settled on a non-attracting point");
        }
    }
    attempts.push((numeric::one(map.bits()), FixedPointStrategy::Newton));

    for (start, strategy) in attempts {
        let (z_star, convergence) = newton_fixed_point(map, &start, config, tolerances);
        if !convergence.is_converged() {
            debug!(?strategy, ?convergence, "fixed-point Newton did not converge");
            continue;
        }
        let lambda = map.multiplier(&z_star);
        let lambda_abs = magnitude(&lambda);
        if lambda_abs < 1.0 {
            debug!(?strategy, lambda_abs, "attracting fixed point located");
            return Some(FixedPoint {
                z_star,
                lambda,
                strategy,
                convergence,
            });
        }
        debug!(?strategy, lambda_abs, "fixed point is not attracting");
    }
    None
}

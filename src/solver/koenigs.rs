//! Koenigs linearizing map
//!
//! φ(z) = lim λ^(-n)·(f^∘n(z) - z*). The truncation
//! φ_K(z) = λ^(-K)·(f^∘K(z) - z*) satisfies φ_K(f(z)) = λ·φ_(K+1)(z), so it
//! conjugates f to multiplication by λ up to an error of order |λ|^K.

use crate::numeric;
use crate::solver::map::ExpMap;
use crate::solver::types::FixedPoint;
use rug::Complex;

/// λ^(-K), computed as 1 / exp(K·log λ)
pub fn inverse_multiplier_power(lambda: &Complex, depth: usize, bits: u32) -> Complex {
    let k = Complex::with_val(bits, depth as f64);
    let exponent = Complex::with_val(bits, numeric::ln(lambda, bits) * &k);
    numeric::recip(&numeric::exp(&exponent, bits), bits)
}

/// λ^h = exp(h·log λ) on the principal branch
pub fn multiplier_power(lambda: &Complex, height: &Complex, bits: u32) -> Complex {
    let exponent = Complex::with_val(bits, numeric::ln(lambda, bits) * height);
    numeric::exp(&exponent, bits)
}

/// φ_K for one base, fixed point and depth
#[derive(Debug, Clone)]
pub struct KoenigsMap<'a> {
    map: &'a ExpMap,
    fixed_point: &'a FixedPoint,
    depth: usize,
    scale: Complex,
}

impl<'a> KoenigsMap<'a> {
    pub fn new(map: &'a ExpMap, fixed_point: &'a FixedPoint, depth: usize) -> Self {
        let scale = inverse_multiplier_power(&fixed_point.lambda, depth, map.bits());
        Self {
            map,
            fixed_point,
            depth,
            scale,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn fixed_point(&self) -> &FixedPoint {
        self.fixed_point
    }

    /// λ^(-K)
    pub fn scale(&self) -> &Complex {
        &self.scale
    }

    fn linearize(&self, u_k: &Complex) -> Complex {
        let bits = self.map.bits();
        let offset = Complex::with_val(bits, u_k - &self.fixed_point.z_star);
        Complex::with_val(bits, &self.scale * &offset)
    }

    /// φ_K(z)
    pub fn eval(&self, z: &Complex) -> Complex {
        self.linearize(&self.map.iterate(z, self.depth))
    }

    /// φ_K(w) and dφ_K/dw, the derivative composed by the chain rule over
    /// the K forward steps: d(f^∘K)/dw = Π f'(u_k), f'(u) = ln(b)·f(u)
    pub fn eval_with_derivative(&self, w: &Complex) -> (Complex, Complex) {
        let bits = self.map.bits();
        let mut u = numeric::at_precision(w, bits);
        let mut der = numeric::one(bits);
        for _ in 0..self.depth {
            let next = self.map.apply(&u);
            der = Complex::with_val(bits, &der * self.map.derivative_from_value(&next));
            u = next;
        }
        let phi = self.linearize(&u);
        let phi_prime = Complex::with_val(bits, &self.scale * &der);
        (phi, phi_prime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{is_close, parse_complex};
    use crate::solver::depth::{select_depth, Tolerances};
    use crate::solver::fixed_point::locate;
    use crate::solver::types::SolverConfig;

    fn half_base(bits: u32) -> (ExpMap, FixedPoint, usize) {
        let config = SolverConfig::default();
        let tolerances = Tolerances::for_precision(&config, bits);
        let map = ExpMap::new(&parse_complex("0.5", bits).unwrap(), bits);
        let fp = locate(&map, &config, &tolerances).unwrap();
        let depth = select_depth(numeric::magnitude(&fp.lambda), bits, &config).unwrap();
        (map, fp, depth)
    }

    #[test]
    fn test_inverse_multiplier_power() {
        let lambda = parse_complex("0.5", 128).unwrap();
        let got = inverse_multiplier_power(&lambda, 10, 128);
        assert!(is_close(&got, &parse_complex("1024", 128).unwrap(), 25));
    }

    #[test]
    fn test_multiplier_power_of_negative_lambda_is_complex() {
        // principal branch: (-0.25)^0.5 = 0.5i
        let lambda = parse_complex("-0.25", 128).unwrap();
        let half = parse_complex("0.5", 128).unwrap();
        let got = multiplier_power(&lambda, &half, 128);
        assert!(is_close(&got, &parse_complex("0.5i", 128).unwrap(), 30));
    }

    #[test]
    fn test_phi_vanishes_at_fixed_point() {
        let (map, fp, depth) = half_base(256);
        let koenigs = KoenigsMap::new(&map, &fp, depth);
        let phi = koenigs.eval(&fp.z_star);
        assert!(numeric::is_below(&phi, 20));
    }

    #[test]
    fn test_phi_conjugates_f_to_multiplication() {
        let bits = 256;
        let (map, fp, depth) = half_base(bits);
        let koenigs = KoenigsMap::new(&map, &fp, depth);
        let z = parse_complex("0.9", bits).unwrap();
        let lhs = koenigs.eval(&map.apply(&z));
        let rhs = Complex::with_val(bits, &fp.lambda * koenigs.eval(&z));
        assert!(is_close(&lhs, &rhs, 25));
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let bits = 256;
        let (map, fp, depth) = half_base(bits);
        let koenigs = KoenigsMap::new(&map, &fp, depth);
        let w = parse_complex("0.8+0.1i", bits).unwrap();
        let h = parse_complex("1e-20", bits).unwrap();

        let (phi, phi_prime) = koenigs.eval_with_derivative(&w);
        assert!(is_close(&phi, &koenigs.eval(&w), 30));

        let shifted = koenigs.eval(&Complex::with_val(bits, &w + &h));
        let slope = Complex::with_val(bits, (shifted - &phi) / &h);
        assert!(is_close(&slope, &phi_prime, 10));
    }
}

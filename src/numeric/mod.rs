//! Numeric engine adapter over `rug`
//!
//! `rug::Complex` supplies the arithmetic and transcendental primitives.
//! This module adds literal parsing, decimal rendering and the handful of
//! helpers the solver needs to compare magnitudes against tolerances.

pub mod format;
pub mod literal;

pub use format::{
    abs_fixed, arg_scientific, complex_fixed, complex_scientific, display_digits, float_fixed,
    float_scientific, imag_fixed, real_fixed, MAX_DISPLAY_DIGITS,
};
pub use literal::{complex_from_parts, parse_complex};

use crate::errors::{Result, TetrationError};
use rug::{Complex, Float};

/// log10(2), decimal digits carried per bit
pub const LOG10_2: f64 = std::f64::consts::LOG10_2;

/// Reject zero precision before any value is allocated
pub fn check_precision(bits: u32) -> Result<u32> {
    if bits == 0 {
        return Err(TetrationError::InvalidPrecision(bits));
    }
    Ok(bits)
}

/// Approximate decimal digits carried by `bits` of binary precision
pub fn decimal_digits(bits: u32) -> f64 {
    f64::from(bits) * LOG10_2
}

/// 10^(-digits) as f64 (saturates to zero past the f64 range)
pub fn tolerance(digits: u32) -> f64 {
    10f64.powi(-(digits.min(400) as i32))
}

/// Complex one at `bits`
pub fn one(bits: u32) -> Complex {
    Complex::with_val(bits, 1)
}

/// Complex zero at `bits`
pub fn zero(bits: u32) -> Complex {
    Complex::with_val(bits, 0)
}

/// Re-round `z` to `bits`, producing a fresh value
pub fn at_precision(z: &Complex, bits: u32) -> Complex {
    Complex::with_val(bits, z)
}

/// |z| as f64 (infinite on overflow, zero on underflow, NaN for NaN input)
pub fn magnitude(z: &Complex) -> f64 {
    Float::with_val(z.prec().0, z.abs_ref()).to_f64()
}

/// log10|z|, evaluated in arbitrary precision so tiny magnitudes do not
/// underflow (-inf for zero, NaN for NaN input)
pub fn magnitude_log10(z: &Complex) -> f64 {
    let mut abs = Float::with_val(z.prec().0, z.abs_ref());
    abs.log10_mut();
    abs.to_f64()
}

/// |z| < 10^(-digits), for any number of digits
pub fn is_below(z: &Complex, digits: u32) -> bool {
    magnitude_log10(z) < -f64::from(digits)
}

/// |a - b| < 10^(-digits)
pub fn is_close(a: &Complex, b: &Complex, digits: u32) -> bool {
    let bits = a.prec().0.max(b.prec().0);
    is_below(&Complex::with_val(bits, a - b), digits)
}

/// Both components finite
pub fn is_finite(z: &Complex) -> bool {
    z.real().is_finite() && z.imag().is_finite()
}

/// Principal natural logarithm
pub fn ln(z: &Complex, bits: u32) -> Complex {
    Complex::with_val(bits, z.ln_ref())
}

/// Complex exponential
pub fn exp(z: &Complex, bits: u32) -> Complex {
    Complex::with_val(bits, z.exp_ref())
}

/// a^b with exp(b·log a) semantics
pub fn pow(a: &Complex, b: &Complex, bits: u32) -> Complex {
    let exponent = Complex::with_val(bits, b * ln(a, bits));
    exp(&exponent, bits)
}

/// 1/z
pub fn recip(z: &Complex, bits: u32) -> Complex {
    one(bits) / z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_precision() {
        assert!(check_precision(0).is_err());
        assert_eq!(check_precision(128).unwrap(), 128);
    }

    #[test]
    fn test_decimal_digits() {
        let digits = decimal_digits(2048);
        assert!(digits > 616.0 && digits < 617.0);
    }

    #[test]
    fn test_magnitude_of_three_four() {
        let z = parse_complex("3+4i", 128).unwrap();
        assert!((magnitude(&z) - 5.0).abs() < 1e-15);
    }

    #[test]
    fn test_exp_log_round_trip() {
        let z = parse_complex("0.75+0.5i", 256).unwrap();
        let back = exp(&ln(&z, 256), 256);
        assert!(is_close(&back, &z, 60));
    }

    #[test]
    fn test_is_below_beyond_f64_range() {
        let tiny = parse_complex("1e-500", 4096).unwrap();
        assert_eq!(magnitude(&tiny), 0.0);
        assert!(is_below(&tiny, 499));
        assert!(!is_below(&tiny, 501));
        assert!(is_below(&zero(64), 1000));
        assert!(!is_below(&one(64), 0));
    }

    #[test]
    fn test_recip() {
        let z = parse_complex("3.25-1.75i", 128).unwrap();
        let product = Complex::with_val(128, &z * recip(&z, 128));
        assert!(is_close(&product, &one(128), 30));
    }

    #[test]
    fn test_pow_matches_integer_power() {
        let two = parse_complex("2", 256).unwrap();
        let ten = parse_complex("10", 256).unwrap();
        let got = pow(&two, &ten, 256);
        assert!(is_close(&got, &parse_complex("1024", 256).unwrap(), 60));
    }

    #[test]
    fn test_at_precision() {
        let z = parse_complex("1.5", 64).unwrap();
        let widened = at_precision(&z, 512);
        assert_eq!(widened.prec(), (512, 512));
        assert_eq!(*widened.real(), 1.5);
    }
}

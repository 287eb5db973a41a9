//! The iteration map f(z) = b^z

use crate::numeric;
use rug::Complex;

/// f(z) = b^z = exp(ln(b)·z) on the principal branch, with ln(b) computed once
#[derive(Debug, Clone)]
pub struct ExpMap {
    base: Complex,
    ln_base: Complex,
    bits: u32,
}

impl ExpMap {
    /// Build the map for `base`, re-rounding it to `bits`
    pub fn new(base: &Complex, bits: u32) -> Self {
        let base = numeric::at_precision(base, bits);
        let ln_base = numeric::ln(&base, bits);
        Self {
            base,
            ln_base,
            bits,
        }
    }

    pub fn base(&self) -> &Complex {
        &self.base
    }

    pub fn ln_base(&self) -> &Complex {
        &self.ln_base
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// f(z)
    pub fn apply(&self, z: &Complex) -> Complex {
        let exponent = Complex::with_val(self.bits, &self.ln_base * z);
        numeric::exp(&exponent, self.bits)
    }

    /// f'(z) given an already computed f(z)
    pub fn derivative_from_value(&self, fz: &Complex) -> Complex {
        Complex::with_val(self.bits, &self.ln_base * fz)
    }

    /// λ = f'(z*) = ln(b)·z*, using f(z*) = z*
    pub fn multiplier(&self, z_star: &Complex) -> Complex {
        self.derivative_from_value(z_star)
    }

    /// f^∘n(z)
    pub fn iterate(&self, z: &Complex, n: usize) -> Complex {
        let mut u = numeric::at_precision(z, self.bits);
        for _ in 0..n {
            u = self.apply(&u);
        }
        u
    }
}

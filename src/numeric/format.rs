//! Decimal rendering of arbitrary-precision values
//!
//! Fixed form rounds to `digits` fractional digits (`0` prints an integer);
//! scientific form prints one leading digit, `digits` fractional digits and
//! a signed exponent of at least two digits, e.g. `-1.250e+03`.

use rug::{Complex, Float, Integer};

/// Extra bits per decimal digit when scaling for fixed output
const BITS_PER_DIGIT: f64 = 3.321_928_094_887_362;

/// Upper bound on requested output digits
pub const MAX_DISPLAY_DIGITS: usize = 1 << 20;

/// Digits worth printing at `bits` of precision (a small safety margin below
/// the representable count, never less than one)
pub fn display_digits(bits: u32) -> usize {
    let digits = (f64::from(bits) * super::LOG10_2).floor() - 5.0;
    if digits < 1.0 {
        1
    } else {
        digits as usize
    }
}

fn non_finite(x: &Float) -> Option<String> {
    if x.is_nan() {
        Some("nan".to_string())
    } else if x.is_infinite() {
        Some(if x.is_sign_negative() { "-inf" } else { "inf" }.to_string())
    } else {
        None
    }
}

/// Render `x` with exactly `digits` digits after the decimal point
pub fn float_fixed(x: &Float, digits: usize) -> String {
    if let Some(s) = non_finite(x) {
        return s;
    }

    let extra = (digits as f64 * BITS_PER_DIGIT).ceil() as u32 + 64;
    let scale = Integer::from(Integer::u_pow_u(10, digits as u32));
    let scaled = Float::with_val(x.prec() + extra, x * &scale);
    let units = scaled.to_integer().unwrap_or_default();

    let negative = units < 0;
    let mut body = units.abs().to_string();
    if digits > 0 {
        if body.len() <= digits {
            body = format!("{}{}", "0".repeat(digits + 1 - body.len()), body);
        }
        body.insert(body.len() - digits, '.');
    }
    if negative {
        body.insert(0, '-');
    }
    body
}

/// Render `x` as `d.ddd…e±XX` with `digits` fractional digits
pub fn float_scientific(x: &Float, digits: usize) -> String {
    if let Some(s) = non_finite(x) {
        return s;
    }
    let digits = digits.max(1);
    if x.is_zero() {
        let sign = if x.is_sign_negative() { "-" } else { "" };
        return format!("{}0.{}e+00", sign, "0".repeat(digits));
    }

    let (negative, mut mantissa, exp) = x.to_sign_string_exp(10, Some(digits + 1));
    mantissa.retain(|c| c.is_ascii_digit());
    mantissa.truncate(digits + 1);
    while mantissa.len() < digits + 1 {
        mantissa.push('0');
    }

    // value = 0.mantissa × 10^exp = m.antissa × 10^(exp-1)
    let exponent = exp.unwrap_or(1) - 1;
    let (head, tail) = mantissa.split_at(1);
    format!(
        "{}{}.{}e{}{:02}",
        if negative { "-" } else { "" },
        head,
        tail,
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

fn join_parts(re: String, im: String) -> String {
    match im.strip_prefix('-') {
        Some(rest) => format!("{}-{}i", re, rest),
        None => format!("{}+{}i", re, im),
    }
}

/// `a+bi` with both components in fixed form
pub fn complex_fixed(z: &Complex, digits: usize) -> String {
    join_parts(float_fixed(z.real(), digits), float_fixed(z.imag(), digits))
}

/// `a+bi` with both components in scientific form
pub fn complex_scientific(z: &Complex, digits: usize) -> String {
    join_parts(
        float_scientific(z.real(), digits),
        float_scientific(z.imag(), digits),
    )
}

/// Real component in fixed form
pub fn real_fixed(z: &Complex, digits: usize) -> String {
    float_fixed(z.real(), digits)
}

/// Imaginary component in fixed form
pub fn imag_fixed(z: &Complex, digits: usize) -> String {
    float_fixed(z.imag(), digits)
}

/// |z| in fixed form
pub fn abs_fixed(z: &Complex, digits: usize) -> String {
    float_fixed(&Float::with_val(z.prec().0, z.abs_ref()), digits)
}

/// arg(z) in scientific form
pub fn arg_scientific(z: &Complex, digits: usize) -> String {
    float_scientific(&Float::with_val(z.prec().0, z.arg_ref()), digits)
}

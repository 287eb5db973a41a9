//! Complex literal parsing
//!
//! Accepted forms: `a`, `i`, `-i`, `bi`, `a+bi`, `a-bi`, `a+i`, `(a b)`,
//! `(a, b)`. `I` is read as `i`. The empty string is zero. Real parts are
//! anything `rug::Float::parse` accepts, so exponents (`1e-100`) work.

use crate::errors::{Result, TetrationError};
use rug::{Complex, Float};

/// Parse a combined complex literal at `bits` of precision
pub fn parse_complex(literal: &str, bits: u32) -> Result<Complex> {
    let (re, im) = split_literal(literal)
        .ok_or_else(|| TetrationError::parse(literal, "unrecognised complex form"))?;
    build(literal, &re, &im, bits)
}

/// Build `re + i·im` from two real literals
pub fn complex_from_parts(re: &str, im: &str, bits: u32) -> Result<Complex> {
    let literal = format!("({} {})", re, im);
    build(&literal, re.trim(), im.trim(), bits)
}

fn build(literal: &str, re: &str, im: &str, bits: u32) -> Result<Complex> {
    let re = parse_real(re, bits)
        .map_err(|e| TetrationError::parse(literal, format!("invalid real part {:?}: {}", re, e)))?;
    let im = parse_real(im, bits).map_err(|e| {
        TetrationError::parse(literal, format!("invalid imaginary part {:?}: {}", im, e))
    })?;
    Ok(Complex::with_val(bits, (re, im)))
}

fn parse_real(text: &str, bits: u32) -> std::result::Result<Float, String> {
    let parsed = Float::parse(text).map_err(|e| e.to_string())?;
    Ok(Float::with_val(bits, parsed))
}

/// Split a literal into real and imaginary component strings
pub(crate) fn split_literal(input: &str) -> Option<(String, String)> {
    let s = input.trim();
    if s.is_empty() {
        return Some(("0".into(), "0".into()));
    }

    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        let inner = inner.replace(',', " ");
        let fields: Vec<&str> = inner.split_whitespace().collect();
        return match fields.as_slice() {
            [re] => Some((re.to_string(), "0".into())),
            [re, im, ..] => Some((re.to_string(), im.to_string())),
            [] => None,
        };
    }

    let s = s.replace('I', "i");
    match s.as_str() {
        "i" | "+i" => return Some(("0".into(), "1".into())),
        "-i" => return Some(("0".into(), "-1".into())),
        _ => {}
    }

    if !s.ends_with('i') {
        return Some((s, "0".into()));
    }
    let core = s[..s.len() - 1].trim();
    match last_sign_outside_exponent(core) {
        Some(idx) => {
            let re = core[..idx].trim().to_string();
            let im = match core[idx..].trim() {
                "+" => "1".to_string(),
                "-" => "-1".to_string(),
                other => other.replace(' ', ""),
            };
            Some((re, im))
        }
        None => Some(("0".into(), core.to_string())),
    }
}

/// Index of the last `+`/`-` that is neither leading nor an exponent sign
fn last_sign_outside_exponent(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len()).rev().find(|&i| {
        matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
    })
}

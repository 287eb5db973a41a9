//! Integer power towers
//!
//! T_b(0) = 1 and T_b(n) = b^T_b(n-1), evaluated right-associated. Used when
//! no attracting fixed point exists but the height is a non-negative
//! integer.

use crate::errors::{Result, TetrationError};
use crate::numeric;
use crate::solver::map::ExpMap;
use rug::{Complex, Float};
use tracing::debug;

/// Height `h` as a non-negative integer, if it is one to within 10^-digits
pub fn integer_height(height: &Complex, digits: u32) -> Option<u64> {
    let bits = height.prec().0;
    if !numeric::is_finite(height) {
        return None;
    }
    let rounded = Float::with_val(bits, height.real().round_ref());
    let nearest = Complex::with_val(bits, (&rounded, 0));
    if !numeric::is_close(height, &nearest, digits) {
        return None;
    }
    rounded.to_integer()?.to_u64()
}

/// x₀ = 1, x_{i+1} = b^x_i, `n` times
///
/// Overflow is not an error: the iterate becomes infinite and is returned
/// as such.
pub fn power_tower(map: &ExpMap, n: u64, max_height: u64) -> Result<Complex> {
    if n > max_height {
        return Err(TetrationError::HeightTooLarge {
            height: n,
            max: max_height,
        });
    }
    let mut x = numeric::one(map.bits());
    for level in 0..n {
        x = map.apply(&x);
        if !numeric::is_finite(&x) {
            debug!(level = level + 1, "power tower left the finite range");
            break;
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{is_close, parse_complex};

    fn height(literal: &str) -> Complex {
        parse_complex(literal, 256).unwrap()
    }

    #[test]
    fn test_integer_height_detection() {
        assert_eq!(integer_height(&height("0"), 30), Some(0));
        assert_eq!(integer_height(&height("3"), 30), Some(3));
        assert_eq!(integer_height(&height("2.0+0i"), 30), Some(2));
        assert_eq!(integer_height(&height("3.0000000000000000000000000000000001"), 30), Some(3));
    }

    #[test]
    fn test_non_integer_heights_rejected() {
        assert_eq!(integer_height(&height("1.5"), 30), None);
        assert_eq!(integer_height(&height("2+1e-10i"), 30), None);
        assert_eq!(integer_height(&height("-1"), 30), None);
        assert_eq!(integer_height(&height("2.000001"), 30), None);
    }

    #[test]
    fn test_tower_of_two() {
        let map = ExpMap::new(&height("2"), 256);
        let expected = ["1", "2", "4", "16", "65536"];
        for (n, want) in expected.iter().enumerate() {
            let got = power_tower(&map, n as u64, 100).unwrap();
            assert!(is_close(&got, &height(want), 50), "n = {}", n);
        }
    }

    #[test]
    fn test_tower_height_guard() {
        let map = ExpMap::new(&height("2"), 256);
        assert!(matches!(
            power_tower(&map, 101, 100),
            Err(TetrationError::HeightTooLarge { height: 101, max: 100 })
        ));
    }

    #[test]
    fn test_tower_overflow_is_not_an_error() {
        let map = ExpMap::new(&height("10"), 64);
        let got = power_tower(&map, 6, 100).unwrap();
        assert!(!numeric::is_finite(&got));
    }
}

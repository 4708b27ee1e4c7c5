//! Functions to construct [`Integer`]s, [`Rational`]s and [`Float`]s from various types.

use rug::{ops::Pow, Assign, Float, Integer, Rational};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 8;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Reads a decimal literal such as `3.14159` or `.5` exactly. Characters other than digits and
/// the decimal point are ignored.
pub fn rational_from_decimal(s: &str) -> Rational {
    let mut numer = int(0);
    let mut scale = 0u32;
    let mut after_point = false;

    for c in s.chars() {
        if c == '.' {
            after_point = true;
        } else if let Some(digit) = c.to_digit(10) {
            numer *= 10;
            numer += digit;
            if after_point {
                scale += 1;
            }
        }
    }

    Rational::from((numer, int(10).pow(scale)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_are_exact() {
        assert_eq!(rational_from_decimal("3.14159"), rational((314159, 100000)));
        assert_eq!(rational_from_decimal(".5"), rational((1, 2)));
        assert_eq!(rational_from_decimal("42"), rational(42));
        assert_eq!(rational_from_decimal("0.250"), rational((1, 4)));
    }
}

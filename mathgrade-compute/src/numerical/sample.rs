use crate::{numerical::eval::Assignment, primitive::{float, rational, PRECISION}};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rug::Float;
use std::collections::BTreeSet;

/// Probability that a sampled value is negative. Positive values are preferred so that square
/// roots and logarithms are usually defined.
const NEGATIVE_PROBABILITY: f64 = 0.25;

/// Generates `count` assignments of values to the given symbols, deterministically from `seed`.
///
/// Values are fractions `p/q` with `1 <= p <= 60` and `1 <= q <= 9`, which avoids the small
/// integers where distinct expressions tend to agree by coincidence. With no symbols, a single
/// empty assignment is returned, since a constant expression has only one value.
pub fn sample_points(symbols: &BTreeSet<String>, count: usize, seed: u64) -> Vec<Assignment> {
    if symbols.is_empty() {
        return vec![Assignment::new()];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            symbols.iter()
                .map(|symbol| (symbol.clone(), sample_value(&mut rng)))
                .collect()
        })
        .collect()
}

/// Generates a single sample value.
fn sample_value(rng: &mut StdRng) -> Float {
    loop {
        let numer: i64 = rng.gen_range(1..=60);
        let denom: i64 = rng.gen_range(1..=9);
        if numer % denom == 0 && numer / denom <= 3 {
            continue;
        }
        let sign = if rng.gen_bool(NEGATIVE_PROBABILITY) { -1 } else { 1 };
        return float(rational((sign * numer, denom)));
    }
}

/// Returns true if `a` and `b` differ by at most `tolerance`.
pub fn within_tolerance(a: &Float, b: &Float, tolerance: f64) -> bool {
    Float::with_val(PRECISION, a - b).abs() <= tolerance
}

/// Returns true if `a` and `b` agree within `tolerance`, relative to the larger of their
/// magnitudes or absolute for magnitudes below one. Used for values at sample points, which
/// grow with the sampled values.
pub fn within_relative_tolerance(a: &Float, b: &Float, tolerance: f64) -> bool {
    let diff = Float::with_val(PRECISION, a - b).abs();
    let mut scale = float(1);
    for value in [a, b] {
        let magnitude = value.clone().abs();
        if magnitude > scale {
            scale = magnitude;
        }
    }
    diff <= Float::with_val(PRECISION, scale * tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let symbols = BTreeSet::from(["x".to_owned(), "y".to_owned()]);
        assert_eq!(sample_points(&symbols, 7, 42), sample_points(&symbols, 7, 42));
        assert_eq!(sample_points(&symbols, 7, 42).len(), 7);
    }

    #[test]
    fn avoids_small_integers() {
        let symbols = BTreeSet::from(["x".to_owned()]);
        for point in sample_points(&symbols, 200, 7) {
            let value = point["x"].to_f64();
            assert!(!(value.fract() == 0.0 && value.abs() <= 3.0), "sampled {}", value);
        }
    }

    #[test]
    fn constants_need_one_point() {
        assert_eq!(sample_points(&BTreeSet::new(), 7, 1), vec![Assignment::new()]);
    }

    #[test]
    fn tolerance_is_absolute() {
        assert!(!within_tolerance(&float(1000.0), &float(1000.0005), 1e-6));
        assert!(within_tolerance(&float(1000.0), &float(1000.0005), 1e-3));
        assert!(within_tolerance(&float(3.14159), &float(3.14160), 1e-4));
        assert!(!within_tolerance(&float(3.14159), &float(3.14160), 1e-6));
    }

    #[test]
    fn sampled_tolerance_scales_with_magnitude() {
        assert!(within_relative_tolerance(&float(1_000_000.0), &float(1_000_000.5), 1e-6));
        assert!(!within_relative_tolerance(&float(1.0), &float(1.5), 1e-6));
        assert!(!within_relative_tolerance(&float(0.5), &float(0.5001), 1e-6));
    }
}

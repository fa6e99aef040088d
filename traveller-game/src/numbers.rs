//! Numeric conversion helpers centralizing lossy casts.

use num_traits::cast::cast;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Money per step of travel; 0.0 for a zero-length trip.
#[must_use]
pub fn per_step(value: i64, length: u32) -> f64 {
    if length == 0 {
        return 0.0;
    }
    i64_to_f64(value) / f64::from(length)
}

/// `base` raised to a visit or edge count, saturating the exponent at `i32::MAX`.
#[must_use]
pub fn powu(base: f64, exponent: usize) -> f64 {
    base.powi(i32::try_from(exponent).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_step_handles_zero_length() {
        assert!((per_step(80, 4) - 20.0).abs() < f64::EPSILON);
        assert!(per_step(80, 0).abs() < f64::EPSILON);
        assert!((per_step(-9, 3) + 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn powu_matches_repeated_multiplication() {
        assert!((powu(2.0, 3) - 8.0).abs() < f64::EPSILON);
        assert!((powu(1.1, 0) - 1.0).abs() < f64::EPSILON);
        assert!((i64_to_f64(-42) + 42.0).abs() < f64::EPSILON);
    }
}

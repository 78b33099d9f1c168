//! Circular angle arithmetic.
//!
//! Every tack and turn decision in the crate is built on these three
//! primitives. Angles are plain `f64` degrees; the functions accept any
//! finite value, including negative and multi-turn arguments.
//!
//! # Ranges
//!
//! | function | result |
//! |----------|--------|
//! | [`normalize_unsigned`] | `[0, 360)` |
//! | [`normalize_signed`] | `(-180, 180]` |
//! | [`signed_delta`] | `(-180, 180]`, positive = clockwise |

/// Full circle in degrees.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Half circle in degrees.
pub const HALF_CIRCLE_DEG: f64 = 180.0;

/// Normalize an angle to `[0, 360)`.
///
/// Handles wraparound (e.g. -90° becomes 270°, 450° becomes 90°).
#[inline]
pub fn normalize_unsigned(angle: f64) -> f64 {
    let mut a = angle % FULL_CIRCLE_DEG;
    if a < 0.0 {
        a += FULL_CIRCLE_DEG;
    }
    // -1e-15 + 360.0 rounds to exactly 360.0
    if a >= FULL_CIRCLE_DEG {
        a = 0.0;
    }
    a
}

/// Normalize an angle to `(-180, 180]`.
#[inline]
pub fn normalize_signed(angle: f64) -> f64 {
    let a = normalize_unsigned(angle);
    if a > HALF_CIRCLE_DEG {
        a - FULL_CIRCLE_DEG
    } else {
        a
    }
}

/// Smallest signed rotation from `from` to `to`, in `(-180, 180]`.
///
/// Positive means `to` lies clockwise of `from`, i.e. to the right when
/// facing along `from`. Exactly opposite directions yield `+180`, so
/// `signed_delta(a, b) == -signed_delta(b, a)` holds everywhere except at
/// that boundary.
#[inline]
pub fn signed_delta(from: f64, to: f64) -> f64 {
    normalize_signed(to - from)
}

/// Parse a textual angle in degrees.
///
/// Accepts surrounding whitespace and an optional trailing `°`. Returns
/// `None` for anything unparsable or non-finite; callers treat that the
/// same as a missing value.
pub fn parse_angle(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('°').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Normalization
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_unsigned() {
        assert_close(normalize_unsigned(0.0), 0.0);
        assert_close(normalize_unsigned(360.0), 0.0);
        assert_close(normalize_unsigned(-90.0), 270.0);
        assert_close(normalize_unsigned(450.0), 90.0);
        assert_close(normalize_unsigned(-450.0), 270.0);
        assert_close(normalize_unsigned(720.5), 0.5);
    }

    #[test]
    fn test_normalize_unsigned_tiny_negative_stays_in_range() {
        let a = normalize_unsigned(-1e-15);
        assert!((0.0..360.0).contains(&a), "got {a}");
    }

    #[test]
    fn test_normalize_signed() {
        assert_close(normalize_signed(180.0), 180.0);
        assert_close(normalize_signed(-180.0), 180.0);
        assert_close(normalize_signed(181.0), -179.0);
        assert_close(normalize_signed(270.0), -90.0);
        assert_close(normalize_signed(-10.0), -10.0);
        assert_close(normalize_signed(540.0), 180.0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signed delta
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_signed_delta_simple() {
        assert_close(signed_delta(0.0, 10.0), 10.0);
        assert_close(signed_delta(10.0, 0.0), -10.0);
    }

    #[test]
    fn test_signed_delta_wraparound() {
        assert_close(signed_delta(350.0, 10.0), 20.0);
        assert_close(signed_delta(10.0, 350.0), -20.0);
        assert_close(signed_delta(-370.0, 370.0), 20.0);
    }

    #[test]
    fn test_signed_delta_opposite_is_plus_180() {
        assert_close(signed_delta(0.0, 180.0), 180.0);
        assert_close(signed_delta(180.0, 0.0), 180.0);
        assert_close(signed_delta(90.0, 270.0), 180.0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Parsing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_angle() {
        assert_eq!(parse_angle("45"), Some(45.0));
        assert_eq!(parse_angle("  -12.5 "), Some(-12.5));
        assert_eq!(parse_angle("270°"), Some(270.0));
        assert_eq!(parse_angle(""), None);
        assert_eq!(parse_angle("north"), None);
        assert_eq!(parse_angle("NaN"), None);
        assert_eq!(parse_angle("inf"), None);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Distance between two angles on the circle.
        fn circular_gap(a: f64, b: f64) -> f64 {
            signed_delta(a, b).abs()
        }

        proptest! {
            #[test]
            fn test_unsigned_in_range(a in -1.0e6..1.0e6_f64) {
                let n = normalize_unsigned(a);
                prop_assert!((0.0..360.0).contains(&n), "{} -> {}", a, n);
            }

            #[test]
            fn test_signed_in_range(a in -1.0e6..1.0e6_f64) {
                let n = normalize_signed(a);
                prop_assert!(n > -180.0 && n <= 180.0, "{} -> {}", a, n);
            }

            #[test]
            fn test_unsigned_periodic(a in -1.0e4..1.0e4_f64, k in -100i32..100) {
                let shifted = normalize_unsigned(a + 360.0 * k as f64);
                let base = normalize_unsigned(a);
                prop_assert!(circular_gap(shifted, base) < 1e-6);
            }

            #[test]
            fn test_delta_to_self_is_zero(a in -1.0e4..1.0e4_f64) {
                prop_assert_eq!(signed_delta(a, a), 0.0);
            }

            #[test]
            fn test_delta_antisymmetric(a in -720.0..720.0_f64, b in -720.0..720.0_f64) {
                let forward = signed_delta(a, b);
                prop_assume!(forward.abs() < 179.999);
                let backward = signed_delta(b, a);
                prop_assert!((forward + backward).abs() < 1e-9);
            }
        }
    }
}

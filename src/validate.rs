// Unit Conversion & Validation
// Turns free-text entry fields into canonical meters / kilograms

use crate::error::ValidationError;

/// Longest subject name kept, in bytes
pub const NAME_MAX_BYTES: usize = 49;

/// Longest height or weight field kept, in bytes
pub const FIELD_MAX_BYTES: usize = 19;

/// A height still above this many meters after the cm conversion is
/// assumed to have been typed in an even smaller unit and is scaled again.
pub const METERS_CEILING: f64 = 3.0;

// ============================================================================
// RAW INPUT
// ============================================================================

/// Entry-flow state for one attempt, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    pub name: String,
    pub height: String,
    pub weight: String,
}

impl RawInput {
    pub fn new(name: impl Into<String>, height: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            height: height.into(),
            weight: weight.into(),
        }
    }

    pub fn normalize(&self) -> Result<Measurements, ValidationError> {
        normalize(&self.name, &self.height, &self.weight)
    }
}

// ============================================================================
// MEASUREMENTS
// ============================================================================

/// Validated measurements in canonical units
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    pub name: String,
    pub height_m: f64,
    pub weight_kg: f64,
}

impl Measurements {
    /// Body-mass index, `weight / height²`
    ///
    /// Positive inputs can still overflow (`1e308` kg) or underflow to zero,
    /// so the result is checked again before it may reach the store.
    pub fn bmi(&self) -> Result<f64, ValidationError> {
        let bmi = self.weight_kg / (self.height_m * self.height_m);
        if bmi.is_finite() && bmi > 0.0 {
            Ok(bmi)
        } else {
            Err(ValidationError::OutOfRange)
        }
    }
}

/// Normalize one entry attempt.
///
/// Height is read as centimeters. If the meters value is still above
/// [`METERS_CEILING`] it is divided by 100 once more. Numbers are parsed
/// with [`parse_lenient`], so text without a numeric prefix counts as zero
/// and is rejected as non-positive.
pub fn normalize(name: &str, height_raw: &str, weight_raw: &str) -> Result<Measurements, ValidationError> {
    let mut height_m = parse_lenient(height_raw) / 100.0;
    if height_m > METERS_CEILING {
        height_m /= 100.0;
    }
    let weight_kg = parse_lenient(weight_raw);

    if height_m <= 0.0 || weight_kg <= 0.0 {
        return Err(ValidationError::NonPositive);
    }

    Ok(Measurements {
        name: truncate_to_boundary(name, NAME_MAX_BYTES).to_string(),
        height_m,
        weight_kg,
    })
}

// ============================================================================
// PARSING HELPERS
// ============================================================================

/// Parse the longest decimal prefix of `raw`, like C's `atof`.
///
/// Leading whitespace is skipped and trailing garbage ignored: `"170cm"` is
/// `170.0`, `"abc"` and `""` are `0.0`. Hex floats, `inf` and `nan` are not
/// recognised and also give `0.0`.
pub fn parse_lenient(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Cut `s` to at most `max_bytes` without splitting a character
pub fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// TESTS
// ============================================================================

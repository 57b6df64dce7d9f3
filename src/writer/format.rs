//! Locale-invariant rendering of sample values.
//!
//! Output never depends on the process locale: `.` is the decimal point, there
//! is no digit grouping, and every value round-trips through `str::parse` at its
//! own precision.

use crate::cmbl::Samples;

/// Values at or above this magnitude switch to exponent notation
const EXP_UPPER: f64 = 1e16;
/// Non-zero values below this magnitude switch to exponent notation
const EXP_LOWER: f64 = 1e-5;

fn format_non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

fn needs_exponent(magnitude: f64) -> bool {
    magnitude >= EXP_UPPER || (magnitude != 0.0 && magnitude < EXP_LOWER)
}

/// Render a 64-bit sample
pub fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return format_non_finite(value);
    }
    if needs_exponent(value.abs()) {
        format!("{:e}", value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Render a 32-bit sample using the shortest representation of the `f32` itself
pub fn format_f32(value: f32) -> String {
    if !value.is_finite() {
        return format_non_finite(f64::from(value));
    }
    if needs_exponent(f64::from(value.abs())) {
        format!("{:e}", value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Render the sample at `index`, if present
pub fn format_sample(samples: &Samples, index: usize) -> Option<String> {
    match samples {
        Samples::Single(v) => v.get(index).map(|&x| format_f32(x)),
        Samples::Double(v) => v.get(index).map(|&x| format_f64(x)),
    }
}

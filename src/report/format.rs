//! Number formatting for the text report.

use std::fmt::Write as _;

/// Significant figures used for timings and frame rates.
pub const TIMING_SIG_FIGS: i32 = 4;
/// Significant figures used for percentages.
pub const PERCENT_SIG_FIGS: i32 = 3;

/// Rounds `x` to `digits` significant figures.
///
/// With `k = floor(log10(|x|)) + 1` the value is scaled by `10^(k - digits)`,
/// rounded to the nearest integer (halves away from zero) and scaled back.
/// The scale is always applied as an exact power of ten on the side that
/// keeps it an integer, so `0.0056789` at three figures is exactly `0.00568`.
/// Zero and non-finite values are returned unchanged.
pub fn round_to_sig_figs(x: f64, digits: i32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let k = x.abs().log10().floor() as i32 + 1;
    let shift = digits - k;
    let factor = pow10(shift.abs());
    // Scales beyond f64 range (subnormals, values near f64::MAX) stay unrounded.
    if !factor.is_finite() {
        return x;
    }
    let rounded = if shift >= 0 {
        (x * factor).round() / factor
    } else {
        (x / factor).round() * factor
    };
    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

fn pow10(exp: i32) -> f64 {
    // Integer powers of ten up to 1e22 are exactly representable.
    if exp <= 22 {
        let mut value = 1.0;
        for _ in 0..exp {
            value *= 10.0;
        }
        value
    } else {
        10f64.powi(exp)
    }
}

/// Renders a value, spelling out non-finite results instead of Rust's `inf`.
pub fn number(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x == f64::INFINITY {
        "Infinity".to_string()
    } else if x == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        let mut out = String::new();
        let _ = write!(out, "{x}");
        out
    }
}

/// Timing or rate value: 4 significant figures.
#[inline]
pub fn timing(x: f64) -> String {
    number(round_to_sig_figs(x, TIMING_SIG_FIGS))
}

/// Percentage value: 3 significant figures.
#[inline]
pub fn percent(x: f64) -> String {
    number(round_to_sig_figs(x, PERCENT_SIG_FIGS))
}

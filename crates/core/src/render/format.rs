use crate::render::NOT_AVAILABLE;

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Compact amount formatting (`3.20B`, `2.50M`, `1.50K`, `999.00`).
///
/// Thresholds compare the signed value, so negative amounts are never abbreviated.
pub fn format_number(value: Option<f64>) -> String {
    let Some(v) = value else {
        return NOT_AVAILABLE.to_string();
    };

    if v >= BILLION {
        format!("{}B", to_fixed(v / BILLION, 2))
    } else if v >= MILLION {
        format!("{}M", to_fixed(v / MILLION, 2))
    } else if v >= THOUSAND {
        format!("{}K", to_fixed(v / THOUSAND, 2))
    } else {
        to_fixed(v, 2)
    }
}

/// Ratio formatting. Zero is indistinguishable from missing and renders as N/A.
pub fn format_ratio(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => to_fixed(v, decimals),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Fixed-point formatting where exact halfway values round away from zero
/// (`1.125` -> `1.13`, `-1.125` -> `-1.13`). `-0.0` prints without a sign.
fn to_fixed(v: f64, decimals: usize) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let mut magnitude = v.abs();
    if is_half_step(magnitude, decimals) {
        // Smallest step up from an exact tie rounds upward.
        magnitude = f64::from_bits(magnitude.to_bits() + 1);
    }
    format!("{sign}{magnitude:.decimals$}")
}

/// True when the exact binary value of `magnitude` ends in a single `5` right after
/// `decimals` fractional digits.
fn is_half_step(magnitude: f64, decimals: usize) -> bool {
    if !magnitude.is_finite() {
        return false;
    }
    // Every finite f64 has at most 1074 fractional decimal digits, so this is exact.
    let exact = format!("{magnitude:.1100}");
    let Some((_, fraction)) = exact.split_once('.') else {
        return false;
    };
    let Some(tail) = fraction.get(decimals..) else {
        return false;
    };
    let mut digits = tail.chars();
    digits.next() == Some('5') && digits.all(|c| c == '0')
}

//! One-decimal rounding shared by the aggregates.
//!
//! Ratios are rounded half-up in integer arithmetic so that e.g. 17/4
//! renders as `4.3`, never `4.2`.

/// Rounds `numerator / denominator` to tenths, half-up.
///
/// The result is the ratio times ten; `denominator` must be non-zero.
pub(crate) fn tenths(numerator: u64, denominator: u64) -> u64 {
    (numerator * 20 + denominator) / (denominator * 2)
}

/// Formats a tenths value as a one-decimal string.
pub(crate) fn format_tenths(tenths: u64) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Formats `numerator / denominator` with one decimal, `"0.0"` when the
/// denominator is zero.
pub(crate) fn one_decimal(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return format_tenths(0);
    }
    format_tenths(tenths(numerator, denominator))
}

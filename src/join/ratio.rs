//! Normalised ratios with explicit zero and missing-denominator semantics.

use crate::data::rows::FieldValue;

use super::selector::RatioScale;

/// Tri-state ratio: `None` is unset (denominator missing), `Some(None)` is
/// "no comparison possible" (denominator zero), `Some(Some(v))` a value.
pub type Ratio = Option<Option<f64>>;

/// Divide `numerator` by `denominator`, scaled by `scale`.
pub fn ratio(numerator: f64, denominator: FieldValue, scale: RatioScale) -> Ratio {
    match denominator {
        FieldValue::Missing => None,
        FieldValue::Present(value) if value == 0.0 => Some(None),
        FieldValue::Present(value) => Some(Some((numerator / value) * scale.multiplier())),
    }
}

/// Ordering value for a ratio: null and unset compare as zero.
pub fn sort_value(ratio: Ratio) -> f64 {
    ratio.flatten().unwrap_or(0.0)
}

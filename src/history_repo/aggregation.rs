// Pure aggregation over a window of raw samples.

use crate::models::Sample;

/// Arithmetic mean of the sample values. `None` for an empty window.
/// NaN or infinite inputs propagate into the result.
pub fn mean(samples: &[Sample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(|s| s.value).sum::<f64>() / samples.len() as f64)
}

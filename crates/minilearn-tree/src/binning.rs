//! Equal-width discretisation of continuous features.

use tracing::debug;

/// `n_bins + 1` equally spaced edges spanning `[min, max]` of `values`.
///
/// A constant (or empty) column yields a single edge, so every value of that
/// feature maps to bin 0. A column whose min or max is not finite also
/// yields the single edge `[0.0]`: it carries no split information and is
/// never chosen by the tree.
pub fn compute_bin_edges<I>(values: I, n_bins: usize) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        debug!(min, max, "non-finite feature range, binning as constant");
        return vec![0.0];
    }
    if min == max || n_bins == 0 {
        return vec![min];
    }
    (0..=n_bins)
        .map(|i| min + (max - min) * i as f64 / n_bins as f64)
        .collect()
}

/// Bin id of `value` given sorted `edges`.
///
/// Bins are the closed intervals `[edges[i], edges[i + 1]]`; a value sitting
/// on a shared edge belongs to the lower bin. Values outside every bin fall
/// into the last one.
pub fn find_bin(value: f64, edges: &[f64]) -> usize {
    edges
        .windows(2)
        .position(|w| value >= w[0] && value <= w[1])
        .unwrap_or_else(|| edges.len().saturating_sub(2))
}

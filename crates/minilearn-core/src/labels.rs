//! Helpers for numerically-encoded class labels.
//!
//! Labels are `f64` values compared exactly; every helper returns labels in
//! ascending order so results do not depend on input order.

/// Sorted, de-duplicated label values.
pub fn unique_labels(y: &[f64]) -> Vec<f64> {
    let mut labels = y.to_vec();
    labels.sort_by(|a, b| a.total_cmp(b));
    labels.dedup();
    labels
}

/// Frequency of each distinct label, sorted by label value.
pub fn label_counts<I>(labels: I) -> Vec<(f64, usize)>
where
    I: IntoIterator<Item = f64>,
{
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, c)) => *c += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| a.0.total_cmp(&b.0));
    counts
}

/// Most frequent label; ties go to the lowest label value.
///
/// Returns `None` for an empty input.
pub fn majority_label<I>(labels: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(f64, usize)> = None;
    for (label, count) in label_counts(labels) {
        match best {
            Some((_, c)) if count <= c => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

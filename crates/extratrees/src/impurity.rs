//! Gini impurity over class-count histograms

/// `1 - sum(p_c^2)` for the class distribution in `counts`.
///
/// Returns `0.0` for an empty histogram.
pub fn gini(counts: &[u16], total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }

    let total = total as f32;
    let mut impurity = 1.0f32;
    for &count in counts.iter().filter(|&&c| c > 0) {
        let prob = count as f32 / total;
        impurity -= prob * prob;
    }
    impurity
}

/// Class-count histogram of `labels[rows[..]]` written into `counts`.
///
/// Labels are validated at the training boundary, so every label indexes
/// into `counts`.
pub(crate) fn fill_histogram(counts: &mut [u16], labels: &[i16], rows: &[i16]) {
    counts.fill(0);
    for &row in rows {
        counts[labels[row as usize] as usize] += 1;
    }
}

/// Lowest class index holding the strictly greatest count; 0 when empty.
pub(crate) fn majority_class(counts: &[u16]) -> usize {
    let mut max_count = 0u16;
    let mut majority = 0usize;
    for (class, &count) in counts.iter().enumerate() {
        if count > max_count {
            max_count = count;
            majority = class;
        }
    }
    majority
}

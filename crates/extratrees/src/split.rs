//! Split search and in-place partitioning over a node's row range
//!
//! Both sides use the same convention: a row goes left when
//! `features[row][feature] <= threshold`.

use crate::impurity::{fill_histogram, gini};
use heapless::Vec as StackVec;

/// Maximum distinct values examined per feature in one node
pub const MAX_DISTINCT_VALUES: usize = 50;

/// Borrowed row-major training matrix with its labels
#[derive(Debug, Clone, Copy)]
pub struct TrainingData<'a> {
    pub features: &'a [i16],
    pub labels: &'a [i16],
    pub n_features: usize,
}

impl<'a> TrainingData<'a> {
    pub fn new(features: &'a [i16], labels: &'a [i16], n_features: usize) -> Self {
        Self {
            features,
            labels,
            n_features,
        }
    }

    #[inline]
    pub fn value(&self, row: i16, feature: usize) -> i16 {
        self.features[row as usize * self.n_features + feature]
    }

    #[inline]
    pub fn label(&self, row: i16) -> i16 {
        self.labels[row as usize]
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }
}

/// Per-class histograms reused by every split search
#[derive(Debug, Clone)]
pub struct ClassCounts {
    pub(crate) parent: Vec<u16>,
    left: Vec<u16>,
    right: Vec<u16>,
}

impl ClassCounts {
    pub fn new(n_classes: usize) -> Self {
        Self {
            parent: vec![0; n_classes],
            left: vec![0; n_classes],
            right: vec![0; n_classes],
        }
    }

    pub fn n_classes(&self) -> usize {
        self.parent.len()
    }
}

/// Winning split candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub feature: usize,
    pub threshold: i16,
    pub improvement: f32,
}

/// Find the split with the greatest Gini decrease over `rows`.
///
/// Candidates are compared with `>=`, so among equal improvements the one
/// examined last wins, and zero-gain splits are kept when nothing beats
/// them. Returns `None` for pure ranges and when no feature yields a split
/// leaving at least `min_samples_leaf` rows on each side.
pub fn find_best_split(
    data: &TrainingData<'_>,
    rows: &[i16],
    feature_subset: &[i16],
    min_samples_leaf: usize,
    counts: &mut ClassCounts,
) -> Option<Split> {
    let total = rows.len();
    if total < 2 {
        return None;
    }

    fill_histogram(&mut counts.parent, data.labels, rows);
    let parent_gini = gini(&counts.parent, total);
    if parent_gini == 0.0 {
        return None;
    }

    let mut best: Option<Split> = None;
    let mut best_improvement = -1.0f32;

    for &feature in feature_subset {
        let feature = feature as usize;

        let mut distinct: StackVec<i16, MAX_DISTINCT_VALUES> = StackVec::new();
        for &row in rows {
            let val = data.value(row, feature);
            if !distinct.contains(&val) {
                // Values past the cap are ignored.
                let _ = distinct.push(val);
            }
        }
        if distinct.len() < 2 {
            continue;
        }
        distinct.sort_unstable();

        for &threshold in &distinct[..distinct.len() - 1] {
            counts.left.fill(0);
            counts.right.fill(0);
            let mut left_total = 0usize;
            let mut right_total = 0usize;

            for &row in rows {
                let label = data.label(row) as usize;
                if data.value(row, feature) <= threshold {
                    counts.left[label] += 1;
                    left_total += 1;
                } else {
                    counts.right[label] += 1;
                    right_total += 1;
                }
            }

            if left_total == 0 || right_total == 0 {
                continue;
            }
            if left_total < min_samples_leaf || right_total < min_samples_leaf {
                continue;
            }

            let left_gini = gini(&counts.left, left_total);
            let right_gini = gini(&counts.right, right_total);
            let weighted = (left_total as f32 * left_gini + right_total as f32 * right_gini)
                / total as f32;
            let improvement = parent_gini - weighted;

            if improvement >= best_improvement {
                best_improvement = improvement;
                best = Some(Split {
                    feature,
                    threshold,
                    improvement,
                });
            }
        }
    }

    best
}

/// Reorder `rows` so rows going left precede rows going right.
///
/// Returns the number of left rows, i.e. the split point relative to the
/// start of `rows`; always within `0..=rows.len()`.
pub fn partition(
    data: &TrainingData<'_>,
    rows: &mut [i16],
    feature: usize,
    threshold: i16,
) -> usize {
    let mut left = 0usize;
    let mut right = rows.len();

    while left < right {
        if data.value(rows[left], feature) <= threshold {
            left += 1;
        } else if data.value(rows[right - 1], feature) > threshold {
            right -= 1;
        } else {
            rows.swap(left, right - 1);
            left += 1;
            right -= 1;
        }
    }

    left
}

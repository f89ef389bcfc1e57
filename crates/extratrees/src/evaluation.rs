//! Classification scoring on held-out data

use crate::classifier::ExtraTrees;
use crate::dataset::Dataset;
use crate::errors::{ExtraTreesError, Result};

/// Square confusion matrix, rows indexed by actual class and columns by
/// predicted class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    n_classes: usize,
    cells: Vec<u32>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            cells: vec![0; n_classes * n_classes],
        }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count one prediction.
    ///
    /// An out-of-range class is a `LabelOutOfRange` whose `index` is the
    /// number of predictions recorded so far.
    pub fn record(&mut self, actual: usize, predicted: usize) -> Result<()> {
        for class in [actual, predicted] {
            if class >= self.n_classes {
                return Err(ExtraTreesError::LabelOutOfRange {
                    index: self.total() as usize,
                    label: i16::try_from(class).unwrap_or(i16::MAX),
                    n_classes: self.n_classes,
                });
            }
        }
        self.cells[actual * self.n_classes + predicted] += 1;
        Ok(())
    }

    pub fn get(&self, actual: usize, predicted: usize) -> u32 {
        self.cells[actual * self.n_classes + predicted]
    }

    pub fn total(&self) -> u32 {
        self.cells.iter().sum()
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> u32 {
        (0..self.n_classes).map(|c| self.get(c, c)).sum()
    }

    /// Fraction of correct predictions; 0.0 when nothing was recorded
    pub fn accuracy(&self) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f32 / total as f32,
        }
    }
}

/// Predict every row of `dataset` and tally the outcomes
pub fn evaluate(classifier: &ExtraTrees, dataset: &Dataset) -> Result<ConfusionMatrix> {
    let mut matrix = ConfusionMatrix::new(classifier.n_classes());
    for i in 0..dataset.len() {
        let predicted = classifier.predict(dataset.row(i))?;
        let label = dataset.labels[i];
        if label < 0 {
            return Err(ExtraTreesError::LabelOutOfRange {
                index: i,
                label,
                n_classes: classifier.n_classes(),
            });
        }
        matrix.record(label as usize, predicted)?;
    }
    Ok(matrix)
}

/// Fraction of rows in `dataset` predicted correctly
pub fn accuracy(classifier: &ExtraTrees, dataset: &Dataset) -> Result<f32> {
    Ok(evaluate(classifier, dataset)?.accuracy())
}

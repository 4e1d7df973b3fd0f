// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Streaming one-vs-all ROC evaluation for multi-class classifiers
//!
//! For N classes this produces N ROC curves, one per class, each treating
//! that class as positive and every other class as negative.
//!
//! Thresholds are fixed steps of `1 / threshold_steps` rather than cut points
//! derived from the data. That keeps batched and distributed evaluation
//! simple: the full data set never has to be in memory, and evaluators
//! built with the same step count on different workers can be combined
//! with [`RocMultiClass::merge`].

use super::curve::RocCurve;
use ndarray::{Array2, ArrayView2, ArrayView3, ArrayViewD, Ix2, Ix3};
use rocstream_core::{
    flatten_time_series, ClassCounts, ConfusionAccumulator, Result, RocConfig, RocError,
    ThresholdGrid,
};
use serde::{Deserialize, Serialize};

/// Streaming multi-class ROC evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "EvaluatorState")]
pub struct RocMultiClass {
    grid: ThresholdGrid,
    /// Sized on the first successful `eval`; always built over `grid`
    accumulator: Option<ConfusionAccumulator>,
}

/// Unchecked wire form of [`RocMultiClass`]
#[derive(Deserialize)]
struct EvaluatorState {
    grid: ThresholdGrid,
    accumulator: Option<ConfusionAccumulator>,
}

impl TryFrom<EvaluatorState> for RocMultiClass {
    type Error = RocError;

    fn try_from(state: EvaluatorState) -> Result<Self> {
        if let Some(acc) = &state.accumulator {
            if acc.grid().steps() != state.grid.steps() {
                return Err(RocError::IncompatibleGrid {
                    expected: state.grid.steps(),
                    actual: acc.grid().steps(),
                });
            }
        }
        Ok(Self {
            grid: state.grid,
            accumulator: state.accumulator,
        })
    }
}

/// Per-class entry of a [`RocSummary`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRocSummary {
    pub class_index: usize,
    pub actual_positive: u64,
    pub actual_negative: u64,
    pub auc: f64,
}

/// Serializable snapshot of per-class and average AUC
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocSummary {
    pub threshold_steps: usize,
    pub num_classes: usize,
    pub classes: Vec<ClassRocSummary>,
    pub average_auc: f64,
}

impl RocMultiClass {
    /// Create an evaluator with `threshold_steps + 1` thresholds.
    pub fn new(threshold_steps: usize) -> Result<Self> {
        Ok(Self {
            grid: ThresholdGrid::new(threshold_steps)?,
            accumulator: None,
        })
    }

    pub fn from_config(config: &RocConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.threshold_steps)
    }

    pub fn threshold_steps(&self) -> usize {
        self.grid.steps()
    }

    pub fn grid(&self) -> &ThresholdGrid {
        &self.grid
    }

    /// Number of classes, once the first batch has been evaluated
    pub fn num_classes(&self) -> Option<usize> {
        self.accumulator.as_ref().map(|a| a.num_classes())
    }

    pub fn is_fitted(&self) -> bool {
        self.accumulator.is_some()
    }

    /// Raw accumulated counts, if any batch has been evaluated
    pub fn counts(&self) -> Option<&ConfusionAccumulator> {
        self.accumulator.as_ref()
    }

    /// Evaluate (collect statistics for) one batch.
    ///
    /// `labels` and `predictions` are `[rows, classes]`. Label values of 1.0
    /// mark the actual class; predictions are scores in `[0, 1]`. The first
    /// call fixes the number of classes. A failed call leaves all counts
    /// untouched.
    pub fn eval(&mut self, labels: ArrayView2<f64>, predictions: ArrayView2<f64>) -> Result<()> {
        if labels.dim() != predictions.dim() || labels.ncols() == 0 {
            return Err(RocError::InvalidShape(format!(
                "labels shape = {:?}, predictions shape = {:?}; require rank 2 arrays of equal shape with at least one column",
                labels.shape(),
                predictions.shape()
            )));
        }

        let num_classes = labels.ncols();
        if let Some(acc) = &self.accumulator {
            if acc.num_classes() != num_classes {
                return Err(RocError::InconsistentShape {
                    expected: acc.num_classes(),
                    actual: num_classes,
                });
            }
        }

        let grid = &self.grid;
        let acc = self.accumulator.get_or_insert_with(|| {
            tracing::debug!(
                "Initializing ROC counts: {} classes x {} thresholds",
                num_classes,
                grid.len()
            );
            ConfusionAccumulator::new(grid.clone(), num_classes)
        });

        for class_index in 0..num_classes {
            acc.record_column(
                class_index,
                labels.column(class_index),
                predictions.column(class_index),
            )?;
        }

        tracing::trace!(
            "Evaluated batch of {} rows across {} classes",
            labels.nrows(),
            num_classes
        );
        Ok(())
    }

    /// Evaluate arrays of either rank 2 (`[rows, classes]`) or rank 3
    /// (`[batch, classes, time]`, no mask).
    pub fn eval_dyn(
        &mut self,
        labels: ArrayViewD<f64>,
        predictions: ArrayViewD<f64>,
    ) -> Result<()> {
        match (labels.ndim(), predictions.ndim()) {
            (2, 2) => self.eval(
                labels.into_dimensionality::<Ix2>()?,
                predictions.into_dimensionality::<Ix2>()?,
            ),
            (3, 3) => self.eval_time_series(
                labels.into_dimensionality::<Ix3>()?,
                predictions.into_dimensionality::<Ix3>()?,
            ),
            _ => Err(RocError::InvalidShape(format!(
                "labels shape = {:?}, predictions shape = {:?}; require rank 2 or rank 3 arrays",
                labels.shape(),
                predictions.shape()
            ))),
        }
    }

    /// Evaluate `[batch, classes, time]` series with every step valid.
    pub fn eval_time_series(
        &mut self,
        labels: ArrayView3<f64>,
        predictions: ArrayView3<f64>,
    ) -> Result<()> {
        let (labels, predictions) = flatten_time_series(labels, predictions, None)?;
        self.eval(labels.view(), predictions.view())
    }

    /// Evaluate `[batch, classes, time]` series, skipping steps whose
    /// `[batch, time]` mask value is zero.
    pub fn eval_time_series_masked(
        &mut self,
        labels: ArrayView3<f64>,
        predictions: ArrayView3<f64>,
        mask: ArrayView2<f64>,
    ) -> Result<()> {
        let (labels, predictions) = flatten_time_series(labels, predictions, Some(mask))?;
        self.eval(labels.view(), predictions.view())
    }

    /// Add another evaluator's counts into this one.
    ///
    /// Both must use the same number of threshold steps. An unfitted `other`
    /// is a no-op; an unfitted `self` takes a copy of `other`'s counts.
    pub fn merge(&mut self, other: &RocMultiClass) -> Result<()> {
        if self.grid.steps() != other.grid.steps() {
            return Err(RocError::IncompatibleGrid {
                expected: self.grid.steps(),
                actual: other.grid.steps(),
            });
        }
        let Some(theirs) = &other.accumulator else {
            return Ok(());
        };

        match self.accumulator.as_mut() {
            Some(mine) => mine.merge(theirs)?,
            None => self.accumulator = Some(theirs.clone()),
        }

        tracing::debug!("Merged ROC counts for {} classes", theirs.num_classes());
        Ok(())
    }

    /// ROC curve for one class, one point per threshold in ascending order.
    pub fn build_curve(&self, class_index: usize) -> Result<RocCurve> {
        let counts = self.class_counts(class_index)?;
        Ok(RocCurve::from_counts(class_index, &self.grid, counts))
    }

    /// ROC curve as a `[2, threshold_steps + 1]` array of FPRs (row 0) and
    /// TPRs (row 1)
    pub fn curve_as_array(&self, class_index: usize) -> Result<Array2<f64>> {
        Ok(self.build_curve(class_index)?.as_array())
    }

    /// Calculate the AUC (Area Under Curve) for one class
    pub fn auc(&self, class_index: usize) -> Result<f64> {
        Ok(self.build_curve(class_index)?.auc())
    }

    /// Average one-vs-all AUC over all classes
    pub fn average_auc(&self) -> Result<f64> {
        let aucs = (0..self.fitted()?.num_classes())
            .map(|c| self.auc(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(mean(&aucs))
    }

    pub fn summary(&self) -> Result<RocSummary> {
        let classes = (0..self.fitted()?.num_classes())
            .map(|class_index| {
                let counts = self.class_counts(class_index)?;
                Ok(ClassRocSummary {
                    class_index,
                    actual_positive: counts.actual_positive,
                    actual_negative: counts.actual_negative,
                    auc: RocCurve::from_counts(class_index, &self.grid, counts).auc(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let aucs: Vec<f64> = classes.iter().map(|c| c.auc).collect();
        let average_auc = mean(&aucs);

        Ok(RocSummary {
            threshold_steps: self.grid.steps(),
            num_classes: classes.len(),
            classes,
            average_auc,
        })
    }

    fn fitted(&self) -> Result<&ConfusionAccumulator> {
        self.accumulator.as_ref().ok_or(RocError::NotFitted)
    }

    fn class_counts(&self, class_index: usize) -> Result<&ClassCounts> {
        let counts = self.fitted()?.class(class_index)?;
        if counts.actual_positive == 0 || counts.actual_negative == 0 {
            tracing::warn!(
                "Class {} has {} actual positives and {} actual negatives; ROC rates will be NaN",
                class_index,
                counts.actual_positive,
                counts.actual_negative
            );
        }
        Ok(counts)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

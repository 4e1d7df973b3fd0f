// Copyright 2025 AgentReplay (https://github.com/agentreplay)
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

//! Running confusion counts per (class, threshold)
//!
//! The accumulator only ever stores counts, never raw scores, so memory is
//! bounded by `num_classes * (steps + 1)` regardless of how many rows are seen.
//! All counts are plain sums over a shared grid, which makes two accumulators
//! mergeable by adding them field by field.

use crate::error::{Result, RocError};
use crate::grid::ThresholdGrid;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Label values at or above this are treated as actual positives
pub const POSITIVE_LABEL_CUTOFF: f64 = 0.5;

/// True/false positive counts at a single threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsForThreshold {
    pub true_positive: u64,
    pub false_positive: u64,
}

impl CountsForThreshold {
    pub fn increment_true_positive(&mut self, by: u64) {
        self.true_positive += by;
    }

    pub fn increment_false_positive(&mut self, by: u64) {
        self.false_positive += by;
    }
}

/// One-vs-all counts for a single class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub actual_positive: u64,
    pub actual_negative: u64,
    /// One entry per grid point, in grid order
    pub per_threshold: Vec<CountsForThreshold>,
}

impl ClassCounts {
    fn new(grid_len: usize) -> Self {
        Self {
            actual_positive: 0,
            actual_negative: 0,
            per_threshold: vec![CountsForThreshold::default(); grid_len],
        }
    }

    /// Total label rows observed for this class
    pub fn total(&self) -> u64 {
        self.actual_positive + self.actual_negative
    }

    /// Fold one batch column into the counts.
    ///
    /// `labels` and `predictions` must have the same length.
    fn record(
        &mut self,
        grid: &ThresholdGrid,
        labels: ArrayView1<f64>,
        predictions: ArrayView1<f64>,
    ) {
        // *_ends[k] counts rows that are positive at thresholds [0, k) and
        // negative from k on; a suffix sum turns that into per-threshold counts.
        let mut tp_ends = vec![0u64; grid.len() + 1];
        let mut fp_ends = vec![0u64; grid.len() + 1];

        for (&label, &score) in labels.iter().zip(predictions.iter()) {
            let end = grid.positive_prefix(score);
            if label >= POSITIVE_LABEL_CUTOFF {
                self.actual_positive += 1;
                tp_ends[end] += 1;
            } else {
                self.actual_negative += 1;
                fp_ends[end] += 1;
            }
        }

        let mut tp = 0u64;
        let mut fp = 0u64;
        for j in (0..grid.len()).rev() {
            tp += tp_ends[j + 1];
            fp += fp_ends[j + 1];
            let counts = &mut self.per_threshold[j];
            counts.increment_true_positive(tp);
            counts.increment_false_positive(fp);
        }
    }

    fn add(&mut self, other: &ClassCounts) {
        self.actual_positive += other.actual_positive;
        self.actual_negative += other.actual_negative;
        for (mine, theirs) in self.per_threshold.iter_mut().zip(&other.per_threshold) {
            mine.increment_true_positive(theirs.true_positive);
            mine.increment_false_positive(theirs.false_positive);
        }
    }
}

/// Per-class threshold counts sized for a fixed number of classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AccumulatorState")]
pub struct ConfusionAccumulator {
    grid: ThresholdGrid,
    classes: Vec<ClassCounts>,
}

/// Unchecked wire form of [`ConfusionAccumulator`]
#[derive(Deserialize)]
struct AccumulatorState {
    grid: ThresholdGrid,
    classes: Vec<ClassCounts>,
}

impl TryFrom<AccumulatorState> for ConfusionAccumulator {
    type Error = RocError;

    fn try_from(state: AccumulatorState) -> Result<Self> {
        let grid_len = state.grid.len();
        if let Some((class_index, counts)) = state
            .classes
            .iter()
            .enumerate()
            .find(|(_, c)| c.per_threshold.len() != grid_len)
        {
            return Err(RocError::InvalidShape(format!(
                "class {} has counts for {} thresholds, grid has {}",
                class_index,
                counts.per_threshold.len(),
                grid_len
            )));
        }
        Ok(Self {
            grid: state.grid,
            classes: state.classes,
        })
    }
}

impl ConfusionAccumulator {
    /// Zeroed counts for `num_classes` classes over `grid`
    pub fn new(grid: ThresholdGrid, num_classes: usize) -> Self {
        let classes = (0..num_classes).map(|_| ClassCounts::new(grid.len())).collect();
        Self { grid, classes }
    }

    pub fn grid(&self) -> &ThresholdGrid {
        &self.grid
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn class(&self, class_index: usize) -> Result<&ClassCounts> {
        self.classes
            .get(class_index)
            .ok_or(RocError::InvalidClassIndex {
                index: class_index,
                num_classes: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[ClassCounts] {
        &self.classes
    }

    /// Fold one class column of a batch into the counts.
    pub fn record_column(
        &mut self,
        class_index: usize,
        labels: ArrayView1<f64>,
        predictions: ArrayView1<f64>,
    ) -> Result<()> {
        if labels.len() != predictions.len() {
            return Err(RocError::InvalidShape(format!(
                "label column has {} rows, prediction column has {}",
                labels.len(),
                predictions.len()
            )));
        }
        let num_classes = self.classes.len();
        let counts = self
            .classes
            .get_mut(class_index)
            .ok_or(RocError::InvalidClassIndex {
                index: class_index,
                num_classes,
            })?;
        counts.record(&self.grid, labels, predictions);
        Ok(())
    }

    /// Add every count of `other` into `self`.
    ///
    /// Fails without mutating when the grids or class counts differ.
    pub fn merge(&mut self, other: &ConfusionAccumulator) -> Result<()> {
        if self.grid.steps() != other.grid.steps() {
            return Err(RocError::IncompatibleGrid {
                expected: self.grid.steps(),
                actual: other.grid.steps(),
            });
        }
        if self.classes.len() != other.classes.len() {
            return Err(RocError::InconsistentShape {
                expected: self.classes.len(),
                actual: other.classes.len(),
            });
        }
        if other
            .classes
            .iter()
            .any(|c| c.per_threshold.len() != self.grid.len())
        {
            return Err(RocError::InvalidShape(
                "merged counts do not cover every grid point".to_string(),
            ));
        }

        for (mine, theirs) in self.classes.iter_mut().zip(&other.classes) {
            mine.add(theirs);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array1};
    use proptest::prelude::*;

    fn accumulator(steps: usize, num_classes: usize) -> ConfusionAccumulator {
        ConfusionAccumulator::new(ThresholdGrid::new(steps).unwrap(), num_classes)
    }

    #[test]
    fn test_deserialize_checks_threshold_coverage() {
        let mut acc = accumulator(4, 2);
        let labels = arr1(&[1.0, 0.0]);
        let predictions = arr1(&[0.8, 0.3]);
        acc.record_column(1, labels.view(), predictions.view()).unwrap();

        let json = serde_json::to_string(&acc).unwrap();
        let back: ConfusionAccumulator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, acc);

        let short = r#"{"grid":4,"classes":[{"actual_positive":1,"actual_negative":0,"per_threshold":[]}]}"#;
        let err = serde_json::from_str::<ConfusionAccumulator>(short).unwrap_err();
        assert!(err.to_string().contains("class 0 has counts for 0 thresholds, grid has 5"));
    }

    #[test]
    fn test_record_separable_column() {
        let mut acc = accumulator(10, 1);
        let labels = arr1(&[1.0, 1.0, 0.0, 0.0]);
        let predictions = arr1(&[0.9, 0.6, 0.4, 0.1]);
        acc.record_column(0, labels.view(), predictions.view()).unwrap();

        let counts = acc.class(0).unwrap();
        assert_eq!(counts.actual_positive, 2);
        assert_eq!(counts.actual_negative, 2);

        // t = 0.0: everything is positive
        assert_eq!(counts.per_threshold[0].true_positive, 2);
        assert_eq!(counts.per_threshold[0].false_positive, 2);
        // t = 0.4: 0.4 itself is still positive
        assert_eq!(counts.per_threshold[4].true_positive, 2);
        assert_eq!(counts.per_threshold[4].false_positive, 1);
        // t = 0.5
        assert_eq!(counts.per_threshold[5].true_positive, 2);
        assert_eq!(counts.per_threshold[5].false_positive, 0);
        // t = 0.7
        assert_eq!(counts.per_threshold[7].true_positive, 1);
        // t = 1.0
        assert_eq!(counts.per_threshold[10].true_positive, 0);
    }

    #[test]
    fn test_score_of_one_counts_at_top_threshold() {
        let mut acc = accumulator(4, 1);
        let labels = arr1(&[1.0, 0.0]);
        let predictions = arr1(&[1.0, 1.0]);
        acc.record_column(0, labels.view(), predictions.view()).unwrap();

        let top = acc.class(0).unwrap().per_threshold[4];
        assert_eq!(top.true_positive, 1);
        assert_eq!(top.false_positive, 1);
    }

    #[test]
    fn test_nan_score_is_never_positive() {
        let mut acc = accumulator(4, 1);
        let labels = arr1(&[1.0]);
        let predictions = arr1(&[f64::NAN]);
        acc.record_column(0, labels.view(), predictions.view()).unwrap();

        let counts = acc.class(0).unwrap();
        assert_eq!(counts.actual_positive, 1);
        assert!(counts.per_threshold.iter().all(|c| c.true_positive == 0));
    }

    #[test]
    fn test_record_column_rejects_bad_input() {
        let mut acc = accumulator(4, 1);
        let labels = arr1(&[1.0, 0.0]);
        let predictions = arr1(&[0.5]);
        assert!(matches!(
            acc.record_column(0, labels.view(), predictions.view()),
            Err(RocError::InvalidShape(_))
        ));
        assert!(matches!(
            acc.record_column(1, labels.view(), labels.view()),
            Err(RocError::InvalidClassIndex { index: 1, .. })
        ));
        assert_eq!(acc.class(0).unwrap().total(), 0);
    }

    #[test]
    fn test_merge_rejects_mismatches() {
        let mut acc = accumulator(10, 2);
        assert!(matches!(
            acc.merge(&accumulator(5, 2)),
            Err(RocError::IncompatibleGrid {
                expected: 10,
                actual: 5
            })
        ));
        assert!(matches!(
            acc.merge(&accumulator(10, 3)),
            Err(RocError::InconsistentShape {
                expected: 2,
                actual: 3
            })
        ));
    }

    fn column(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (0..max_len).prop_flat_map(|len| {
            (
                proptest::collection::vec(prop_oneof![Just(0.0), Just(1.0)], len),
                proptest::collection::vec(0.0f64..=1.0, len),
            )
        })
    }

    proptest! {
        #[test]
        fn counts_bounded_and_monotone(
            batches in proptest::collection::vec(column(40), 1..4),
            steps in 1usize..25,
        ) {
            let mut acc = accumulator(steps, 1);
            let mut rows = 0u64;
            for (labels, predictions) in &batches {
                let labels = Array1::from_vec(labels.clone());
                let predictions = Array1::from_vec(predictions.clone());
                acc.record_column(0, labels.view(), predictions.view()).unwrap();
                rows += labels.len() as u64;
            }

            let counts = acc.class(0).unwrap();
            prop_assert_eq!(counts.total(), rows);
            for c in &counts.per_threshold {
                prop_assert!(c.true_positive <= counts.actual_positive);
                prop_assert!(c.false_positive <= counts.actual_negative);
            }
            for w in counts.per_threshold.windows(2) {
                prop_assert!(w[1].true_positive <= w[0].true_positive);
                prop_assert!(w[1].false_positive <= w[0].false_positive);
            }
        }

        #[test]
        fn merge_equals_sequential(
            (l1, p1) in column(30),
            (l2, p2) in column(30),
        ) {
            let (l1, p1) = (Array1::from_vec(l1), Array1::from_vec(p1));
            let (l2, p2) = (Array1::from_vec(l2), Array1::from_vec(p2));

            let mut sequential = accumulator(10, 1);
            sequential.record_column(0, l1.view(), p1.view()).unwrap();
            sequential.record_column(0, l2.view(), p2.view()).unwrap();

            let mut left = accumulator(10, 1);
            left.record_column(0, l1.view(), p1.view()).unwrap();
            let mut right = accumulator(10, 1);
            right.record_column(0, l2.view(), p2.view()).unwrap();
            left.merge(&right).unwrap();

            prop_assert_eq!(left, sequential);
        }
    }
}

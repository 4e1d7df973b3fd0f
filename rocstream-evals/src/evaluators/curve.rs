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

//! ROC Curves over a Fixed Threshold Grid
//!
//! A curve is read off the accumulated counts of one class: one point per
//! grid threshold, in ascending threshold order. Rates are plain ratios of
//! counts, so a class that was never seen as positive (or never as negative)
//! produces NaN rates rather than an error.
//!
//! ## AUC
//!
//! AUC is the trapezoidal integral of TPR over FPR, walking the points in
//! threshold order. FPR normally falls as the threshold rises, but each step
//! uses `|ΔFPR|` so the area stays well defined without assuming monotonicity.

use ndarray::Array2;
use rocstream_core::{ClassCounts, ThresholdGrid};
use serde::{Deserialize, Serialize};

/// Single point on ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    pub tpr: f64, // True Positive Rate (sensitivity/recall)
    pub fpr: f64, // False Positive Rate (1 - specificity)
}

/// One-vs-all ROC curve for a single class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub class_index: usize,
    /// Points in ascending threshold order
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    /// Derive the curve from a class's accumulated counts
    pub fn from_counts(class_index: usize, grid: &ThresholdGrid, counts: &ClassCounts) -> Self {
        let positives = counts.actual_positive as f64;
        let negatives = counts.actual_negative as f64;

        let points = grid
            .iter()
            .zip(&counts.per_threshold)
            .map(|(threshold, c)| RocPoint {
                threshold,
                tpr: c.true_positive as f64 / positives,
                fpr: c.false_positive as f64 / negatives,
            })
            .collect();

        Self {
            class_index,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RocPoint> {
        self.points.iter()
    }

    /// Area under this curve
    pub fn auc(&self) -> f64 {
        trapezoid_auc(&self.points)
    }

    /// Curve as a `[2, n]` array: row 0 holds FPRs, row 1 holds TPRs
    pub fn as_array(&self) -> Array2<f64> {
        let n = self.points.len();
        Array2::from_shape_fn((2, n), |(row, i)| {
            let point = &self.points[i];
            if row == 0 {
                point.fpr
            } else {
                point.tpr
            }
        })
    }
}

impl<'a> IntoIterator for &'a RocCurve {
    type Item = &'a RocPoint;
    type IntoIter = std::slice::Iter<'a, RocPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Trapezoidal area under consecutive ROC points.
///
/// Points are taken in the order given (ascending threshold). NaN rates
/// propagate into the result.
pub fn trapezoid_auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let (left, right) = (&w[0], &w[1]);
            let dx = (right.fpr - left.fpr).abs();
            let avg_y = (left.tpr + right.tpr) / 2.0;
            dx * avg_y
        })
        .sum()
}

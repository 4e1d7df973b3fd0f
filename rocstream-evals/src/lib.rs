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

//! # Rocstream Evaluation
//!
//! Streaming one-vs-all ROC curves and AUC for multi-class classifiers.
//!
//! ## Features
//!
//! - **Fixed threshold grid**: Counts from any number of batches add up
//! - **Lazy sizing**: The class count is taken from the first batch
//! - **Time series**: `[batch, class, time]` inputs with an optional mask
//! - **Mergeable**: Per-worker evaluators combine by summing their counts
//!
//! ## Example
//!
//! ```rust
//! use ndarray::arr2;
//! use rocstream_evals::RocMultiClass;
//!
//! let mut roc = RocMultiClass::new(10).unwrap();
//!
//! let labels = arr2(&[[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]]);
//! let predictions = arr2(&[[0.9, 0.1], [0.6, 0.4], [0.4, 0.6], [0.1, 0.9]]);
//! roc.eval(labels.view(), predictions.view()).unwrap();
//!
//! let curve = roc.build_curve(0).unwrap();
//! assert_eq!(curve.len(), 11);
//! assert!((roc.average_auc().unwrap() - 1.0).abs() < 1e-9);
//! ```

pub mod evaluators;

pub use evaluators::{
    trapezoid_auc, ClassRocSummary, RocCurve, RocMultiClass, RocPoint, RocSummary,
};
pub use rocstream_core::{
    flatten_time_series, ClassCounts, ConfusionAccumulator, CountsForThreshold, Result,
    RocConfig, RocError, ThresholdGrid,
};

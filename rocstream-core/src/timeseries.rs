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

//! Flattening of `[batch, class, time]` series into 2-D `[rows, class]` batches

use crate::error::{Result, RocError};
use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

/// Flatten time-series labels and predictions into 2-D batches.
///
/// Inputs are shaped `[batch, classes, time]`. Each (example, time step) pair
/// becomes one output row, ordered by example then time step. When a
/// `[batch, time]` mask is given, steps whose mask value is zero are dropped.
pub fn flatten_time_series(
    labels: ArrayView3<f64>,
    predictions: ArrayView3<f64>,
    mask: Option<ArrayView2<f64>>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    if labels.shape() != predictions.shape() {
        return Err(RocError::InvalidShape(format!(
            "labels shape = {:?}, predictions shape = {:?}; time series inputs must match",
            labels.shape(),
            predictions.shape()
        )));
    }

    let (batch, classes, time) = labels.dim();
    if let Some(mask) = &mask {
        if mask.dim() != (batch, time) {
            return Err(RocError::InvalidShape(format!(
                "mask shape = {:?}; expected [{}, {}]",
                mask.shape(),
                batch,
                time
            )));
        }
    }

    let is_valid = |example: usize, step: usize| match &mask {
        Some(mask) => mask[[example, step]] != 0.0,
        None => true,
    };

    let mut label_rows = Vec::with_capacity(batch * time * classes);
    let mut prediction_rows = Vec::with_capacity(batch * time * classes);
    let mut rows = 0;

    for example in 0..batch {
        let example_labels = labels.index_axis(Axis(0), example);
        let example_predictions = predictions.index_axis(Axis(0), example);
        for step in 0..time {
            if !is_valid(example, step) {
                continue;
            }
            label_rows.extend(example_labels.index_axis(Axis(1), step).iter().copied());
            prediction_rows.extend(example_predictions.index_axis(Axis(1), step).iter().copied());
            rows += 1;
        }
    }

    tracing::trace!(
        "Flattened {} examples x {} steps into {} rows",
        batch,
        time,
        rows
    );

    Ok((
        Array2::from_shape_vec((rows, classes), label_rows)?,
        Array2::from_shape_vec((rows, classes), prediction_rows)?,
    ))
}

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

//! Error types shared by the accumulator and the evaluator.
//!
//! Usage errors are returned as [`RocError`]. Degenerate statistics (a class
//! that was never observed as positive or never as negative) are not errors:
//! the affected rates come back as NaN.

use thiserror::Error;

/// Errors raised by ROC accumulation and read-side queries
#[derive(Debug, Error)]
pub enum RocError {
    #[error("Invalid input shape: {0}")]
    InvalidShape(String),

    #[error(
        "Number of label classes does not match previous call: got {actual}, expected {expected}"
    )]
    InconsistentShape { expected: usize, actual: usize },

    #[error("Cannot get results: no data has been collected")]
    NotFitted,

    #[error("Invalid class index {index}: must be in range 0 to {num_classes}")]
    InvalidClassIndex { index: usize, num_classes: usize },

    #[error("Threshold grids differ: expected {expected} steps, got {actual}")]
    IncompatibleGrid { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("Array error: {0}")]
    Array(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, RocError>;

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

//! Rocstream Core
//!
//! Fixed threshold grids, mergeable confusion counts and time-series
//! flattening used by the streaming ROC evaluator.

pub mod config;
pub mod counts;
pub mod error;
pub mod grid;
pub mod timeseries;

pub use config::{RocConfig, DEFAULT_THRESHOLD_STEPS};
pub use counts::{ClassCounts, ConfusionAccumulator, CountsForThreshold, POSITIVE_LABEL_CUTOFF};
pub use error::{Result, RocError};
pub use grid::ThresholdGrid;
pub use timeseries::flatten_time_series;

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

//! Fixed decision threshold grid
//!
//! Thresholds are `j / steps` for `j` in `0..=steps`. The grid is chosen at
//! configuration time and never depends on the data, so counts gathered on
//! disjoint batches (or on different workers) line up point for point.

use crate::error::{Result, RocError};
use serde::{Deserialize, Serialize};

/// Ascending, evenly spaced thresholds covering `[0.0, 1.0]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ThresholdGrid {
    steps: usize,
    thresholds: Vec<f64>,
}

impl ThresholdGrid {
    /// Build a grid of `steps + 1` thresholds. `steps` must be at least 1.
    pub fn new(steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(RocError::InvalidConfig(
                "threshold_steps must be at least 1".to_string(),
            ));
        }

        // Divide rather than accumulate a step so 3/10 is exactly 0.3
        let thresholds = (0..=steps)
            .map(|j| j as f64 / steps as f64)
            .collect();

        Ok(Self { steps, thresholds })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of grid points (`steps + 1`)
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.thresholds.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.thresholds.iter().copied()
    }

    /// Number of leading grid points a score clears (`score >= t`).
    ///
    /// The grid is ascending, so a score is positive exactly at the first
    /// `positive_prefix(score)` thresholds. NaN clears none.
    pub fn positive_prefix(&self, score: f64) -> usize {
        self.thresholds.partition_point(|&t| score >= t)
    }
}

impl TryFrom<usize> for ThresholdGrid {
    type Error = RocError;

    fn try_from(steps: usize) -> Result<Self> {
        Self::new(steps)
    }
}

impl From<ThresholdGrid> for usize {
    fn from(grid: ThresholdGrid) -> Self {
        grid.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_endpoints() {
        let grid = ThresholdGrid::new(10).unwrap();
        assert_eq!(grid.len(), 11);
        assert_eq!(grid.get(0), Some(0.0));
        assert_eq!(grid.get(10), Some(1.0));
        assert_eq!(grid.get(11), None);
    }

    #[test]
    fn test_grid_matches_decimal_literals() {
        let grid = ThresholdGrid::new(10).unwrap();
        assert_eq!(grid.get(3), Some(0.3));
        assert_eq!(grid.get(7), Some(0.7));
    }

    #[test]
    fn test_grid_ascending() {
        let grid = ThresholdGrid::new(37).unwrap();
        assert!(grid.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert!(matches!(
            ThresholdGrid::new(0),
            Err(RocError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_positive_prefix() {
        let grid = ThresholdGrid::new(10).unwrap();
        assert_eq!(grid.positive_prefix(0.0), 1);
        assert_eq!(grid.positive_prefix(0.45), 5);
        assert_eq!(grid.positive_prefix(0.5), 6);
        assert_eq!(grid.positive_prefix(1.0), 11);
        assert_eq!(grid.positive_prefix(-0.1), 0);
        assert_eq!(grid.positive_prefix(f64::NAN), 0);
    }

    #[test]
    fn test_grid_serializes_as_steps() {
        let grid = ThresholdGrid::new(4).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "4");

        let back: ThresholdGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<ThresholdGrid>("0").is_err());
    }
}

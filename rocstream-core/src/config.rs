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

//! Configuration for ROC evaluation
//!
//! The only knob is the number of threshold steps. It fixes the grid for the
//! lifetime of an evaluator, and evaluators can only be merged when they
//! were built from the same value.

use crate::error::{Result, RocError};
use crate::grid::ThresholdGrid;
use serde::{Deserialize, Serialize};

/// Default number of threshold steps (grid of 101 points)
pub const DEFAULT_THRESHOLD_STEPS: usize = 100;

/// Configuration for ROC evaluation
///
/// # Example TOML Configuration
///
/// ```toml
/// threshold_steps = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocConfig {
    /// Number of threshold steps; the grid has `threshold_steps + 1` points.
    #[serde(default = "default_threshold_steps")]
    pub threshold_steps: usize,
}

fn default_threshold_steps() -> usize {
    DEFAULT_THRESHOLD_STEPS
}

impl Default for RocConfig {
    fn default() -> Self {
        Self {
            threshold_steps: default_threshold_steps(),
        }
    }
}

impl RocConfig {
    pub fn with_threshold_steps(mut self, steps: usize) -> Self {
        self.threshold_steps = steps;
        self
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| RocError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RocError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold_steps == 0 {
            return Err(RocError::InvalidConfig(
                "threshold_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the threshold grid this configuration describes.
    pub fn grid(&self) -> Result<ThresholdGrid> {
        ThresholdGrid::new(self.threshold_steps)
    }
}

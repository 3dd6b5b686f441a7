//! Configuration for boundary resolution.
//!
//! This module provides the configuration structures for the splitter, the
//! merger, and the boundary detectors, together with validation. All knobs
//! are externally supplied; the defaults reproduce the values observed to
//! work well on printed text at roughly 300 dpi.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is outside its permitted range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the invalid value.
        message: String,
    },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Configuration for split candidate detection and the recursive splitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// The minimum ratio between a shape's width and its x-height for the
    /// shape to be considered for splitting at all.
    /// Default: 1.1
    pub min_width_ratio: f64,

    /// The minimum ratio between a shape's height and its x-height for the
    /// shape to be considered for splitting. Applied by the detectors
    /// before invoking the splitter.
    /// Default: 1.0
    pub min_height_ratio: f64,

    /// Maximum number of split sequences retained per shape, applied at
    /// every level of the recursion as well as by the beam detector.
    /// Default: 5
    pub beam_width: usize,

    /// Maximum recursion depth when searching for splits in a single
    /// shape. The maximum number of sub-shapes is `2^max_depth`, so this
    /// must stay small; worst-case branching before beam pruning is
    /// `O(candidates^max_depth)`.
    /// Default: 2
    pub max_depth: usize,

    /// Minimum horizontal distance, in pixels, between two retained split
    /// candidates. Candidates closer than this to a stronger candidate are
    /// suppressed.
    /// Default: 5
    pub min_distance_between_splits: i32,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            min_width_ratio: 1.1,
            min_height_ratio: 1.0,
            beam_width: 5,
            max_depth: 2,
            min_distance_between_splits: 5,
        }
    }
}

impl SplitterConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beam_width == 0 {
            return Err(ConfigError::invalid("beam_width must be at least 1"));
        }
        if self.min_width_ratio < 0.0 || self.min_height_ratio < 0.0 {
            return Err(ConfigError::invalid(
                "split width/height ratios must be non-negative",
            ));
        }
        if self.min_distance_between_splits < 0 {
            return Err(ConfigError::invalid(
                "min_distance_between_splits must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Configuration for merge candidate gating.
///
/// The gates are applied by the callers of the merger, never by the merger
/// itself: pairs that are visually implausible as a single letter are
/// rejected before the scoring oracle is ever consulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerConfig {
    /// Maximum ratio between the merged pair's width and its x-height for
    /// the pair to be considered for merging.
    /// Default: 1.2
    pub max_width_ratio: f64,

    /// Maximum ratio between the horizontal gap separating the two shapes
    /// and their x-height for the pair to be considered for merging.
    /// Default: 0.15
    pub max_distance_ratio: f64,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            max_width_ratio: 1.2,
            max_distance_ratio: 0.15,
        }
    }
}

impl MergerConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width_ratio < 0.0 {
            return Err(ConfigError::invalid("max_width_ratio must be non-negative"));
        }
        Ok(())
    }
}

/// Top-level configuration for boundary detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundariesConfig {
    /// Splitter configuration.
    pub splitter: SplitterConfig,

    /// Merger gating configuration.
    pub merger: MergerConfig,

    /// Minimum probability for the deterministic detector to act on a
    /// split or merge decision; below this threshold the shape is kept
    /// unchanged.
    /// Default: 0.5
    #[serde(default = "default_min_prob_for_decision")]
    pub min_prob_for_decision: f64,
}

fn default_min_prob_for_decision() -> f64 {
    0.5
}

impl Default for BoundariesConfig {
    fn default() -> Self {
        Self {
            splitter: SplitterConfig::default(),
            merger: MergerConfig::default(),
            min_prob_for_decision: default_min_prob_for_decision(),
        }
    }
}

impl BoundariesConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.splitter.validate()?;
        self.merger.validate()?;
        if !(0.0..=1.0).contains(&self.min_prob_for_decision) {
            return Err(ConfigError::invalid(
                "min_prob_for_decision must lie in [0, 1]",
            ));
        }
        Ok(())
    }
}

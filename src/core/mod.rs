//! Core functionality for boundary resolution.
//!
//! This module contains the error types, configuration structures, and the
//! trait seams shared by every boundary-resolution component: the scoring
//! oracle, the split candidate source, and the detection protocol.

pub mod config;
pub mod errors;
pub mod traits;

pub use config::{BoundariesConfig, ConfigError, MergerConfig, SplitterConfig};
pub use errors::{BoundaryError, BoundaryResult};
pub use traits::{BoundaryDetector, MergeScorer, ShapeSplitter, SplitCandidateSource, SplitScorer};

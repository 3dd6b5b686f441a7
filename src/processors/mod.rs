//! Boundary-search algorithms.
//!
//! This module contains the processing stages that turn a group of raw
//! segmented shapes into letter-sized pieces:
//!
//! * [`split_candidates`] - Finds candidate cut positions from a shape's
//!   vertical contour
//! * [`splitter`] - The depth-bounded recursive splitter producing ranked
//!   sub-sequences for a single shape
//! * [`merger`] - Pairwise merge scoring and the rectangle-union merge
//! * [`detector`] - The deterministic and beam-search boundary detectors
//!   composing splits and merges across a whole group
//! * [`training`] - Ground-truth splitter and merge check reading
//!   annotation markers instead of a model, used at training time

pub mod detector;
pub mod merger;
pub mod split_candidates;
pub mod splitter;
pub mod training;

pub use detector::{
    find_boundaries_parallel, DeterministicBoundaryDetector, LetterByLetterBoundaryDetector,
};
pub use merger::ShapeMerger;
pub use split_candidates::{SplitCandidate, SplitCandidateFinder};
pub use splitter::RecursiveShapeSplitter;
pub use training::{annotated_merge, TrainingShapeSplitter};

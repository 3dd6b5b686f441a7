//! Trait seams for boundary resolution.
//!
//! The boundary-search engine never instantiates a classification model
//! itself. Split and merge probabilities come from injected scoring oracles
//! ([`SplitScorer`] and [`MergeScorer`]), which are pure functions of the
//! candidate's geometry. Candidate generation sits behind
//! [`SplitCandidateSource`] so the recursive splitter can be exercised with
//! scripted candidates in tests, and the two detection policies share the
//! [`BoundaryDetector`] protocol.

use crate::core::errors::BoundaryResult;
use crate::domain::{Group, Shape, ShapePair, ShapeSequence, Split};
use crate::processors::split_candidates::SplitCandidate;

/// Scores a candidate cut point.
///
/// Implementations return the probability, in `[0, 1]`, that the shape
/// should be split at the candidate position. A trained classifier is the
/// usual implementation; the engine treats it as opaque.
pub trait SplitScorer: Send + Sync {
    /// Returns the probability that the split should occur.
    fn score_split(&self, split: &Split) -> f64;
}

/// Scores a candidate merge of two adjacent shapes.
///
/// Implementations return the probability, in `[0, 1]`, that the pair is
/// two fragments of one letter and should be fused.
pub trait MergeScorer: Send + Sync {
    /// Returns the probability that the pair should be merged.
    fn score_merge(&self, pair: &ShapePair) -> f64;
}

/// Produces the ordered list of candidate cut positions for a shape.
pub trait SplitCandidateSource: Send + Sync {
    /// Finds candidate cut positions in the shape, best first.
    fn find_split_candidates(&self, shape: &Shape) -> Vec<SplitCandidate>;
}

/// Splits a single shape into ranked alternatives.
///
/// Each returned sequence partitions the input shape into `1..N` sub-shapes
/// in script order; the union of the sub-shape rectangles always equals the
/// input rectangle exactly. At least one returned sequence is the no-split
/// singleton.
pub trait ShapeSplitter: Send + Sync {
    /// Returns ranked shape sequences for the shape, best first.
    fn split(&self, shape: &Shape) -> BoundaryResult<Vec<ShapeSequence>>;
}

/// Finds the letter boundaries of a whole group of shapes.
///
/// Detection never crosses group boundaries; each group is an independent
/// unit of work.
pub trait BoundaryDetector: Send + Sync {
    /// Returns the surviving boundary guesses for the group, best first.
    fn find_boundaries(&self, group: &Group) -> BoundaryResult<Vec<ShapeSequence>>;
}

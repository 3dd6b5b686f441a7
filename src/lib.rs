//! # glyph-bounds
//!
//! An OCR post-segmentation boundary resolver. Given a word-group of
//! connected-component glyph candidates ("shapes") produced by an upstream
//! pixel segmenter, this crate decides the true letter boundaries: shapes
//! covering two or more fused letters are split, and adjacent shapes holding
//! fragments of a single letter are merged.
//!
//! Decisions are driven by injected binary classifiers scoring candidate cut
//! points and candidate merges, combined through a recursive/beam search
//! that behaves consistently whether zero, one, or many transformations
//! apply to a shape.
//!
//! ## Components
//!
//! * [`core`] - Error types, configuration, and the trait seams for the
//!   scoring oracle and the detection protocol
//! * [`domain`] - Data model: pages, shapes, groups, shape pairs, and the
//!   scored shape sequences every component produces
//! * [`processors`] - The boundary-search algorithms: split candidate
//!   detection, the recursive shape splitter, the shape merger, the two
//!   boundary detectors, and the training-corpus variants
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyph_bounds::prelude::*;
//! use std::sync::Arc;
//!
//! # struct MyScorer;
//! # impl SplitScorer for MyScorer {
//! #     fn score_split(&self, _split: &Split) -> f64 { 0.0 }
//! # }
//! # fn load_page() -> Arc<PageImage> { unimplemented!() }
//! # fn load_group(_page: &Arc<PageImage>) -> Group { unimplemented!() }
//! let config = BoundariesConfig::default();
//! let page = load_page();
//! let group = load_group(&page);
//!
//! let finder = SplitCandidateFinder::new(&config.splitter);
//! let splitter = RecursiveShapeSplitter::new(
//!     Arc::new(finder),
//!     Arc::new(MyScorer),
//!     &config.splitter,
//! );
//!
//! let detector = DeterministicBoundaryDetector::new(
//!     Some(Arc::new(splitter)),
//!     None,
//!     &config,
//! );
//! let sequences = detector.find_boundaries(&group)?;
//! # Ok::<(), glyph_bounds::core::errors::BoundaryError>(())
//! ```

pub mod core;
pub mod domain;
pub mod processors;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::config::{BoundariesConfig, MergerConfig, SplitterConfig};
    pub use crate::core::errors::{BoundaryError, BoundaryResult};
    pub use crate::core::traits::{
        BoundaryDetector, MergeScorer, ShapeSplitter, SplitCandidateSource, SplitScorer,
    };
    pub use crate::domain::{
        Decision, DecisionOutcome, Group, LinguisticsProfile, PageImage, Rect, Shape,
        ShapeInSequence, ShapePair, ShapeSequence, Split,
    };
    pub use crate::processors::detector::{
        find_boundaries_parallel, DeterministicBoundaryDetector, LetterByLetterBoundaryDetector,
    };
    pub use crate::processors::merger::ShapeMerger;
    pub use crate::processors::split_candidates::{SplitCandidate, SplitCandidateFinder};
    pub use crate::processors::splitter::RecursiveShapeSplitter;
    pub use crate::processors::training::{annotated_merge, TrainingShapeSplitter};
}

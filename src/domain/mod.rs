//! Domain types for boundary resolution.
//!
//! This module holds the data model shared by every component: the page
//! pixel source, rectangles and shapes, groups of shapes, consecutive shape
//! pairs, the scored shape sequences produced by the search, and the
//! linguistics profile consumed by the training-corpus splitter.
//!
//! Shapes are value types: splitting and merging never edit a shape in
//! place, they construct new shapes from the subdivision or union of
//! rectangles. This makes the partition invariant (the sub-shapes of a
//! split reconstruct the input shape exactly) trivially checkable.

pub mod group;
pub mod linguistics;
pub mod page;
pub mod pair;
pub mod sequence;
pub mod shape;
pub mod split;

pub use group::Group;
pub use linguistics::LinguisticsProfile;
pub use page::PageImage;
pub use pair::ShapePair;
pub use sequence::{Decision, DecisionOutcome, ShapeInSequence, ShapeSequence};
pub use shape::{Rect, Shape};
pub use split::Split;

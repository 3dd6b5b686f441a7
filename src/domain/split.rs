//! Candidate and annotated cut points.

use std::fmt;

use crate::domain::shape::Shape;

/// A split point separating a shape into two sub-shapes.
///
/// Defined by the parent shape and an x-offset relative to the shape's left
/// edge: cutting at `position` produces the columns `0..=position` and
/// `position + 1..` of the parent. A negative position is the sentinel
/// "no split" candidate.
#[derive(Debug, Clone)]
pub struct Split {
    shape: Shape,
    position: i32,
}

impl Split {
    /// Creates a split of the shape at the given x-offset.
    pub fn new(shape: Shape, position: i32) -> Self {
        Self { shape, position }
    }

    /// Creates the sentinel "no split" candidate for the shape.
    pub fn no_split(shape: Shape) -> Self {
        Self {
            shape,
            position: -1,
        }
    }

    /// The shape being split.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// X-offset of the cut, relative to the shape's left edge.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Whether this is the sentinel "no split" candidate.
    pub fn is_no_split(&self) -> bool {
        self.position < 0
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split [shape={}, position={}]", self.shape, self.position)
    }
}

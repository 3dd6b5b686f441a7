//! Groups of shapes.

use crate::domain::shape::Shape;

/// A word: the ordered sequence of shapes segmented from one row.
///
/// Shapes are stored in reading order (left-to-right or right-to-left,
/// matching the page's script direction). A group is the unit of work for
/// boundary detection, which never crosses group boundaries.
#[derive(Debug, Clone, Default)]
pub struct Group {
    shapes: Vec<Shape>,
}

impl Group {
    /// Creates a group from shapes in reading order.
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// The shapes of this group, in reading order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The shape at the given reading-order index.
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Number of shapes in the group.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the group holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

//! Pairs of consecutive shapes.

use std::fmt;

use crate::domain::shape::{Rect, Shape};

/// A transient view over two consecutive shapes considered for merging.
///
/// Provides the union rectangle, the larger of the two x-heights (floored
/// at 1 so it can safely be used as a ratio denominator), and the inner
/// distance between the facing edges.
#[derive(Debug, Clone)]
pub struct ShapePair {
    first: Shape,
    second: Shape,
}

impl ShapePair {
    /// Creates a pair from two consecutive shapes.
    pub fn new(first: Shape, second: Shape) -> Self {
        Self { first, second }
    }

    /// The first shape in reading order.
    pub fn first(&self) -> &Shape {
        &self.first
    }

    /// The second shape in reading order.
    pub fn second(&self) -> &Shape {
        &self.second
    }

    /// The union rectangle of the two shapes.
    pub fn rect(&self) -> Rect {
        self.first.rect().union(&self.second.rect())
    }

    /// Left-most column of the union.
    pub fn left(&self) -> i32 {
        self.rect().left
    }

    /// Top-most row of the union.
    pub fn top(&self) -> i32 {
        self.rect().top
    }

    /// Right-most column of the union.
    pub fn right(&self) -> i32 {
        self.rect().right
    }

    /// Bottom-most row of the union.
    pub fn bottom(&self) -> i32 {
        self.rect().bottom
    }

    /// Width of the union rectangle.
    pub fn width(&self) -> i32 {
        self.rect().width()
    }

    /// Height of the union rectangle.
    pub fn height(&self) -> i32 {
        self.rect().height()
    }

    /// The larger of the two shapes' x-heights, floored at 1.
    pub fn x_height(&self) -> i32 {
        self.first.x_height().max(self.second.x_height()).max(1)
    }

    /// The horizontal gap between the two shapes' facing edges.
    ///
    /// Negative when the shapes overlap horizontally. Callers that do not
    /// know the reading order must use the absolute value.
    pub fn inner_distance(&self) -> i32 {
        if self.first.left() < self.second.left() {
            self.second.left() - self.first.right() - 1
        } else {
            self.first.left() - self.second.right() - 1
        }
    }
}

impl fmt::Display for ShapePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapePair [{}, {}]", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::PageImage;
    use image::{GrayImage, Luma};
    use std::sync::Arc;

    fn blank_page() -> Arc<PageImage> {
        let image = GrayImage::from_pixel(64, 32, Luma([255u8]));
        Arc::new(PageImage::new(image, 127, true))
    }

    #[test]
    fn union_and_inner_distance() {
        let page = blank_page();
        let a = page.shape(0, 2, 9, 20).with_baselines(15, 5);
        let b = page.shape(13, 0, 22, 18).with_baselines(14, 6);
        let pair = ShapePair::new(a, b);
        assert_eq!(pair.rect(), Rect::new(0, 0, 22, 20));
        assert_eq!(pair.width(), 23);
        assert_eq!(pair.inner_distance(), 3);
        assert_eq!(pair.x_height(), 10);
    }

    #[test]
    fn inner_distance_is_negative_for_overlapping_shapes() {
        let page = blank_page();
        let a = page.shape(0, 0, 12, 20);
        let b = page.shape(10, 0, 20, 20);
        assert_eq!(ShapePair::new(a, b).inner_distance(), -3);
    }

    #[test]
    fn inner_distance_ignores_argument_order() {
        let page = blank_page();
        let a = page.shape(0, 0, 9, 20);
        let b = page.shape(12, 0, 20, 20);
        assert_eq!(ShapePair::new(a.clone(), b.clone()).inner_distance(), 2);
        assert_eq!(ShapePair::new(b, a).inner_distance(), 2);
    }
}

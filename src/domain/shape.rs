//! Rectangles and shapes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::page::PageImage;

/// An axis-aligned rectangle in page pixel coordinates.
///
/// Bounds are inclusive on every side, so `width = right - left + 1`. This
/// matches the coordinate arithmetic of splitting: cutting at position `p`
/// produces `[left, left + p]` and `[left + p + 1, right]`, which partition
/// the parent exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left-most column, inclusive.
    pub left: i32,
    /// Top-most row, inclusive.
    pub top: i32,
    /// Right-most column, inclusive.
    pub right: i32,
    /// Bottom-most row, inclusive.
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from inclusive bounds.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The rectangle's width in pixels.
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// The rectangle's height in pixels.
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// A rectangular glyph candidate with pixel content.
///
/// A shape is defined by its rectangle on a shared [`PageImage`], plus the
/// baseline and meanline placing it vertically relative to its row. Shapes
/// are immutable: every derivation (`sub_shape`, `with_letter`, a merge)
/// constructs a new value, so rectangles are never shared mutable state.
///
/// Shapes read from a training corpus may additionally carry a ground-truth
/// `letter` annotation, where a `|` marker denotes a letter continuing
/// across a shape boundary, and a list of annotated split positions.
#[derive(Debug, Clone)]
pub struct Shape {
    page: Arc<PageImage>,
    rect: Rect,
    /// Baseline row, relative to the shape's top.
    baseline: i32,
    /// Meanline row, relative to the shape's top.
    meanline: i32,
    letter: Option<String>,
    splits: Vec<i32>,
}

impl Shape {
    /// Creates a shape over a rectangle of the page.
    ///
    /// The baseline defaults to the bottom row and the meanline to the top
    /// row; upstream segmentation normally supplies real values via
    /// [`Shape::with_baselines`].
    pub fn new(page: Arc<PageImage>, rect: Rect) -> Self {
        let baseline = rect.height() - 1;
        Self {
            page,
            rect,
            baseline,
            meanline: 0,
            letter: None,
            splits: Vec::new(),
        }
    }

    /// Sets the baseline and meanline rows, both relative to the shape's
    /// top edge.
    pub fn with_baselines(mut self, baseline: i32, meanline: i32) -> Self {
        self.baseline = baseline;
        self.meanline = meanline;
        self
    }

    /// Sets the ground-truth letter annotation.
    pub fn with_letter(mut self, letter: impl Into<String>) -> Self {
        self.letter = Some(letter.into());
        self
    }

    /// Sets the annotated split positions, relative to the left edge.
    pub fn with_splits(mut self, splits: Vec<i32>) -> Self {
        self.splits = splits;
        self
    }

    /// The page this shape lives on.
    pub fn page(&self) -> &Arc<PageImage> {
        &self.page
    }

    /// The shape's rectangle in page coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Left-most column, inclusive.
    pub fn left(&self) -> i32 {
        self.rect.left
    }

    /// Top-most row, inclusive.
    pub fn top(&self) -> i32 {
        self.rect.top
    }

    /// Right-most column, inclusive.
    pub fn right(&self) -> i32 {
        self.rect.right
    }

    /// Bottom-most row, inclusive.
    pub fn bottom(&self) -> i32 {
        self.rect.bottom
    }

    /// The shape's width in pixels.
    pub fn width(&self) -> i32 {
        self.rect.width()
    }

    /// The shape's height in pixels.
    pub fn height(&self) -> i32 {
        self.rect.height()
    }

    /// Baseline row, relative to the shape's top.
    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    /// Meanline row, relative to the shape's top.
    pub fn meanline(&self) -> i32 {
        self.meanline
    }

    /// The x-height (baseline minus meanline), the normalizing unit for all
    /// size ratios. Floored at 1 so degenerate shapes never divide by zero.
    pub fn x_height(&self) -> i32 {
        (self.baseline - self.meanline).max(1)
    }

    /// The ground-truth letter annotation, empty when absent.
    pub fn letter(&self) -> &str {
        self.letter.as_deref().unwrap_or("")
    }

    /// The annotated split positions, relative to the left edge.
    pub fn splits(&self) -> &[i32] {
        &self.splits
    }

    /// Derives the sub-shape spanning columns `rel_left..=rel_right`
    /// (relative to this shape's left edge), keeping the full vertical
    /// extent and the parent's baselines. Annotations do not carry over.
    pub fn sub_shape(&self, rel_left: i32, rel_right: i32) -> Shape {
        Shape {
            page: Arc::clone(&self.page),
            rect: Rect::new(
                self.rect.left + rel_left,
                self.rect.top,
                self.rect.left + rel_right,
                self.rect.bottom,
            ),
            baseline: self.baseline,
            meanline: self.meanline,
            letter: None,
            splits: Vec::new(),
        }
    }

    /// Derives a shape over an arbitrary page rectangle, keeping this
    /// shape's page and baselines.
    pub fn with_rect(&self, rect: Rect) -> Shape {
        Shape {
            page: Arc::clone(&self.page),
            rect,
            baseline: self.baseline,
            meanline: self.meanline,
            letter: None,
            splits: Vec::new(),
        }
    }

    /// Checks whether the pixel at shape-relative `(x, y)` is ink, using
    /// the page's black threshold. Coordinates outside the shape are
    /// background.
    pub fn is_pixel_black(&self, x: i32, y: i32) -> bool {
        self.is_pixel_black_with(x, y, self.page.black_threshold())
    }

    /// Checks whether the pixel at shape-relative `(x, y)` is ink under an
    /// explicit brightness threshold.
    pub fn is_pixel_black_with(&self, x: i32, y: i32, threshold: u8) -> bool {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return false;
        }
        self.page
            .is_pixel_black(self.rect.left + x, self.rect.top + y, threshold)
    }

    /// Returns the shape's ink mask under the page's black threshold and
    /// configured white-gap-fill factor, row-major from the top-left
    /// corner.
    pub fn black_grid(&self) -> Vec<bool> {
        self.black_grid_with(self.page.black_threshold(), self.page.white_gap_fill_factor())
    }

    /// Returns the shape's ink mask under an explicit threshold and
    /// white-gap-fill factor, row-major from the top-left corner.
    ///
    /// Each fill pass turns a background pixel into ink when at least 5 of
    /// its 8 neighbours are ink, progressively closing white gaps. Outlines
    /// get padded as well; the fill does not distinguish internal gaps from
    /// external ones.
    pub fn black_grid_with(&self, threshold: u8, white_gap_fill_factor: u32) -> Vec<bool> {
        let width = self.width() as usize;
        let height = self.height() as usize;
        let mut grid = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                grid[y * width + x] = self.is_pixel_black_with(x as i32, y as i32, threshold);
            }
        }
        for _ in 0..white_gap_fill_factor {
            let snapshot = grid.clone();
            for y in 0..height {
                for x in 0..width {
                    if snapshot[y * width + x] {
                        continue;
                    }
                    let mut black_neighbours = 0;
                    for dy in -1i32..=1 {
                        for dx in -1i32..=1 {
                            if dx == 0 && dy == 0 {
                                continue;
                            }
                            let nx = x as i32 + dx;
                            let ny = y as i32 + dy;
                            if nx >= 0
                                && ny >= 0
                                && (nx as usize) < width
                                && (ny as usize) < height
                                && snapshot[ny as usize * width + nx as usize]
                            {
                                black_neighbours += 1;
                            }
                        }
                    }
                    if black_neighbours >= 5 {
                        grid[y * width + x] = true;
                    }
                }
            }
        }
        grid
    }

    /// The distance to the shape's ink as seen from the top and bottom.
    ///
    /// For each x-coordinate in the shape, gives the row of the first ink
    /// pixel seen from the top (`[0]`) and from the bottom (`[1]`), using
    /// the page's black threshold. Columns with no ink report `[0, 0]`.
    pub fn vertical_contour(&self) -> Vec<[i32; 2]> {
        let mut contour = vec![[0i32; 2]; self.width() as usize];
        for x in 0..self.width() {
            for y in 0..self.height() {
                if self.is_pixel_black(x, y) {
                    contour[x as usize][0] = y;
                    break;
                }
            }
            for y in (0..self.height()).rev() {
                if self.is_pixel_black(x, y) {
                    contour[x as usize][1] = y;
                    break;
                }
            }
        }
        contour
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape{}", self.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn blank_page(width: u32, height: u32) -> Arc<PageImage> {
        let image = GrayImage::from_pixel(width, height, Luma([255u8]));
        Arc::new(PageImage::new(image, 127, true))
    }

    fn page_with_ink(width: u32, height: u32, ink: &[(u32, u32)]) -> Arc<PageImage> {
        let mut image = GrayImage::from_pixel(width, height, Luma([255u8]));
        for &(x, y) in ink {
            image.put_pixel(x, y, Luma([0u8]));
        }
        Arc::new(PageImage::new(image, 127, true))
    }

    #[test]
    fn rect_width_and_height_are_inclusive() {
        let rect = Rect::new(3, 0, 10, 15);
        assert_eq!(rect.width(), 8);
        assert_eq!(rect.height(), 16);
    }

    #[test]
    fn x_height_floors_at_one() {
        let page = blank_page(16, 16);
        let shape = page.shape(0, 0, 7, 7).with_baselines(3, 3);
        assert_eq!(shape.x_height(), 1);
        let inverted = page.shape(0, 0, 7, 7).with_baselines(2, 5);
        assert_eq!(inverted.x_height(), 1);
    }

    #[test]
    fn sub_shapes_partition_the_parent() {
        let page = blank_page(32, 16);
        let shape = page.shape(4, 0, 19, 15);
        let left = shape.sub_shape(0, 7);
        let right = shape.sub_shape(8, shape.width() - 1);
        assert_eq!(left.rect(), Rect::new(4, 0, 11, 15));
        assert_eq!(right.rect(), Rect::new(12, 0, 19, 15));
        assert_eq!(left.rect().union(&right.rect()), shape.rect());
        assert_eq!(left.width() + right.width(), shape.width());
    }

    #[test]
    fn pixel_test_is_shape_relative_and_bounded() {
        let page = page_with_ink(16, 16, &[(5, 6)]);
        let shape = page.shape(4, 4, 11, 11);
        assert!(shape.is_pixel_black(1, 2));
        assert!(!shape.is_pixel_black(5, 6));
        assert!(!shape.is_pixel_black(-1, 0));
        assert!(!shape.is_pixel_black(0, 100));
    }

    #[test]
    fn vertical_contour_reports_first_ink_from_both_edges() {
        let page = page_with_ink(8, 8, &[(2, 1), (2, 5), (3, 3)]);
        let shape = page.shape(0, 0, 7, 7);
        let contour = shape.vertical_contour();
        assert_eq!(contour[2], [1, 5]);
        assert_eq!(contour[3], [3, 3]);
        assert_eq!(contour[0], [0, 0]);
    }

    #[test]
    fn gap_fill_closes_a_surrounded_hole() {
        // A 3x3 ink block with its centre missing: the centre has 8 ink
        // neighbours, so one fill pass closes it.
        let ink: Vec<(u32, u32)> = (1..4)
            .flat_map(|y| (1..4).map(move |x| (x, y)))
            .filter(|&(x, y)| !(x == 2 && y == 2))
            .collect();
        let page = page_with_ink(6, 6, &ink);
        let shape = page.shape(0, 0, 5, 5);
        let unfilled = shape.black_grid_with(127, 0);
        assert!(!unfilled[2 * 6 + 2]);
        let filled = shape.black_grid_with(127, 1);
        assert!(filled[2 * 6 + 2]);
    }

    #[test]
    fn black_grid_uses_the_page_gap_fill_factor() {
        let ink: Vec<(u32, u32)> = (1..4)
            .flat_map(|y| (1..4).map(move |x| (x, y)))
            .filter(|&(x, y)| !(x == 2 && y == 2))
            .collect();
        let mut image = GrayImage::from_pixel(6, 6, Luma([255u8]));
        for &(x, y) in &ink {
            image.put_pixel(x, y, Luma([0u8]));
        }
        let plain = Arc::new(PageImage::new(image.clone(), 127, true));
        assert!(!plain.shape(0, 0, 5, 5).black_grid()[2 * 6 + 2]);
        let filling = Arc::new(PageImage::new(image, 127, true).with_white_gap_fill_factor(1));
        assert!(filling.shape(0, 0, 5, 5).black_grid()[2 * 6 + 2]);
    }
}

//! The page pixel source backing all shapes.

use std::sync::Arc;

use image::GrayImage;

use crate::domain::shape::{Rect, Shape};

/// A page image with the segmentation metadata shapes need.
///
/// The page owns the grayscale pixel data together with the brightness
/// threshold separating ink from background, the white-gap-fill factor used
/// by gap-sensitive algorithms, and the script direction. Shapes reference
/// the page through an [`Arc`], so deriving new shapes during splitting and
/// merging never copies pixel data.
#[derive(Debug)]
pub struct PageImage {
    image: GrayImage,
    black_threshold: u8,
    white_gap_fill_factor: u32,
    left_to_right: bool,
}

impl PageImage {
    /// Creates a page from a grayscale image.
    ///
    /// `black_threshold` is the brightness at or below which a pixel counts
    /// as ink. `left_to_right` gives the script direction of the text on
    /// the page.
    pub fn new(image: GrayImage, black_threshold: u8, left_to_right: bool) -> Self {
        Self {
            image,
            black_threshold,
            white_gap_fill_factor: 0,
            left_to_right,
        }
    }

    /// Sets the white-gap-fill factor applied by gap-sensitive pixel tests.
    ///
    /// Each fill pass turns a background pixel into ink when at least 5 of
    /// its 8 neighbours are ink; the factor is the number of passes.
    pub fn with_white_gap_fill_factor(mut self, factor: u32) -> Self {
        self.white_gap_fill_factor = factor;
        self
    }

    /// The page width in pixels.
    pub fn width(&self) -> i32 {
        self.image.width() as i32
    }

    /// The page height in pixels.
    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }

    /// The brightness threshold at or below which a pixel counts as ink.
    pub fn black_threshold(&self) -> u8 {
        self.black_threshold
    }

    /// The configured number of white-gap-fill passes.
    pub fn white_gap_fill_factor(&self) -> u32 {
        self.white_gap_fill_factor
    }

    /// Whether the script on this page runs left-to-right.
    pub fn is_left_to_right(&self) -> bool {
        self.left_to_right
    }

    /// Checks whether the pixel at page coordinates `(x, y)` is ink under
    /// the given threshold. Coordinates outside the page are background.
    pub fn is_pixel_black(&self, x: i32, y: i32, threshold: u8) -> bool {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return false;
        }
        self.image.get_pixel(x as u32, y as u32).0[0] <= threshold
    }

    /// Creates a shape over the given page rectangle.
    ///
    /// The shape's baseline and meanline default to the rectangle's full
    /// height; upstream segmentation normally overrides them via
    /// [`Shape::with_baselines`].
    pub fn shape(self: &Arc<Self>, left: i32, top: i32, right: i32, bottom: i32) -> Shape {
        Shape::new(Arc::clone(self), Rect::new(left, top, right, bottom))
    }
}

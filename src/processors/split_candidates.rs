//! Split candidate detection.
//!
//! Cut points between fused letters almost always sit where the ink is
//! thinnest: at a summit of the distance from the shape's top and bottom
//! edges to the first ink pixel, between two valleys. This module scans a
//! shape's vertical contour for such summits and scores them by their
//! prominence relative to the neighbouring valleys.

use tracing::trace;

use crate::core::config::SplitterConfig;
use crate::core::traits::SplitCandidateSource;
use crate::domain::Shape;

/// A candidate cut position inside a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    /// X-offset of the candidate cut, relative to the shape's left edge.
    pub position: i32,
    /// The average prominence of the contour peak at this position,
    /// relative to its two neighbouring valleys.
    pub magnitude: f64,
}

/// Finds candidate cut positions in a shape.
#[derive(Debug, Clone)]
pub struct SplitCandidateFinder {
    min_distance_between_splits: i32,
}

impl SplitCandidateFinder {
    /// Creates a finder from the splitter configuration.
    pub fn new(config: &SplitterConfig) -> Self {
        Self {
            min_distance_between_splits: config.min_distance_between_splits,
        }
    }

    /// The minimum distance enforced between two retained candidates.
    pub fn min_distance_between_splits(&self) -> i32 {
        self.min_distance_between_splits
    }
}

impl SplitCandidateSource for SplitCandidateFinder {
    /// Finds candidate cut positions in the shape, strongest first.
    fn find_split_candidates(&self, shape: &Shape) -> Vec<SplitCandidate> {
        let width = shape.width() as usize;
        let height = shape.height();
        if width < 2 {
            return Vec::new();
        }

        // Total distance from the top and bottom edges to the shape's ink,
        // per column, capped at height - 1 for ink-free columns.
        let contour = shape.vertical_contour();
        let mut edge_distances = vec![0i32; width];
        for x in 0..width {
            let distance = contour[x][0] + ((height - 1) - contour[x][1]);
            edge_distances[x] = distance.min(height - 1);
        }

        // Classify columns as local maxima (1) or minima (-1) by tracking
        // the rising/falling trend and marking the column before each
        // reversal. The first column is forced to a maximum; the last one
        // follows the final trend.
        let mut maxima_minima = vec![0i8; width];
        let mut last_distance = -1i32;
        let mut rising = true;
        for (i, &distance) in edge_distances.iter().enumerate() {
            if last_distance >= 0 {
                if distance < last_distance && rising {
                    maxima_minima[i - 1] = 1;
                }
                if distance > last_distance && !rising {
                    maxima_minima[i - 1] = -1;
                }
            }
            if distance > last_distance {
                rising = true;
            } else if distance < last_distance {
                rising = false;
            }
            last_distance = distance;
        }
        maxima_minima[0] = 1;
        maxima_minima[width - 1] = if rising { 1 } else { -1 };

        // Every maximum preceded by at least one minimum becomes a
        // candidate, scored by the average prominence of the peak over its
        // two neighbouring valleys.
        let mut have_minimum = false;
        let mut last_maximum = -1i32;
        let mut last_min_value = 0i32;
        let mut last_max_value = 0i32;
        let mut candidates: Vec<SplitCandidate> = Vec::new();
        for i in 0..width {
            if maxima_minima[i] < 0 {
                have_minimum = true;
                if last_maximum > 0 {
                    let magnitude = ((last_max_value - last_min_value) as f64
                        + (last_max_value - edge_distances[i]) as f64)
                        / 2.0;
                    candidates.push(SplitCandidate {
                        position: last_maximum,
                        magnitude,
                    });
                }
                last_min_value = edge_distances[i];
            }
            if maxima_minima[i] > 0 {
                if have_minimum {
                    last_maximum = i as i32;
                    last_max_value = edge_distances[i];
                }
                have_minimum = false;
            }
        }

        // Non-maximum suppression: keep the strongest candidates, dropping
        // any weaker candidate closer than the minimum distance to one
        // already retained.
        candidates.sort_by(|a, b| {
            b.magnitude
                .total_cmp(&a.magnitude)
                .then_with(|| a.position.cmp(&b.position))
        });
        let mut retained: Vec<SplitCandidate> = Vec::new();
        for candidate in candidates {
            let too_close = retained.iter().any(|kept| {
                (kept.position - candidate.position).abs() < self.min_distance_between_splits
            });
            if too_close {
                trace!(
                    position = candidate.position,
                    magnitude = candidate.magnitude,
                    "suppressing split candidate near a stronger one"
                );
            } else {
                retained.push(candidate);
            }
        }
        retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageImage;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect as PixelRect;
    use std::sync::Arc;

    fn ink(image: &mut GrayImage, left: i32, top: i32, width: u32, height: u32) {
        draw_filled_rect_mut(
            image,
            PixelRect::at(left, top).of_size(width, height),
            Luma([0u8]),
        );
    }

    /// Two full-height blobs joined by a thin bridge, with short serif
    /// columns at the outer edges so the profile falls into a valley on
    /// each blob before and after the bridge summit.
    fn waisted_shape() -> (Arc<PageImage>, i32) {
        let mut image = GrayImage::from_pixel(40, 16, Luma([255u8]));
        ink(&mut image, 0, 5, 1, 6); // left serif
        ink(&mut image, 1, 0, 12, 16); // left blob
        ink(&mut image, 13, 7, 4, 3); // bridge
        ink(&mut image, 17, 0, 12, 16); // right blob
        ink(&mut image, 29, 5, 1, 6); // right serif
        let page = Arc::new(PageImage::new(image, 127, true));
        (page, 16)
    }

    #[test]
    fn finds_the_bridge_between_two_blobs() {
        let (page, _) = waisted_shape();
        let shape = page.shape(0, 0, 29, 15).with_baselines(12, 2);
        let finder = SplitCandidateFinder::new(&Default::default());
        let candidates = finder.find_split_candidates(&shape);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].position, 16);
        assert!(candidates[0].magnitude > 0.0);
    }

    #[test]
    fn solid_shape_has_no_candidates() {
        let mut image = GrayImage::from_pixel(24, 16, Luma([255u8]));
        ink(&mut image, 2, 0, 20, 16);
        let page = Arc::new(PageImage::new(image, 127, true));
        let shape = page.shape(2, 0, 21, 15).with_baselines(12, 2);
        let finder = SplitCandidateFinder::new(&Default::default());
        assert!(finder.find_split_candidates(&shape).is_empty());
    }

    #[test]
    fn close_candidates_are_suppressed_keeping_the_stronger() {
        // Three blobs with two waists three columns apart: the deeper
        // waist wins, the weaker one within the minimum distance is
        // dropped.
        let mut image = GrayImage::from_pixel(40, 16, Luma([255u8]));
        ink(&mut image, 0, 5, 1, 6);
        ink(&mut image, 1, 0, 10, 16);
        ink(&mut image, 11, 7, 2, 3); // deep waist (thin ink)
        ink(&mut image, 13, 0, 2, 16);
        ink(&mut image, 15, 4, 2, 9); // shallow waist
        ink(&mut image, 17, 0, 12, 16);
        ink(&mut image, 29, 5, 1, 6);
        let page = Arc::new(PageImage::new(image, 127, true));
        let shape = page.shape(0, 0, 29, 15).with_baselines(12, 2);

        let finder = SplitCandidateFinder::new(&Default::default());
        let candidates = finder.find_split_candidates(&shape);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].position, 12);

        // With suppression disabled both waists survive.
        let permissive = SplitCandidateFinder::new(&crate::core::config::SplitterConfig {
            min_distance_between_splits: 0,
            ..Default::default()
        });
        let all = permissive.find_split_candidates(&shape);
        assert_eq!(all.len(), 2);
        assert!(all[0].magnitude >= all[1].magnitude);
    }
}

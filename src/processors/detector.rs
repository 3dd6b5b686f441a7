//! Group-level boundary detection.
//!
//! A detector walks the shapes of a group in reading order and composes
//! the splitter's per-shape hypotheses with pairwise merge checks into
//! whole-group boundary guesses. Two policies are provided:
//!
//! * [`DeterministicBoundaryDetector`] commits greedily to the single most
//!   probable action per shape and returns one sequence.
//! * [`LetterByLetterBoundaryDetector`] carries a beam of alternative
//!   sequences across the group, forking on every plausible merge, and
//!   returns the surviving beam best first.
//!
//! Merge candidates are gated geometrically before the scoring oracle is
//! consulted: the fused pair must still be letter-sized, and the gap
//! between the fragments must be small relative to the x-height.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::core::config::BoundariesConfig;
use crate::core::errors::{BoundaryError, BoundaryResult};
use crate::core::traits::{BoundaryDetector, ShapeSplitter};
use crate::domain::{Decision, DecisionOutcome, Group, Shape, ShapePair, ShapeSequence};
use crate::processors::merger::ShapeMerger;

/// Whether a shape is large enough to be worth offering to the splitter.
fn eligible_for_split(shape: &Shape, min_width_ratio: f64, min_height_ratio: f64) -> bool {
    let x_height = shape.x_height() as f64;
    shape.width() as f64 / x_height >= min_width_ratio
        && shape.height() as f64 / x_height >= min_height_ratio
}

/// Whether a pair of adjacent shapes could plausibly be one letter.
fn eligible_for_merge(
    previous: &Shape,
    shape: &Shape,
    max_width_ratio: f64,
    max_distance_ratio: f64,
) -> bool {
    let pair = ShapePair::new(previous.clone(), shape.clone());
    let x_height = pair.x_height() as f64;
    let width_ratio = pair.width() as f64 / x_height;
    let distance_ratio = pair.inner_distance() as f64 / x_height;
    width_ratio <= max_width_ratio && distance_ratio <= max_distance_ratio
}

fn first_piece(split_sequence: &ShapeSequence) -> BoundaryResult<&Shape> {
    split_sequence
        .first()
        .map(|entry| entry.shape())
        .ok_or_else(|| BoundaryError::invalid_input("splitter returned an empty sequence"))
}

/// Appends a split sequence's shapes and decisions to a group sequence.
fn append_split_sequence(target: &mut ShapeSequence, split_sequence: &ShapeSequence) {
    for entry in split_sequence {
        target.push_entry(entry.clone());
    }
    for decision in split_sequence.decisions() {
        target.add_decision(*decision);
    }
}

/// Replaces the target's last shape with its merge against the split
/// sequence's first piece, then appends the remaining pieces.
fn splice_merged_sequence(
    target: &mut ShapeSequence,
    merger: &ShapeMerger,
    split_sequence: &ShapeSequence,
    merge_prob: f64,
) -> BoundaryResult<()> {
    let first_entry = split_sequence
        .first()
        .ok_or_else(|| BoundaryError::invalid_input("splitter returned an empty sequence"))?;
    let previous = target
        .pop_shape()
        .ok_or_else(|| BoundaryError::invalid_input("merge with no preceding shape"))?;
    let merged = merger.merge(previous.shape(), first_entry.shape());
    let mut originals = previous.original_shapes().to_vec();
    originals.extend_from_slice(first_entry.original_shapes());
    target.add_merged_shape(merged, originals);
    for entry in split_sequence.iter().skip(1) {
        target.push_entry(entry.clone());
    }
    for decision in split_sequence.decisions() {
        target.add_decision(*decision);
    }
    target.add_decision(Decision::new(DecisionOutcome::DoMerge, merge_prob));
    Ok(())
}

/// A greedy detector committing to one action per shape.
///
/// Splits only when the splitter's best hypothesis reaches the decision
/// threshold, merges only when the merge probability does, and returns a
/// single sequence.
pub struct DeterministicBoundaryDetector {
    splitter: Option<Arc<dyn ShapeSplitter>>,
    merger: Option<ShapeMerger>,
    min_width_ratio_for_split: f64,
    min_height_ratio_for_split: f64,
    max_width_ratio_for_merge: f64,
    max_distance_ratio_for_merge: f64,
    min_prob_for_decision: f64,
}

impl DeterministicBoundaryDetector {
    /// Creates a detector. Either stage can be disabled by passing `None`.
    pub fn new(
        splitter: Option<Arc<dyn ShapeSplitter>>,
        merger: Option<ShapeMerger>,
        config: &BoundariesConfig,
    ) -> Self {
        Self {
            splitter,
            merger,
            min_width_ratio_for_split: config.splitter.min_width_ratio,
            min_height_ratio_for_split: config.splitter.min_height_ratio,
            max_width_ratio_for_merge: config.merger.max_width_ratio,
            max_distance_ratio_for_merge: config.merger.max_distance_ratio,
            min_prob_for_decision: config.min_prob_for_decision,
        }
    }

    fn best_split_sequence(&self, shape: &Shape) -> BoundaryResult<ShapeSequence> {
        if let Some(splitter) = &self.splitter {
            if eligible_for_split(
                shape,
                self.min_width_ratio_for_split,
                self.min_height_ratio_for_split,
            ) {
                let mut sequences = splitter.split(shape)?.into_iter();
                let best = sequences.next().ok_or_else(|| {
                    BoundaryError::invalid_input("splitter returned no sequences")
                })?;
                if best.score() >= self.min_prob_for_decision {
                    return Ok(best);
                }
                trace!(%shape, score = best.score(), "split below decision threshold");
            }
        }
        let mut sequence = ShapeSequence::new();
        sequence.add_shape(shape.clone());
        Ok(sequence)
    }
}

impl BoundaryDetector for DeterministicBoundaryDetector {
    fn find_boundaries(&self, group: &Group) -> BoundaryResult<Vec<ShapeSequence>> {
        let mut sequence = ShapeSequence::new();
        for shape in group.shapes() {
            let split_sequence = self.best_split_sequence(shape)?;

            let mut merge_prob = 0.0;
            if let (Some(merger), Some(previous)) = (&self.merger, sequence.last()) {
                let previous_shape = previous.shape().clone();
                if eligible_for_merge(
                    &previous_shape,
                    shape,
                    self.max_width_ratio_for_merge,
                    self.max_distance_ratio_for_merge,
                ) {
                    merge_prob = merger.check_merge(&previous_shape, first_piece(&split_sequence)?);
                }
            }

            if merge_prob > self.min_prob_for_decision {
                let merger = self
                    .merger
                    .as_ref()
                    .ok_or_else(|| BoundaryError::invalid_input("merge without a merger"))?;
                splice_merged_sequence(&mut sequence, merger, &split_sequence, merge_prob)?;
            } else {
                append_split_sequence(&mut sequence, &split_sequence);
                if merge_prob > 0.0 {
                    sequence.add_decision(Decision::new(
                        DecisionOutcome::DoNotMerge,
                        1.0 - merge_prob,
                    ));
                }
            }
        }
        debug!(
            shapes_in = group.len(),
            shapes_out = sequence.len(),
            score = sequence.score(),
            "boundaries resolved"
        );
        Ok(vec![sequence])
    }
}

/// A beam-search detector carrying alternative sequences across the group.
///
/// Every split hypothesis of every shape extends every surviving sequence;
/// plausible merges fork the sequence into a merged and an unmerged
/// branch. After each shape the beam is truncated to the configured width,
/// keeping the highest-scoring sequences.
pub struct LetterByLetterBoundaryDetector {
    splitter: Option<Arc<dyn ShapeSplitter>>,
    merger: Option<ShapeMerger>,
    min_width_ratio_for_split: f64,
    min_height_ratio_for_split: f64,
    max_width_ratio_for_merge: f64,
    max_distance_ratio_for_merge: f64,
    beam_width: usize,
}

impl LetterByLetterBoundaryDetector {
    /// Creates a detector. Either stage can be disabled by passing `None`.
    pub fn new(
        splitter: Option<Arc<dyn ShapeSplitter>>,
        merger: Option<ShapeMerger>,
        config: &BoundariesConfig,
    ) -> Self {
        Self {
            splitter,
            merger,
            min_width_ratio_for_split: config.splitter.min_width_ratio,
            min_height_ratio_for_split: config.splitter.min_height_ratio,
            max_width_ratio_for_merge: config.merger.max_width_ratio,
            max_distance_ratio_for_merge: config.merger.max_distance_ratio,
            beam_width: config.splitter.beam_width,
        }
    }

    fn split_sequences(&self, shape: &Shape) -> BoundaryResult<Vec<ShapeSequence>> {
        if let Some(splitter) = &self.splitter {
            if eligible_for_split(
                shape,
                self.min_width_ratio_for_split,
                self.min_height_ratio_for_split,
            ) {
                return splitter.split(shape);
            }
        }
        let mut sequence = ShapeSequence::new();
        sequence.add_shape(shape.clone());
        Ok(vec![sequence])
    }
}

impl BoundaryDetector for LetterByLetterBoundaryDetector {
    fn find_boundaries(&self, group: &Group) -> BoundaryResult<Vec<ShapeSequence>> {
        let mut beam = vec![ShapeSequence::new()];
        for shape in group.shapes() {
            let split_sequences = self.split_sequences(shape)?;
            let mut next_beam: Vec<ShapeSequence> = Vec::new();

            for sequence in &beam {
                for split_sequence in &split_sequences {
                    let mut merge_prob = 0.0;
                    if let (Some(merger), Some(previous)) = (&self.merger, sequence.last()) {
                        let previous_shape = previous.shape().clone();
                        if eligible_for_merge(
                            &previous_shape,
                            shape,
                            self.max_width_ratio_for_merge,
                            self.max_distance_ratio_for_merge,
                        ) {
                            merge_prob =
                                merger.check_merge(&previous_shape, first_piece(split_sequence)?);
                        }
                    }

                    if merge_prob > 0.0 {
                        let merger = self
                            .merger
                            .as_ref()
                            .ok_or_else(|| BoundaryError::invalid_input("merge without a merger"))?;
                        let mut merged_branch = sequence.clone();
                        splice_merged_sequence(
                            &mut merged_branch,
                            merger,
                            split_sequence,
                            merge_prob,
                        )?;
                        next_beam.push(merged_branch);
                    }
                    if merge_prob < 1.0 {
                        let mut unmerged_branch = sequence.clone();
                        append_split_sequence(&mut unmerged_branch, split_sequence);
                        if merge_prob > 0.0 {
                            unmerged_branch.add_decision(Decision::new(
                                DecisionOutcome::DoNotMerge,
                                1.0 - merge_prob,
                            ));
                        }
                        next_beam.push(unmerged_branch);
                    }
                }
            }

            next_beam.sort_by(|a, b| b.score().total_cmp(&a.score()));
            next_beam.truncate(self.beam_width);
            beam = next_beam;
        }
        debug!(
            shapes_in = group.len(),
            beam = beam.len(),
            "boundary beam resolved"
        );
        Ok(beam)
    }
}

/// Runs a detector over many groups in parallel.
///
/// Groups are independent units of work, so this is a straight data
/// parallel map. The result preserves input order; the first error
/// encountered aborts the whole batch.
pub fn find_boundaries_parallel<D>(
    detector: &D,
    groups: &[Group],
) -> BoundaryResult<Vec<Vec<ShapeSequence>>>
where
    D: BoundaryDetector + ?Sized,
{
    groups
        .par_iter()
        .map(|group| detector.find_boundaries(group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageImage;
    use image::{GrayImage, Luma};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Splits any eligible shape into halves, returning scripted
    /// alternatives with fixed scores.
    struct ScriptedSplitter {
        scores: Vec<f64>,
    }

    impl ShapeSplitter for ScriptedSplitter {
        fn split(&self, shape: &Shape) -> BoundaryResult<Vec<ShapeSequence>> {
            let mid = shape.width() / 2 - 1;
            let mut sequences = Vec::new();
            for (i, &score) in self.scores.iter().enumerate() {
                let mut sequence = ShapeSequence::new();
                if i == 0 {
                    sequence.add_derived_shape(shape.sub_shape(0, mid), shape.clone());
                    sequence
                        .add_derived_shape(shape.sub_shape(mid + 1, shape.width() - 1), shape.clone());
                } else {
                    sequence.add_derived_shape(shape.clone(), shape.clone());
                }
                sequence.add_decision(Decision::new(DecisionOutcome::DoSplit, score));
                sequences.push(sequence);
            }
            Ok(sequences)
        }
    }

    struct FixedMergeScorer(f64);

    impl crate::core::traits::MergeScorer for FixedMergeScorer {
        fn score_merge(&self, _pair: &ShapePair) -> f64 {
            self.0
        }
    }

    struct CountingMergeScorer(AtomicUsize);

    impl crate::core::traits::MergeScorer for CountingMergeScorer {
        fn score_merge(&self, _pair: &ShapePair) -> f64 {
            self.0.fetch_add(1, Ordering::SeqCst);
            0.0
        }
    }

    fn blank_page() -> Arc<PageImage> {
        let image = GrayImage::from_pixel(128, 32, Luma([255u8]));
        Arc::new(PageImage::new(image, 127, true))
    }

    fn wide_shape(page: &Arc<PageImage>, left: i32, right: i32) -> Shape {
        page.shape(left, 0, right, 25).with_baselines(22, 2)
    }

    #[test]
    fn deterministic_applies_a_confident_split() {
        let page = blank_page();
        let group = Group::new(vec![wide_shape(&page, 0, 39)]);
        let detector = DeterministicBoundaryDetector::new(
            Some(Arc::new(ScriptedSplitter { scores: vec![0.8] })),
            None,
            &BoundariesConfig::default(),
        );
        let result = detector.find_boundaries(&group).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].len(), 2);
        assert!((result[0].score() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn deterministic_keeps_the_shape_below_the_threshold() {
        let page = blank_page();
        let group = Group::new(vec![wide_shape(&page, 0, 39)]);
        let detector = DeterministicBoundaryDetector::new(
            Some(Arc::new(ScriptedSplitter { scores: vec![0.4] })),
            None,
            &BoundariesConfig::default(),
        );
        let result = detector.find_boundaries(&group).unwrap();
        assert_eq!(result[0].len(), 1);
        assert!(result[0].decisions().is_empty());
    }

    #[test]
    fn deterministic_merges_close_fragments() {
        let page = blank_page();
        // 10px fragments 2px apart with x-height 20: width ratio 22/20 and
        // distance ratio 2/20 both pass the gates.
        let group = Group::new(vec![
            wide_shape(&page, 0, 9),
            wide_shape(&page, 12, 21),
        ]);
        let merger = ShapeMerger::new(Arc::new(FixedMergeScorer(0.9)));
        let detector =
            DeterministicBoundaryDetector::new(None, Some(merger), &BoundariesConfig::default());
        let result = detector.find_boundaries(&group).unwrap();
        assert_eq!(result[0].len(), 1);
        let merged = result[0].first().unwrap();
        assert_eq!(merged.shape().rect().left, 0);
        assert_eq!(merged.shape().rect().right, 21);
        assert_eq!(merged.original_shapes().len(), 2);
        assert_eq!(result[0].decisions().len(), 1);
        assert!((result[0].score() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn distant_pairs_never_reach_the_merge_oracle() {
        let page = blank_page();
        // gap 8 against x-height 20 exceeds the distance gate
        let group = Group::new(vec![
            wide_shape(&page, 0, 9),
            wide_shape(&page, 18, 27),
        ]);
        let scorer = Arc::new(CountingMergeScorer(AtomicUsize::new(0)));
        let merger = ShapeMerger::new(scorer.clone());
        let detector =
            DeterministicBoundaryDetector::new(None, Some(merger), &BoundariesConfig::default());
        let result = detector.find_boundaries(&group).unwrap();
        assert_eq!(result[0].len(), 2);
        assert_eq!(scorer.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn beam_is_truncated_after_every_shape() {
        let page = blank_page();
        let group = Group::new(vec![wide_shape(&page, 0, 39), wide_shape(&page, 50, 89)]);
        let mut config = BoundariesConfig::default();
        config.splitter.beam_width = 2;
        let detector = LetterByLetterBoundaryDetector::new(
            Some(Arc::new(ScriptedSplitter {
                scores: vec![1.0, 0.8, 0.6],
            })),
            None,
            &config,
        );
        let result = detector.find_boundaries(&group).unwrap();
        assert!(result.len() <= 2);
        for window in result.windows(2) {
            assert!(window[0].score() >= window[1].score());
        }
        assert_eq!(result[0].len(), 4);
        assert!((result[0].score() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn beam_forks_on_a_plausible_merge() {
        let page = blank_page();
        let group = Group::new(vec![
            wide_shape(&page, 0, 9),
            wide_shape(&page, 12, 21),
        ]);
        let merger = ShapeMerger::new(Arc::new(FixedMergeScorer(0.6)));
        let detector =
            LetterByLetterBoundaryDetector::new(None, Some(merger), &BoundariesConfig::default());
        let result = detector.find_boundaries(&group).unwrap();
        assert_eq!(result.len(), 2);
        // merged branch (prob 0.6) outranks the unmerged one (prob 0.4)
        assert_eq!(result[0].len(), 1);
        assert_eq!(result[1].len(), 2);
        assert!((result[0].score() - 0.6).abs() < 1e-9);
        assert!((result[1].score() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn groups_are_detected_in_parallel_preserving_order() {
        let page = blank_page();
        let groups: Vec<Group> = (0..3)
            .map(|i| Group::new(vec![wide_shape(&page, i * 40, i * 40 + 9)]))
            .collect();
        let detector =
            DeterministicBoundaryDetector::new(None, None, &BoundariesConfig::default());
        let results = find_boundaries_parallel(&detector, &groups).unwrap();
        assert_eq!(results.len(), 3);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result[0].first().unwrap().shape().left(), i as i32 * 40);
        }
    }
}

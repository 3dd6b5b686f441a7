//! Depth-bounded recursive shape splitting.
//!
//! The splitter turns one shape into a ranked list of alternative
//! sub-shape sequences. Each candidate cut position is scored by the
//! injected [`SplitScorer`]; both halves of a cut are split recursively,
//! and the cross product of their sub-sequences is re-ranked under a
//! renormalization scheme that keeps the best overall hypothesis at score
//! 1.0 while discounting the alternatives relative to it. The no-split
//! hypothesis is always among the results.

use std::sync::Arc;

use itertools::iproduct;
use tracing::{debug, trace};

use crate::core::config::SplitterConfig;
use crate::core::errors::BoundaryResult;
use crate::core::traits::{ShapeSplitter, SplitCandidateSource, SplitScorer};
use crate::domain::{Decision, DecisionOutcome, Shape, ShapeSequence, Split};

/// Splits a shape recursively at its strongest candidate cut positions.
pub struct RecursiveShapeSplitter {
    candidate_source: Arc<dyn SplitCandidateSource>,
    scorer: Arc<dyn SplitScorer>,
    min_width_ratio: f64,
    beam_width: usize,
    max_depth: usize,
}

impl RecursiveShapeSplitter {
    /// Creates a splitter from a candidate source, a scoring oracle and the
    /// splitter configuration.
    pub fn new(
        candidate_source: Arc<dyn SplitCandidateSource>,
        scorer: Arc<dyn SplitScorer>,
        config: &SplitterConfig,
    ) -> Self {
        Self {
            candidate_source,
            scorer,
            min_width_ratio: config.min_width_ratio,
            beam_width: config.beam_width,
            max_depth: config.max_depth,
        }
    }

    fn split_recursive(
        &self,
        shape: &Shape,
        depth: usize,
        original: &Shape,
        left_to_right: bool,
    ) -> Vec<ShapeSequence> {
        let width_ratio = shape.width() as f64 / shape.x_height() as f64;
        trace!(%shape, depth, width_ratio, "splitting");

        if width_ratio < self.min_width_ratio || depth >= self.max_depth {
            let mut sequence = ShapeSequence::new();
            sequence.add_derived_shape(shape.clone(), original.clone());
            return vec![sequence];
        }

        // Score every candidate cut, then add the no-split hypothesis with
        // the complement of the best cut's probability.
        let mut candidates: Vec<(Split, f64)> = self
            .candidate_source
            .find_split_candidates(shape)
            .iter()
            .map(|candidate| {
                let split = Split::new(shape.clone(), candidate.position);
                let prob = self.scorer.score_split(&split);
                (split, prob)
            })
            .collect();
        let best_split_prob = candidates
            .iter()
            .map(|(_, prob)| *prob)
            .fold(f64::NEG_INFINITY, f64::max);
        let no_split_prob = if candidates.is_empty() {
            1.0
        } else {
            1.0 - best_split_prob
        };
        candidates.push((Split::no_split(shape.clone()), no_split_prob));

        candidates.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.is_no_split().cmp(&b.0.is_no_split()))
                .then_with(|| a.0.position().cmp(&b.0.position()))
        });
        let max_prob = candidates[0].1;

        // The best hypothesis is renormalized to 1.0; every other candidate
        // is additionally discounted by the weight of the top candidate's
        // own no-split outcome, so that alternatives to a confident cut pay
        // for disagreeing with it.
        let mut top_candidate_weight = 1.0;
        let mut sequences: Vec<ShapeSequence> = Vec::new();
        for (i, (split, prob)) in candidates.iter().enumerate() {
            let top_candidate = i == 0;
            let normalized_prob = if max_prob > 0.0 { prob / max_prob } else { 0.0 };
            if split.is_no_split() {
                let mut weighted_prob = normalized_prob;
                if !top_candidate {
                    weighted_prob *= top_candidate_weight;
                }
                let mut sequence = ShapeSequence::new();
                sequence.add_derived_shape(shape.clone(), original.clone());
                sequence.add_decision(Decision::new(DecisionOutcome::DoNotSplit, weighted_prob));
                sequences.push(sequence);
            } else {
                let position = split.position();
                let left = shape.sub_shape(0, position);
                let right = shape.sub_shape(position + 1, shape.width() - 1);
                let left_sequences =
                    self.split_recursive(&left, depth + 1, original, left_to_right);
                let right_sequences =
                    self.split_recursive(&right, depth + 1, original, left_to_right);

                if top_candidate {
                    let left_no_split = left_sequences
                        .iter()
                        .find(|s| s.len() == 1)
                        .map(ShapeSequence::score)
                        .unwrap_or(1.0);
                    let right_no_split = right_sequences
                        .iter()
                        .find(|s| s.len() == 1)
                        .map(ShapeSequence::score)
                        .unwrap_or(1.0);
                    top_candidate_weight = left_no_split * right_no_split;
                    trace!(top_candidate_weight, "weight of the top cut's no-split outcomes");
                }

                for (left_sequence, right_sequence) in
                    iproduct!(&left_sequences, &right_sequences)
                {
                    let mut combined = if left_to_right {
                        ShapeSequence::concat(left_sequence, right_sequence)
                    } else {
                        ShapeSequence::concat(right_sequence, left_sequence)
                    };
                    // Fold the sub-sequences' histories into one decision so
                    // the geometric mean does not dilute deep splits.
                    let total_prob = combined.decision_product();
                    combined.clear_decisions();
                    let mut weighted_prob = total_prob * normalized_prob;
                    if !top_candidate {
                        weighted_prob *= top_candidate_weight;
                    }
                    combined.add_decision(Decision::new(DecisionOutcome::DoSplit, weighted_prob));
                    sequences.push(combined);
                }
            }
        }

        // Rank by score; singletons always survive the beam so the
        // no-split hypothesis can never be pruned away.
        sequences.sort_by(|a, b| b.score().total_cmp(&a.score()));
        let retained: Vec<ShapeSequence> = sequences
            .into_iter()
            .enumerate()
            .filter(|(i, sequence)| sequence.len() == 1 || *i < self.beam_width)
            .map(|(_, sequence)| sequence)
            .collect();
        debug!(
            %shape,
            depth,
            sequences = retained.len(),
            "split hypotheses retained"
        );
        retained
    }
}

impl ShapeSplitter for RecursiveShapeSplitter {
    fn split(&self, shape: &Shape) -> BoundaryResult<Vec<ShapeSequence>> {
        let left_to_right = shape.page().is_left_to_right();
        Ok(self.split_recursive(shape, 0, shape, left_to_right))
    }
}

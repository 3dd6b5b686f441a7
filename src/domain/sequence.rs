//! Scored sequences of shapes.

use std::fmt;

use crate::domain::shape::Shape;

/// The outcome labels attached to weighted decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// A shape was split at a candidate position.
    DoSplit,
    /// A shape was kept whole.
    DoNotSplit,
    /// Two adjacent shapes were fused.
    DoMerge,
    /// Two adjacent shapes were kept apart.
    DoNotMerge,
}

/// A weighted decision taken while building a sequence.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    /// The outcome label.
    pub outcome: DecisionOutcome,
    /// The probability assigned to the outcome, in `[0, 1]`.
    pub probability: f64,
}

impl Decision {
    /// Creates a decision with the given outcome and probability.
    pub fn new(outcome: DecisionOutcome, probability: f64) -> Self {
        Self {
            outcome,
            probability,
        }
    }
}

/// A shape placed at a specific index inside a [`ShapeSequence`].
///
/// Carries the list of original, pre-transform shapes it was derived from,
/// for traceability when shapes are split and merged repeatedly.
#[derive(Debug, Clone)]
pub struct ShapeInSequence {
    shape: Shape,
    index: usize,
    original_shapes: Vec<Shape>,
}

impl ShapeInSequence {
    /// The shape at this position.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The position of this shape within its sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The original shapes this shape was derived from.
    pub fn original_shapes(&self) -> &[Shape] {
        &self.original_shapes
    }
}

/// An ordered sequence of shapes resulting from splits and merges, with the
/// weighted decisions that produced it.
///
/// The sequence's score is the geometric mean of its decision
/// probabilities; a sequence with no decisions scores 1.0. Scores are
/// recomputed on demand and never cached.
#[derive(Debug, Clone, Default)]
pub struct ShapeSequence {
    shapes: Vec<ShapeInSequence>,
    decisions: Vec<Decision>,
}

impl ShapeSequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combines two sequences into one, concatenating both the shapes and
    /// the decision histories and re-indexing the shapes.
    pub fn concat(first: &ShapeSequence, second: &ShapeSequence) -> Self {
        let mut combined = ShapeSequence {
            shapes: Vec::with_capacity(first.len() + second.len()),
            decisions: Vec::with_capacity(first.decisions.len() + second.decisions.len()),
        };
        for entry in first.iter().chain(second.iter()) {
            combined.push_entry(entry.clone());
        }
        combined.decisions.extend_from_slice(&first.decisions);
        combined.decisions.extend_from_slice(&second.decisions);
        combined
    }

    /// Appends a shape that is its own original.
    pub fn add_shape(&mut self, shape: Shape) {
        let originals = vec![shape.clone()];
        self.push_entry_parts(shape, originals);
    }

    /// Appends a shape derived from a single original shape.
    pub fn add_derived_shape(&mut self, shape: Shape, original: Shape) {
        self.push_entry_parts(shape, vec![original]);
    }

    /// Appends a shape derived from several original shapes, such as the
    /// result of a merge.
    pub fn add_merged_shape(&mut self, shape: Shape, originals: Vec<Shape>) {
        self.push_entry_parts(shape, originals);
    }

    /// Appends an existing sequence entry, re-indexing it for this
    /// sequence.
    pub fn push_entry(&mut self, entry: ShapeInSequence) {
        let index = self.shapes.len();
        self.shapes.push(ShapeInSequence { index, ..entry });
    }

    fn push_entry_parts(&mut self, shape: Shape, original_shapes: Vec<Shape>) {
        let index = self.shapes.len();
        self.shapes.push(ShapeInSequence {
            shape,
            index,
            original_shapes,
        });
    }

    /// Removes and returns the last shape of the sequence.
    pub fn pop_shape(&mut self) -> Option<ShapeInSequence> {
        self.shapes.pop()
    }

    /// Records a weighted decision.
    pub fn add_decision(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    /// The decisions taken while building this sequence.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// The product of all decision probabilities (1.0 when empty).
    pub fn decision_product(&self) -> f64 {
        self.decisions.iter().map(|d| d.probability).product()
    }

    /// Discards the decision history. Used by the recursive splitter, which
    /// folds the history of a concatenated sequence into one synthetic
    /// decision.
    pub fn clear_decisions(&mut self) {
        self.decisions.clear();
    }

    /// The score of this sequence: the geometric mean of its decision
    /// probabilities, or 1.0 when no decision was taken.
    pub fn score(&self) -> f64 {
        if self.decisions.is_empty() {
            return 1.0;
        }
        self.decision_product()
            .powf(1.0 / self.decisions.len() as f64)
    }

    /// The entries of this sequence, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ShapeInSequence> {
        self.shapes.iter()
    }

    /// The entry at the given index.
    pub fn get(&self, index: usize) -> Option<&ShapeInSequence> {
        self.shapes.get(index)
    }

    /// The first entry.
    pub fn first(&self) -> Option<&ShapeInSequence> {
        self.shapes.first()
    }

    /// The last entry.
    pub fn last(&self) -> Option<&ShapeInSequence> {
        self.shapes.last()
    }

    /// Number of shapes in the sequence.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the sequence holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl<'a> IntoIterator for &'a ShapeSequence {
    type Item = &'a ShapeInSequence;
    type IntoIter = std::slice::Iter<'a, ShapeInSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

impl fmt::Display for ShapeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.shapes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({},{})", entry.shape().left(), entry.shape().right())?;
        }
        write!(f, "]")
    }
}

//! Ground-truth boundary events from an annotated corpus.
//!
//! Training corpora annotate each raw shape with the letters it contains
//! and, for fused shapes, with the cut positions separating them. A `|`
//! marker inside a letter annotation denotes a letter broken across two
//! shapes: the earlier shape carries `|x` and the later one `x|`, or one
//! side is an unannotated fragment. This module turns those annotations
//! into the split and merge events the scoring models are trained on.

use tracing::trace;

use crate::core::errors::{BoundaryError, BoundaryResult};
use crate::domain::{Group, LinguisticsProfile, Shape, ShapePair, ShapeSequence};

/// Splits annotated shapes at their ground-truth cut positions.
pub struct TrainingShapeSplitter {
    profile: LinguisticsProfile,
}

impl TrainingShapeSplitter {
    /// Creates a splitter for the given linguistics profile.
    pub fn new(profile: LinguisticsProfile) -> Self {
        Self { profile }
    }

    /// Splits the shape at `index` of the group into its annotated
    /// letters.
    ///
    /// Shapes annotated with exactly one letter, or with a single
    /// dual-character letter, come back as a singleton sequence. The group
    /// is needed because an ambiguous broken-letter marker is resolved by
    /// looking at the neighbouring shapes' annotations.
    pub fn split(&self, group: &Group, index: usize) -> BoundaryResult<ShapeSequence> {
        let shape = group
            .get(index)
            .ok_or_else(|| BoundaryError::invalid_input("shape index out of range"))?;
        let letter = shape.letter();
        let test_letter: String = letter.chars().filter(|&c| c != '|').collect();

        let mut sequence = ShapeSequence::new();
        if test_letter.chars().count() == 1 || self.profile.is_dual_character_letter(&test_letter)
        {
            sequence.add_shape(shape.clone());
            return Ok(sequence);
        }

        let mut positions = shape.splits().to_vec();
        positions.sort_unstable();
        let mut pieces: Vec<Shape> = Vec::with_capacity(positions.len() + 1);
        let mut start = 0;
        for &position in &positions {
            pieces.push(shape.sub_shape(start, position));
            start = position + 1;
        }
        pieces.push(shape.sub_shape(start, shape.width() - 1));
        if !self.profile.is_left_to_right() {
            pieces.reverse();
        }

        let parsed = self.parse_letters(letter);
        let letters = self.resolve_markers(group, index, parsed)?;
        if letters.len() != pieces.len() {
            return Err(BoundaryError::invalid_annotation(
                shape,
                format!(
                    "{} letters for {} annotated pieces in {letter:?}",
                    letters.len(),
                    pieces.len()
                ),
            ));
        }

        trace!(%shape, ?letters, "ground-truth split");
        for (piece, piece_letter) in pieces.into_iter().zip(letters) {
            sequence.add_derived_shape(piece.with_letter(piece_letter), shape.clone());
        }
        Ok(sequence)
    }

    /// Splits a fused shape's annotation into letter units, keeping
    /// dual-character letters whole. A broken-letter marker comes back as
    /// its own `"|"` unit; an empty annotation yields one empty unit.
    fn parse_letters(&self, letter: &str) -> Vec<String> {
        let mut letters: Vec<String> = Vec::new();
        let mut pending: Option<char> = None;
        for c in letter.chars() {
            match pending {
                None => pending = Some(c),
                Some(last) => {
                    let pair: String = [last, c].iter().collect();
                    if self.profile.is_dual_character_letter(&pair) {
                        letters.push(pair);
                        pending = None;
                    } else {
                        letters.push(last.to_string());
                        pending = Some(c);
                    }
                }
            }
        }
        if let Some(last) = pending {
            letters.push(last.to_string());
        }
        if letters.is_empty() {
            letters.push(String::new());
        }
        letters
    }

    /// Attaches each `"|"` unit to the letter it belongs to, yielding one
    /// letter per annotated piece.
    fn resolve_markers(
        &self,
        group: &Group,
        index: usize,
        parsed: Vec<String>,
    ) -> BoundaryResult<Vec<String>> {
        if !parsed.iter().any(|unit| unit == "|") {
            return Ok(parsed);
        }
        let shape = group
            .get(index)
            .ok_or_else(|| BoundaryError::invalid_input("shape index out of range"))?;
        let n = parsed.len();
        let mut resolved: Vec<String> = Vec::new();
        let mut open_split = false;
        for (i, unit) in parsed.iter().enumerate() {
            if unit == "|" {
                let backwards = if i == 1 && i + 2 == n {
                    // a lone marker between two letters could close the
                    // first or open the second; the neighbouring shapes'
                    // annotations decide
                    self.marker_attaches_backwards(group, index, &parsed)?
                } else if i == 1 {
                    true
                } else if i + 2 == n {
                    false
                } else {
                    return Err(BoundaryError::invalid_annotation(
                        shape,
                        format!("misplaced broken-letter marker in {:?}", shape.letter()),
                    ));
                };
                if backwards {
                    match resolved.first_mut() {
                        Some(first) => first.push('|'),
                        None => {
                            return Err(BoundaryError::invalid_annotation(
                                shape,
                                format!(
                                    "marker with no preceding letter in {:?}",
                                    shape.letter()
                                ),
                            ))
                        }
                    }
                } else {
                    open_split = true;
                }
            } else if open_split {
                resolved.push(format!("|{unit}"));
                open_split = false;
            } else {
                resolved.push(unit.clone());
            }
        }
        Ok(resolved)
    }

    /// Resolves the ambiguous `"x|y"` annotation: returns true when the
    /// marker closes `x`, false when it opens `y`.
    ///
    /// Only an existing neighbour can resolve the marker. A shape at the
    /// edge of its group has no neighbour on that side, which is not the
    /// same as a neighbour with an empty annotation.
    fn marker_attaches_backwards(
        &self,
        group: &Group,
        index: usize,
        parsed: &[String],
    ) -> BoundaryResult<bool> {
        let previous_shape = index.checked_sub(1).and_then(|i| group.get(i));
        let next_shape = group.get(index + 1);
        let first_letter = &parsed[0];
        let last_letter = &parsed[2];

        if let Some(previous) = previous_shape {
            if previous.letter() == format!("|{first_letter}") {
                return Ok(true);
            }
        }
        if let Some(next) = next_shape {
            if next.letter() == format!("{last_letter}|") {
                return Ok(false);
            }
        }
        if previous_shape.is_some_and(|s| s.letter().is_empty()) {
            return Ok(true);
        }
        if next_shape.is_some_and(|s| s.letter().is_empty()) {
            return Ok(false);
        }
        let shape = group
            .get(index)
            .ok_or_else(|| BoundaryError::invalid_input("shape index out of range"))?;
        Err(BoundaryError::invalid_annotation(
            shape,
            format!("cannot place broken-letter marker in {first_letter}|{last_letter}"),
        ))
    }
}

/// Whether the annotations of a pair of consecutive shapes mark them as
/// two fragments of one letter.
///
/// True when the first shape opens a broken letter and the second closes
/// it, or when one side carries the marker and the other is an
/// unannotated fragment.
pub fn annotated_merge(pair: &ShapePair) -> bool {
    let first = pair.first().letter();
    let second = pair.second().letter();
    (first.starts_with('|') && (second.is_empty() || second.ends_with('|')))
        || (second.ends_with('|') && first.is_empty())
}

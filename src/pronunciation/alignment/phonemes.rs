use crate::pronunciation::phonemes::PhonemeString;
use crate::pronunciation::{Mismatch, MismatchKind};

use super::edit::edit_table;

/// Result of aligning an attempted phoneme sequence against its target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhonemeAlignment {
    pub distance: usize,
    /// Ordered by target position; length always equals `distance`.
    pub mismatches: Vec<Mismatch>,
}

impl PhonemeAlignment {
    pub fn count(&self, kind: MismatchKind) -> usize {
        self.mismatches.iter().filter(|m| m.kind == kind).count()
    }

    /// Fraction of target phonemes realised without error, in [0, 1].
    pub fn accuracy(&self, target_len: usize) -> f32 {
        if target_len == 0 {
            return if self.distance == 0 { 1.0 } else { 0.0 };
        }
        (1.0 - self.distance as f32 / target_len as f32).clamp(0.0, 1.0)
    }
}

/// Edit-distance aligner that localises substituted, omitted and inserted phonemes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhonemeAligner;

impl PhonemeAligner {
    pub fn new() -> Self {
        Self
    }

    pub fn align(&self, target: &PhonemeString, actual: &PhonemeString) -> PhonemeAlignment {
        align_symbols(target.symbols(), actual.symbols())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Match,
    Substitute,
    Omit,
    Insert,
}

/// Aligns `actual` against `target` and lists every non-matching step.
///
/// When several predecessors reach the same minimal cost the backtrace prefers, in order:
/// an exact match, a substitution, an omission (target symbol skipped), an insertion
/// (extra symbol in the attempt). Insertions are positioned at the target index they precede.
pub fn align_symbols<S: AsRef<str>>(target: &[S], actual: &[S]) -> PhonemeAlignment {
    let target: Vec<&str> = target.iter().map(AsRef::as_ref).collect();
    let actual: Vec<&str> = actual.iter().map(AsRef::as_ref).collect();
    let table = edit_table(&actual, &target);
    let distance = table[[actual.len(), target.len()]];

    let mut mismatches = Vec::with_capacity(distance);
    let (mut i, mut j) = (actual.len(), target.len());
    while i > 0 || j > 0 {
        let here = table[[i, j]];
        let diagonal = (i > 0 && j > 0).then(|| table[[i - 1, j - 1]]);
        let step = if diagonal == Some(here) && actual[i - 1] == target[j - 1] {
            Step::Match
        } else if diagonal.map(|d| d + 1) == Some(here) {
            Step::Substitute
        } else if j > 0 && table[[i, j - 1]] + 1 == here {
            Step::Omit
        } else {
            Step::Insert
        };

        match step {
            Step::Match => {
                i -= 1;
                j -= 1;
            }
            Step::Substitute => {
                mismatches.push(Mismatch::substitution(j - 1, target[j - 1], actual[i - 1]));
                i -= 1;
                j -= 1;
            }
            Step::Omit => {
                mismatches.push(Mismatch::omission(j - 1, target[j - 1]));
                j -= 1;
            }
            Step::Insert => {
                mismatches.push(Mismatch::insertion(j, actual[i - 1]));
                i -= 1;
            }
        }
    }
    mismatches.reverse();
    debug_assert_eq!(mismatches.len(), distance);

    PhonemeAlignment {
        distance,
        mismatches,
    }
}

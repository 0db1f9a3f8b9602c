use std::collections::BTreeSet;

use crate::pronunciation::alignment::levenshtein;

const TARGET_IN_RECOGNIZED: f32 = 0.95;
const RECOGNIZED_IN_TARGET: f32 = 0.90;
const JACCARD_WEIGHT: f32 = 0.3;
const SEQUENCE_WEIGHT: f32 = 0.5;
const LENGTH_WEIGHT: f32 = 0.2;

/// Orthographic similarity between what the recognizer heard and the target word.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordSimilarityScorer;

impl WordSimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Similarity in [0, 1]; the first matching rule wins:
    /// exact match, target inside recognized, recognized inside target, weighted blend.
    pub fn similarity(&self, recognized: &str, target: &str) -> f32 {
        let recognized: Vec<char> = fold_text(recognized).chars().collect();
        let target: Vec<char> = fold_text(target).chars().collect();

        if recognized == target {
            return 1.0;
        }
        if !recognized.is_empty() && !target.is_empty() {
            if contains(&recognized, &target) {
                return TARGET_IN_RECOGNIZED;
            }
            if contains(&target, &recognized) {
                return RECOGNIZED_IN_TARGET;
            }
        }
        blend(&recognized, &target)
    }
}

/// Lower-cases and drops all whitespace.
pub fn fold_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn contains(haystack: &[char], needle: &[char]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|window| window == needle)
}

fn blend(recognized: &[char], target: &[char]) -> f32 {
    let longest = recognized.len().max(target.len());
    let shortest = recognized.len().min(target.len());
    if longest == 0 {
        return 0.0;
    }
    let sequence = 1.0 - levenshtein(recognized, target) as f32 / longest as f32;
    let length_ratio = shortest as f32 / longest as f32;
    let score = JACCARD_WEIGHT * jaccard(recognized, target)
        + SEQUENCE_WEIGHT * sequence
        + LENGTH_WEIGHT * length_ratio;
    score.clamp(0.0, 1.0)
}

fn jaccard(a: &[char], b: &[char]) -> f32 {
    let left: BTreeSet<char> = a.iter().copied().collect();
    let right: BTreeSet<char> = b.iter().copied().collect();
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f32 / union as f32
}

pub mod alignment;
pub mod cli;
pub mod config;
pub mod engine;
pub mod features;
pub mod feedback;
pub mod metrics;
pub mod phonemes;

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::types::AudioRole;

pub use config::{DtwConfig, FeedbackConfig, FusionConfig, ScoringConfig};
pub use engine::{ScoringEngine, ScoringEngineBuilder, ScoringRequest};

/// Convenient alias for results returned by pronunciation modules.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Failures that abort a scoring request.
///
/// `TranscriberUnavailable` is the only kind the engine itself recovers from; it
/// surfaces here so standalone callers of the phoneme stage can still see it.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("{0} audio is empty after decoding")]
    EmptyAudio(AudioRole),

    #[error("audio decoding failed: {0}")]
    Decode(String),

    #[error("feature extractor returned a malformed sequence: {0}")]
    MalformedFeatureSequence(String),

    #[error("cannot align an empty feature sequence")]
    EmptySequence,

    #[error("feature dimensions differ: {left} vs {right} coefficients")]
    DimensionMismatch { left: usize, right: usize },

    #[error("unsupported language code \"{0}\"")]
    UnsupportedLanguage(String),

    #[error("speech recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    #[error("phoneme transcriber unavailable: {0}")]
    TranscriberUnavailable(String),

    #[error("invalid target word: {0}")]
    InvalidTarget(String),

    #[error("invalid scoring configuration: {0}")]
    Config(String),
}

/// How a phoneme in the learner's attempt departs from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Both symbols present but different.
    Substitution,
    /// Target symbol with no counterpart in the attempt.
    Omission,
    /// Extra symbol in the attempt with no counterpart in the target.
    Insertion,
}

impl Display for MismatchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MismatchKind::Substitution => "substitution",
            MismatchKind::Omission => "omission",
            MismatchKind::Insertion => "insertion",
        };
        f.write_str(label)
    }
}

/// One localized phoneme error, positioned relative to the target sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub position: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub kind: MismatchKind,
}

impl Mismatch {
    pub fn substitution(position: usize, expected: &str, actual: &str) -> Self {
        Self {
            position,
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
            kind: MismatchKind::Substitution,
        }
    }

    pub fn omission(position: usize, expected: &str) -> Self {
        Self {
            position,
            expected: Some(expected.to_string()),
            actual: None,
            kind: MismatchKind::Omission,
        }
    }

    pub fn insertion(position: usize, actual: &str) -> Self {
        Self {
            position,
            expected: None,
            actual: Some(actual.to_string()),
            kind: MismatchKind::Insertion,
        }
    }
}

/// Numeric outcome of a scoring request. All scores live in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub overall_score: f32,
    pub dtw_score: f32,
    pub phoneme_score: f32,
    pub recognized_text: String,
    pub target_word: String,
    pub dtw_distance: f32,
    pub reference_text: String,
    pub confidence: f32,
    pub path_length: usize,
}

/// Best-effort phoneme-level breakdown of an attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhonemeAnalysis {
    pub target_ipa: String,
    pub actual_ipa: String,
    pub mismatches: Vec<Mismatch>,
    pub feedback_text: String,
}

/// Everything the engine hands back for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringOutcome {
    pub score: ScoreResult,
    pub feedback: String,
    pub phoneme_analysis: Option<PhonemeAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_constructors_fill_expected_sides() {
        let sub = Mismatch::substitution(0, "k", "b");
        assert_eq!(sub.kind, MismatchKind::Substitution);
        assert_eq!(sub.actual.as_deref(), Some("b"));

        let omitted = Mismatch::omission(2, "t");
        assert!(omitted.actual.is_none());

        let inserted = Mismatch::insertion(3, "s");
        assert!(inserted.expected.is_none());
        assert_eq!(inserted.kind.to_string(), "insertion");
    }

    #[test]
    fn errors_render_their_context() {
        let err = ScoringError::EmptyAudio(AudioRole::User);
        assert_eq!(err.to_string(), "user audio is empty after decoding");
        let err = ScoringError::UnsupportedLanguage("xx".to_string());
        assert!(err.to_string().contains("\"xx\""));
    }
}

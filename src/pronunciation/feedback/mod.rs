mod hints;

pub use hints::articulation_hint;

use crate::pronunciation::config::FeedbackConfig;
use crate::pronunciation::metrics::fold_text;
use crate::pronunciation::{Mismatch, MismatchKind, ScoreResult};

const ALL_CORRECT: &str = "All sounds pronounced correctly!";

/// Turns scores and phoneme mismatches into learner-facing text. Never alters scores.
#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    config: FeedbackConfig,
}

impl FeedbackGenerator {
    pub fn new(config: FeedbackConfig) -> Self {
        Self { config }
    }

    /// Score-driven sentences, followed by the grouped mismatch report when available.
    pub fn generate(&self, score: &ScoreResult, mismatches: Option<&[Mismatch]>) -> String {
        let mut parts = vec![self.headline(score.overall_score).to_string()];

        if fold_text(&score.recognized_text) != fold_text(&score.target_word)
            && score.phoneme_score < self.config.mismatch_threshold
        {
            parts.push(recognition_sentence(&score.recognized_text, &score.target_word));
        }

        let weak_dtw = score.dtw_score < self.config.tip_threshold;
        let weak_phoneme = score.phoneme_score < self.config.tip_threshold;
        match (weak_dtw, weak_phoneme) {
            (true, true) => {
                parts.push("Focus on both the sounds and the rhythm of the word.".to_string())
            }
            (true, false) => parts
                .push("Try to match the natural timing and stress pattern of the word.".to_string()),
            (false, true) => parts.push(
                "Pay attention to articulating each individual sound clearly.".to_string(),
            ),
            (false, false) => {}
        }

        if score.dtw_distance > self.config.pacing_distance {
            parts.push(
                "Try to keep a pace closer to the reference recording, neither rushed nor drawn out."
                    .to_string(),
            );
        }

        let mut text = parts.join(" ");
        if let Some(mismatches) = mismatches {
            text.push('\n');
            text.push_str(&self.render_mismatches(mismatches));
        }
        text
    }

    /// Groups mismatches by kind with an articulation hint for each expected sound.
    pub fn render_mismatches(&self, mismatches: &[Mismatch]) -> String {
        if mismatches.is_empty() {
            return ALL_CORRECT.to_string();
        }
        let groups = [
            (MismatchKind::Substitution, "Sounds to adjust:"),
            (MismatchKind::Omission, "Missing sounds:"),
            (MismatchKind::Insertion, "Extra sounds:"),
        ];
        let mut lines = Vec::new();
        for (kind, title) in groups {
            let entries: Vec<String> = mismatches
                .iter()
                .filter(|m| m.kind == kind)
                .map(describe)
                .collect();
            if entries.is_empty() {
                continue;
            }
            lines.push(title.to_string());
            lines.extend(entries.into_iter().map(|entry| format!("- {entry}")));
        }
        lines.join("\n")
    }

    fn headline(&self, overall: f32) -> &'static str {
        let config = &self.config;
        if overall >= config.excellent {
            "Excellent pronunciation!"
        } else if overall >= config.very_good {
            "Very good pronunciation!"
        } else if overall >= config.good {
            "Good pronunciation."
        } else if overall >= config.decent {
            "Decent pronunciation, but it could be better."
        } else if overall >= config.fair {
            "Fair attempt; keep practising."
        } else {
            "This word needs more practice."
        }
    }
}

fn recognition_sentence(recognized: &str, target: &str) -> String {
    if recognized.trim().is_empty() {
        "I couldn't make out what you said clearly.".to_string()
    } else {
        format!("I heard '{}' (expected '{}').", recognized.trim(), target.trim())
    }
}

fn describe(mismatch: &Mismatch) -> String {
    let expected = mismatch.expected.as_deref().unwrap_or_default();
    let actual = mismatch.actual.as_deref().unwrap_or_default();
    let sentence = match mismatch.kind {
        MismatchKind::Substitution => format!("/{expected}/ sounded like /{actual}/"),
        MismatchKind::Omission => format!("/{expected}/ was missing"),
        MismatchKind::Insertion => return format!("/{actual}/ was added"),
    };
    match articulation_hint(expected) {
        Some(hint) => format!("{sentence}: {hint}"),
        None => sentence,
    }
}

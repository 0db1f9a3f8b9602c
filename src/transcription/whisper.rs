use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{Recognition, SpeechRecognizer};
use crate::pronunciation::phonemes::Language;
use crate::pronunciation::{Result, ScoringError};
use crate::types::{AudioSignal, TARGET_SAMPLE_RATE};

/// whisper.cpp model loaded through whisper-rs.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
}

impl WhisperRecognizer {
    /// Loads a ggml model, e.g. `ggml-base.bin` from huggingface.co/ggerganov/whisper.cpp.
    pub fn load(model_path: &Path) -> Result<Self> {
        let path = model_path.to_str().ok_or_else(|| {
            ScoringError::RecognizerUnavailable(format!(
                "model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|err| {
                ScoringError::RecognizerUnavailable(format!(
                    "failed to load whisper model {path}: {err}"
                ))
            })?;
        Ok(Self { ctx })
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn recognize(&self, signal: &AudioSignal, language: &Language) -> Result<Recognition> {
        if signal.sample_rate != TARGET_SAMPLE_RATE {
            return Err(ScoringError::RecognizerUnavailable(format!(
                "whisper expects {TARGET_SAMPLE_RATE} Hz audio, got {}",
                signal.sample_rate
            )));
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language.recognizer));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|err| unavailable("failed to create whisper state", err))?;
        state
            .full(params, &signal.samples)
            .map_err(|err| unavailable("failed to transcribe audio", err))?;

        let mut text = String::new();
        let mut speech_probability = Vec::new();
        for segment in state.as_iter() {
            let piece = segment
                .to_str()
                .map_err(|err| unavailable("failed to read segment text", err))?;
            text.push_str(piece);
            text.push(' ');
            speech_probability.push(1.0 - segment.no_speech_probability());
        }

        let confidence = if speech_probability.is_empty() {
            0.0
        } else {
            speech_probability.iter().sum::<f32>() / speech_probability.len() as f32
        };
        Ok(Recognition::new(&text, confidence))
    }
}

fn unavailable(context: &str, err: impl std::fmt::Display) -> ScoringError {
    ScoringError::RecognizerUnavailable(format!("{context}: {err}"))
}

//! Speech recognition - turns prepared 16 kHz audio into text.
//!
//! The engine only sees the [`SpeechRecognizer`] contract. The whisper-rs
//! backend is compiled in with the `whisper` feature; without it the default
//! recognizer reports itself unavailable at scoring time.

#[cfg(feature = "whisper")]
mod whisper;

use std::fmt;
use std::path::PathBuf;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::pronunciation::phonemes::Language;
use crate::pronunciation::{Result, ScoringError};
use crate::types::AudioSignal;

#[cfg(feature = "whisper")]
pub use whisper::WhisperRecognizer;

/// Environment variable naming the whisper model file.
pub const MODEL_PATH_ENV: &str = "WHISPER_MODEL_PATH";
const DEFAULT_MODEL_PATH: &str = "./models/ggml-base.bin";

/// Recognized text and how sure the recognizer was about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recognition {
    pub text: String,
    pub confidence: f32,
}

impl Recognition {
    /// Normalizes the text and clamps confidence into [0, 1].
    pub fn new(text: &str, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            text: normalize_transcript(text),
            confidence,
        }
    }
}

/// Transcribes a mono 16 kHz signal spoken in `language`.
pub trait SpeechRecognizer: Send + Sync {
    fn recognize(&self, signal: &AudioSignal, language: &Language) -> Result<Recognition>;
}

/// Lower-cases, drops punctuation other than apostrophes and collapses whitespace.
pub fn normalize_transcript(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '\'' || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect::<String>()
        .to_lowercase();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

type Loader<R> = Box<dyn Fn() -> Result<R> + Send + Sync>;

/// Defers loading a recognizer model until the first request, then shares it.
///
/// Concurrent first calls block on a single initialization. A failed load is
/// not cached, so a later call retries.
pub struct LazyRecognizer<R> {
    name: String,
    loader: Loader<R>,
    loaded: OnceCell<R>,
}

impl<R: SpeechRecognizer> LazyRecognizer<R> {
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<R> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            loader: Box::new(loader),
            loaded: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    fn get(&self) -> Result<&R> {
        self.loaded.get_or_try_init(|| {
            let recognizer = (self.loader)()?;
            tracing::info!(recognizer = %self.name, "speech recognizer loaded");
            Ok(recognizer)
        })
    }
}

impl<R> fmt::Debug for LazyRecognizer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRecognizer")
            .field("name", &self.name)
            .field("loaded", &self.loaded.get().is_some())
            .finish()
    }
}

impl<R: SpeechRecognizer> SpeechRecognizer for LazyRecognizer<R> {
    fn recognize(&self, signal: &AudioSignal, language: &Language) -> Result<Recognition> {
        self.get()?.recognize(signal, language)
    }
}

/// Stand-in used when no recognition backend is compiled in.
#[derive(Debug, Clone)]
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SpeechRecognizer for UnavailableRecognizer {
    fn recognize(&self, _: &AudioSignal, _: &Language) -> Result<Recognition> {
        Err(ScoringError::RecognizerUnavailable(self.reason.clone()))
    }
}

/// Model path from the override, then `WHISPER_MODEL_PATH`, then `./models/ggml-base.bin`.
pub fn resolve_model_path(model: Option<PathBuf>) -> PathBuf {
    model
        .or_else(|| std::env::var_os(MODEL_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// The recognizer the binary uses: lazily loaded whisper when available.
#[cfg(feature = "whisper")]
pub fn default_recognizer(model: Option<PathBuf>) -> Box<dyn SpeechRecognizer> {
    let path = resolve_model_path(model);
    let name = path.display().to_string();
    Box::new(LazyRecognizer::new(name, move || {
        WhisperRecognizer::load(&path)
    }))
}

/// The recognizer the binary uses: lazily loaded whisper when available.
#[cfg(not(feature = "whisper"))]
pub fn default_recognizer(model: Option<PathBuf>) -> Box<dyn SpeechRecognizer> {
    let path = resolve_model_path(model);
    Box::new(UnavailableRecognizer::new(format!(
        "built without the `whisper` feature; cannot load {}",
        path.display()
    )))
}

pub mod espeak;
pub mod ipa;
pub mod language;
pub mod lexicon;

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use super::ScoringError;

pub use espeak::EspeakTranscriber;
pub use language::Language;
pub use lexicon::{Lexicon, LexiconTranscriber};

/// Ordered phoneme symbols (IPA tokens, each one or more characters).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhonemeString {
    symbols: Vec<String>,
}

impl PhonemeString {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// Tokenizes a raw IPA transcription.
    pub fn from_ipa(ipa: &str) -> Self {
        Self::new(ipa::tokenize(ipa))
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Concatenated IPA form, e.g. `kæt`.
    pub fn to_ipa(&self) -> String {
        self.symbols.concat()
    }
}

impl Display for PhonemeString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_ipa())
    }
}

impl<S: Into<String>> FromIterator<S> for PhonemeString {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Grapheme-to-phoneme failures; all of them are recoverable for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptionError {
    #[error("no phoneme transcriber for language \"{0}\"")]
    UnsupportedLanguage(String),

    #[error("phoneme transcriber unavailable: {0}")]
    TranscriberUnavailable(String),

    #[error("no pronunciation known for \"{0}\"")]
    NoPronunciation(String),
}

impl From<TranscriptionError> for ScoringError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::UnsupportedLanguage(code) => ScoringError::UnsupportedLanguage(code),
            other => ScoringError::TranscriberUnavailable(other.to_string()),
        }
    }
}

/// Converts written text into phoneme symbols for a language.
pub trait GraphemeToPhoneme: Send + Sync {
    fn name(&self) -> &str;

    fn transcribe(&self, text: &str, language_code: &str) -> Result<PhonemeString, TranscriptionError>;
}

/// Tries each transcriber in order and returns the first success.
#[derive(Default)]
pub struct TranscriberChain {
    transcribers: Vec<Box<dyn GraphemeToPhoneme>>,
}

impl TranscriberChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, transcriber: impl GraphemeToPhoneme + 'static) -> Self {
        self.transcribers.push(Box::new(transcriber));
        self
    }

    /// Bundled lexicon first, espeak-ng for everything it does not know.
    pub fn standard() -> Self {
        Self::new()
            .with(LexiconTranscriber::new())
            .with(EspeakTranscriber::new())
    }
}

impl GraphemeToPhoneme for TranscriberChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn transcribe(&self, text: &str, language_code: &str) -> Result<PhonemeString, TranscriptionError> {
        let mut last_error = TranscriptionError::TranscriberUnavailable(
            "no transcribers configured".to_string(),
        );
        for transcriber in &self.transcribers {
            match transcriber.transcribe(text, language_code) {
                Ok(phonemes) => return Ok(phonemes),
                Err(err) => {
                    tracing::debug!(transcriber = transcriber.name(), error = %err, "transcriber declined");
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(TranscriptionError);

    impl GraphemeToPhoneme for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn transcribe(&self, _: &str, _: &str) -> Result<PhonemeString, TranscriptionError> {
            Err(self.0.clone())
        }
    }

    #[test]
    fn chain_falls_through_to_next_transcriber() {
        let chain = TranscriberChain::new()
            .with(Failing(TranscriptionError::NoPronunciation("cat".into())))
            .with(LexiconTranscriber::new());
        let phonemes = chain.transcribe("cat", "en").unwrap();
        assert_eq!(phonemes.symbols(), &["k", "æ", "t"]);
    }

    #[test]
    fn chain_reports_last_failure() {
        let chain = TranscriberChain::new()
            .with(Failing(TranscriptionError::NoPronunciation("x".into())))
            .with(Failing(TranscriptionError::TranscriberUnavailable("gone".into())));
        assert_eq!(
            chain.transcribe("x", "en").unwrap_err(),
            TranscriptionError::TranscriberUnavailable("gone".into())
        );
        assert!(TranscriberChain::new().transcribe("x", "en").is_err());
    }

    #[test]
    fn phoneme_string_round_trips_through_ipa() {
        let phonemes: PhonemeString = ["tʃ", "ɝ", "tʃ"].into_iter().collect();
        assert_eq!(phonemes.to_string(), "tʃɝtʃ");
        assert_eq!(PhonemeString::from_ipa(&phonemes.to_ipa()), phonemes);
    }

    #[test]
    fn unsupported_language_stays_distinct_when_converted() {
        let err: ScoringError = TranscriptionError::UnsupportedLanguage("xx".into()).into();
        assert!(matches!(err, ScoringError::UnsupportedLanguage(_)));
        let err: ScoringError = TranscriptionError::NoPronunciation("x".into()).into();
        assert!(matches!(err, ScoringError::TranscriberUnavailable(_)));
    }
}

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::language::Language;
use super::{GraphemeToPhoneme, PhonemeString, TranscriptionError};

const DEFAULT_PROGRAM: &str = "espeak-ng";

/// Transcriber that shells out to `espeak-ng --ipa`.
#[derive(Debug, Clone)]
pub struct EspeakTranscriber {
    program: PathBuf,
}

impl Default for EspeakTranscriber {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

impl EspeakTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific espeak-ng executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl GraphemeToPhoneme for EspeakTranscriber {
    fn name(&self) -> &str {
        "espeak-ng"
    }

    fn transcribe(&self, text: &str, language_code: &str) -> Result<PhonemeString, TranscriptionError> {
        let language = Language::lookup(language_code)
            .ok_or_else(|| TranscriptionError::UnsupportedLanguage(language_code.to_string()))?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(PhonemeString::default());
        }

        // Text goes through stdin so words starting with '-' are never read as flags.
        let mut child = Command::new(&self.program)
            .args(["-q", "--ipa", "--stdin", "-v", language.espeak_voice])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                let reason = if err.kind() == ErrorKind::NotFound {
                    format!("{} not found on PATH", self.program.display())
                } else {
                    format!("failed to run {}: {err}", self.program.display())
                };
                TranscriptionError::TranscriberUnavailable(reason)
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let line = format!("{}\n", text.replace(['\r', '\n'], " "));
            stdin.write_all(line.as_bytes()).map_err(|err| {
                TranscriptionError::TranscriberUnavailable(format!(
                    "failed to write to {}: {err}",
                    self.program.display()
                ))
            })?;
        }

        let output = child.wait_with_output().map_err(|err| {
            TranscriptionError::TranscriberUnavailable(format!(
                "failed to read {} output: {err}",
                self.program.display()
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::TranscriberUnavailable(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let ipa = String::from_utf8_lossy(&output.stdout);
        let phonemes = PhonemeString::from_ipa(&ipa);
        if phonemes.is_empty() {
            return Err(TranscriptionError::NoPronunciation(text.to_string()));
        }
        Ok(phonemes)
    }
}

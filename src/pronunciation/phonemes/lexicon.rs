use std::collections::HashMap;

use once_cell::sync::OnceCell;

use super::language::Language;
use super::{GraphemeToPhoneme, PhonemeString, TranscriptionError};

const RAW_LEXICON: &str = include_str!("../../../assets/phonemes/lexicon.txt");

static DEFAULT_LEXICON: OnceCell<Lexicon> = OnceCell::new();

/// Collection of ARPABET pronunciations keyed by normalized word.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: HashMap<String, Vec<Box<[&'static str]>>>,
}

impl Lexicon {
    /// Parses CMU-style lexicon data: `WORD PH1 PH2 ...`, `;` comments, `WORD(2)` variants.
    pub fn from_lexicon(data: &'static str) -> Result<Self, TranscriptionError> {
        let mut entries: HashMap<String, Vec<Box<[&'static str]>>> = HashMap::new();

        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let raw_word = parts.next().ok_or_else(|| {
                malformed(format!("line {idx} missing word column: {trimmed}"))
            })?;
            let key = normalize_token(trim_variant(raw_word))
                .ok_or_else(|| malformed(format!("line {idx} has an empty word: {raw_word}")))?;

            let phonemes: Vec<&'static str> = parts.collect();
            if phonemes.is_empty() {
                return Err(malformed(format!(
                    "line {idx} missing phoneme sequence for {raw_word}"
                )));
            }
            if let Some(unknown) = phonemes.iter().find(|p| arpabet_to_ipa(p).is_none()) {
                return Err(malformed(format!(
                    "line {idx} uses unknown ARPABET symbol {unknown}"
                )));
            }

            entries
                .entry(key)
                .or_default()
                .push(phonemes.into_boxed_slice());
        }

        if entries.is_empty() {
            return Err(malformed("lexicon contained no entries".to_string()));
        }
        Ok(Self { entries })
    }

    /// The bundled lexicon, parsed on first use.
    pub fn shared() -> Result<&'static Self, TranscriptionError> {
        DEFAULT_LEXICON.get_or_try_init(|| Self::from_lexicon(RAW_LEXICON))
    }

    /// All ARPABET variants for a token, in lexicon order.
    pub fn lookup(&self, token: &str) -> Result<Vec<&[&'static str]>, TranscriptionError> {
        let normalized = normalize_token(token)
            .ok_or_else(|| TranscriptionError::NoPronunciation(token.to_string()))?;
        let variants = self
            .entries
            .get(&normalized)
            .ok_or_else(|| TranscriptionError::NoPronunciation(token.to_string()))?;
        Ok(variants.iter().map(|seq| seq.as_ref()).collect())
    }

    /// Primary pronunciation of a token as IPA symbols.
    pub fn ipa_for(&self, token: &str) -> Result<Vec<String>, TranscriptionError> {
        let variants = self.lookup(token)?;
        let primary = variants
            .first()
            .ok_or_else(|| TranscriptionError::NoPronunciation(token.to_string()))?;
        Ok(primary
            .iter()
            .filter_map(|symbol| arpabet_to_ipa(symbol))
            .map(str::to_string)
            .collect())
    }
}

/// English transcriber backed by the bundled lexicon; needs no external binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTranscriber;

impl LexiconTranscriber {
    pub fn new() -> Self {
        Self
    }
}

impl GraphemeToPhoneme for LexiconTranscriber {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn transcribe(&self, text: &str, language_code: &str) -> Result<PhonemeString, TranscriptionError> {
        let language = Language::lookup(language_code)
            .ok_or_else(|| TranscriptionError::UnsupportedLanguage(language_code.to_string()))?;
        if language.primary() != "en" {
            return Err(TranscriptionError::UnsupportedLanguage(
                language_code.to_string(),
            ));
        }
        let lexicon = Lexicon::shared()?;
        let mut symbols = Vec::new();
        for token in text.split_whitespace() {
            symbols.extend(lexicon.ipa_for(token)?);
        }
        Ok(PhonemeString::new(symbols))
    }
}

/// Normalizes tokens by removing punctuation and uppercasing.
pub fn normalize_token(token: &str) -> Option<String> {
    let normalized: String = token
        .chars()
        .filter_map(|ch| match ch {
            'A'..='Z' | '\'' => Some(ch),
            'a'..='z' => Some(ch.to_ascii_uppercase()),
            _ => None,
        })
        .collect();
    (!normalized.is_empty()).then_some(normalized)
}

/// Maps an ARPABET symbol (stress digit optional) to IPA.
pub fn arpabet_to_ipa(symbol: &str) -> Option<&'static str> {
    let stress = symbol.chars().last().filter(char::is_ascii_digit);
    let base = symbol.trim_end_matches(|c: char| c.is_ascii_digit());
    let ipa = match base {
        "AA" => "ɑ",
        "AE" => "æ",
        "AH" if stress == Some('0') => "ə",
        "AH" => "ʌ",
        "AO" => "ɔ",
        "AW" => "aʊ",
        "AY" => "aɪ",
        "EH" => "ɛ",
        "ER" if stress == Some('0') => "ɚ",
        "ER" => "ɝ",
        "EY" => "eɪ",
        "IH" => "ɪ",
        "IY" => "i",
        "OW" => "oʊ",
        "OY" => "ɔɪ",
        "UH" => "ʊ",
        "UW" => "u",
        "B" => "b",
        "CH" => "tʃ",
        "D" => "d",
        "DH" => "ð",
        "F" => "f",
        "G" => "ɡ",
        "HH" => "h",
        "JH" => "dʒ",
        "K" => "k",
        "L" => "l",
        "M" => "m",
        "N" => "n",
        "NG" => "ŋ",
        "P" => "p",
        "R" => "ɹ",
        "S" => "s",
        "SH" => "ʃ",
        "T" => "t",
        "TH" => "θ",
        "V" => "v",
        "W" => "w",
        "Y" => "j",
        "Z" => "z",
        "ZH" => "ʒ",
        _ => return None,
    };
    Some(ipa)
}

fn trim_variant(raw_word: &str) -> &str {
    raw_word
        .split_once('(')
        .map(|(base, _)| base)
        .unwrap_or(raw_word)
}

fn malformed(message: String) -> TranscriptionError {
    TranscriptionError::TranscriberUnavailable(format!("bundled lexicon is malformed: {message}"))
}

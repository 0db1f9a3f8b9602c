/// Per-language handles for the external recognizer and transcriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    /// Language hint passed to the speech recognizer.
    pub recognizer: &'static str,
    /// espeak-ng voice used for grapheme-to-phoneme conversion.
    pub espeak_voice: &'static str,
}

const fn language(
    code: &'static str,
    name: &'static str,
    recognizer: &'static str,
    espeak_voice: &'static str,
) -> Language {
    Language {
        code,
        name,
        recognizer,
        espeak_voice,
    }
}

pub const LANGUAGES: &[Language] = &[
    language("en", "English", "en", "en-us"),
    language("es", "Spanish", "es", "es"),
    language("fr", "French", "fr", "fr-fr"),
    language("it", "Italian", "it", "it"),
    language("pt", "Portuguese", "pt", "pt"),
    language("de", "German", "de", "de"),
    language("nl", "Dutch", "nl", "nl"),
    language("cs", "Czech", "cs", "cs"),
    language("pl", "Polish", "pl", "pl"),
    language("ru", "Russian", "ru", "ru"),
    language("hu", "Hungarian", "hu", "hu"),
    language("ar", "Arabic", "ar", "ar"),
    language("tr", "Turkish", "tr", "tr"),
    language("hi", "Hindi", "hi", "hi"),
    language("ja", "Japanese", "ja", "ja"),
    language("ko", "Korean", "ko", "ko"),
    language("zh-CN", "Chinese (Simplified)", "zh", "cmn"),
    language("zh-TW", "Chinese (Traditional)", "zh", "cmn"),
];

impl Language {
    /// Resolves a language code case-insensitively, falling back to its primary subtag
    /// (`"en-GB"` resolves to English, `"zh"` to the first Chinese entry).
    pub fn lookup(code: &str) -> Option<&'static Language> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let normalized = code.replace('_', "-");
        if let Some(exact) = LANGUAGES
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(&normalized))
        {
            return Some(exact);
        }
        let primary = primary_subtag(&normalized);
        LANGUAGES
            .iter()
            .find(|lang| primary_subtag(lang.code).eq_ignore_ascii_case(primary))
    }

    pub fn primary(&self) -> &'static str {
        primary_subtag(self.code)
    }
}

fn primary_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Two-character sequences kept together as one phoneme.
const UNITS: &[&str] = &[
    "tʃ", "dʒ", "aɪ", "aʊ", "eɪ", "oʊ", "ɔɪ", "əʊ", "ɪə", "eə", "ʊə",
];

/// Spacing modifiers that belong to the preceding symbol.
const MODIFIERS: &[char] = &['ː', 'ˑ', 'ʰ', 'ʲ', 'ʷ', 'ˠ', 'ˤ', 'ʼ', 'ⁿ', 'ˡ'];

/// Marks that carry no segmental content.
const SKIPPED: &[char] = &['ˈ', 'ˌ', '.', '‿', '|', '‖', '-', '\''];

const TIE_BARS: &[char] = &['\u{0361}', '\u{035C}'];

/// Splits an IPA transcription into phoneme symbols.
///
/// Stress and syllable marks, whitespace and punctuation are dropped; length marks,
/// aspiration and combining diacritics stay attached to the symbol they modify; tie-barred
/// and common affricate/diphthong pairs become a single symbol. Parenthesised
/// language-switch tags such as `(en)` are removed.
pub fn tokenize(ipa: &str) -> Vec<String> {
    let chars: Vec<char> = strip_tags(ipa).chars().collect();
    let mut symbols: Vec<String> = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        let ch = chars[index];
        if ch.is_whitespace() || SKIPPED.contains(&ch) || ch.is_ascii_punctuation() {
            index += 1;
            continue;
        }
        if is_combining(ch) || MODIFIERS.contains(&ch) {
            if let Some(last) = symbols.last_mut() {
                last.push(ch);
                if TIE_BARS.contains(&ch) {
                    if let Some(&next) = chars.get(index + 1) {
                        last.push(next);
                        index += 1;
                    }
                }
            }
            index += 1;
            continue;
        }
        if let Some(&next) = chars.get(index + 1) {
            let pair: String = [ch, next].iter().collect();
            if UNITS.contains(&pair.as_str()) {
                symbols.push(pair);
                index += 2;
                continue;
            }
        }
        symbols.push(ch.to_string());
        index += 1;
    }
    symbols
}

fn is_combining(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

fn strip_tags(ipa: &str) -> String {
    let mut depth = 0usize;
    ipa.chars()
        .filter(|&ch| match ch {
            '(' => {
                depth += 1;
                false
            }
            ')' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}

/// Articulation advice keyed by the expected IPA symbol.
const HINTS: &[(&str, &str)] = &[
    ("p", "close both lips, then release with a small puff of air"),
    ("b", "close both lips and release while your voice is on"),
    ("t", "tap the tongue tip on the ridge behind your upper teeth"),
    ("d", "tap the tongue tip behind your upper teeth with your voice on"),
    ("k", "lift the back of your tongue against the soft palate, then release"),
    ("ɡ", "lift the back of your tongue to the soft palate and voice the release"),
    ("g", "lift the back of your tongue to the soft palate and voice the release"),
    ("f", "rest your upper teeth on your lower lip and blow"),
    ("v", "rest your upper teeth on your lower lip and hum through it"),
    ("θ", "put the tongue tip between your teeth and blow gently"),
    ("ð", "put the tongue tip between your teeth and add voice"),
    ("s", "keep the tongue tip close to the ridge and hiss"),
    ("z", "keep the tongue tip close to the ridge and buzz"),
    ("ʃ", "round your lips slightly and pull the tongue back for a 'sh'"),
    ("ʒ", "shape a 'sh' and add voice"),
    ("h", "breathe out through an open mouth"),
    ("m", "close your lips and hum through your nose"),
    ("n", "press the tongue tip behind your teeth and hum through your nose"),
    ("ŋ", "raise the back of your tongue and let the sound ring through your nose"),
    ("l", "touch the tongue tip to the ridge and let air flow around the sides"),
    ("ɹ", "curl the tongue tip back without touching the roof of your mouth"),
    ("r", "let the tongue tip flap or trill against the ridge"),
    ("ɾ", "flick the tongue tip once against the ridge"),
    ("ʁ", "narrow the back of your tongue toward the uvula"),
    ("x", "raise the back of your tongue toward the soft palate and let air rasp through"),
    ("w", "round your lips tightly, then open into the vowel"),
    ("j", "raise the middle of your tongue toward the hard palate, as in 'yes'"),
    ("tʃ", "start with a 't' and release straight into 'sh'"),
    ("dʒ", "start with a 'd' and release straight into the 'zh' of 'measure'"),
    ("i", "spread your lips and keep the tongue high and forward"),
    ("ɪ", "relax the tongue slightly lower than for 'ee'"),
    ("e", "keep the tongue mid-high and forward with relaxed lips"),
    ("ɛ", "open your mouth a little more than for 'ay'"),
    ("æ", "drop your jaw and spread your lips, as in 'cat'"),
    ("a", "open your mouth wide with the tongue low and central"),
    ("ɑ", "open wide and keep the tongue low and back, as in 'father'"),
    ("ɒ", "open wide with slightly rounded lips"),
    ("ɔ", "round your lips and keep the tongue low and back"),
    ("o", "round your lips and keep the tongue mid-high and back"),
    ("ʊ", "round your lips loosely with the tongue high and back, as in 'book'"),
    ("u", "round your lips tightly with the tongue high and back"),
    ("ʌ", "relax your mouth and keep the vowel short, as in 'cup'"),
    ("ə", "keep everything relaxed for a short, neutral vowel"),
    ("ɚ", "relax the vowel and curl the tongue slightly for an 'r' colour"),
    ("ɝ", "hold a stressed 'er' with the tongue bunched or curled"),
    ("ɜ", "hold a mid central vowel with relaxed lips"),
    ("y", "say 'ee' while rounding your lips"),
    ("ø", "say 'ay' while rounding your lips"),
    ("aɪ", "glide from an open 'ah' to 'ee'"),
    ("aʊ", "glide from an open 'ah' to 'oo'"),
    ("eɪ", "glide from 'e' up toward 'ee'"),
    ("oʊ", "glide from 'o' while rounding toward 'oo'"),
    ("ɔɪ", "glide from a rounded 'aw' to 'ee'"),
];

/// Looks up a hint for the exact symbol, then for the symbol stripped of length marks
/// and diacritics.
pub fn articulation_hint(symbol: &str) -> Option<&'static str> {
    find(symbol).or_else(|| find(&base_symbol(symbol)))
}

fn find(symbol: &str) -> Option<&'static str> {
    HINTS
        .iter()
        .find(|(key, _)| *key == symbol)
        .map(|(_, hint)| *hint)
}

fn base_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|ch| {
            !matches!(ch, 'ː' | 'ˑ' | 'ʰ' | 'ʲ' | 'ʷ') && !('\u{0300}'..='\u{036F}').contains(ch)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::articulation_hint;

    #[test]
    fn finds_exact_and_modified_symbols() {
        assert!(articulation_hint("θ").unwrap().contains("between your teeth"));
        assert_eq!(articulation_hint("iː"), articulation_hint("i"));
        assert_eq!(articulation_hint("pʰ"), articulation_hint("p"));
    }

    #[test]
    fn unknown_symbols_have_no_hint() {
        assert!(articulation_hint("ʘ").is_none());
    }
}

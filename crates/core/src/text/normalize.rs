//! Tolerant multilingual text canonicalization.
//!
//! Queries and catalog fields pass through here before any matching, so
//! casing, stray whitespace, Arabic letter variants, and diacritics never
//! affect scores. Normalization is pure, total, and idempotent.

use std::collections::BTreeMap;

/// Canonicalizes raw text and applies token-wise transliteration aliases.
#[derive(Clone, Debug, Default)]
pub struct TextNormalizer {
    aliases: BTreeMap<String, String>,
}

impl TextNormalizer {
    /// Build a normalizer with a transliteration table. Keys are
    /// canonicalized on construction so lookups stay consistent; values
    /// are expected to already be canonical text.
    pub fn new(aliases: &BTreeMap<String, String>) -> Self {
        let aliases = aliases
            .iter()
            .map(|(key, value)| (canonicalize(key), canonicalize(value)))
            .collect();
        Self { aliases }
    }

    /// Lower-case, trim, collapse whitespace, unify Arabic letter variants,
    /// strip Arabic diacritics, then replace known transliterated tokens.
    /// Empty input yields the empty string.
    pub fn normalize(&self, text: &str) -> String {
        let canonical = canonicalize(text);
        let mut output = String::with_capacity(canonical.len());
        for token in canonical.split_whitespace() {
            if !output.is_empty() {
                output.push(' ');
            }
            match self.aliases.get(token) {
                Some(replacement) => output.push_str(replacement),
                None => output.push_str(token),
            }
        }
        output
    }
}

/// Character-level canonical form: lowercase, unified Arabic letter
/// variants (alef forms to bare alef, teh marbuta to heh, alef maksura to
/// yeh), Arabic diacritics removed, whitespace collapsed to single spaces.
fn canonicalize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            pending_space = !output.is_empty();
            continue;
        }
        if is_arabic_diacritic(ch) {
            continue;
        }
        if pending_space {
            output.push(' ');
            pending_space = false;
        }
        output.push(unify_arabic_variant(ch));
    }

    output
}

fn unify_arabic_variant(ch: char) -> char {
    match ch {
        'أ' | 'إ' | 'آ' => 'ا',
        'ة' => 'ه',
        'ى' => 'ي',
        _ => ch,
    }
}

/// Harakat range U+064B..=U+065F plus the superscript alef U+0670.
fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

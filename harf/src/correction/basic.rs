use regex::Regex;

use crate::error::{HarfError, Result};

/// OCR artifacts fixed by plain substitution.
const LITERAL_FIXES: &[(&str, &str)] = &[
    // `i` followed by COMBINING DOT ABOVE
    ("i\u{0307}", "i"),
];

/// Function words normalized to lowercase wherever they stand alone.
/// Every `i` also matches `I`, `ı` and `İ`.
const COMMON_WORDS: &[&str] = &[
    "ve", "bir", "bu", "için", "olan", "sonra", "daha", "gibi", "ile",
];

/// Ligature confusions at the end of a word. The trailing whitespace is
/// captured and written back.
const LIGATURE_FIXES: &[(&str, &str)] = &[(r"rn(\s)", "m${1}"), (r"cl(\s)", "d${1}")];

/// Case-insensitive whole-word pattern. The regex engine's simple case
/// folding neither maps `İ` to `i` nor treats `ı` as a variant of `i`, so
/// those are spelled out as a character class.
fn common_word_pattern(word: &str) -> String {
    let body: String = word
        .chars()
        .map(|c| match c {
            'i' => "[iIıİ]".to_string(),
            _ => regex::escape(c.encode_utf8(&mut [0; 4])),
        })
        .collect();
    format!(r"(?i)\b{body}\b")
}

struct Rule {
    pattern: Regex,
    replacement: String,
}

/// Static fallback correction: an ordered substitution table that needs no
/// engine and cannot fail.
pub struct BasicCorrector {
    rules: Vec<Rule>,
}

impl BasicCorrector {
    pub fn new() -> Result<Self> {
        let literal = LITERAL_FIXES
            .iter()
            .map(|(from, to)| (regex::escape(from), to.to_string()));
        let words = COMMON_WORDS
            .iter()
            .map(|word| (common_word_pattern(word), word.to_string()));
        let ligatures = LIGATURE_FIXES
            .iter()
            .map(|(pattern, to)| (pattern.to_string(), to.to_string()));

        let rules = literal
            .chain(words)
            .chain(ligatures)
            .map(|(pattern, replacement)| {
                Regex::new(&pattern)
                    .map(|pattern| Rule {
                        pattern,
                        replacement,
                    })
                    .map_err(|e| HarfError::Internal(format!("Invalid correction pattern: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn correct(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let mut corrected = text.to_string();
        for rule in &self.rules {
            corrected = rule
                .pattern
                .replace_all(&corrected, rule.replacement.as_str())
                .into_owned();
        }

        corrected.trim().to_string()
    }
}

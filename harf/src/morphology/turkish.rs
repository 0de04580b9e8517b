//! Turkish-aware casing.
//!
//! The generic Unicode mappings pair `I` with `i`; Turkish pairs `I` with `ı`
//! and `İ` with `i`. Lexicon keys are always built with [`to_lower`].

pub fn to_lower(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        match c {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

pub fn to_upper(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.chars() {
        match c {
            'i' => out.push('İ'),
            'ı' => out.push('I'),
            _ => out.extend(c.to_uppercase()),
        }
    }
    out
}

/// Capitalization shape of a word, used to give suggestions the same shape as
/// the word they replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    Lower,
    Title,
    Upper,
}

impl CasePattern {
    pub fn of(word: &str) -> Self {
        let mut letters = word.chars().filter(|c| c.is_alphabetic());
        let Some(first) = letters.next() else {
            return Self::Lower;
        };
        if !first.is_uppercase() {
            return Self::Lower;
        }

        let rest: Vec<char> = letters.collect();
        if !rest.is_empty() && rest.iter().all(|c| c.is_uppercase()) {
            Self::Upper
        } else {
            Self::Title
        }
    }

    pub fn apply(self, word: &str) -> String {
        match self {
            Self::Lower => word.to_string(),
            Self::Upper => to_upper(word),
            Self::Title => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        let mut out = to_upper(first.encode_utf8(&mut [0; 4]));
                        out.push_str(chars.as_str());
                        out
                    }
                    None => String::new(),
                }
            }
        }
    }
}

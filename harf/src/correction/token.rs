/// A whitespace-delimited piece of OCR output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token as it appeared, punctuation included.
    pub original: &'a str,
    /// Alphabetic characters only; this is what gets looked up.
    pub clean: String,
}

impl<'a> Token<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            clean: original.chars().filter(|c| c.is_alphabetic()).collect(),
        }
    }

    pub fn has_letters(&self) -> bool {
        !self.clean.is_empty()
    }

    /// Swaps every occurrence of the clean form inside the original token.
    ///
    /// When the letters are not contiguous in the original (`a-b`), nothing
    /// matches and the token comes back unchanged.
    pub fn replace_clean(&self, replacement: &str) -> String {
        self.original.replace(&self.clean, replacement)
    }
}

pub fn tokenize(text: &str) -> impl Iterator<Item = Token<'_>> {
    text.split_whitespace().map(Token::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_digits() {
        let token = Token::new("\"kitab,\"");
        assert_eq!(token.clean, "kitab");

        let token = Token::new("3.");
        assert!(!token.has_letters());
    }

    #[test]
    fn keeps_turkish_letters() {
        assert_eq!(Token::new("(çiçeğı)").clean, "çiçeğı");
    }

    #[test]
    fn replacement_preserves_surrounding_punctuation() {
        let token = Token::new("(kitab),");
        assert_eq!(token.replace_clean("kitap"), "(kitap),");
    }

    #[test]
    fn non_contiguous_letters_are_left_alone() {
        let token = Token::new("ki-tab");
        assert_eq!(token.clean, "kitab");
        assert_eq!(token.replace_clean("kitap"), "ki-tab");
    }

    #[test]
    fn tokenize_splits_on_any_whitespace() {
        let tokens: Vec<_> = tokenize("  bir\tiki\n\nüç ").map(|t| t.original).collect();
        assert_eq!(tokens, vec!["bir", "iki", "üç"]);
    }
}

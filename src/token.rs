//! Stream elements accepted by the sketches.
//!
//! Tokenizers hand out either single words or whole lines split into words.
//! Both shapes are normalized into one string before hashing, sequences being
//! joined with a single space.

use std::borrow::Cow;

/// Stream element: a single token or an ordered sequence of sub-tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    Scalar(&'a str),
    Sequence(Vec<&'a str>),
}

impl<'a> Token<'a> {
    /// Return the comparable representation of this token.
    #[inline]
    pub fn normalize(&self) -> Cow<'a, str> {
        match self {
            Token::Scalar(s) => Cow::Borrowed(*s),
            Token::Sequence(parts) => Cow::Owned(parts.join(" ")),
        }
    }
}

impl<'a> From<&'a str> for Token<'a> {
    fn from(s: &'a str) -> Self {
        Token::Scalar(s)
    }
}

impl<'a> From<&'a String> for Token<'a> {
    fn from(s: &'a String) -> Self {
        Token::Scalar(s.as_str())
    }
}

impl<'a> From<&'a [String]> for Token<'a> {
    fn from(parts: &'a [String]) -> Self {
        Token::Sequence(parts.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Token<'a> {
    fn from(parts: &'a Vec<String>) -> Self {
        Token::from(parts.as_slice())
    }
}

impl<'a> From<&'a [&'a str]> for Token<'a> {
    fn from(parts: &'a [&'a str]) -> Self {
        Token::Sequence(parts.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Token::Scalar("word") => "word")]
    #[test_case(Token::Sequence(vec![]) => "")]
    #[test_case(Token::Sequence(vec!["one"]) => "one")]
    #[test_case(Token::Sequence(vec!["a", "midsummer", "night"]) => "a midsummer night")]
    fn test_normalize(token: Token) -> String {
        token.normalize().into_owned()
    }

    #[test]
    fn test_scalar_is_borrowed() {
        let token = Token::from("hermia");
        assert!(matches!(token.normalize(), Cow::Borrowed("hermia")));
    }

    #[test]
    fn test_conversions() {
        let line = vec!["lord".to_string(), "what".to_string(), "fools".to_string()];
        assert_eq!(Token::from(&line).normalize(), "lord what fools");
        assert_eq!(Token::from(line.as_slice()).normalize(), "lord what fools");

        let words: &[&str] = &["these", "mortals", "be"];
        assert_eq!(Token::from(words).normalize(), "these mortals be");

        let owned = "puck".to_string();
        assert_eq!(Token::from(&owned), Token::Scalar("puck"));
    }
}

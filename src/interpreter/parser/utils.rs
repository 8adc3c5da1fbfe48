use crate::interpreter::lexer::{Token, lexer};

/// Whether `text` is exactly one identifier token.
///
/// # Example
/// ```
/// use abacus::interpreter::parser::utils::is_identifier;
///
/// assert!(is_identifier("speed_2"));
/// assert!(!is_identifier("2x"));
/// assert!(!is_identifier("a b"));
/// ```
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    let mut lex = lexer(text, 10);
    matches!(lex.next(), Some(Ok(Token::Identifier))) && lex.span() == (0..text.len())
}

/// Number of leading whitespace bytes of `text`.
#[must_use]
pub fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Offset of the first byte at or after `from` that is neither whitespace nor
/// a `;`.
pub(in crate::interpreter::parser) fn skip_separators(text: &str, from: usize) -> usize {
    text[from..].find(|c: char| !c.is_whitespace() && c != ';')
                .map_or(text.len(), |at| from + at)
}

/// The identifier at `at` and the offset just past it.
pub(in crate::interpreter::parser) fn word_at(text: &str, at: usize) -> Option<(&str, usize)> {
    let mut lex = lexer(&text[at..], 10);
    match lex.next() {
        Some(Ok(Token::Identifier)) => Some((lex.slice(), at + lex.span().end)),
        _ => None,
    }
}

/// Whether the token at `at` is the keyword `keyword`.
pub(in crate::interpreter::parser) fn keyword_at(text: &str, at: usize, keyword: &str) -> Option<usize> {
    word_at(text, at).filter(|(word, _)| *word == keyword).map(|(_, end)| end)
}

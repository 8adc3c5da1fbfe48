use logos::{Lexer, Logos};

/// Represents a lexical token in the source input.
///
/// Tokens carry no payload: the sectionizer works with spans into the
/// original text, so the slice of any token is always at hand.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens such as `42`, `.5`, `0x1f` or `2.1e-10`.
    ///
    /// Only the first character is matched by the pattern; the rest of the
    /// literal depends on the ambient base and is consumed by [`lex_number`].
    #[regex(r"[0-9]", lex_number)]
    #[regex(r"\.[0-9]", lex_number)]
    Number,
    /// Identifier tokens; variable, function or unit names such as `x`,
    /// `sin` or `kg`.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Identifier,
    /// String literals such as `"sin"`. There are no escape sequences.
    #[regex(r#""[^"]*""#)]
    Str,
    /// A string literal missing its closing quote.
    #[regex(r#""[^"]*"#)]
    UnterminatedStr,
    /// `=>`
    #[token("=>")]
    Arrow,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`; opens a vector where an operand is expected.
    #[token("<")]
    Less,
    /// `>`; closes a vector when one is open.
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Equals,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `_`; introduces the base of a square group.
    #[token("_")]
    Underscore,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// Whitespace, including newlines.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Whether the token can be part of an operator run.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(self,
                 Self::Plus
                 | Self::Minus
                 | Self::Star
                 | Self::Slash
                 | Self::Percent
                 | Self::Caret
                 | Self::EqualEqual
                 | Self::BangEqual
                 | Self::LessEqual
                 | Self::GreaterEqual
                 | Self::Less
                 | Self::Greater)
    }

    /// Whether the token ends an operand, so that a following `<` compares
    /// rather than opening a vector.
    ///
    /// Closing brackets also end operands; the bracket tracker handles those
    /// itself because `>` only closes when a vector is open.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        matches!(self, Self::Number | Self::Identifier | Self::Str)
    }

    /// The bracket that closes this opening bracket.
    #[must_use]
    pub const fn closer(self) -> Option<Self> {
        match self {
            Self::LParen => Some(Self::RParen),
            Self::LBracket => Some(Self::RBracket),
            Self::LBrace => Some(Self::RBrace),
            Self::Less => Some(Self::Greater),
            _ => None,
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Holds the ambient numeric base, which decides how far a number literal
/// extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerExtras {
    /// The base digits are read in, from 2 to 36.
    pub base: u32,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { base: 10 }
    }
}

/// Creates a lexer over `source` reading numbers in `base`.
#[must_use]
pub fn lexer(source: &str, base: u32) -> Lexer<'_, Token> {
    Token::lexer_with_extras(source, LexerExtras { base })
}

/// Extends a number token over the rest of the literal.
fn lex_number(lex: &mut Lexer<Token>) -> bool {
    let extent = number_extent(lex.slice(), lex.remainder(), lex.extras.base);
    lex.bump(extent);
    true
}

/// Whether `byte` is a digit of `base`.
#[must_use]
pub fn is_digit(byte: u8, base: u32) -> bool {
    char::from(byte).to_digit(base.clamp(2, 36)).is_some()
}

/// Base selected by a literal prefix letter (`x`, `b`, `o`), unless that
/// letter is itself a digit of the ambient base.
#[must_use]
pub fn prefix_base(letter: u8, ambient: u32) -> Option<u32> {
    if is_digit(letter, ambient) {
        return None;
    }
    match letter {
        b'x' | b'X' => Some(16),
        b'b' | b'B' => Some(2),
        b'o' | b'O' => Some(8),
        _ => None,
    }
}

/// Number of bytes of `rest` that continue the literal whose first
/// characters are `matched`.
///
/// A literal is: an optional base prefix after a leading `0`, digits of the
/// (possibly prefixed) base, an optional `.` fraction, and an optional
/// `e[+-]digits` exponent when `e` is not a digit of the base.
fn number_extent(matched: &str, rest: &str, base: u32) -> usize {
    let bytes = rest.as_bytes();
    let mut index = 0;
    let mut digit_base = base;
    let mut seen_dot = matched.starts_with('.');

    if matched == "0"
       && let Some(&letter) = bytes.first()
       && let Some(prefixed) = prefix_base(letter, base)
       && bytes.get(1).is_some_and(|&d| is_digit(d, prefixed))
    {
        digit_base = prefixed;
        index = 1;
    }

    loop {
        match bytes.get(index) {
            Some(&b) if is_digit(b, digit_base) => index += 1,
            Some(b'.')
                if !seen_dot && bytes.get(index + 1).is_some_and(|&d| is_digit(d, digit_base)) =>
            {
                seen_dot = true;
                index += 1;
            },
            _ => break,
        }
    }

    if !is_digit(b'e', digit_base) && matches!(bytes.get(index), Some(b'e' | b'E')) {
        let mut end = index + 1;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        if bytes.get(end).is_some_and(u8::is_ascii_digit) {
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
            index = end;
        }
    }

    index
}

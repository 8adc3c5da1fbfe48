use std::ops::Range;

use logos::Lexer;

use crate::interpreter::lexer::{Token, lexer};

/// What a section of text is, as far as can be told without parsing it.
///
/// Positions stored in a kind are byte offsets into the sectionized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// A numeric literal.
    Number,
    /// A bare identifier.
    Variable,
    /// `name(args...)`; `open` is the offset of the `(`.
    Call { open: usize },
    /// `(expr)`.
    Parenthesis,
    /// `[expr]` or `[expr]_base`; `close` is the offset of the `]` and `base`
    /// the offset where the base expression starts.
    SquareUnit { close: usize, base: Option<usize> },
    /// `<a, b; c, d>`.
    Vector,
    /// One or more adjacent operator tokens.
    OperatorRun,
    /// `x => expr`, `(a, b) => expr` or `(a) => { block }`; `arrow` is the
    /// offset of the `=>`.
    AnonymousFunction { arrow: usize, multiline: bool },
    /// `"text"`.
    String,
    /// A token no section can start with.
    Undefined,
}

/// A classified span of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind:       SectionKind,
    pub start:      usize,
    pub end:        usize,
    /// A bracket group in this section is unclosed or closed by the wrong
    /// bracket.
    pub mismatched: bool,
}

impl Section {
    const fn new(kind: SectionKind, start: usize, end: usize) -> Self {
        Self { kind,
               start,
               end,
               mismatched: false }
    }
}

/// Stack-based bracket matching over a token stream.
///
/// `<` counts as an opening bracket only where an operand is expected, and
/// `>` closes only when the innermost open bracket is a `<`; everywhere else
/// they are comparison operators.
#[derive(Debug, Default)]
pub struct Brackets {
    stack:         Vec<Token>,
    after_operand: bool,
    mismatched:    bool,
}

impl Brackets {
    fn opened(open: Token) -> Self {
        Self { stack:         vec![open],
               after_operand: false,
               mismatched:    false, }
    }

    /// Number of currently open brackets.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether any bracket was closed by the wrong partner, closed while
    /// nothing was open, or a string was left unterminated.
    #[must_use]
    pub const fn mismatched(&self) -> bool {
        self.mismatched
    }

    /// Consumes one token, updating the nesting depth.
    pub fn feed(&mut self, token: Result<Token, ()>) {
        let Ok(token) = token else {
            self.after_operand = false;
            return;
        };
        let opens = matches!(token, Token::LParen | Token::LBracket | Token::LBrace)
                    || (token == Token::Less && !self.after_operand);
        if opens {
            self.stack.push(token);
            self.after_operand = false;
            return;
        }
        let closes = matches!(token, Token::RParen | Token::RBracket | Token::RBrace)
                     || (token == Token::Greater && self.stack.last() == Some(&Token::Less));
        if closes {
            let opener = self.stack.pop();
            if opener.and_then(Token::closer) != Some(token) {
                self.mismatched = true;
            }
            self.after_operand = true;
            return;
        }
        if token == Token::UnterminatedStr {
            self.mismatched = true;
        }
        self.after_operand = token.ends_operand();
    }
}

/// Consumes tokens up to and including the bracket closing `open`, which has
/// just been read.
///
/// Returns the end offset (relative to the lexer's source) and whether the
/// group was mismatched. An unclosed group extends to the end of the source.
fn match_group(lex: &mut Lexer<'_, Token>, open: Token) -> (usize, bool) {
    let mut brackets = Brackets::opened(open);
    while let Some(token) = lex.next() {
        brackets.feed(token);
        if brackets.depth() == 0 {
            return (lex.span().end, brackets.mismatched());
        }
    }
    (lex.source().len(), true)
}

/// Classifies the section starting at or after `start` in `text`.
///
/// `after_operand` tells whether the previous section was an operand, which
/// decides whether `<` opens a vector or compares. Returns `None` when only
/// whitespace remains.
///
/// # Example
/// ```
/// use abacus::interpreter::sectionizer::{SectionKind, sectionize};
///
/// let text = "sin(x) + <1, 2>";
/// let call = sectionize(text, 0, 10, false).unwrap();
/// assert_eq!(call.kind, SectionKind::Call { open: 3 });
/// assert_eq!(&text[call.start..call.end], "sin(x)");
///
/// let op = sectionize(text, call.end, 10, true).unwrap();
/// assert_eq!(op.kind, SectionKind::OperatorRun);
///
/// let vector = sectionize(text, op.end, 10, false).unwrap();
/// assert_eq!(vector.kind, SectionKind::Vector);
/// assert_eq!(&text[vector.start..vector.end], "<1, 2>");
/// ```
#[must_use]
pub fn sectionize(text: &str, start: usize, base: u32, after_operand: bool) -> Option<Section> {
    let mut lex = lexer(&text[start..], base);
    let token = lex.next()?;
    let span = lex.span();
    let at = |offset: usize| start + offset;
    let section_start = at(span.start);
    let token_end = at(span.end);

    let section = match token {
        Err(()) => Section::new(SectionKind::Undefined, section_start, token_end),
        Ok(Token::Number) => Section::new(SectionKind::Number, section_start, token_end),
        Ok(Token::Str) => Section::new(SectionKind::String, section_start, token_end),
        Ok(Token::UnterminatedStr) => Section { mismatched: true,
                                                ..Section::new(SectionKind::String,
                                                               section_start,
                                                               token_end) },
        Ok(Token::Identifier) => {
            let mut peek = lex.clone();
            match peek.next() {
                Some(Ok(Token::LParen)) if peek.span().start == span.end => {
                    let open = at(peek.span().start);
                    let (end, mismatched) = match_group(&mut peek, Token::LParen);
                    Section { kind: SectionKind::Call { open },
                              start: section_start,
                              end: at(end),
                              mismatched }
                },
                Some(Ok(Token::Arrow)) => anonymous_function(text, start, &mut peek, section_start),
                _ => Section::new(SectionKind::Variable, section_start, token_end),
            }
        },
        Ok(Token::LParen) => {
            let (end, mismatched) = match_group(&mut lex, Token::LParen);
            let mut peek = lex.clone();
            if !mismatched && let Some(Ok(Token::Arrow)) = peek.next() {
                anonymous_function(text, start, &mut peek, section_start)
            } else {
                Section { kind: SectionKind::Parenthesis,
                          start: section_start,
                          end: at(end),
                          mismatched }
            }
        },
        Ok(Token::LBracket) => square_group(text, start, &mut lex, section_start),
        Ok(Token::Less) if !after_operand => {
            let (end, mismatched) = match_group(&mut lex, Token::Less);
            Section { kind: SectionKind::Vector,
                      start: section_start,
                      end: at(end),
                      mismatched }
        },
        Ok(token) if token.is_operator() => {
            let mut end = token_end;
            loop {
                let mut peek = lex.clone();
                match peek.next() {
                    Some(Ok(next)) if next.is_operator() && next != Token::Less => {
                        end = at(peek.span().end);
                        lex = peek;
                    },
                    _ => break,
                }
            }
            Section::new(SectionKind::OperatorRun, section_start, end)
        },
        Ok(_) => Section::new(SectionKind::Undefined, section_start, token_end),
    };
    Some(section)
}

/// Finishes an anonymous function section; `lex` has just read the `=>`.
fn anonymous_function(text: &str,
                      start: usize,
                      lex: &mut Lexer<'_, Token>,
                      section_start: usize)
                      -> Section {
    let arrow = start + lex.span().start;
    let mut peek = lex.clone();
    if let Some(Ok(Token::LBrace)) = peek.next() {
        let (end, mismatched) = match_group(&mut peek, Token::LBrace);
        return Section { kind: SectionKind::AnonymousFunction { arrow,
                                                                multiline: true },
                         start: section_start,
                         end: start + end,
                         mismatched };
    }
    Section::new(SectionKind::AnonymousFunction { arrow,
                                                  multiline: false },
                 section_start,
                 text.len())
}

/// Finishes a `[...]` section, including an optional `_base` suffix; `lex`
/// has just read the `[`.
fn square_group(text: &str, start: usize, lex: &mut Lexer<'_, Token>, section_start: usize) -> Section {
    let (end, mismatched) = match_group(lex, Token::LBracket);
    if mismatched {
        return Section { kind: SectionKind::SquareUnit { close: text.len(),
                                                         base:  None, },
                         start: section_start,
                         end: start + end,
                         mismatched };
    }
    let close = start + end - 1;
    let mut section = Section::new(SectionKind::SquareUnit { close, base: None },
                                   section_start,
                                   start + end);

    let mut peek = lex.clone();
    if !matches!(peek.next(), Some(Ok(Token::Underscore))) || peek.span().start != end {
        return section;
    }
    let base_start = peek.span().end;
    section.kind = SectionKind::SquareUnit { close,
                                             base: Some(start + base_start) };
    section.end = start + base_start;

    match peek.next() {
        Some(Ok(Token::Number)) => section.end = start + peek.span().end,
        Some(Ok(Token::Identifier)) => {
            let name_end = peek.span().end;
            section.end = start + name_end;
            let mut call = peek.clone();
            if let Some(Ok(Token::LParen)) = call.next()
               && call.span().start == name_end
            {
                let (call_end, call_mismatched) = match_group(&mut call, Token::LParen);
                section.end = start + call_end;
                section.mismatched = call_mismatched;
            }
        },
        Some(Ok(Token::LParen)) => {
            let (group_end, group_mismatched) = match_group(&mut peek, Token::LParen);
            section.end = start + group_end;
            section.mismatched = group_mismatched;
        },
        _ => {},
    }
    section
}

/// End offset of the bracket group whose opening bracket is at `open`.
///
/// Returns `None` when there is no opening bracket at `open` or the group is
/// not closed by its partner.
#[must_use]
pub fn group_end(text: &str, open: usize) -> Option<usize> {
    let mut lex = lexer(&text[open..], 10);
    let first = lex.next()?.ok()?;
    first.closer()?;
    let (end, mismatched) = match_group(&mut lex, first);
    (!mismatched).then_some(open + end)
}

/// Splits `text` at every `separator` token outside of brackets.
///
/// Returns the byte ranges of the pieces; there is always at least one.
#[must_use]
pub fn split_top_level(text: &str, base: u32, separator: Token) -> Vec<Range<usize>> {
    let mut lex = lexer(text, base);
    let mut brackets = Brackets::default();
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    while let Some(token) = lex.next() {
        if brackets.depth() == 0 && token == Ok(separator) {
            pieces.push(piece_start..lex.span().start);
            piece_start = lex.span().end;
        }
        brackets.feed(token);
    }
    pieces.push(piece_start..text.len());
    pieces
}

/// Offset of the first `separator` token at or after `from` that lies
/// outside of brackets, or the end of the text.
#[must_use]
pub fn find_top_level(text: &str, from: usize, separator: Token) -> usize {
    let mut lex = lexer(&text[from..], 10);
    let mut brackets = Brackets::default();
    while let Some(token) = lex.next() {
        if brackets.depth() == 0 && token == Ok(separator) {
            return from + lex.span().start;
        }
        brackets.feed(token);
    }
    text.len()
}

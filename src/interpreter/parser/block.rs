use crate::{
    ast::{Action, CodeBlock, Target},
    error::ParseError,
    interpreter::{
        Interpreter,
        builtin::is_keyword,
        lexer::{Token, lexer},
        parser::{
            core::{Ambient, ParseResult, Scope, parse_expression},
            utils::{keyword_at, leading_whitespace, skip_separators, word_at},
        },
        sectionizer::{find_top_level, group_end},
    },
};

/// Parses the statements of a code block; `text` is the interior of the
/// braces and `offset` its position in the input.
///
/// Statements are separated by `;`. A braced body closing an `if`, `else` or
/// `while` also ends its statement. Locals declared here are released when
/// the block ends, so they are unknown to the statements that follow it.
///
/// # Errors
/// Any error of the contained expressions, plus the structural errors
/// `DanglingElse`, `IllegalBreak`, `IllegalContinue`, `StatementAfterReturn`
/// and `ReservedName`.
pub fn parse_block(env: &Interpreter, text: &str, offset: usize, scope: &mut Scope) -> ParseResult<CodeBlock> {
    let first_slot = scope.locals.len();
    let mut actions: Vec<Action> = Vec::new();
    let mut cursor = skip_separators(text, 0);

    while cursor < text.len() {
        if matches!(actions.last(), Some(Action::Return(_))) {
            return Err(ParseError::StatementAfterReturn { position: offset + cursor });
        }
        let (action, end) = parse_action(env, text, offset, cursor, scope, actions.last())?;
        actions.push(action);
        cursor = skip_separators(text, end);
    }

    let locals = scope.locals.split_off(first_slot);
    Ok(CodeBlock { actions,
                   locals,
                   first_slot,
                   frame_size: scope.high_water })
}

/// Parses the statement starting at `start`; returns it and the offset just
/// past it.
fn parse_action(env: &Interpreter,
                text: &str,
                offset: usize,
                start: usize,
                scope: &mut Scope,
                previous: Option<&Action>)
                -> ParseResult<(Action, usize)> {
    let position = offset + start;
    let Some((word, after)) = word_at(text, start) else {
        return parse_statement(env, text, offset, start, scope);
    };

    match word {
        "if" => {
            let (condition, body, end) = parse_conditional(env, text, offset, after, scope, false)?;
            Ok((Action::If { condition, body }, end))
        },
        "while" => {
            let (condition, body, end) = parse_conditional(env, text, offset, after, scope, true)?;
            Ok((Action::While { condition, body }, end))
        },
        "else" => {
            if !matches!(previous, Some(Action::If { .. })) {
                return Err(ParseError::DanglingElse { position });
            }
            let (body, end) = parse_else(env, text, offset, after, scope)?;
            Ok((Action::Else(body), end))
        },
        "return" => {
            let end = find_top_level(text, after, Token::Semicolon);
            let value = parse_expression(env, &text[after..end], offset + after, scope, Ambient::default())?;
            Ok((Action::Return(value), end))
        },
        "break" | "continue" => {
            if scope.loop_depth == 0 {
                return Err(if word == "break" {
                               ParseError::IllegalBreak { position }
                           } else {
                               ParseError::IllegalContinue { position }
                           });
            }
            let end = find_top_level(text, after, Token::Semicolon);
            let rest = &text[after..end];
            if !rest.trim().is_empty() {
                return Err(ParseError::UnexpectedToken { token: rest.trim().to_string(),
                                                         position: offset + after + leading_whitespace(rest) });
            }
            Ok((if word == "break" { Action::Break } else { Action::Continue }, end))
        },
        name => match assignment_value(text, after) {
            Some(value_start) => parse_assignment(env, text, offset, name, position, value_start, scope),
            None => parse_statement(env, text, offset, start, scope),
        },
    }
}

/// Offset of the value of `name = value` when the token after the name is a
/// lone `=`.
fn assignment_value(text: &str, after_name: usize) -> Option<usize> {
    let mut lex = lexer(&text[after_name..], 10);
    match lex.next() {
        Some(Ok(Token::Equals)) => Some(after_name + lex.span().end),
        _ => None,
    }
}

fn parse_assignment(env: &Interpreter,
                    text: &str,
                    offset: usize,
                    name: &str,
                    position: usize,
                    value_start: usize,
                    scope: &mut Scope)
                    -> ParseResult<(Action, usize)> {
    if is_keyword(name) {
        return Err(ParseError::ReservedName { name: name.to_string(),
                                              position });
    }
    let end = find_top_level(text, value_start, Token::Semicolon);
    let value = parse_expression(env, &text[value_start..end], offset + value_start, scope, Ambient::default())?;
    let target = if let Some(index) = scope.argument(name) {
        Target::Argument(index)
    } else if let Some(slot) = scope.local(name) {
        Target::Local(slot)
    } else {
        Target::Local(scope.declare(name))
    };
    Ok((Action::Assign { target, value }, end))
}

fn parse_statement(env: &Interpreter,
                   text: &str,
                   offset: usize,
                   start: usize,
                   scope: &mut Scope)
                   -> ParseResult<(Action, usize)> {
    let end = find_top_level(text, start, Token::Semicolon);
    let tree = parse_expression(env, &text[start..end], offset + start, scope, Ambient::default())?;
    Ok((Action::Statement(tree), end))
}

/// Parses `(condition) body` after an `if` or `while`.
fn parse_conditional(env: &Interpreter,
                     text: &str,
                     offset: usize,
                     after: usize,
                     scope: &mut Scope,
                     looping: bool)
                     -> ParseResult<(crate::ast::Tree, CodeBlock, usize)> {
    let open = after + leading_whitespace(&text[after..]);
    if !text[open..].starts_with('(') {
        let token = text[open..].split_whitespace().next().unwrap_or_default();
        return Err(ParseError::UnexpectedToken { token: token.to_string(),
                                                 position: offset + open });
    }
    let close = group_end(text, open).ok_or(ParseError::BracketMismatch { position: offset + open })?;
    let condition = parse_expression(env, &text[open + 1..close - 1], offset + open + 1, scope, Ambient::default())?;

    if looping {
        scope.loop_depth += 1;
    }
    let body = parse_body(env, text, offset, close, scope);
    if looping {
        scope.loop_depth -= 1;
    }
    let (body, end) = body?;
    Ok((condition, body, end))
}

/// Parses a body: a braced block or a single statement.
fn parse_body(env: &Interpreter,
              text: &str,
              offset: usize,
              from: usize,
              scope: &mut Scope)
              -> ParseResult<(CodeBlock, usize)> {
    let start = from + leading_whitespace(&text[from..]);
    if start == text.len() {
        return Err(ParseError::EmptyExpression { position: offset + start });
    }
    if text[start..].starts_with('{') {
        let end = group_end(text, start).ok_or(ParseError::BracketMismatch { position: offset + start })?;
        let block = parse_block(env, &text[start + 1..end - 1], offset + start + 1, scope)?;
        return Ok((block, end));
    }
    let end = find_top_level(text, start, Token::Semicolon);
    let block = parse_block(env, &text[start..end], offset + start, scope)?;
    Ok((block, end))
}

/// Parses the body of an `else`. An `else if` chain becomes a block holding
/// the nested conditional and its own `else`.
fn parse_else(env: &Interpreter,
              text: &str,
              offset: usize,
              after: usize,
              scope: &mut Scope)
              -> ParseResult<(CodeBlock, usize)> {
    let start = after + leading_whitespace(&text[after..]);
    if keyword_at(text, start, "if").is_none() {
        return parse_body(env, text, offset, after, scope);
    }

    let first_slot = scope.locals.len();
    let (conditional, mut end) = parse_action(env, text, offset, start, scope, None)?;
    let mut actions = vec![conditional];
    let next = skip_separators(text, end);
    if keyword_at(text, next, "else").is_some() {
        let (alternative, alternative_end) = parse_action(env, text, offset, next, scope, actions.last())?;
        actions.push(alternative);
        end = alternative_end;
    }
    Ok((CodeBlock { actions,
                    locals: Vec::new(),
                    first_slot,
                    frame_size: scope.high_water },
        end))
}

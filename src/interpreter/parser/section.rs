use std::rc::Rc;

use crate::{
    ast::{CodeBlock, FunctionId, Tree},
    error::ParseError,
    interpreter::{
        Interpreter,
        builtin::{Builtin, constant, is_keyword},
        lexer::Token,
        parser::{
            block::parse_block,
            core::{Ambient, ParseResult, Scope, parse_expression},
            number::parse_number,
            utils::{is_identifier, leading_whitespace},
        },
        sectionizer::{Section, SectionKind, split_top_level},
        value::{core::Value, number::Number},
    },
    util::num::f64_to_i64_truncating,
};

/// Builds the node for one section of `text`.
///
/// `offset` is the position of `text` in the input; section offsets are
/// relative to `text`.
pub fn build_section(env: &Interpreter,
                     text: &str,
                     offset: usize,
                     section: Section,
                     scope: &mut Scope,
                     ambient: Ambient)
                     -> ParseResult<Tree> {
    let slice = &text[section.start..section.end];
    let position = offset + section.start;

    match section.kind {
        SectionKind::Number => parse_number(slice, ambient.base)
            .map(|value| Tree::number(Number::real(value)))
            .ok_or_else(|| ParseError::InvalidNumber { text: slice.to_string(),
                                                       position }),
        SectionKind::Variable => resolve_name(env, slice, position, scope, ambient),
        SectionKind::Call { open } => {
            let name = &text[section.start..open];
            let inner = &text[open + 1..section.end - 1];
            build_call(env, name, inner, offset + open + 1, position, scope, ambient)
        },
        SectionKind::Parenthesis => {
            parse_expression(env, &slice[1..slice.len() - 1], position + 1, scope, ambient)
        },
        SectionKind::SquareUnit { close, base } => {
            let base = match base {
                Some(base_start) => {
                    evaluate_base(env, &text[base_start..section.end], offset + base_start, scope, ambient)?
                },
                None => 10,
            };
            parse_expression(env,
                             &text[section.start + 1..close],
                             position + 1,
                             scope,
                             Ambient { unit: true, base })
        },
        SectionKind::Vector => build_vector(env, &slice[1..slice.len() - 1], position + 1, scope, ambient),
        SectionKind::String => Ok(Tree::Literal(Value::String(slice[1..slice.len() - 1].to_string()))),
        SectionKind::AnonymousFunction { arrow, multiline } => {
            let head = &text[section.start..arrow];
            let body = &text[arrow + 2..section.end];
            build_closure(env, head, body, offset + arrow + 2, position, multiline, scope, ambient)
        },
        SectionKind::OperatorRun => Err(ParseError::MissingOperand { position }),
        SectionKind::Undefined => Err(ParseError::UnexpectedToken { token: slice.to_string(),
                                                                    position }),
    }
}

/// Resolves a bare identifier.
fn resolve_name(env: &Interpreter,
                name: &str,
                position: usize,
                scope: &Scope,
                ambient: Ambient)
                -> ParseResult<Tree> {
    if ambient.unit
       && let Some((multiplier, unit)) = env.units.lookup(name)
    {
        return Ok(Tree::number(Number::real(multiplier).with_unit(unit)));
    }
    if let Some(index) = scope.argument(name) {
        return Ok(Tree::Argument(index));
    }
    if let Some(slot) = scope.local(name) {
        return Ok(Tree::Local(slot));
    }
    if let Some(slot) = env.variables.lookup(name) {
        return Ok(Tree::Global(slot));
    }
    if let Some((id, 0)) = scope.function_named(env, name) {
        return Ok(Tree::Custom { id,
                                 args: Vec::new() });
    }
    if let Some(value) = constant(name) {
        return Ok(Tree::number(value));
    }
    let name = name.to_string();
    Err(if ambient.unit {
            ParseError::UnknownUnit { name, position }
        } else {
            ParseError::UnknownName { name, position }
        })
}

/// What a call resolves to.
enum Callee {
    /// A value slot holding a closure, called through `run`.
    Value(Tree),
    Custom(FunctionId),
    Builtin(Builtin),
}

/// Resolves the callee of `name(...)` and checks the argument count.
fn resolve_callee(env: &Interpreter,
                  name: &str,
                  count: usize,
                  position: usize,
                  scope: &Scope)
                  -> ParseResult<Callee> {
    if let Some(index) = scope.argument(name) {
        return Ok(Callee::Value(Tree::Argument(index)));
    }
    if let Some(slot) = scope.local(name) {
        return Ok(Callee::Value(Tree::Local(slot)));
    }
    if let Some(slot) = env.variables.lookup(name) {
        return Ok(Callee::Value(Tree::Global(slot)));
    }
    if let Some((id, arity)) = scope.function_named(env, name) {
        if arity != count {
            return Err(ParseError::ArityMismatch { name: name.to_string(),
                                                   expected: arity.to_string(),
                                                   found: count,
                                                   position });
        }
        return Ok(Callee::Custom(id));
    }
    if let Some(op) = Builtin::from_name(name) {
        let arity = op.def().arity;
        if !arity.accepts(count) {
            return Err(ParseError::ArityMismatch { name: name.to_string(),
                                                   expected: arity.to_string(),
                                                   found: count,
                                                   position });
        }
        return Ok(Callee::Builtin(op));
    }
    Err(ParseError::UnknownFunction { name: name.to_string(),
                                      position })
}

/// Builds `name(inner)`; `inner_offset` is the position of `inner`.
fn build_call(env: &Interpreter,
              name: &str,
              inner: &str,
              inner_offset: usize,
              position: usize,
              scope: &mut Scope,
              ambient: Ambient)
              -> ParseResult<Tree> {
    let pieces = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_top_level(inner, ambient.base, Token::Comma)
    };
    let callee = resolve_callee(env, name, pieces.len(), position, scope)?;

    let mut args = Vec::with_capacity(pieces.len() + 1);
    if let Callee::Value(target) = &callee {
        args.push(target.clone());
    }
    for piece in pieces {
        let arg_offset = inner_offset + piece.start;
        args.push(parse_expression(env, &inner[piece], arg_offset, scope, ambient)?);
    }

    Ok(match callee {
           Callee::Value(_) => Tree::Builtin { op: Builtin::Run,
                                               args },
           Callee::Custom(id) => Tree::Custom { id, args },
           Callee::Builtin(op) => Tree::Builtin { op, args },
       })
}

/// Parses and evaluates the base of a `[...]_base` group.
fn evaluate_base(env: &Interpreter,
                 text: &str,
                 position: usize,
                 scope: &mut Scope,
                 ambient: Ambient)
                 -> ParseResult<u32> {
    let tree = parse_expression(env, text, position, scope, ambient)?;
    if tree.references_frame() {
        return Err(ParseError::BaseReferencesFrame { position });
    }
    let value = env.evaluate(&tree)
                   .map_err(|error| ParseError::InvalidBase { details: error.to_string(),
                                                              position })?;
    let invalid = || ParseError::InvalidBase { details: format!("{value} is not an integer from 2 to 36"),
                                               position };
    let number = value.as_number()
                      .filter(|n| n.is_real() && n.real.fract() == 0.0 && (2.0..=36.0).contains(&n.real))
                      .ok_or_else(invalid)?;
    u32::try_from(f64_to_i64_truncating(number.real)).map_err(|_| invalid())
}

/// Builds a vector constructor from the interior of `<...>`.
fn build_vector(env: &Interpreter,
                inner: &str,
                offset: usize,
                scope: &mut Scope,
                ambient: Ambient)
                -> ParseResult<Tree> {
    let rows: Vec<_> = split_top_level(inner, ambient.base, Token::Semicolon)
        .into_iter()
        .map(|row| {
            split_top_level(&inner[row.clone()], ambient.base, Token::Comma)
                .into_iter()
                .map(|cell| row.start + cell.start..row.start + cell.end)
                .collect::<Vec<_>>()
        })
        .collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(1);
    let height = rows.len();

    let mut cells = Vec::with_capacity(width * height);
    for row in &rows {
        for x in 0..width {
            match row.get(x) {
                Some(cell) if !inner[cell.clone()].trim().is_empty() => {
                    let cell_offset = offset + cell.start;
                    cells.push(parse_expression(env, &inner[cell.clone()], cell_offset, scope, ambient)?);
                },
                _ => cells.push(Tree::zero()),
            }
        }
    }
    Ok(Tree::Vector { width,
                      height,
                      cells })
}

/// Reads the parameter list before `=>`: `x`, `()` or `(a, b)`.
pub(crate) fn parse_params(head: &str, position: usize) -> ParseResult<Vec<String>> {
    let head = head.trim();
    let malformed = || ParseError::MalformedParameters { position };
    let list = match head.strip_prefix('(') {
        Some(rest) => rest.strip_suffix(')').ok_or_else(malformed)?,
        None => head,
    };
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut params: Vec<String> = Vec::new();
    for piece in list.split(',') {
        let name = piece.trim();
        if !is_identifier(name) || params.iter().any(|p| p == name) {
            return Err(malformed());
        }
        if is_keyword(name) {
            return Err(ParseError::ReservedName { name: name.to_string(),
                                                  position });
        }
        params.push(name.to_string());
    }
    Ok(params)
}

/// Builds an anonymous function. `body` starts right after the `=>`, at
/// `body_offset`.
#[allow(clippy::too_many_arguments)]
fn build_closure(env: &Interpreter,
                 head: &str,
                 body: &str,
                 body_offset: usize,
                 position: usize,
                 multiline: bool,
                 scope: &Scope,
                 ambient: Ambient)
                 -> ParseResult<Tree> {
    let params = parse_params(head, position)?;
    let mut inner = Scope::closure(&params, scope);
    let block = if multiline {
        let open = leading_whitespace(body);
        parse_block(env, &body[open + 1..body.len() - 1], body_offset + open + 1, &mut inner)?
    } else {
        let expression = parse_expression(env,
                                          body,
                                          body_offset,
                                          &mut inner,
                                          Ambient { unit: false,
                                                    base: ambient.base })?;
        CodeBlock::returning(expression)
    };
    Ok(Tree::Closure { params: params.into(),
                       body: Rc::new(block),
                       capture_width: scope.capture_width() })
}

use std::mem;

use crate::{
    ast::{FunctionId, Tree},
    error::ParseError,
    interpreter::{
        Interpreter,
        builtin::Builtin,
        lexer::{Token, lexer},
        parser::section::build_section,
        sectionizer::{SectionKind, sectionize},
        value::core::Value,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// How the text currently being parsed is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambient {
    /// Identifiers are looked up in the unit table first.
    pub unit: bool,
    /// Base of numeric literals.
    pub base: u32,
}

impl Default for Ambient {
    fn default() -> Self {
        Self { unit: false,
               base: 10 }
    }
}

/// A function whose body is being parsed; its name is already callable so
/// the body may recurse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub name:  String,
    pub id:    FunctionId,
    pub arity: usize,
}

/// Names visible to the tree builder.
///
/// Arguments are addressed by position, locals by slot. Slots are handed out
/// in declaration order and released when the declaring block ends; the
/// high-water mark is the frame size a call needs.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub(crate) args:       Vec<String>,
    pub(crate) locals:     Vec<String>,
    pub(crate) high_water: usize,
    pub(crate) loop_depth: usize,
    pub(crate) pending:    Option<Pending>,
}

impl Scope {
    /// The scope of a top-level expression: no arguments, no locals.
    #[must_use]
    pub fn top() -> Self {
        Self::default()
    }

    /// The scope of a function body.
    #[must_use]
    pub fn function(params: Vec<String>, pending: Option<Pending>) -> Self {
        Self { args: params,
               pending,
               ..Self::default() }
    }

    /// The scope of an anonymous function body: its own parameters, then
    /// everything the enclosing scope can see, which the closure captures.
    #[must_use]
    pub fn closure(params: &[String], outer: &Self) -> Self {
        let mut args = params.to_vec();
        args.extend(outer.args.iter().cloned());
        args.extend(outer.locals.iter().cloned());
        Self { args,
               pending: outer.pending.clone(),
               ..Self::default() }
    }

    /// Number of frame values a closure created here captures.
    #[must_use]
    pub fn capture_width(&self) -> usize {
        self.args.len() + self.locals.len()
    }

    #[must_use]
    pub fn argument(&self, name: &str) -> Option<usize> {
        self.args.iter().position(|arg| arg == name)
    }

    #[must_use]
    pub fn local(&self, name: &str) -> Option<usize> {
        self.locals.iter().rposition(|local| local == name)
    }

    /// Introduces a new local and returns its slot.
    pub fn declare(&mut self, name: &str) -> usize {
        self.locals.push(name.to_string());
        self.high_water = self.high_water.max(self.locals.len());
        self.locals.len() - 1
    }

    /// The custom function `name` and its arity, including the one being
    /// defined.
    pub(crate) fn function_named(&self, env: &Interpreter, name: &str) -> Option<(FunctionId, usize)> {
        if let Some(pending) = &self.pending
           && pending.name == name
        {
            return Some((pending.id, pending.arity));
        }
        let id = env.functions.lookup(name)?;
        env.functions.get(id).map(|function| (id, function.params.len()))
    }
}

/// An element of the flat list built before folding.
#[derive(Debug)]
enum Item {
    Operand(Tree),
    /// A binary operator and its byte offset.
    Operator(Builtin, usize),
}

/// Parses `text` into a single tree.
///
/// `offset` is the position of `text` within the input, used for error
/// positions. The text is cut into sections, each section becomes a node,
/// and the flat list is folded by implicit multiplication followed by the
/// precedence passes `^`, `% * /`, `+ -` and the comparisons.
///
/// # Errors
/// Any [`ParseError`] met in a section, or `MissingOperand` /
/// `EmptyExpression` when the list does not fold into one tree.
pub fn parse_expression(env: &Interpreter,
                        text: &str,
                        offset: usize,
                        scope: &mut Scope,
                        ambient: Ambient)
                        -> ParseResult<Tree> {
    let mut items: Vec<Item> = Vec::new();
    let mut cursor = 0;
    let mut negate_next = false;
    let mut leading_negation = None;

    while let Some(section) =
        sectionize(text, cursor, ambient.base, matches!(items.last(), Some(Item::Operand(_))))
    {
        let position = offset + section.start;
        if section.mismatched {
            return Err(ParseError::BracketMismatch { position });
        }
        cursor = section.end;

        if section.kind == SectionKind::OperatorRun {
            let run = &text[section.start..section.end];
            let (op, negate) = reduce_operator_run(run, position)?;
            if items.is_empty() {
                if op != Builtin::Sub || leading_negation.is_some() {
                    return Err(ParseError::MissingOperand { position });
                }
                leading_negation = Some(position);
            } else {
                items.push(Item::Operator(op, position));
            }
            negate_next = negate;
            continue;
        }

        let mut node = build_section(env, text, offset, section, scope, ambient)?;
        if negate_next {
            node = negate(node);
            negate_next = false;
        }
        items.push(Item::Operand(node));
    }

    if items.is_empty() {
        return Err(match leading_negation {
                       Some(position) => ParseError::MissingOperand { position },
                       None => ParseError::EmptyExpression { position: offset },
                   });
    }
    fold(items, leading_negation)
}

/// Negates a node, folding plain numeric literals.
pub(crate) fn negate(node: Tree) -> Tree {
    match node {
        Tree::Literal(Value::Number(n)) => Tree::number(-n),
        other => Tree::unary(Builtin::Negate, other),
    }
}

/// Reduces an operator run to one binary operator and whether the following
/// operand is negated.
fn reduce_operator_run(run: &str, position: usize) -> ParseResult<(Builtin, bool)> {
    let mut tokens: Vec<Token> = lexer(run, 10).filter_map(Result::ok).collect();
    let negate = tokens.len() > 1 && tokens.last() == Some(&Token::Minus);
    if negate {
        tokens.pop();
    }
    let op = match tokens.as_slice() {
        [Token::Plus] => Builtin::Add,
        [Token::Minus] => Builtin::Sub,
        [Token::Star] => Builtin::Mul,
        [Token::Slash] => Builtin::Div,
        [Token::Percent] => Builtin::Mod,
        [Token::Caret] | [Token::Star, Token::Star] => Builtin::Pow,
        [Token::EqualEqual] => Builtin::Equal,
        [Token::BangEqual] => Builtin::NotEqual,
        [Token::Less] => Builtin::Less,
        [Token::Greater] => Builtin::Greater,
        [Token::LessEqual] => Builtin::LessEqual,
        [Token::GreaterEqual] => Builtin::GreaterEqual,
        _ => {
            return Err(ParseError::InvalidOperator { operator: run.to_string(),
                                                     position });
        },
    };
    Ok((op, negate))
}

const COMPARISONS: &[Builtin] = &[Builtin::Equal,
                                  Builtin::NotEqual,
                                  Builtin::Less,
                                  Builtin::Greater,
                                  Builtin::LessEqual,
                                  Builtin::GreaterEqual];

/// Folds the flat list into one tree.
fn fold(items: Vec<Item>, leading_negation: Option<usize>) -> ParseResult<Tree> {
    let mut items = implicit_multiplication(items);
    fold_level(&mut items, &[Builtin::Pow])?;
    fold_level(&mut items, &[Builtin::Mod, Builtin::Mul, Builtin::Div])?;
    fold_level(&mut items, &[Builtin::Add, Builtin::Sub])?;
    fold_level(&mut items, COMPARISONS)?;

    let tree = match (items.pop(), items.is_empty()) {
        (Some(Item::Operand(tree)), true) => tree,
        (Some(Item::Operator(_, position)), _) => return Err(ParseError::MissingOperand { position }),
        _ => return Err(ParseError::MissingOperand { position: leading_negation.unwrap_or(0) }),
    };
    // A leading minus applies to the whole folded expression.
    Ok(if leading_negation.is_some() { negate(tree) } else { tree })
}

/// Joins adjacent operands with a multiplication.
fn implicit_multiplication(items: Vec<Item>) -> Vec<Item> {
    let mut merged: Vec<Item> = Vec::with_capacity(items.len());
    for item in items {
        if let Item::Operand(next) = item {
            if let Some(Item::Operand(previous)) = merged.last_mut() {
                let left = mem::replace(previous, Tree::zero());
                *previous = Tree::binary(Builtin::Mul, left, next);
                continue;
            }
            merged.push(Item::Operand(next));
        } else {
            merged.push(item);
        }
    }
    merged
}

/// Folds every operator of one precedence level, left to right.
fn fold_level(items: &mut Vec<Item>, level: &[Builtin]) -> ParseResult<()> {
    let mut index = 0;
    while index < items.len() {
        let Item::Operator(op, position) = items[index] else {
            index += 1;
            continue;
        };
        if !level.contains(&op) {
            index += 1;
            continue;
        }
        if index == 0 || index + 1 == items.len() {
            return Err(ParseError::MissingOperand { position });
        }
        let right = items.remove(index + 1);
        items.remove(index);
        match (&mut items[index - 1], right) {
            (Item::Operand(left), Item::Operand(right)) => {
                let lhs = mem::replace(left, Tree::zero());
                *left = Tree::binary(op, lhs, right);
            },
            _ => return Err(ParseError::MissingOperand { position }),
        }
    }
    Ok(())
}

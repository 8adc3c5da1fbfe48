
use crate::{
    ast::{Action, CodeBlock, Function, Target, Tree},
    interpreter::{
        Interpreter,
        builtin::Builtin,
        value::{core::Value, number::Number, vector::Vector},
    },
};

/// Renders trees and code blocks back into source text.
///
/// The output parses into an equivalent tree: nested operators are
/// parenthesised, negative and complex literals are wrapped in parentheses,
/// and anonymous functions are always enclosed in their own group. Frame
/// references are written with the names they had in the source.
///
/// # Example
/// ```
/// use abacus::interpreter::{Interpreter, render::Renderer};
///
/// let interpreter = Interpreter::new();
/// let tree = interpreter.parse("(1 + 2) * -3").unwrap();
/// assert_eq!(Renderer::new(&interpreter).tree(&tree), "(1+2)*(-3)");
/// ```
#[derive(Debug)]
pub struct Renderer<'e> {
    env:    &'e Interpreter,
    /// Names of the current frame's arguments.
    args:   Vec<String>,
    /// Names of the current frame's locals, by slot.
    locals: Vec<String>,
}

impl<'e> Renderer<'e> {
    /// A renderer for top-level expressions, which have no frame.
    #[must_use]
    pub const fn new(env: &'e Interpreter) -> Self {
        Self { env,
               args: Vec::new(),
               locals: Vec::new() }
    }

    /// Renders a stored function as `name(params) = body`.
    pub fn function(&mut self, function: &Function) -> String {
        self.args.clone_from(&function.params);
        self.locals.clear();
        let body = self.body(&function.body);
        format!("{}({}) = {body}", function.name, function.params.join(","))
    }

    /// Renders an expression tree.
    pub fn tree(&mut self, tree: &Tree) -> String {
        match tree {
            Tree::Literal(value) => self.value(value),
            Tree::Argument(index) => self.args
                                         .get(*index)
                                         .cloned()
                                         .unwrap_or_else(|| format!("arg{index}")),
            Tree::Local(slot) => self.locals
                                     .get(*slot)
                                     .cloned()
                                     .unwrap_or_else(|| format!("local{slot}")),
            Tree::Global(slot) => self.env
                                      .variables
                                      .name(*slot)
                                      .map_or_else(|| format!("global{slot}"), str::to_string),
            Tree::Builtin { op: Builtin::Negate,
                            args, } if args.len() == 1 => format!("-{}", self.operand(&args[0])),
            Tree::Builtin { op, args } if op.is_infix() && args.len() == 2 => {
                let left = self.operand(&args[0]);
                let right = self.operand(&args[1]);
                format!("{left}{}{right}", op.name())
            },
            Tree::Builtin { op, args } => {
                let args = self.list(args);
                format!("{}({args})", op.name())
            },
            Tree::Custom { id, args } => {
                let name = self.env
                               .functions
                               .get(*id)
                               .map_or_else(|| format!("function{}", id.0), |function| function.name.clone());
                let args = self.list(args);
                format!("{name}({args})")
            },
            Tree::Vector { width, cells, .. } => {
                let rows = cells.chunks((*width).max(1))
                                .map(|row| {
                                    row.iter()
                                       .map(|cell| self.operand(cell))
                                       .collect::<Vec<_>>()
                                       .join(",")
                                })
                                .collect::<Vec<_>>();
                format!("<{}>", rows.join(";"))
            },
            Tree::Closure { params,
                            body,
                            capture_width, } => {
                let captured = self.args.iter().chain(&self.locals).take(*capture_width).cloned();
                let mut inner = Renderer { env:    self.env,
                                           args:   params.iter().cloned().chain(captured).collect(),
                                           locals: Vec::new(), };
                let body = inner.body(body);
                format!("(({})=>{body})", params.join(","))
            },
        }
    }

    /// Renders a code block as `{s1;s2}`.
    pub fn block(&mut self, block: &CodeBlock) -> String {
        let outer = self.locals.clone();
        self.locals.truncate(block.first_slot);
        self.locals.extend(block.locals.iter().cloned());
        let statements = block.actions
                              .iter()
                              .map(|action| self.action(action))
                              .collect::<Vec<_>>();
        self.locals = outer;
        format!("{{{}}}", statements.join(";"))
    }

    /// A function body: the bare expression when it only returns one,
    /// otherwise the braced block.
    fn body(&mut self, block: &CodeBlock) -> String {
        match block.single_return() {
            Some(tree) => self.tree(tree),
            None => self.block(block),
        }
    }

    fn action(&mut self, action: &Action) -> String {
        match action {
            Action::Statement(tree) => self.tree(tree),
            Action::Return(tree) => format!("return {}", self.tree(tree)),
            Action::Assign { target, value } => {
                let value = self.tree(value);
                let name = match *target {
                    Target::Argument(index) => self.tree(&Tree::Argument(index)),
                    Target::Local(slot) => self.tree(&Tree::Local(slot)),
                };
                format!("{name}={value}")
            },
            Action::If { condition, body } => {
                let condition = self.tree(condition);
                format!("if({condition}){}", self.block(body))
            },
            Action::Else(body) => match body.actions.as_slice() {
                [Action::If { .. }] | [Action::If { .. }, Action::Else(_)] if body.locals.is_empty() => {
                    let chain = body.actions
                                    .iter()
                                    .map(|action| self.action(action))
                                    .collect::<Vec<_>>();
                    format!("else {}", chain.join(";"))
                },
                _ => format!("else{}", self.block(body)),
            },
            Action::While { condition, body } => {
                let condition = self.tree(condition);
                format!("while({condition}){}", self.block(body))
            },
            Action::Break => "break".to_string(),
            Action::Continue => "continue".to_string(),
        }
    }

    /// Renders an operand of an operator, parenthesising nested operators.
    fn operand(&mut self, tree: &Tree) -> String {
        let text = self.tree(tree);
        match tree {
            Tree::Builtin { op, .. } if op.is_infix() || *op == Builtin::Negate => format!("({text})"),
            _ => text,
        }
    }

    fn list(&mut self, args: &[Tree]) -> String {
        args.iter()
            .map(|arg| self.tree(arg))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn value(&self, value: &Value) -> String {
        match value {
            Value::Number(n) => number(*n),
            Value::Vector(v) => vector(v),
            Value::String(s) => format!("\"{s}\""),
            Value::Bignum(b) => format!("big(\"{}\")", b.to_string_radix(10, self.env.config.bignum_digits)),
            Value::Closure(_) => value.to_string(),
        }
    }
}

/// A real number that reads back as an operand.
fn real(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value.is_sign_negative() {
        format!("(-{})", real(-value))
    } else {
        format!("{value}")
    }
}

/// A number literal: `3`, `(-3)`, `(1+2*i)`, `(5*[m])`.
fn number(n: Number) -> String {
    let mut text = if n.is_real() {
        real(n.real)
    } else {
        let mut text = String::from("(");
        if n.real != 0.0 {
            text.push_str(&real(n.real));
            text.push(if n.imag.is_sign_negative() { '-' } else { '+' });
        } else if n.imag.is_sign_negative() {
            text.push('-');
        }
        text.push_str(&format!("{}*i)", real(n.imag.abs())));
        text
    };
    if !n.unit.is_dimensionless() {
        text = format!("({text}*[{}])", n.unit);
    }
    text
}

fn vector(v: &Vector) -> String {
    let rows = v.cells()
                .chunks(v.width().max(1))
                .map(|row| row.iter().map(|&cell| number(cell)).collect::<Vec<_>>().join(","))
                .collect::<Vec<_>>();
    format!("<{}>", rows.join(";"))
}

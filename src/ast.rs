use std::{fmt, rc::Rc};

use crate::interpreter::{
    builtin::Builtin,
    value::{
        core::Value,
        number::{Number, ONE, ZERO},
    },
};

/// Index of a custom function in the function registry.
///
/// Indices are never reused after a delete, so a tree that still refers to a
/// deleted function fails at evaluation time instead of calling a stranger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub usize);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the expression tree.
///
/// Trees are built once by the tree builder and never mutated afterwards.
/// Non-leaf nodes own their children exclusively; only closure bodies are
/// shared, through `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// A constant value.
    Literal(Value),
    /// A call to a builtin operator or function.
    Builtin {
        /// Which builtin.
        op:   Builtin,
        /// Argument subtrees; their count satisfies the builtin's arity.
        args: Vec<Self>,
    },
    /// A call to a registered custom function.
    Custom {
        /// Registry index of the callee.
        id:   FunctionId,
        /// Argument subtrees.
        args: Vec<Self>,
    },
    /// The argument at this index of the current frame.
    Argument(usize),
    /// The local variable in this slot of the current frame.
    Local(usize),
    /// The global variable in this registry slot.
    Global(usize),
    /// A vector constructor holding exactly `width * height` cells.
    Vector {
        width:  usize,
        height: usize,
        cells:  Vec<Self>,
    },
    /// An anonymous function.
    ///
    /// Evaluating it copies the first `capture_width` values of the current
    /// frame (arguments, then locals) into the resulting closure value.
    Closure {
        /// Parameter names.
        params:        Rc<[String]>,
        /// The body, shared with every closure value built from this node.
        body:          Rc<CodeBlock>,
        /// Number of frame values captured at construction.
        capture_width: usize,
    },
}

impl Tree {
    #[must_use]
    pub const fn zero() -> Self {
        Self::Literal(Value::Number(ZERO))
    }

    #[must_use]
    pub const fn one() -> Self {
        Self::Literal(Value::Number(ONE))
    }

    #[must_use]
    pub const fn number(value: Number) -> Self {
        Self::Literal(Value::Number(value))
    }

    /// A call to a two-argument builtin.
    #[must_use]
    pub fn binary(op: Builtin, left: Self, right: Self) -> Self {
        Self::Builtin { op,
                        args: vec![left, right] }
    }

    /// A call to a one-argument builtin.
    #[must_use]
    pub fn unary(op: Builtin, arg: Self) -> Self {
        Self::Builtin { op,
                        args: vec![arg] }
    }

    /// The number stored in a literal leaf.
    #[must_use]
    pub const fn as_number(&self) -> Option<Number> {
        match self {
            Self::Literal(Value::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Whether evaluating this tree needs the current call frame.
    #[must_use]
    pub fn references_frame(&self) -> bool {
        match self {
            Self::Argument(_) | Self::Local(_) => true,
            Self::Literal(_) | Self::Global(_) => false,
            Self::Builtin { args, .. } | Self::Custom { args, .. } => {
                args.iter().any(Self::references_frame)
            },
            Self::Vector { cells, .. } => cells.iter().any(Self::references_frame),
            Self::Closure { capture_width, .. } => *capture_width > 0,
        }
    }
}

/// Where an assignment stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// An argument slot of the current frame.
    Argument(usize),
    /// A local slot of the current frame.
    Local(usize),
}

/// One statement of a [`CodeBlock`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Evaluate and discard.
    Statement(Tree),
    /// Evaluate and leave the function with the result.
    Return(Tree),
    /// Evaluate and store.
    Assign { target: Target, value: Tree },
    /// Run `body` when `condition` is truthy.
    If { condition: Tree, body: CodeBlock },
    /// Run `body` when the directly preceding `If` did not fire.
    Else(CodeBlock),
    /// Run `body` while `condition` is truthy.
    While { condition: Tree, body: CodeBlock },
    Break,
    Continue,
}

/// An ordered list of statements with its own local scope.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// The statements, in order. A `Return` may only be last.
    pub actions:    Vec<Action>,
    /// Names of the locals this block introduces, in slot order.
    pub locals:     Vec<String>,
    /// Slot of the first local in `locals`.
    pub first_slot: usize,
    /// Number of local slots a frame running this block needs, counting
    /// nested blocks.
    pub frame_size: usize,
}

impl CodeBlock {
    /// A body consisting of a single `return expr`.
    #[must_use]
    pub fn returning(tree: Tree) -> Self {
        Self { actions:    vec![Action::Return(tree)],
               locals:     Vec::new(),
               first_slot: 0,
               frame_size: 0, }
    }

    /// The expression of a body that is exactly one `return expr`.
    #[must_use]
    pub fn single_return(&self) -> Option<&Tree> {
        match self.actions.as_slice() {
            [Action::Return(tree)] if self.locals.is_empty() => Some(tree),
            _ => None,
        }
    }
}

/// A registered custom function.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name:   String,
    pub params: Vec<String>,
    pub body:   Rc<CodeBlock>,
}

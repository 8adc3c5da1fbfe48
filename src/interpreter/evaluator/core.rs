use std::{borrow::Cow, rc::Rc};

use crate::{
    ast::{CodeBlock, FunctionId, Tree},
    error::RuntimeError,
    interpreter::{
        Interpreter,
        evaluator::utils::type_error,
        value::{
            core::{Closure, KindSet, Value},
            vector::{Vector, reserve_cells},
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The values a tree's `Argument` and `Local` leaves refer to.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'f> {
    /// Call arguments, followed by captured values inside a closure.
    pub args:   &'f [Value],
    /// Local variable slots.
    pub locals: &'f [Value],
}

impl Frame<'static> {
    /// The frame of a top-level expression.
    pub const EMPTY: Self = Self { args:   &[],
                                   locals: &[], };
}

impl Interpreter {
    /// Evaluates a tree against a frame.
    ///
    /// Leaves return borrows of the stored value: literals of themselves,
    /// `Argument`, `Local` and `Global` of their slot. Everything else
    /// produces an owned value. Callers copy a borrowed result before storing
    /// it.
    ///
    /// # Example
    /// ```
    /// use std::borrow::Cow;
    ///
    /// use abacus::interpreter::{Interpreter, evaluator::core::Frame, value::core::Value};
    ///
    /// let interpreter = Interpreter::new();
    /// let tree = interpreter.parse("2 * 3").unwrap();
    /// let result = interpreter.evaluate_tree(&tree, Frame::EMPTY).unwrap();
    /// assert_eq!(result, Cow::<Value>::Owned(Value::from(6.0)));
    /// ```
    pub fn evaluate_tree<'a>(&'a self, tree: &'a Tree, frame: Frame<'a>) -> EvalResult<Cow<'a, Value>> {
        match tree {
            Tree::Literal(value) => Ok(Cow::Borrowed(value)),
            Tree::Argument(index) => frame.args
                                          .get(*index)
                                          .map(Cow::Borrowed)
                                          .ok_or(RuntimeError::InvalidSlot { kind:  "argument",
                                                                             index: *index, }),
            Tree::Local(slot) => frame.locals
                                      .get(*slot)
                                      .map(Cow::Borrowed)
                                      .ok_or(RuntimeError::InvalidSlot { kind:  "local",
                                                                         index: *slot, }),
            Tree::Global(slot) => self.variables
                                      .get(*slot)
                                      .map(Cow::Borrowed)
                                      .ok_or(RuntimeError::DeletedVariable { slot: *slot }),
            Tree::Builtin { op, args } => self.eval_builtin(*op, args, frame),
            Tree::Custom { id, args } => {
                let values = self.evaluate_args(args, frame)?;
                self.call_custom(*id, values).map(Cow::Owned)
            },
            Tree::Vector { width,
                           height,
                           cells, } => self.eval_vector(*width, *height, cells, frame).map(Cow::Owned),
            Tree::Closure { params,
                            body,
                            capture_width, } => {
                let captured: Rc<[Value]> = frame.args
                                                 .iter()
                                                 .chain(frame.locals)
                                                 .take(*capture_width)
                                                 .cloned()
                                                 .collect();
                Ok(Cow::Owned(Value::Closure(Closure { params: Rc::clone(params),
                                                       body: Rc::clone(body),
                                                       captured })))
            },
        }
    }

    /// Evaluates call arguments into owned values.
    fn evaluate_args(&self, args: &[Tree], frame: Frame<'_>) -> EvalResult<Vec<Value>> {
        args.iter()
            .map(|arg| self.evaluate_tree(arg, frame).map(Cow::into_owned))
            .collect()
    }

    /// Builds a vector from its cell trees; every cell must be a number.
    fn eval_vector(&self, width: usize, height: usize, cells: &[Tree], frame: Frame<'_>) -> EvalResult<Value> {
        let mut numbers = reserve_cells(width, height)?;
        for (index, cell) in cells.iter().enumerate() {
            let value = self.evaluate_tree(cell, frame)?;
            let number = value.as_number()
                              .ok_or_else(|| type_error("vector", index + 1, KindSet::NUMBER, &value))?;
            numbers.push(number);
        }
        Vector::from_cells(width, height, numbers).map(Value::Vector)
                                                  .ok_or_else(|| RuntimeError::ShapeMismatch {
                                                      details: format!("{} cells do not fill a {width}x{height} vector", cells.len()),
                                                  })
    }

    /// Calls the custom function in slot `id`.
    pub(crate) fn call_custom(&self, id: FunctionId, args: Vec<Value>) -> EvalResult<Value> {
        let function = self.functions
                           .get(id)
                           .ok_or(RuntimeError::DeletedFunction { id: id.0 })?;
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name:     function.name.clone(),
                                                             expected: function.params.len(),
                                                             found:    args.len(), });
        }
        self.run_body(&function.body, args)
    }

    /// Calls a closure: its parameters come first in the frame, followed by
    /// the captured values.
    pub(crate) fn call_closure(&self, closure: &Closure, mut args: Vec<Value>) -> EvalResult<Value> {
        if args.len() != closure.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name:     "anonymous function".to_string(),
                                                             expected: closure.params.len(),
                                                             found:    args.len(), });
        }
        args.extend(closure.captured.iter().cloned());
        self.run_body(&closure.body, args)
    }

    /// Runs a function body with `args` as the frame's arguments.
    fn run_body(&self, body: &CodeBlock, args: Vec<Value>) -> EvalResult<Value> {
        if let Some(tree) = body.single_return() {
            let frame = Frame { args:   &args,
                                locals: &[], };
            return self.evaluate_tree(tree, frame).map(Cow::into_owned);
        }
        self.execute_body(body, args)
    }
}

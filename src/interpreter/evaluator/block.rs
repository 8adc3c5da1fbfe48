use tracing::warn;

use crate::{
    ast::{Action, CodeBlock, Target, Tree},
    error::RuntimeError,
    interpreter::{
        Interpreter,
        evaluator::core::{EvalResult, Frame},
        value::core::Value,
    },
};

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Fallthrough,
    /// Leave the function with this value.
    Return(Value),
    /// Leave the innermost loop.
    Break,
    /// Start the next iteration of the innermost loop.
    Continue,
}

impl Interpreter {
    /// Runs a function body with its own local array.
    ///
    /// A body that falls through returns zero.
    pub(crate) fn execute_body(&self, body: &CodeBlock, mut args: Vec<Value>) -> EvalResult<Value> {
        let mut locals = vec![Value::zero(); body.frame_size];
        match self.run_block(body, &mut args, &mut locals)? {
            Flow::Return(value) => Ok(value),
            Flow::Fallthrough => Ok(Value::zero()),
            Flow::Break | Flow::Continue => Err(RuntimeError::IllegalLoopControl),
        }
    }

    /// Runs the statements of one block. Nested blocks share the local array.
    fn run_block(&self, block: &CodeBlock, args: &mut [Value], locals: &mut [Value]) -> EvalResult<Flow> {
        let mut branch_taken = false;
        for action in &block.actions {
            let flow = match action {
                Action::Statement(tree) => {
                    self.evaluate_tree(tree, frame(args, locals))?;
                    Flow::Fallthrough
                },
                Action::Return(tree) => Flow::Return(self.evaluate_tree(tree, frame(args, locals))?.into_owned()),
                Action::Assign { target, value } => {
                    let value = self.evaluate_tree(value, frame(args, locals))?.into_owned();
                    let slot = match *target {
                        Target::Argument(index) => args.get_mut(index).ok_or(RuntimeError::InvalidSlot { kind: "argument",
                                                                                                          index }),
                        Target::Local(index) => locals.get_mut(index).ok_or(RuntimeError::InvalidSlot { kind: "local",
                                                                                                        index }),
                    }?;
                    *slot = value;
                    Flow::Fallthrough
                },
                Action::If { condition, body } => {
                    branch_taken = self.evaluate_tree(condition, frame(args, locals))?.is_truthy();
                    if branch_taken {
                        self.run_block(body, args, locals)?
                    } else {
                        Flow::Fallthrough
                    }
                },
                Action::Else(body) => {
                    if branch_taken {
                        Flow::Fallthrough
                    } else {
                        self.run_block(body, args, locals)?
                    }
                },
                Action::While { condition, body } => self.run_loop(condition, body, args, locals)?,
                Action::Break => Flow::Break,
                Action::Continue => Flow::Continue,
            };
            if flow != Flow::Fallthrough {
                return Ok(flow);
            }
        }
        Ok(Flow::Fallthrough)
    }

    /// Runs a `while` loop, giving up after the configured number of
    /// iterations.
    fn run_loop(&self,
                condition: &Tree,
                body: &CodeBlock,
                args: &mut [Value],
                locals: &mut [Value])
                -> EvalResult<Flow> {
        let limit = self.config.max_loop_iterations;
        let mut iterations = 0_usize;
        loop {
            let proceed = self.evaluate_tree(condition, frame(args, locals))?.is_truthy();
            if !proceed {
                break;
            }
            if iterations == limit {
                warn!(limit, "loop iteration limit reached");
                return Err(RuntimeError::InfiniteLoop { limit });
            }
            iterations += 1;
            match self.run_block(body, args, locals)? {
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Break => break,
                Flow::Continue | Flow::Fallthrough => {},
            }
        }
        Ok(Flow::Fallthrough)
    }
}

const fn frame<'f>(args: &'f [Value], locals: &'f [Value]) -> Frame<'f> {
    Frame { args, locals }
}

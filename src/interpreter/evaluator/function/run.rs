use std::borrow::Cow;

use crate::{
    error::RuntimeError,
    interpreter::{
        Interpreter,
        builtin::{Arity, Builtin},
        evaluator::{core::EvalResult, utils::type_error},
        value::core::{KindSet, Value},
    },
};

impl Interpreter {
    /// `run(f, args...)`: calls `f` with the remaining arguments.
    ///
    /// `f` is either a closure or a string naming a custom function or a
    /// callable builtin. Named callees are resolved when the call runs, so
    /// a function defined after the calling code is found.
    ///
    /// # Example
    /// ```
    /// use abacus::interpreter::{Interpreter, value::core::Value};
    ///
    /// let interpreter = Interpreter::new();
    /// assert_eq!(interpreter.evaluate_str("run(n=>n+1, 4)").unwrap(), Value::from(5.0));
    /// assert_eq!(interpreter.evaluate_str("run(\"max\", 2, 9, 4)").unwrap(), Value::from(9.0));
    /// ```
    pub(crate) fn run<'a>(&'a self, args: Vec<Cow<'a, Value>>) -> EvalResult<Cow<'a, Value>> {
        let mut args = args.into_iter();
        let Some(callee) = args.next() else {
            return Err(RuntimeError::ArgumentCountMismatch { name:     Builtin::Run.name().to_string(),
                                                             expected: 1,
                                                             found:    0, });
        };
        match callee.as_ref() {
            Value::Closure(closure) => {
                let values = args.map(Cow::into_owned).collect();
                self.call_closure(closure, values).map(Cow::Owned)
            },
            Value::String(name) => self.run_named(name, args.collect()),
            other => Err(type_error(Builtin::Run.name(),
                                    1,
                                    KindSet::CLOSURE.union(KindSet::STRING),
                                    other)),
        }
    }

    fn run_named<'a>(&'a self, name: &str, args: Vec<Cow<'a, Value>>) -> EvalResult<Cow<'a, Value>> {
        if let Some(id) = self.functions.lookup(name) {
            let values = args.into_iter().map(Cow::into_owned).collect();
            return self.call_custom(id, values).map(Cow::Owned);
        }
        let op = Builtin::from_name(name).ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string() })?;
        let def = op.def();
        if !def.arity.accepts(args.len()) {
            let (Arity::Exact(expected) | Arity::AtLeast(expected)) = def.arity;
            return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                             expected,
                                                             found: args.len() });
        }
        for (position, value) in args.iter().enumerate() {
            def.check_kind(position, value)?;
        }
        self.apply_builtin(op, args)
    }
}

use std::borrow::Cow;

use crate::{
    ast::Tree,
    interpreter::{
        Interpreter,
        builtin::Builtin,
        evaluator::{
            binary::{comparison::compare, core::binary},
            core::{EvalResult, Frame},
            function::{
                math::elementwise,
                min_max::{Extremum, extremum},
                vector::{det, fill, get, height, ident, length, mmul, sum, transpose, width},
            },
            unary::negate,
            utils::take_args,
        },
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates the arguments of a builtin call, checks each against the
    /// builtin's signature and applies it.
    ///
    /// # Example
    /// ```
    /// use abacus::interpreter::Interpreter;
    ///
    /// let interpreter = Interpreter::new();
    /// let err = interpreter.evaluate_str("sin(\"x\")").unwrap_err();
    /// assert!(err.to_string().contains("'sin' expects"));
    /// ```
    pub(crate) fn eval_builtin<'a>(&'a self,
                                   op: Builtin,
                                   args: &'a [Tree],
                                   frame: Frame<'a>)
                                   -> EvalResult<Cow<'a, Value>> {
        let def = op.def();
        let mut values = Vec::with_capacity(args.len());
        for (position, arg) in args.iter().enumerate() {
            let value = self.evaluate_tree(arg, frame)?;
            def.check_kind(position, &value)?;
            values.push(value);
        }
        self.apply_builtin(op, values)
    }

    /// Applies a builtin to already checked arguments.
    pub(crate) fn apply_builtin<'a>(&'a self, op: Builtin, args: Vec<Cow<'a, Value>>) -> EvalResult<Cow<'a, Value>> {
        let value = match op {
            Builtin::Add
            | Builtin::Sub
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Mod
            | Builtin::Pow
            | Builtin::Atan2
            | Builtin::And
            | Builtin::Or
            | Builtin::Xor => {
                let [left, right] = take_args(op, args)?;
                binary(op, left, right)?
            },
            Builtin::Negate => {
                let [value] = take_args(op, args)?;
                negate(value)?
            },
            Builtin::Equal
            | Builtin::NotEqual
            | Builtin::Less
            | Builtin::Greater
            | Builtin::LessEqual
            | Builtin::GreaterEqual => {
                let [left, right] = take_args(op, args)?;
                compare(op, &left, &right)
            },
            Builtin::Sin
            | Builtin::Cos
            | Builtin::Tan
            | Builtin::Asin
            | Builtin::Acos
            | Builtin::Atan
            | Builtin::Sinh
            | Builtin::Cosh
            | Builtin::Tanh
            | Builtin::Asinh
            | Builtin::Acosh
            | Builtin::Atanh
            | Builtin::Ln
            | Builtin::Log
            | Builtin::Exp
            | Builtin::Sqrt
            | Builtin::Cbrt
            | Builtin::Abs
            | Builtin::Floor
            | Builtin::Ceil
            | Builtin::Round
            | Builtin::Trunc
            | Builtin::Sgn
            | Builtin::Re
            | Builtin::Im
            | Builtin::Conj
            | Builtin::Arg => {
                let [value] = take_args(op, args)?;
                elementwise(op, value)?
            },
            Builtin::Transpose => {
                let [value] = take_args(op, args)?;
                transpose(&value)?
            },
            Builtin::Det => {
                let [value] = take_args(op, args)?;
                det(&value)?
            },
            Builtin::Width => {
                let [value] = take_args(op, args)?;
                width(&value)?
            },
            Builtin::Height => {
                let [value] = take_args(op, args)?;
                height(&value)?
            },
            Builtin::Sum => {
                let [value] = take_args(op, args)?;
                sum(&value)?
            },
            Builtin::Length => {
                let [value] = take_args(op, args)?;
                length(&value)
            },
            Builtin::Get => {
                let [vector, x, y] = take_args(op, args)?;
                get(&vector, &x, &y)?
            },
            Builtin::Fill => {
                let [value, w, h] = take_args(op, args)?;
                fill(&value, &w, &h)?
            },
            Builtin::Ident => {
                let [n] = take_args(op, args)?;
                ident(&n)?
            },
            Builtin::Mmul => {
                let [a, b] = take_args(op, args)?;
                mmul(&a, &b)?
            },
            Builtin::Min => return extremum(Extremum::Min, args),
            Builtin::Max => return extremum(Extremum::Max, args),
            Builtin::Run => return self.run(args),
            Builtin::Str => {
                let [value] = take_args(op, args)?;
                Value::String(self.format_value(&value))
            },
            Builtin::Substr => {
                let [text, start, len] = take_args(op, args)?;
                Self::substr(&text, &start, &len)?
            },
            Builtin::Big => {
                let [value] = take_args(op, args)?;
                self.big(&value)?
            },
            Builtin::Num => {
                let [value] = take_args(op, args)?;
                Self::num(&value)?
            },
            Builtin::Print => {
                let [value] = take_args(op, args)?;
                return Ok(self.print_value(value));
            },
        };
        Ok(Cow::Owned(value))
    }
}

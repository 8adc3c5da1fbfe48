use crate::{
    error::RuntimeError,
    interpreter::{
        Interpreter,
        evaluator::{
            core::EvalResult,
            utils::{index_arg, type_error},
        },
        parser::number::parse_number,
        value::{
            bignum::Bignum,
            core::{KindSet, Value},
            number::Number,
        },
    },
};

const REPRESENTABLE: KindSet = KindSet::NUMBER.union(KindSet::BIGNUM).union(KindSet::STRING);

impl Interpreter {
    /// `substr(s, start, len)`: `len` characters of `s` starting at
    /// character `start`.
    ///
    /// # Example
    /// ```
    /// use abacus::interpreter::{Interpreter, value::core::Value};
    ///
    /// let interpreter = Interpreter::new();
    /// let part = interpreter.evaluate_str("substr(\"abacus\", 1, 3)").unwrap();
    /// assert_eq!(part, Value::String("bac".into()));
    /// assert!(interpreter.evaluate_str("substr(\"abc\", 2, 5)").is_err());
    /// ```
    pub(crate) fn substr(text: &Value, start: &Value, len: &Value) -> EvalResult<Value> {
        let text = text.as_str()
                       .ok_or_else(|| type_error("substr", 1, KindSet::STRING, text))?;
        let start = index_arg(start, "substr", 2)?;
        let len = index_arg(len, "substr", 3)?;
        let count = text.chars().count();
        if start > count {
            return Err(RuntimeError::IndexOutOfBounds { max:   count,
                                                        found: start, });
        }
        if len > count - start {
            return Err(RuntimeError::InvalidArgument { details: format!("{len} characters from offset {start} \
                                                                         run past the end of a {count} \
                                                                         character string") });
        }
        Ok(Value::String(text.chars().skip(start).take(len).collect()))
    }

    /// Converts a number or a decimal string to a bignum at the configured
    /// precision.
    pub(crate) fn big(&self, value: &Value) -> EvalResult<Value> {
        let precision = self.config.bignum_precision;
        let converted = match value {
            Value::Bignum(b) => Some(b.clone()),
            Value::Number(n) => Bignum::from_number(*n, precision),
            Value::String(s) => Bignum::parse(s, 10, precision),
            other => return Err(type_error("big", 1, REPRESENTABLE, other)),
        };
        converted.map(Value::Bignum)
                 .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("'{value}' has no bignum value") })
    }

    /// Converts a bignum or a numeric string back to a number.
    pub(crate) fn num(value: &Value) -> EvalResult<Value> {
        match value {
            Value::Number(n) => Ok(Value::Number(*n)),
            Value::Bignum(b) => Ok(Value::Number(b.to_number())),
            Value::String(s) => {
                parse_number(s.trim(), 10).map(|n| Value::Number(Number::real(n)))
                                          .ok_or_else(|| RuntimeError::InvalidArgument { details: format!("'{s}' is not a number") })
            },
            other => Err(type_error("num", 1, REPRESENTABLE, other)),
        }
    }
}

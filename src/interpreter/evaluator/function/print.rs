use std::borrow::Cow;

use crate::interpreter::{Interpreter, value::core::Value};

impl Interpreter {
    /// Writes a value to the output sink and returns it unchanged.
    ///
    /// Bignums are written with the configured number of digits.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// use abacus::interpreter::{Interpreter, value::core::Value};
    ///
    /// let output = Rc::new(RefCell::new(Vec::new()));
    /// let sink = Rc::clone(&output);
    /// let interpreter = Interpreter::new().with_printer(move |line| sink.borrow_mut().push(line.to_string()));
    ///
    /// let result = interpreter.evaluate_str("print(6 * 7) + 1").unwrap();
    /// assert_eq!(result, Value::from(43.0));
    /// assert_eq!(*output.borrow(), vec!["42".to_string()]);
    /// ```
    pub(crate) fn print_value<'a>(&self, value: Cow<'a, Value>) -> Cow<'a, Value> {
        self.print(&self.format_value(&value));
        value
    }
}

use crate::interpreter::{builtin::Builtin, value::core::Value};

/// Evaluates a comparison of the form `Value <Operator> Value`.
///
/// `==` and `!=` compare exactly, component by component, including units.
/// The relational operators compare the flattened readings of both sides,
/// so `<1, 2> < 4` holds while `<1, 2> == 3` does not.
///
/// # Example
/// ```
/// use abacus::interpreter::{
///     builtin::Builtin,
///     evaluator::binary::comparison::compare,
///     value::core::Value,
/// };
///
/// let a = Value::from(3.0);
/// let b = Value::from(5.0);
/// assert_eq!(compare(Builtin::Less, &a, &b), Value::from(true));
/// assert_eq!(compare(Builtin::Equal, &a, &b), Value::from(false));
/// ```
#[must_use]
pub fn compare(op: Builtin, left: &Value, right: &Value) -> Value {
    let ordering = left.compare(right);
    Value::from(match op {
                    Builtin::Equal => left == right,
                    Builtin::NotEqual => left != right,
                    Builtin::Less => ordering.is_lt(),
                    Builtin::Greater => ordering.is_gt(),
                    Builtin::LessEqual => ordering.is_le(),
                    Builtin::GreaterEqual => ordering.is_ge(),
                    _ => false,
                })
}

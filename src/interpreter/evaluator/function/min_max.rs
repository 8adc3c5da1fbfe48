use std::borrow::Cow;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Which end of the ordering to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

/// Selects the smallest or largest argument.
///
/// Arguments are ordered by their flattened reading, so numbers, vectors,
/// bignums and strings can be mixed. Ties keep the earliest argument, which
/// is returned as given: a borrowed argument stays borrowed.
///
/// # Example
/// ```
/// use std::borrow::Cow;
///
/// use abacus::interpreter::{
///     evaluator::function::min_max::{Extremum, extremum},
///     value::core::Value,
/// };
///
/// let args = vec![Cow::Owned(Value::from(3.0)), Cow::Owned(Value::from(-1.0)), Cow::Owned(Value::from(7.0))];
/// assert_eq!(extremum(Extremum::Min, args.clone()).unwrap().into_owned(), Value::from(-1.0));
/// assert_eq!(extremum(Extremum::Max, args).unwrap().into_owned(), Value::from(7.0));
/// ```
pub fn extremum(which: Extremum, args: Vec<Cow<'_, Value>>) -> EvalResult<Cow<'_, Value>> {
    let name = match which {
        Extremum::Min => "min",
        Extremum::Max => "max",
    };
    args.into_iter()
        .reduce(|best, candidate| {
            let ordering = candidate.compare(&best);
            let replace = match which {
                Extremum::Min => ordering.is_lt(),
                Extremum::Max => ordering.is_gt(),
            };
            if replace { candidate } else { best }
        })
        .ok_or(RuntimeError::ArgumentCountMismatch { name:     name.to_string(),
                                                     expected: 1,
                                                     found:    0, })
}

use std::{borrow::Cow, fmt, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{CodeBlock, Function, FunctionId, Tree},
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        builtin::{is_keyword, is_reserved},
        config::Config,
        derivative::derivative,
        evaluator::core::Frame,
        lexer::{Token, lexer},
        parser::{
            block::parse_block,
            core::{Ambient, Pending, Scope, parse_expression},
            utils::{is_identifier, leading_whitespace},
        },
        registry::{FunctionRegistry, VariableRegistry},
        render::Renderer,
        sectionizer::{find_top_level, group_end},
        value::{core::Value, unit_table::UnitTable},
    },
};

/// Destination of `print` output.
pub type Printer = Box<dyn Fn(&str)>;

/// The environment every parse and evaluation runs against.
///
/// An interpreter owns the custom function and global variable registries,
/// the unit table, its limits and the sink `print` writes to. Interpreters
/// are independent of each other.
///
/// # Example
/// ```
/// use abacus::interpreter::{Interpreter, value::core::Value};
///
/// let mut interpreter = Interpreter::new();
/// interpreter.define_function("square", &["x"], "x^2").unwrap();
/// let value = interpreter.evaluate_str("square(3) + 1").unwrap();
/// assert_eq!(value, Value::from(10.0));
/// ```
pub struct Interpreter {
    pub(crate) functions: FunctionRegistry,
    pub(crate) variables: VariableRegistry,
    pub(crate) units:     UnitTable,
    pub(crate) config:    Config,
    printer:              Printer,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
         .field("functions", &self.functions)
         .field("variables", &self.variables)
         .field("units", &self.units)
         .field("config", &self.config)
         .finish_non_exhaustive()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with SI units, default limits and `print` going to
    /// standard output.
    #[must_use]
    pub fn new() -> Self {
        Self { functions: FunctionRegistry::default(),
               variables: VariableRegistry::default(),
               units:     UnitTable::si(),
               config:    Config::default(),
               printer:   Box::new(|text| println!("{text}")), }
    }

    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: UnitTable) -> Self {
        self.units = units;
        self
    }

    /// Redirects `print` output.
    #[must_use]
    pub fn with_printer(mut self, printer: impl Fn(&str) + 'static) -> Self {
        self.printer = Box::new(printer);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn units(&self) -> &UnitTable {
        &self.units
    }

    pub(crate) fn print(&self, text: &str) {
        (self.printer)(text);
    }

    /// Parses a top-level expression.
    pub fn parse(&self, text: &str) -> Result<Tree, Error> {
        let mut scope = Scope::top();
        Ok(parse_expression(self, text, 0, &mut scope, Ambient::default())?)
    }

    /// Parses a top-level expression, discarding any error.
    #[must_use]
    pub fn try_parse(&self, text: &str) -> Option<Tree> {
        self.parse(text).ok()
    }

    /// Evaluates a tree built for the top level.
    pub fn evaluate(&self, tree: &Tree) -> Result<Value, Error> {
        trace!(?tree, "evaluating");
        Ok(self.evaluate_tree(tree, Frame::EMPTY).map(Cow::into_owned)?)
    }

    /// Parses and evaluates `text`.
    pub fn evaluate_str(&self, text: &str) -> Result<Value, Error> {
        trace!(text, "evaluating text");
        let tree = self.parse(text)?;
        self.evaluate(&tree)
    }

    /// Defines or redefines the custom function `name`.
    ///
    /// `body` is either a single expression or a braced code block. The name
    /// is callable while the body is parsed, so the body may recurse.
    /// Redefinition keeps the slot, so existing callers see the new body.
    ///
    /// # Example
    /// ```
    /// use abacus::interpreter::{Interpreter, value::core::Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.define_function("fact", &["n"], "{if(n<2){return 1};return n*fact(n-1)}")
    ///            .unwrap();
    /// assert_eq!(interpreter.evaluate_str("fact(5)").unwrap(), Value::from(120.0));
    /// ```
    pub fn define_function(&mut self, name: &str, params: &[&str], body: &str) -> Result<FunctionId, Error> {
        check_definable(name)?;
        let params = check_params(params)?;
        let id = self.functions.reserve(name);
        let pending = Pending { name: name.to_string(),
                                id,
                                arity: params.len() };
        let mut scope = Scope::function(params.clone(), Some(pending));

        let text = body.trim_end();
        let start = leading_whitespace(text);
        let block = if text[start..].starts_with('{') && group_end(text, start) == Some(text.len()) {
            parse_block(self, &text[start + 1..text.len() - 1], start + 1, &mut scope)?
        } else {
            CodeBlock::returning(parse_expression(self, text, 0, &mut scope, Ambient::default())?)
        };

        debug!(name, ?id, arity = params.len(), "defining function");
        self.functions.insert(id,
                              Function { name: name.to_string(),
                                         params,
                                         body: Rc::new(block) });
        Ok(id)
    }

    /// Deletes the custom function `name`; its slot is never reused.
    pub fn delete_function(&mut self, name: &str) -> Result<(), Error> {
        self.functions
            .remove(name)
            .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string() })?;
        debug!(name, "deleted function");
        Ok(())
    }

    #[must_use]
    pub fn function_id(&self, name: &str) -> Option<FunctionId> {
        self.functions.lookup(name)
    }

    #[must_use]
    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id)
    }

    /// Renders the function `name` as `name(params) = body`.
    #[must_use]
    pub fn render_function(&self, name: &str) -> Option<String> {
        let function = self.functions.get(self.functions.lookup(name)?)?;
        Some(Renderer::new(self).function(function))
    }

    /// Calls the custom function `name` with already evaluated arguments.
    pub fn call_function(&self, name: &str, args: Vec<Value>) -> Result<Value, Error> {
        let id = self.functions
                     .lookup(name)
                     .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string() })?;
        Ok(self.call_custom(id, args)?)
    }

    /// Sets the global variable `name`, creating it when needed. Trees built
    /// afterwards refer to it by slot.
    pub fn set_variable(&mut self, name: &str, value: Value) -> Result<usize, Error> {
        check_definable(name)?;
        let slot = self.variables.set(name, value);
        debug!(name, slot, "set variable");
        Ok(slot)
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(self.variables.lookup(name)?)
    }

    /// Deletes the global `name`; trees still referring to it fail when
    /// evaluated.
    pub fn delete_variable(&mut self, name: &str) -> Result<Value, Error> {
        let value = self.variables
                        .remove(name)
                        .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string() })?;
        debug!(name, "deleted variable");
        Ok(value)
    }

    /// The derivative of `tree` with respect to the first argument.
    pub fn differentiate(&self, tree: &Tree) -> Result<Tree, Error> {
        Ok(derivative(tree)?)
    }

    /// The derivative of the single-expression function `name`.
    pub fn derive(&self, name: &str) -> Result<Tree, Error> {
        let function = self.functions
                           .lookup(name)
                           .and_then(|id| self.functions.get(id))
                           .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string() })?;
        let body = function.body.single_return().ok_or_else(|| {
                                                     RuntimeError::NotDifferentiable { what: format!("the code block of {name}") }
                                                 })?;
        self.differentiate(body)
    }

    /// Registers the derivative of `name` as the function `new_name` with
    /// the same parameters.
    pub fn define_derivative(&mut self, name: &str, new_name: &str) -> Result<FunctionId, Error> {
        check_definable(new_name)?;
        let tree = self.derive(name)?;
        let params = self.functions
                         .lookup(name)
                         .and_then(|id| self.functions.get(id))
                         .map(|function| function.params.clone())
                         .unwrap_or_default();
        let id = self.functions.reserve(new_name);
        debug!(name, new_name, ?id, "registering derivative");
        self.functions.insert(id,
                              Function { name: new_name.to_string(),
                                         params,
                                         body: Rc::new(CodeBlock::returning(tree)) });
        Ok(id)
    }

    /// Renders a tree as text that parses back into an equivalent tree.
    #[must_use]
    pub fn render(&self, tree: &Tree) -> String {
        Renderer::new(self).tree(tree)
    }

    /// Formats a value for display, showing bignums with the configured
    /// number of digits.
    #[must_use]
    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Bignum(b) => b.to_string_radix(10, self.config.bignum_digits),
            other => other.to_string(),
        }
    }

    /// Executes one line of input.
    ///
    /// - blank lines and lines starting with `#` do nothing;
    /// - `delete name` deletes a function or global;
    /// - `name(params) = body` defines a function;
    /// - `name = expr` sets a global and returns its value;
    /// - anything else is evaluated.
    ///
    /// # Example
    /// ```
    /// use abacus::interpreter::{Interpreter, value::core::Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.execute("f(x) = 2x").unwrap();
    /// interpreter.execute("y = 4").unwrap();
    /// assert_eq!(interpreter.execute("f(y)").unwrap(), Some(Value::from(8.0)));
    /// ```
    pub fn execute(&mut self, line: &str) -> Result<Option<Value>, Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        if let Some(rest) = line.strip_prefix("delete")
           && rest.starts_with(char::is_whitespace)
        {
            let name = rest.trim();
            if self.functions.lookup(name).is_some() {
                self.delete_function(name)?;
            } else {
                self.delete_variable(name)?;
            }
            return Ok(None);
        }

        let equals = find_top_level(line, 0, Token::Equals);
        if equals == line.len() {
            return self.evaluate_str(line).map(Some);
        }

        let head = line[..equals].trim();
        let body = &line[equals + 1..];
        if let Some((name, params)) = head.split_once('(')
           && let Some(params) = params.trim_end().strip_suffix(')')
        {
            let params: Vec<&str> = params.split(',')
                                          .map(str::trim)
                                          .filter(|param| !param.is_empty())
                                          .collect();
            self.define_function(name.trim(), &params, body)?;
            return Ok(None);
        }
        if is_identifier(head) {
            let value = self.evaluate_str(body)?;
            self.set_variable(head, value.clone())?;
            return Ok(Some(value));
        }
        Err(ParseError::InvalidDefinition { position: 0 }.into())
    }

    /// Executes a whole script line by line and returns the last value.
    ///
    /// Lines are joined while a `{` is left open, so function bodies may
    /// span several lines.
    ///
    /// # Example
    /// ```
    /// use abacus::interpreter::{Interpreter, value::core::Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// let script = "count(n) = {\n  c = 0;\n  while (c < n) c = c + 1;\n  return c\n}\ncount(4) * 2";
    /// assert_eq!(interpreter.execute_script(script).unwrap(), Some(Value::from(8.0)));
    /// ```
    pub fn execute_script(&mut self, source: &str) -> Result<Option<Value>, Error> {
        let mut last = None;
        self.execute_script_with(source, |_, value| last = Some(value))?;
        Ok(last)
    }

    /// Executes a whole script, handing every value a line produces to
    /// `each` as soon as the line has run.
    pub fn execute_script_with(&mut self, source: &str, mut each: impl FnMut(&Self, Value)) -> Result<(), Error> {
        let mut pending = String::new();
        for line in source.lines() {
            if !pending.is_empty() {
                pending.push('\n');
            }
            pending.push_str(line);
            if open_braces(&pending) > 0 {
                continue;
            }
            if let Some(value) = self.execute(&pending)? {
                each(self, value);
            }
            pending.clear();
        }
        if !pending.trim().is_empty()
           && let Some(value) = self.execute(&pending)?
        {
            each(self, value);
        }
        Ok(())
    }
}

/// Number of `{` not yet closed in `text`.
fn open_braces(text: &str) -> isize {
    lexer(text, 10).fold(0, |depth, token| match token {
                       Ok(Token::LBrace) => depth + 1,
                       Ok(Token::RBrace) => depth - 1,
                       _ => depth,
                   })
}

/// Rejects names that may not be defined.
fn check_definable(name: &str) -> Result<(), ParseError> {
    if !is_identifier(name) {
        return Err(ParseError::InvalidDefinition { position: 0 });
    }
    if is_reserved(name) {
        return Err(ParseError::ReservedName { name: name.to_string(),
                                              position: 0 });
    }
    Ok(())
}

/// Validates a parameter list: identifiers, no keywords, no duplicates.
fn check_params(params: &[&str]) -> Result<Vec<String>, ParseError> {
    let mut checked: Vec<String> = Vec::with_capacity(params.len());
    for &param in params {
        if is_keyword(param) {
            return Err(ParseError::ReservedName { name: param.to_string(),
                                                  position: 0 });
        }
        if !is_identifier(param) || checked.iter().any(|p| p == param) {
            return Err(ParseError::MalformedParameters { position: 0 });
        }
        checked.push(param.to_string());
    }
    Ok(checked)
}

use std::rc::Rc;

use addle_parser::ast::{Expr, Notation, Operand, Operator, Stmt};
use addle_source::{Diagnostic, DiagnosticKind, Diagnostics};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::value::Value;

pub type EvalResult = Result<Value, RuntimeError>;

/// Maximum number of nested calls before [`RuntimeError::CallDepthExceeded`] is returned.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Entry on the postfix evaluation stack.
enum Slot<'e> {
    /// An operand that has not been looked up yet.
    Pending(&'e Operand),
    /// The result of an operator.
    Resolved(Value),
}

pub struct Interpreter<'a> {
    diagnostics: Option<&'a Diagnostics>,
    max_call_depth: usize,
    /// Number of calls currently being evaluated.
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new() -> Self {
        Self {
            diagnostics: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            depth: 0,
        }
    }

    /// Creates an interpreter that reports unbound names and bad calls to `diagnostics`.
    pub fn with_diagnostics(diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics: Some(diagnostics),
            ..Self::new()
        }
    }

    pub fn max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Runs `statements` against a snapshot of `env` and returns the value of the last
    /// evaluated `return` or expression statement.
    ///
    /// `env` itself is never modified.
    pub fn run(&mut self, statements: &[Stmt], env: &Environment) -> EvalResult {
        let mut scoped_env = env.snapshot();
        self.exec_block(statements, &mut scoped_env)
    }

    /// Like [`Self::run`], but bindings made by `statements` are kept in `env`.
    pub fn run_in(&mut self, statements: &[Stmt], env: &mut Environment) -> EvalResult {
        self.exec_block(statements, env)
    }

    fn exec_block(&mut self, statements: &[Stmt], env: &mut Environment) -> EvalResult {
        let mut last = Value::Undefined;

        for stmt in statements {
            match stmt {
                Stmt::FunctionDeclaration(function) => {
                    env.define(function.name.clone(), Value::Function(Rc::clone(function)));
                }
                Stmt::Let { name, expression } => {
                    let value = self.evaluate(expression, env)?;
                    env.define(name.clone(), value);
                }
                // `return` records its value but does not stop the block
                Stmt::Return(expr) | Stmt::Expression(expr) => {
                    last = self.evaluate(expr, env)?;
                }
            }
            tracing::trace!(depth = self.depth, last = %last, "executed statement");
        }

        Ok(last)
    }

    /// Evaluates a single expression.
    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr {
            Expr::Call { callee } => self.call(callee, env),
            Expr::Binary(notation) => Ok(self.evaluate_binary(notation, env)),
        }
    }

    fn call(&mut self, callee: &str, env: &Environment) -> EvalResult {
        let function = match env.get(callee) {
            Some(Value::Function(function)) => Rc::clone(function),
            Some(value) => {
                self.report(
                    DiagnosticKind::NotCallable,
                    format!("`{}` is {}, not a function", callee, value),
                );
                return Ok(Value::Undefined);
            }
            None => {
                self.report(DiagnosticKind::NotCallable, format!("`{}` is not bound", callee));
                return Ok(Value::Undefined);
            }
        };

        if self.depth >= self.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                callee: callee.to_string(),
                limit: self.max_call_depth,
            });
        }

        self.depth += 1;
        tracing::debug!(callee, depth = self.depth, "entering call");
        let result = self.run(&function.body, env);
        self.depth -= 1;
        tracing::debug!(callee, depth = self.depth, "leaving call");
        result
    }

    /// Folds a postfix sequence with a stack.
    ///
    /// An operator pops the two most recently pushed entries and passes the first popped
    /// (the right operand as written) as its left argument. Operands are looked up only when
    /// popped, or when they are the bottom entry left at the end.
    fn evaluate_binary(&self, notation: &[Notation], env: &Environment) -> Value {
        let mut stack: Vec<Slot> = Vec::with_capacity(notation.len());

        for entry in notation {
            match entry {
                Notation::Operand(operand) => stack.push(Slot::Pending(operand)),
                Notation::Operator(Operator::Plus) => {
                    let lhs = self.pop(&mut stack, env);
                    let rhs = self.pop(&mut stack, env);
                    stack.push(Slot::Resolved(Value::Number(lhs.to_number() + rhs.to_number())));
                }
                Notation::Operator(op) => self.report(
                    DiagnosticKind::UnsupportedOperator,
                    format!("`{}` has no value, ignoring it", op.symbol()),
                ),
            }
        }

        match stack.into_iter().next() {
            Some(slot) => self.resolve_slot(slot, env),
            None => Value::Undefined,
        }
    }

    fn pop(&self, stack: &mut Vec<Slot>, env: &Environment) -> Value {
        match stack.pop() {
            Some(slot) => self.resolve_slot(slot, env),
            None => Value::Undefined,
        }
    }

    fn resolve_slot(&self, slot: Slot, env: &Environment) -> Value {
        match slot {
            Slot::Pending(operand) => self.resolve(operand, env),
            Slot::Resolved(value) => value,
        }
    }

    /// Resolves an operand to its value: identifiers by lookup, numbers by parsing.
    pub fn resolve(&self, operand: &Operand, env: &Environment) -> Value {
        match operand {
            Operand::Number(text) => Value::Number(text.parse().unwrap_or(f64::NAN)),
            Operand::Identifier(name) => match env.get(name) {
                Some(value) => value.clone(),
                None => {
                    self.report(
                        DiagnosticKind::UndefinedIdentifier,
                        format!("`{}` is not bound", name),
                    );
                    Value::Undefined
                }
            },
        }
    }

    fn report(&self, kind: DiagnosticKind, message: String) {
        if let Some(diagnostics) = self.diagnostics {
            // the syntax tree carries no positions
            diagnostics.report(Diagnostic::new(kind, message, 0..0));
        }
    }
}

impl<'a> Default for Interpreter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `statements` against a snapshot of `env` with the default call depth limit.
pub fn run(statements: &[Stmt], env: &Environment) -> EvalResult {
    Interpreter::new().run(statements, env)
}

//! Lexes, parses and evaluates Addle source in one call.

pub mod config;

pub use addle_eval::{Environment, RuntimeError, Value};
pub use addle_source::{Diagnostic, DiagnosticKind};
pub use config::{Config, ConfigError};

use addle_eval::Interpreter;
use addle_parser::ast::Stmt;
use addle_parser::lexer::Lexer;
use addle_parser::parser::Parser;
use addle_source::Source;

/// The value of a run and everything the pipeline reported on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub value: Value,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs `source` with the default [`Config`] and returns its final value.
pub fn interpret(source: &str) -> Result<Value, RuntimeError> {
    Session::new(Config::default())
        .run(source)
        .map(|outcome| outcome.value)
}

/// A pipeline with a top-level environment that outlives individual runs.
pub struct Session {
    config: Config,
    environment: Environment,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            environment: Environment::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Runs `source` as a whole program against a snapshot of the session environment.
    pub fn run(&self, source: &str) -> Result<Outcome, RuntimeError> {
        let environment = &self.environment;
        execute(self.config, source, |interpreter, program| {
            interpreter.run(program, environment)
        })
    }

    /// Runs `source` and keeps its top-level bindings for later runs.
    pub fn run_line(&mut self, source: &str) -> Result<Outcome, RuntimeError> {
        let config = self.config;
        let environment = &mut self.environment;
        execute(config, source, |interpreter, program| {
            interpreter.run_in(program, environment)
        })
    }
}

fn execute(
    config: Config,
    source: &str,
    eval: impl FnOnce(&mut Interpreter, &[Stmt]) -> Result<Value, RuntimeError>,
) -> Result<Outcome, RuntimeError> {
    let source = Source::new(source);

    let tokens: Vec<_> = Lexer::with_source(&source)
        .policy(config.unknown_char)
        .collect();
    tracing::debug!(count = tokens.len(), "tokenized source");

    let program = Parser::with_diagnostics(&tokens, &source.diagnostics).parse_program();

    let mut interpreter =
        Interpreter::with_diagnostics(&source.diagnostics).max_call_depth(config.max_call_depth);
    let value = eval(&mut interpreter, &program)?;
    tracing::debug!(value = %value, diagnostics = source.diagnostics.len(), "evaluated program");

    Ok(Outcome {
        value,
        diagnostics: source.diagnostics.take(),
    })
}

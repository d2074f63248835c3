//! Tree-walking evaluator for the Addle syntax tree.

pub mod environment;
pub mod error;
pub mod interpreter;
pub mod value;

pub use environment::Environment;
pub use error::RuntimeError;
pub use interpreter::{run, Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use value::Value;

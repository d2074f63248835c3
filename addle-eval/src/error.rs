use thiserror::Error;

/// Errors that stop evaluation.
///
/// Unbound identifiers and non-numeric arithmetic are not errors: they evaluate to
/// [`Value::Undefined`](crate::Value::Undefined) or NaN and are reported as diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Call depth limit of {limit} exceeded while calling `{callee}`")]
    CallDepthExceeded { callee: String, limit: usize },
}

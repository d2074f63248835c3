use std::fmt;
use std::rc::Rc;

use addle_parser::ast::FunctionDeclaration;

#[derive(Clone, PartialEq)]
pub enum Value {
    Number(f64),
    /// A declared function. Declarations are bound by name like any other value.
    Function(Rc<FunctionDeclaration>),
    /// The result of reading an unbound name or of a body that produced nothing.
    Undefined,
}

impl Value {
    /// Attempts to cast the `Value` into a `f64` or `None` if wrong type.
    pub fn cast_to_number(&self) -> Option<f64> {
        match self {
            Self::Number(val) => Some(*val),
            _ => None,
        }
    }

    /// Numeric value used by arithmetic. Anything that is not a number is NaN.
    pub fn to_number(&self) -> f64 {
        self.cast_to_number().unwrap_or(f64::NAN)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for `Number(NaN)`.
    pub fn is_nan(&self) -> bool {
        matches!(self, Self::Number(val) if val.is_nan())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Undefined
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Self::Number(val)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(val) => write!(f, "{}", val),
            Value::Function(function) => write!(f, "<fn {}>", function.name),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Undefined.to_string(), "undefined");

        let function = Rc::new(FunctionDeclaration {
            name: "test".to_string(),
            body: Vec::new(),
        });
        assert_eq!(Value::Function(function).to_string(), "<fn test>");
    }

    #[test]
    fn non_numbers_coerce_to_nan() {
        assert_eq!(Value::Number(2.0).to_number(), 2.0);
        assert!(Value::Undefined.to_number().is_nan());

        let function = Rc::new(FunctionDeclaration {
            name: "f".to_string(),
            body: Vec::new(),
        });
        assert!(Value::Function(function).to_number().is_nan());
    }
}

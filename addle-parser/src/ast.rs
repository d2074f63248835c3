use std::rc::Rc;

use crate::lexer::{Token, TokenKind};

/// An operand as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A number literal, kept as written (e.g. `1.5`).
    Number(String),
    /// An identifier (e.g. `foo`).
    Identifier(String),
}

impl Operand {
    /// Returns the operand for a `Number` or `Word` token, or `None` for any other token.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Number => Some(Self::Number(token.text.to_string())),
            TokenKind::Word => Some(Self::Identifier(token.text.to_string())),
            _ => None,
        }
    }

    /// Text of the operand as written.
    pub fn text(&self) -> &str {
        match self {
            Self::Number(text) | Self::Identifier(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Plus,
    /// `=`
    Equals,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Plus),
            "=" => Some(Self::Equals),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Equals => "=",
        }
    }
}

/// One entry of a flattened postfix sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Notation {
    Operand(Operand),
    Operator(Operator),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Operands and operators in evaluation order: the first operand, then
    /// `operand operator` pairs (e.g. `a + b + c` is `a b + c +`).
    Binary(Vec<Notation>),
    /// A zero-argument call (e.g. `foo()`).
    Call { callee: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Shared so the evaluator can bind it as a value without copying the body.
    FunctionDeclaration(Rc<FunctionDeclaration>),
    Let { name: String, expression: Expr },
    Return(Expr),
    Expression(Expr),
}

/// Top-level statements, in source order.
pub type Program = Vec<Stmt>;

//! Lexer, syntax tree and parser for the Addle language.

pub mod ast;
pub mod lexer;
pub mod parser;

use super::*;
use crate::ast::{Expr, Notation, Operand, Operator};

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses an expression up to the next `;` or line break (both consumed) or the end of input.
    ///
    /// There is a single precedence level, so the result is a flat postfix sequence rather than a
    /// tree: the first operand, then each right operand followed by its operator.
    pub fn parse_expr(&mut self) -> Expr {
        let mut notation = Vec::new();
        let mut first: Option<Token<'a>> = None;
        let mut pending: Option<Operator> = None;

        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::Punctuator => {
                    pending = Operator::from_symbol(token.text);
                    self.advance();
                }
                TokenKind::Semicolon | TokenKind::LineBreak => {
                    self.advance();
                    return Expr::Binary(notation);
                }
                TokenKind::Paren if token.is("(") && pending.is_none() => match first {
                    Some(callee) => return self.parse_call_expr(callee),
                    None => self.skip(token),
                },
                TokenKind::Number | TokenKind::Word => {
                    if let Some(operand) = Operand::from_token(&token) {
                        self.push_operand(&mut notation, &mut first, &mut pending, token, operand);
                    }
                    self.advance();
                }
                _ => self.skip(token),
            }
        }

        Expr::Binary(notation)
    }

    fn push_operand(
        &self,
        notation: &mut Vec<Notation>,
        first: &mut Option<Token<'a>>,
        pending: &mut Option<Operator>,
        token: Token<'a>,
        operand: Operand,
    ) {
        if first.is_none() {
            *first = Some(token);
            notation.push(Notation::Operand(operand));
        } else if let Some(op) = pending.take() {
            notation.push(Notation::Operand(operand));
            notation.push(Notation::Operator(op));
        } else {
            self.report(
                DiagnosticKind::MissingOperator,
                format!("Expected an operator before `{}`", token.text),
                token.span(),
            );
        }
    }

    /* Expressions.Call */
    /// Parses a call expression. The current token must be the `(` following `callee`.
    ///
    /// Arguments are not supported: everything up to the first `)` is discarded.
    fn parse_call_expr(&mut self, callee: Token<'a>) -> Expr {
        self.advance(); // eat (

        loop {
            match self.current() {
                Some(token) if token.is(")") => {
                    self.advance();
                    break;
                }
                Some(token) => self.skip(token),
                None => {
                    self.unexpected_end("`)`");
                    break;
                }
            }
        }

        Expr::Call {
            callee: callee.text.to_string(),
        }
    }
}

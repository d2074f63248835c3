use std::rc::Rc;

use super::*;
use crate::ast::FunctionDeclaration;

impl<'a> Parser<'a> {
    /// Parses statements until a `}` is consumed or the tokens run out.
    pub fn parse_block(&mut self) -> Vec<Stmt> {
        let mut body = Vec::new();

        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::FunctionKeyword => {
                    self.advance();
                    if let Some(function) = self.parse_fn_declaration() {
                        body.push(Stmt::FunctionDeclaration(function));
                    }
                }
                TokenKind::ReturnKeyword => {
                    self.advance();
                    body.push(Stmt::Return(self.parse_expr()));
                }
                TokenKind::LetKeyword => {
                    self.advance();
                    if let Some(stmt) = self.parse_let_declaration() {
                        body.push(stmt);
                    }
                }
                TokenKind::Brace if token.is("}") => {
                    self.advance();
                    if self.depth == 0 {
                        self.report(
                            DiagnosticKind::UnbalancedBrace,
                            "Unmatched `}` ends the program",
                            token.span(),
                        );
                    }
                    return body;
                }
                TokenKind::Word => body.push(Stmt::Expression(self.parse_expr())),
                TokenKind::Space | TokenKind::LineBreak | TokenKind::Semicolon | TokenKind::Brace => {
                    self.advance()
                }
                _ => self.skip(token),
            }
            tracing::trace!(statements = body.len(), position = self.current, "parsed statement");
        }

        if self.depth > 0 {
            self.unexpected_end("`}`");
        }
        body
    }

    /// Parses a function declaration. The `function` keyword must already be consumed.
    ///
    /// The name is the trimmed text of everything before the first `(`. Everything between the
    /// name and the first `{` is skipped, so parameter lists are accepted and ignored.
    fn parse_fn_declaration(&mut self) -> Option<Rc<FunctionDeclaration>> {
        let mut name = String::new();
        loop {
            match self.current() {
                Some(token) if token.is("(") => break,
                Some(token) => {
                    name.push_str(token.text);
                    self.advance();
                }
                None => {
                    self.unexpected_end("`(` after the function name");
                    return None;
                }
            }
        }

        loop {
            match self.current() {
                Some(token) if token.is("{") => break,
                Some(token) if token.kind == TokenKind::Paren => self.advance(),
                Some(token) => self.skip(token),
                None => {
                    self.unexpected_end("`{` before the function body");
                    return None;
                }
            }
        }
        self.advance(); // eat {

        self.depth += 1;
        let body = self.parse_block();
        self.depth -= 1;

        Some(Rc::new(FunctionDeclaration {
            name: name.trim().to_string(),
            body,
        }))
    }

    /// Parses a `let` declaration. The `let` keyword must already be consumed.
    fn parse_let_declaration(&mut self) -> Option<Stmt> {
        let name = self.skip_until(|token| token.kind == TokenKind::Word, "a binding name")?;
        self.advance();

        self.skip_until(|token| token.is("="), "`=`")?;
        self.advance();

        let expression = self.parse_expr();
        Some(Stmt::Let {
            name: name.text.to_string(),
            expression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Notation, Operand, Operator};
    use crate::lexer::tokenize;
    use insta::assert_debug_snapshot;

    fn program(source: &str) -> Vec<Stmt> {
        let tokens = tokenize(source);
        let diagnostics = Diagnostics::new();
        let program = Parser::with_diagnostics(&tokens, &diagnostics).parse_program();
        assert!(diagnostics.is_empty(), "unexpected diagnostics:\n{}", diagnostics);
        program
    }

    fn diagnosed(source: &str) -> (Vec<Stmt>, Vec<DiagnosticKind>) {
        let tokens = tokenize(source);
        let diagnostics = Diagnostics::new();
        let program = Parser::with_diagnostics(&tokens, &diagnostics).parse_program();
        (program, diagnostics.kinds())
    }

    fn number(text: &str) -> Notation {
        Notation::Operand(Operand::Number(text.to_string()))
    }

    fn ident(name: &str) -> Notation {
        Notation::Operand(Operand::Identifier(name.to_string()))
    }

    fn function(stmt: &Stmt) -> &FunctionDeclaration {
        match stmt {
            Stmt::FunctionDeclaration(function) => &**function,
            other => panic!("expected a function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_function() {
        assert_debug_snapshot!(program("function test() {\n  return 1;\n}"), @r###"
        [
            FunctionDeclaration(
                FunctionDeclaration {
                    name: "test",
                    body: [
                        Return(
                            Binary(
                                [
                                    Operand(
                                        Number(
                                            "1",
                                        ),
                                    ),
                                ],
                            ),
                        ),
                    ],
                },
            ),
        ]
        "###);
    }

    #[test]
    fn test_function_then_call() {
        let ast = program(
            "function test() {\n    let a = 1;\n    let b = 2;\n    return a + b;\n}\n\ntest();\n",
        );
        assert_eq!(ast.len(), 2);

        let test = function(&ast[0]);
        assert_eq!(test.name, "test");
        assert_eq!(
            test.body,
            vec![
                Stmt::Let {
                    name: "a".to_string(),
                    expression: Expr::Binary(vec![number("1")]),
                },
                Stmt::Let {
                    name: "b".to_string(),
                    expression: Expr::Binary(vec![number("2")]),
                },
                Stmt::Return(Expr::Binary(vec![
                    ident("a"),
                    ident("b"),
                    Notation::Operator(Operator::Plus),
                ])),
            ]
        );
        assert_eq!(
            ast[1],
            Stmt::Expression(Expr::Call {
                callee: "test".to_string()
            })
        );
    }

    #[test]
    fn test_function_name_is_trimmed_text_before_paren() {
        let ast = program("function  spaced  () {}");
        assert_eq!(function(&ast[0]).name, "spaced");
        assert!(function(&ast[0]).body.is_empty());
    }

    #[test]
    fn test_function_parameters_are_skipped() {
        let (ast, diagnostics) = diagnosed("function f(x) { return 1; }");
        assert_eq!(function(&ast[0]).name, "f");
        assert_eq!(function(&ast[0]).body.len(), 1);
        assert_eq!(diagnostics, vec![DiagnosticKind::SkippedToken]);
    }

    #[test]
    fn test_nested_function() {
        let ast = program("function outer() { function inner() { return 2; } return inner(); }\nouter();");
        assert_eq!(ast.len(), 2);

        let outer = function(&ast[0]);
        assert_eq!(outer.body.len(), 2);
        assert_eq!(function(&outer.body[0]).name, "inner");
        assert_eq!(
            outer.body[1],
            Stmt::Return(Expr::Call {
                callee: "inner".to_string()
            })
        );
    }

    #[test]
    fn test_let_declaration() {
        assert_eq!(
            program("let  total =1+2;"),
            vec![Stmt::Let {
                name: "total".to_string(),
                expression: Expr::Binary(vec![
                    number("1"),
                    number("2"),
                    Notation::Operator(Operator::Plus),
                ]),
            }]
        );
    }

    #[test]
    fn test_let_without_equals() {
        let (ast, diagnostics) = diagnosed("let a 1");
        assert!(ast.is_empty());
        assert_eq!(
            diagnostics,
            vec![DiagnosticKind::SkippedToken, DiagnosticKind::UnexpectedEnd]
        );
    }

    #[test]
    fn test_return_keeps_following_statements() {
        let ast = program("function f() { return 1; return 2; }");
        assert_eq!(
            function(&ast[0]).body,
            vec![
                Stmt::Return(Expr::Binary(vec![number("1")])),
                Stmt::Return(Expr::Binary(vec![number("2")])),
            ]
        );
    }

    #[test]
    fn test_closing_brace_ends_program() {
        let (ast, diagnostics) = diagnosed("a;\n}\nb;");
        assert_eq!(ast, vec![Stmt::Expression(Expr::Binary(vec![ident("a")]))]);
        assert_eq!(diagnostics, vec![DiagnosticKind::UnbalancedBrace]);
    }

    #[test]
    fn test_opening_brace_is_skipped() {
        // `{` is skipped, but the matching `}` still ends the top-level block
        let (ast, diagnostics) = diagnosed("{ a; } b;");
        assert_eq!(ast, vec![Stmt::Expression(Expr::Binary(vec![ident("a")]))]);
        assert_eq!(diagnostics, vec![DiagnosticKind::UnbalancedBrace]);
    }

    #[test]
    fn test_unterminated_function_body() {
        let (ast, diagnostics) = diagnosed("function f() { return 1;");
        assert_eq!(function(&ast[0]).body.len(), 1);
        assert_eq!(diagnostics, vec![DiagnosticKind::UnexpectedEnd]);
    }

    #[test]
    fn test_function_without_paren() {
        let (ast, diagnostics) = diagnosed("function f");
        assert!(ast.is_empty());
        assert_eq!(diagnostics, vec![DiagnosticKind::UnexpectedEnd]);
    }

    #[test]
    fn test_statement_starting_with_number_is_skipped() {
        let (ast, diagnostics) = diagnosed("1;");
        assert!(ast.is_empty());
        assert_eq!(diagnostics, vec![DiagnosticKind::SkippedToken]);
    }
}

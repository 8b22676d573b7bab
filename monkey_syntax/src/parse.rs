use log::debug;

use crate::{
    ast::{BinOp, Block, Expr, Ident, Program, Stmt, UnaryOp},
    error::ParseError,
    lex::Lexer,
    token::{Token, TokenKind},
};

/// Binding strength of operators, from loosest to tightest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EQUAL_EQUAL | TokenKind::BANG_EQUAL => Self::Equals,
            TokenKind::LESS | TokenKind::GREATER => Self::LessGreater,
            TokenKind::PLUS | TokenKind::MINUS => Self::Sum,
            TokenKind::STAR | TokenKind::SLASH => Self::Product,
            TokenKind::LPAREN => Self::Call,
            _ => Self::Lowest,
        }
    }
}

type PrefixFn<'a> = fn(&mut Parser<'a>) -> Result<Expr, ParseError>;
type InfixFn<'a> = fn(&mut Parser<'a>, Expr) -> Result<Expr, ParseError>;

#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::default(),
        }
    }

    /// Parses statements until the end of input. A statement that fails
    /// to parse is dropped, its error recorded, and parsing resumes at
    /// the next statement boundary.
    pub fn parse_program(mut self) -> (Program, Vec<ParseError>) {
        let mut statements: Vec<Stmt> = Vec::default();
        while self.current.kind != TokenKind::EOF {
            match self.parse_stmt() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => self.recover(e),
            }
            self.advance();
        }

        (Program { statements }, self.errors)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current.kind {
            TokenKind::LET => self.parse_let_stmt(),
            TokenKind::RETURN => self.parse_return_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_let_stmt(&mut self) -> Result<Stmt, ParseError> {
        let name = Ident::new(self.advance_or_err(TokenKind::IDENT)?.lexeme);
        self.advance_or_err(TokenKind::ASSIGN)?;
        // Move onto the first token of the initialiser
        self.advance();
        let value = self.parse_expr(Precedence::Lowest)?;
        self.advance_if(TokenKind::SEMICOLON);

        Ok(Stmt::Let { name, value })
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        // Skip the `return` keyword
        self.advance();
        let value = self.parse_expr(Precedence::Lowest)?;
        self.advance_if(TokenKind::SEMICOLON);

        Ok(Stmt::Return(value))
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expr(Precedence::Lowest)?;
        self.advance_if(TokenKind::SEMICOLON);

        Ok(Stmt::Expr(expr))
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        // Skip the opening brace
        self.advance();
        let mut statements = vec![];
        while !matches!(self.current.kind, TokenKind::RBRACE | TokenKind::EOF) {
            match self.parse_stmt() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.recover(e);
                    // Resynced onto this block's closing brace
                    if self.current.kind == TokenKind::RBRACE {
                        break;
                    }
                }
            }
            self.advance();
        }

        Ok(Block { statements })
    }

    /// Parses an expression whose operators all bind tighter than `precedence`.
    /// Passing the operator's own precedence for its right operand makes
    /// operators of equal strength associate to the left.
    fn parse_expr(&mut self, precedence: Precedence) -> Result<Expr, ParseError> {
        let prefix =
            prefix_fn(self.current.kind).ok_or(ParseError::MissingPrefix(self.current.kind))?;
        let mut lhs = prefix(self)?;

        while self.peek.kind != TokenKind::SEMICOLON && precedence < self.peek_precedence() {
            let Some(infix) = infix_fn(self.peek.kind) else {
                break;
            };
            self.advance();
            lhs = infix(self, lhs)?;
        }

        Ok(lhs)
    }

    fn parse_ident(&mut self) -> Result<Expr, ParseError> {
        Ok(Expr::Ident(Ident::new(self.current.lexeme.clone())))
    }

    fn parse_integer(&mut self) -> Result<Expr, ParseError> {
        self.current
            .lexeme
            .parse()
            .map(Expr::Integer)
            .map_err(|_| ParseError::InvalidInteger(self.current.lexeme.clone()))
    }

    fn parse_boolean(&mut self) -> Result<Expr, ParseError> {
        Ok(Expr::Boolean(self.current.kind == TokenKind::TRUE))
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        // Infallible as this handler is only registered for unary operators
        let op = UnaryOp::from_token(self.current.kind)
            .expect("non-unary operators cannot be present here");
        self.advance();
        let expr = self.parse_expr(Precedence::Prefix)?;

        Ok(Expr::Prefix {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        // Skip the opening parenthesis
        self.advance();
        let expr = self.parse_expr(Precedence::Lowest)?;
        self.advance_or_err(TokenKind::RPAREN)?;

        Ok(expr)
    }

    fn parse_if(&mut self) -> Result<Expr, ParseError> {
        self.advance_or_err(TokenKind::LPAREN)?;
        self.advance();
        let condition = self.parse_expr(Precedence::Lowest)?;
        self.advance_or_err(TokenKind::RPAREN)?;
        self.advance_or_err(TokenKind::LBRACE)?;
        let consequence = self.parse_block()?;
        let alternative = if self.advance_if(TokenKind::ELSE) {
            self.advance_or_err(TokenKind::LBRACE)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function(&mut self) -> Result<Expr, ParseError> {
        self.advance_or_err(TokenKind::LPAREN)?;
        let mut params = vec![];
        if !self.advance_if(TokenKind::RPAREN) {
            loop {
                params.push(Ident::new(self.advance_or_err(TokenKind::IDENT)?.lexeme));
                if !self.advance_if(TokenKind::COMMA) {
                    break;
                }
            }
            self.advance_or_err(TokenKind::RPAREN)?;
        }
        self.advance_or_err(TokenKind::LBRACE)?;
        let body = self.parse_block()?;

        Ok(Expr::Function { params, body })
    }

    fn parse_infix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        // Infallible as this handler is only registered for binary operators
        let op = BinOp::from_token(self.current.kind)
            .expect("non-binary operators cannot be present here");
        let precedence = Precedence::of(self.current.kind);
        self.advance();
        let rhs = self.parse_expr(precedence)?;

        Ok(Expr::Infix {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    fn parse_call(&mut self, func: Expr) -> Result<Expr, ParseError> {
        let mut args = vec![];
        if !self.advance_if(TokenKind::RPAREN) {
            self.advance();
            args.push(self.parse_expr(Precedence::Lowest)?);
            while self.advance_if(TokenKind::COMMA) {
                self.advance();
                args.push(self.parse_expr(Precedence::Lowest)?);
            }
            self.advance_or_err(TokenKind::RPAREN)?;
        }

        Ok(Expr::Call {
            func: Box::new(func),
            args,
        })
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    /// Moves onto the next token only if it is of the given kind.
    fn advance_if(&mut self, kind: TokenKind) -> bool {
        if self.peek.kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Moves onto the next token, which must be of the given kind,
    /// and returns it.
    fn advance_or_err(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.advance_if(kind) {
            Ok(self.current.clone())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek.kind,
            })
        }
    }

    fn recover(&mut self, e: ParseError) {
        debug!("Parse error at {:?}: {e}", self.current.range);
        self.errors.push(e);
        self.sync();
    }

    /// Skips to the end of the broken statement. Braces opened after
    /// the error are skipped as a whole, and an unmatched `}` belongs
    /// to the enclosing block, so recovery never leaves that block.
    fn sync(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current.kind {
                TokenKind::EOF => return,
                TokenKind::SEMICOLON | TokenKind::RBRACE if depth == 0 => return,
                TokenKind::LBRACE => depth += 1,
                TokenKind::RBRACE => depth -= 1,
                _ => (),
            }
            if depth == 0
                && matches!(
                    self.peek.kind,
                    TokenKind::LET | TokenKind::RETURN | TokenKind::RBRACE
                )
            {
                return;
            }
            self.advance();
        }
    }
}

fn prefix_fn<'a>(kind: TokenKind) -> Option<PrefixFn<'a>> {
    let f: PrefixFn<'a> = match kind {
        TokenKind::IDENT => Parser::parse_ident,
        TokenKind::INT => Parser::parse_integer,
        TokenKind::TRUE | TokenKind::FALSE => Parser::parse_boolean,
        TokenKind::BANG | TokenKind::MINUS => Parser::parse_prefix,
        TokenKind::LPAREN => Parser::parse_group,
        TokenKind::IF => Parser::parse_if,
        TokenKind::FN => Parser::parse_function,
        _ => return None,
    };
    Some(f)
}

fn infix_fn<'a>(kind: TokenKind) -> Option<InfixFn<'a>> {
    let f: InfixFn<'a> = match kind {
        TokenKind::PLUS
        | TokenKind::MINUS
        | TokenKind::STAR
        | TokenKind::SLASH
        | TokenKind::EQUAL_EQUAL
        | TokenKind::BANG_EQUAL
        | TokenKind::LESS
        | TokenKind::GREATER => Parser::parse_infix,
        TokenKind::LPAREN => Parser::parse_call,
        _ => return None,
    };
    Some(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> (Program, Vec<ParseError>) {
        Parser::new(Lexer::new(input)).parse_program()
    }

    fn parse_test(input: &str, expected: Program) {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(program, expected);
    }

    fn print_test(input: &str, expected: &str) {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(program.to_string(), expected);
    }

    fn parse_err_test(input: &str, expected: &[&str]) {
        let (_, errors) = parse(input);
        let errors = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(errors, expected);
    }

    fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(name))
    }

    fn infix(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
        Expr::Infix {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    #[test]
    fn let_stmt() {
        parse_test(
            "let x = 5; let y = true; let foobar = y",
            Program {
                statements: vec![
                    Stmt::Let {
                        name: Ident::new("x"),
                        value: Expr::Integer(5),
                    },
                    Stmt::Let {
                        name: Ident::new("y"),
                        value: Expr::Boolean(true),
                    },
                    Stmt::Let {
                        name: Ident::new("foobar"),
                        value: ident("y"),
                    },
                ],
            },
        );
    }

    #[test]
    fn return_stmt() {
        parse_test(
            "return 5; return x + 1",
            Program {
                statements: vec![
                    Stmt::Return(Expr::Integer(5)),
                    Stmt::Return(infix(ident("x"), BinOp::Plus, Expr::Integer(1))),
                ],
            },
        );
    }

    #[test]
    fn prefix_exprs() {
        parse_test(
            "!5; -15; !true;",
            Program {
                statements: vec![
                    Stmt::Expr(Expr::Prefix {
                        op: UnaryOp::Bang,
                        expr: Box::new(Expr::Integer(5)),
                    }),
                    Stmt::Expr(Expr::Prefix {
                        op: UnaryOp::Minus,
                        expr: Box::new(Expr::Integer(15)),
                    }),
                    Stmt::Expr(Expr::Prefix {
                        op: UnaryOp::Bang,
                        expr: Box::new(Expr::Boolean(true)),
                    }),
                ],
            },
        );
    }

    #[test]
    fn infix_exprs() {
        let cases = [
            ("5 + 5", BinOp::Plus),
            ("5 - 5", BinOp::Minus),
            ("5 * 5", BinOp::Star),
            ("5 / 5", BinOp::Slash),
            ("5 > 5", BinOp::Greater),
            ("5 < 5", BinOp::Less),
            ("5 == 5", BinOp::EqualEqual),
            ("5 != 5", BinOp::BangEqual),
        ];
        for (input, op) in cases {
            parse_test(
                input,
                Program {
                    statements: vec![Stmt::Expr(infix(
                        Expr::Integer(5),
                        op,
                        Expr::Integer(5),
                    ))],
                },
            );
        }
    }

    #[test]
    fn precedence() {
        let cases = [
            ("1 + 2 * 3", "(1 + (2 * 3));"),
            ("-a * b", "((-a) * b);"),
            ("!-a", "(!(-a));"),
            ("a + b + c", "((a + b) + c);"),
            ("a + b - c", "((a + b) - c);"),
            ("a * b * c", "((a * b) * c);"),
            ("a * b / c", "((a * b) / c);"),
            ("a + b / c", "(a + (b / c));"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f);"),
            ("3 + 4; -5 * 5", "(3 + 4); ((-5) * 5);"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));"),
            ("3 > 5 == false", "((3 > 5) == false);"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);"),
            ("(5 + 5) * 2", "((5 + 5) * 2);"),
            ("-(5 + 5)", "(-(5 + 5));"),
            ("!(true == true)", "(!(true == true));"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d);"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g));",
            ),
        ];
        for (input, expected) in cases {
            print_test(input, expected);
        }
    }

    #[test]
    fn round_trip() {
        let inputs = [
            "1 + 2 * 3",
            "let f = fn(x, y) { if (x < y) { return x; } else { y } }; f(1, 2 * -3);",
            "fn() { }()",
            "!(a == b) != c",
        ];
        for input in inputs {
            let (program, errors) = parse(input);
            assert!(errors.is_empty());
            let (reparsed, errors) = parse(&program.to_string());
            assert!(errors.is_empty());
            assert_eq!(reparsed, program);
        }
    }

    #[test]
    fn if_expr() {
        parse_test(
            "if (x < y) { x }",
            Program {
                statements: vec![Stmt::Expr(Expr::If {
                    condition: Box::new(infix(ident("x"), BinOp::Less, ident("y"))),
                    consequence: Block {
                        statements: vec![Stmt::Expr(ident("x"))],
                    },
                    alternative: None,
                })],
            },
        );
    }

    #[test]
    fn if_else_expr() {
        parse_test(
            "if (x < y) { x } else { y; }",
            Program {
                statements: vec![Stmt::Expr(Expr::If {
                    condition: Box::new(infix(ident("x"), BinOp::Less, ident("y"))),
                    consequence: Block {
                        statements: vec![Stmt::Expr(ident("x"))],
                    },
                    alternative: Some(Block {
                        statements: vec![Stmt::Expr(ident("y"))],
                    }),
                })],
            },
        );
    }

    #[test]
    fn unterminated_block() {
        parse_test(
            "if (true) { 1",
            Program {
                statements: vec![Stmt::Expr(Expr::If {
                    condition: Box::new(Expr::Boolean(true)),
                    consequence: Block {
                        statements: vec![Stmt::Expr(Expr::Integer(1))],
                    },
                    alternative: None,
                })],
            },
        );
    }

    #[test]
    fn function() {
        parse_test(
            "fn(x, y) { x + y; }",
            Program {
                statements: vec![Stmt::Expr(Expr::Function {
                    params: vec![Ident::new("x"), Ident::new("y")],
                    body: Block {
                        statements: vec![Stmt::Expr(infix(ident("x"), BinOp::Plus, ident("y")))],
                    },
                })],
            },
        );
    }

    #[test]
    fn function_params() {
        let cases: [(&str, &[&str]); 3] = [
            ("fn() {};", &[]),
            ("fn(x) {};", &["x"]),
            ("fn(x, y, z) {};", &["x", "y", "z"]),
        ];
        for (input, expected) in cases {
            parse_test(
                input,
                Program {
                    statements: vec![Stmt::Expr(Expr::Function {
                        params: expected.iter().map(|&p| Ident::new(p)).collect(),
                        body: Block::default(),
                    })],
                },
            );
        }
    }

    #[test]
    fn call() {
        parse_test(
            "add(1, 2 * 3, 4 + 5);",
            Program {
                statements: vec![Stmt::Expr(Expr::Call {
                    func: Box::new(ident("add")),
                    args: vec![
                        Expr::Integer(1),
                        infix(Expr::Integer(2), BinOp::Star, Expr::Integer(3)),
                        infix(Expr::Integer(4), BinOp::Plus, Expr::Integer(5)),
                    ],
                })],
            },
        );
    }

    #[test]
    fn missing_let_parts() {
        parse_err_test(
            "let x 5; let = 10; let 838383;",
            &[
                "expected next token type to be =, got INT instead",
                "expected next token type to be IDENTIFIER, got = instead",
                "expected next token type to be IDENTIFIER, got INT instead",
            ],
        );
    }

    #[test]
    fn missing_prefix() {
        parse_err_test("let x = ;", &["no prefix parse function for ; found"]);
        parse_err_test("@", &["no prefix parse function for ILLEGAL found"]);
    }

    #[test]
    fn invalid_integer() {
        parse_err_test(
            "99999999999999999999",
            &["could not parse \"99999999999999999999\" as integer"],
        );
    }

    #[test]
    fn missing_closing_paren() {
        parse_err_test(
            "(1 + 2 * 3;",
            &["expected next token type to be ), got ; instead"],
        );
    }

    #[test]
    fn if_requires_parens_and_braces() {
        parse_err_test("if x { 1 }", &["expected next token type to be (, got IDENTIFIER instead"]);
        parse_err_test(
            "if (x) 1",
            &["expected next token type to be {, got INT instead"],
        );
    }

    #[test]
    fn recovers_inside_block() {
        let (program, errors) = parse("if (true) { 5 + ; } 10");
        assert_eq!(errors, vec![ParseError::MissingPrefix(TokenKind::SEMICOLON)]);
        assert_eq!(program.to_string(), "if (true) { }; 10;");

        let (program, errors) = parse("let f = fn(x) { let = 1; x + 1; }; f(1)");
        assert_eq!(
            errors,
            vec![ParseError::UnexpectedToken {
                expected: TokenKind::IDENT,
                found: TokenKind::ASSIGN,
            }]
        );
        assert_eq!(program.to_string(), "let f = fn(x) { (x + 1); }; f(1);");

        let (program, errors) = parse("fn() { if (x { 1 }; 2 }; 3");
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(program.to_string(), "fn() { 2; }; 3;");

        let (program, errors) = parse("if (a) { 1 + }; 4");
        assert_eq!(errors, vec![ParseError::MissingPrefix(TokenKind::RBRACE)]);
        assert_eq!(program.to_string(), "if (a) { }; 4;");
    }

    #[test]
    fn recovers_at_next_stmt() {
        let (program, errors) = parse("let = 1; let y = 2; return 3");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            program.statements,
            vec![
                Stmt::Let {
                    name: Ident::new("y"),
                    value: Expr::Integer(2),
                },
                Stmt::Return(Expr::Integer(3)),
            ]
        );
    }
}

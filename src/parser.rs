use crate::{
    ast::{
        BinaryOp, DeclKind, Declarator, Expr, ExprKind, Function, Literal, Program, Property,
        PropertyKey, SourceType, Stmt, StmtKind, UnaryOp, UpdateOp,
    },
    diagnostics::{Diagnostic, DiagnosticKind, SourceSpan},
    lexer::{Keyword, Lexer, Token, TokenKind},
};

/// The two parse probes the normalizer relies on.
pub trait Grammar {
    /// Parses `source` as a full statement list.
    fn parse_program(&self, source: &str) -> Result<Program, Diagnostic>;

    /// Parses the longest expression starting at byte `offset`. The returned
    /// expression's span ends immediately after the consumed text.
    fn parse_expression_at(&self, source: &str, offset: usize) -> Result<Expr, Diagnostic>;
}

/// Recursive-descent parser for the ECMAScript subset the console accepts.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcmaGrammar;

impl Grammar for EcmaGrammar {
    fn parse_program(&self, source: &str) -> Result<Program, Diagnostic> {
        parse_program(source)
    }

    fn parse_expression_at(&self, source: &str, offset: usize) -> Result<Expr, Diagnostic> {
        parse_expression_at(source, offset)
    }
}

pub fn parse_program(source: &str) -> Result<Program, Diagnostic> {
    Parser::new(Lexer::new(source))?.parse_program(source.len())
}

pub fn parse_expression_at(source: &str, offset: usize) -> Result<Expr, Diagnostic> {
    if offset > source.len() || !source.is_char_boundary(offset) {
        return Err(Diagnostic::new(
            DiagnosticKind::Parser,
            format!("offset {offset} is not a character boundary of the input"),
        ));
    }
    Parser::new(Lexer::at(source, offset))?.parse_expression()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token,
    previous_end: usize,
    in_function: bool,
}

impl<'a> Parser<'a> {
    fn new(mut lexer: Lexer<'a>) -> Result<Self, Diagnostic> {
        let token = lexer.next_token()?;
        let previous_end = token.span.start;
        Ok(Self {
            lexer,
            token,
            previous_end,
            in_function: false,
        })
    }

    fn parse_program(&mut self, len: usize) -> Result<Program, Diagnostic> {
        let mut body = Vec::new();
        while !self.check(TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        Ok(Program {
            source_type: SourceType::Script,
            body,
            span: SourceSpan::new(0, len),
        })
    }

    fn parse_statement(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.token.span.start;
        match self.token.kind {
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(self.finish(start, StmtKind::Empty))
            }
            TokenKind::LBrace => {
                let body = self.parse_block()?;
                Ok(self.finish(start, StmtKind::Block(body)))
            }
            TokenKind::Keyword(Keyword::Var | Keyword::Let | Keyword::Const) => {
                let kind = self.parse_var_decl()?;
                self.consume_semicolon()?;
                Ok(self.finish(start, kind))
            }
            TokenKind::Keyword(Keyword::Function) => {
                let function = self.parse_function(true)?;
                Ok(self.finish(start, StmtKind::Function(function)))
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::Break) => {
                self.advance()?;
                let label = self.parse_jump_label()?;
                Ok(self.finish(start, StmtKind::Break(label)))
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance()?;
                let label = self.parse_jump_label()?;
                Ok(self.finish(start, StmtKind::Continue(label)))
            }
            TokenKind::Keyword(Keyword::Throw) => {
                let throw = self.advance()?;
                if self.token.newline_before {
                    return Err(self.error(&throw, "illegal newline after `throw`"));
                }
                let value = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(self.finish(start, StmtKind::Throw(value)))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.token.span.start;
        let expr = self.parse_expression()?;
        if let ExprKind::Identifier(label) = &expr.kind {
            if self.check(TokenKind::Colon) {
                let label = label.clone();
                self.advance()?;
                let body = self.parse_statement()?;
                return Ok(self.finish(
                    start,
                    StmtKind::Labeled {
                        label,
                        body: Box::new(body),
                    },
                ));
            }
        }
        self.consume_semicolon()?;
        Ok(self.finish(start, StmtKind::Expr(expr)))
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        self.consume(TokenKind::LBrace, "expected `{` to start block")?;
        let mut items = Vec::new();
        while !self.check(TokenKind::RBrace) {
            if self.check(TokenKind::Eof) {
                return Err(self.error(&self.token, "expected `}` to close block"));
            }
            items.push(self.parse_statement()?);
        }
        self.advance()?;
        Ok(items)
    }

    fn parse_var_decl(&mut self) -> Result<StmtKind, Diagnostic> {
        let kind = match self.advance()?.kind {
            TokenKind::Keyword(Keyword::Let) => DeclKind::Let,
            TokenKind::Keyword(Keyword::Const) => DeclKind::Const,
            _ => DeclKind::Var,
        };
        let mut declarations = Vec::new();
        loop {
            let name = self.consume_identifier("expected variable name")?;
            let init = if self.matches(TokenKind::Assign)? {
                Some(self.parse_assignment()?)
            } else if kind == DeclKind::Const {
                return Err(self.error(&self.token, "missing initializer in const declaration"));
            } else {
                None
            };
            declarations.push(Declarator {
                name: name.lexeme,
                init,
            });
            if !self.matches(TokenKind::Comma)? {
                break;
            }
        }
        Ok(StmtKind::VarDecl { kind, declarations })
    }

    fn parse_function(&mut self, require_name: bool) -> Result<Function, Diagnostic> {
        self.consume(TokenKind::Keyword(Keyword::Function), "expected `function`")?;
        let name = if self.check(TokenKind::Identifier) {
            Some(self.advance()?.lexeme)
        } else if require_name {
            return Err(self.error(&self.token, "function statement requires a name"));
        } else {
            None
        };
        self.consume(TokenKind::LParen, "expected `(` before parameters")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.consume_identifier("expected parameter name")?.lexeme);
                if !self.matches(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "expected `)` after parameters")?;
        let enclosing = std::mem::replace(&mut self.in_function, true);
        let body = self.parse_block();
        self.in_function = enclosing;
        Ok(Function {
            name,
            params,
            body: body?,
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.advance()?.span.start;
        let condition = self.parse_paren_condition()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.matches(TokenKind::Keyword(Keyword::Else))? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(self.finish(
            start,
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
        ))
    }

    fn parse_while(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.advance()?.span.start;
        let condition = self.parse_paren_condition()?;
        let body = Box::new(self.parse_statement()?);
        Ok(self.finish(start, StmtKind::While { condition, body }))
    }

    fn parse_do_while(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.advance()?.span.start;
        let body = Box::new(self.parse_statement()?);
        self.consume(
            TokenKind::Keyword(Keyword::While),
            "expected `while` after `do` body",
        )?;
        let condition = self.parse_paren_condition()?;
        self.matches(TokenKind::Semicolon)?;
        Ok(self.finish(start, StmtKind::DoWhile { body, condition }))
    }

    fn parse_for(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.advance()?.span.start;
        self.consume(TokenKind::LParen, "expected `(` after `for`")?;
        let init = if self.check(TokenKind::Semicolon) {
            None
        } else {
            let init_start = self.token.span.start;
            let kind = match self.token.kind {
                TokenKind::Keyword(Keyword::Var | Keyword::Let | Keyword::Const) => {
                    self.parse_var_decl()?
                }
                _ => StmtKind::Expr(self.parse_expression()?),
            };
            Some(Box::new(self.finish(init_start, kind)))
        };
        self.consume(TokenKind::Semicolon, "expected `;` after loop initializer")?;
        let test = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon, "expected `;` after loop condition")?;
        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::RParen, "expected `)` after loop header")?;
        let body = Box::new(self.parse_statement()?);
        Ok(self.finish(
            start,
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
        ))
    }

    fn parse_return(&mut self) -> Result<Stmt, Diagnostic> {
        let keyword = self.advance()?;
        if !self.in_function {
            return Err(self.error(&keyword, "`return` outside of function"));
        }
        let value = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;
        Ok(self.finish(keyword.span.start, StmtKind::Return(value)))
    }

    fn parse_jump_label(&mut self) -> Result<Option<String>, Diagnostic> {
        let label = if self.check(TokenKind::Identifier) && !self.token.newline_before {
            Some(self.advance()?.lexeme)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(label)
    }

    fn parse_paren_condition(&mut self) -> Result<Expr, Diagnostic> {
        self.consume(TokenKind::LParen, "expected `(` before condition")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RParen, "expected `)` after condition")?;
        Ok(condition)
    }

    fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        let first = self.parse_assignment()?;
        if !self.check(TokenKind::Comma) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut items = vec![first];
        while self.matches(TokenKind::Comma)? {
            items.push(self.parse_assignment()?);
        }
        Ok(self.finish_expr(start, ExprKind::Sequence(items)))
    }

    fn parse_assignment(&mut self) -> Result<Expr, Diagnostic> {
        let target = self.parse_conditional()?;
        let op = match self.token.kind {
            TokenKind::Assign => None,
            TokenKind::CompoundAssign => {
                let symbol = self.token.lexeme.trim_end_matches('=');
                Some(compound_op(symbol).ok_or_else(|| {
                    self.error(&self.token, "unsupported compound assignment")
                })?)
            }
            _ => return Ok(target),
        };
        let operator = self.advance()?;
        if !matches!(
            target.kind,
            ExprKind::Identifier(_) | ExprKind::Field { .. } | ExprKind::Index { .. }
        ) {
            return Err(self.error(&operator, "invalid assignment target"));
        }
        let value = self.parse_assignment()?;
        Ok(Expr {
            span: target.span.to(value.span),
            kind: ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, Diagnostic> {
        let test = self.parse_binary(0)?;
        if !self.matches(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.consume(TokenKind::Colon, "expected `:` in conditional expression")?;
        let alternate = self.parse_assignment()?;
        Ok(Expr {
            span: test.span.to(alternate.span),
            kind: ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        })
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_unary()?;
        while let Some((op, precedence)) = binary_op(&self.token.kind) {
            if precedence < min_precedence {
                break;
            }
            self.advance()?;
            // `**` is the only right-associative binary operator.
            let next = if op == BinaryOp::Pow {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary(next)?;
            left = Expr {
                span: left.span.to(right.span),
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        let op = match self.token.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Keyword(Keyword::Typeof) => UnaryOp::Typeof,
            TokenKind::Keyword(Keyword::Void) => UnaryOp::Void,
            TokenKind::Keyword(Keyword::Delete) => UnaryOp::Delete,
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let operator = self.advance()?;
                let target = self.parse_unary()?;
                return Ok(Expr {
                    span: operator.span.to(target.span),
                    kind: ExprKind::Update {
                        op: update_op(&operator.kind),
                        prefix: true,
                        target: Box::new(target),
                    },
                });
            }
            _ => return self.parse_postfix(),
        };
        let operator = self.advance()?;
        let expr = self.parse_unary()?;
        Ok(Expr {
            span: operator.span.to(expr.span),
            kind: ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let expr = self.parse_call()?;
        if matches!(self.token.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.token.newline_before
        {
            let operator = self.advance()?;
            return Ok(Expr {
                span: expr.span.to(operator.span),
                kind: ExprKind::Update {
                    op: update_op(&operator.kind),
                    prefix: false,
                    target: Box::new(expr),
                },
            });
        }
        Ok(expr)
    }

    fn parse_call(&mut self) -> Result<Expr, Diagnostic> {
        let mut expr = if self.check(TokenKind::Keyword(Keyword::New)) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            if self.check(TokenKind::LParen) {
                let args = self.parse_arguments()?;
                expr = self.finish_expr(
                    expr.span.start,
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                );
            } else if self.at_member_suffix() {
                expr = self.parse_member_suffix(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_new(&mut self) -> Result<Expr, Diagnostic> {
        let start = self.advance()?.span.start;
        let mut callee = if self.check(TokenKind::Keyword(Keyword::New)) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        while self.at_member_suffix() {
            callee = self.parse_member_suffix(callee)?;
        }
        let args = if self.check(TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self.finish_expr(
            start,
            ExprKind::New {
                callee: Box::new(callee),
                args,
            },
        ))
    }

    fn at_member_suffix(&self) -> bool {
        matches!(self.token.kind, TokenKind::Dot | TokenKind::LBracket)
    }

    fn parse_member_suffix(&mut self, target: Expr) -> Result<Expr, Diagnostic> {
        let start = target.span.start;
        if self.matches(TokenKind::Dot)? {
            let field = match self.token.kind {
                TokenKind::Identifier | TokenKind::Keyword(_) => self.advance()?.lexeme,
                _ => return Err(self.error(&self.token, "expected property name after `.`")),
            };
            return Ok(self.finish_expr(
                start,
                ExprKind::Field {
                    target: Box::new(target),
                    field,
                },
            ));
        }
        self.consume(TokenKind::LBracket, "expected `[` before index")?;
        let index = self.parse_expression()?;
        self.consume(TokenKind::RBracket, "expected `]` after index")?;
        Ok(self.finish_expr(
            start,
            ExprKind::Index {
                target: Box::new(target),
                index: Box::new(index),
            },
        ))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, Diagnostic> {
        self.consume(TokenKind::LParen, "expected `(` before arguments")?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_assignment()?);
            if !self.matches(TokenKind::Comma)? {
                break;
            }
        }
        self.consume(TokenKind::RParen, "expected `)` after arguments")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let start = self.token.span.start;
        let kind = match self.token.kind {
            TokenKind::Number => {
                let token = self.advance()?;
                let value = parse_number(&token.lexeme)
                    .ok_or_else(|| self.error(&token, "invalid numeric literal"))?;
                ExprKind::Literal(Literal::Number(value))
            }
            TokenKind::String => ExprKind::Literal(Literal::String(self.advance()?.lexeme)),
            TokenKind::Regex => {
                let token = self.advance()?;
                let close = token.lexeme.rfind('/').unwrap_or(0);
                ExprKind::Regex {
                    pattern: token.lexeme[1..close].to_string(),
                    flags: token.lexeme[close + 1..].to_string(),
                }
            }
            TokenKind::Slash | TokenKind::CompoundAssign if self.token.lexeme.starts_with('/') => {
                self.reread_regex()?;
                return self.parse_primary();
            }
            TokenKind::Identifier => ExprKind::Identifier(self.advance()?.lexeme),
            TokenKind::Keyword(Keyword::True) => {
                self.advance()?;
                ExprKind::Literal(Literal::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance()?;
                ExprKind::Literal(Literal::Bool(false))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance()?;
                ExprKind::Literal(Literal::Null)
            }
            TokenKind::Keyword(Keyword::This) => {
                self.advance()?;
                ExprKind::This
            }
            TokenKind::Keyword(Keyword::Function) => ExprKind::Function(self.parse_function(false)?),
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RParen, "expected `)` after expression")?;
                ExprKind::Group(Box::new(inner))
            }
            TokenKind::LBracket => self.parse_array()?,
            TokenKind::LBrace => self.parse_object()?,
            TokenKind::Eof => return Err(self.error(&self.token, "unexpected end of input")),
            _ => {
                let message = format!("unexpected token `{}`", self.token.lexeme);
                return Err(self.error(&self.token, &message));
            }
        };
        Ok(self.finish_expr(start, kind))
    }

    fn parse_array(&mut self) -> Result<ExprKind, Diagnostic> {
        self.consume(TokenKind::LBracket, "expected `[`")?;
        let mut elements = Vec::new();
        loop {
            if self.matches(TokenKind::RBracket)? {
                break;
            }
            if self.matches(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_assignment()?));
            if !self.check(TokenKind::RBracket) {
                self.consume(TokenKind::Comma, "expected `,` or `]` in array literal")?;
            }
        }
        Ok(ExprKind::Array(elements))
    }

    fn parse_object(&mut self) -> Result<ExprKind, Diagnostic> {
        self.consume(TokenKind::LBrace, "expected `{`")?;
        let mut properties = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let start = self.token.span.start;
            let key_token = self.token.clone();
            let key = match &key_token.kind {
                TokenKind::Identifier | TokenKind::Keyword(_) => {
                    self.advance()?;
                    PropertyKey::Identifier(key_token.lexeme.clone())
                }
                TokenKind::String => {
                    self.advance()?;
                    PropertyKey::Literal(Literal::String(key_token.lexeme.clone()))
                }
                TokenKind::Number => {
                    self.advance()?;
                    let value = parse_number(&key_token.lexeme)
                        .ok_or_else(|| self.error(&key_token, "invalid numeric literal"))?;
                    PropertyKey::Literal(Literal::Number(value))
                }
                TokenKind::LBracket => {
                    self.advance()?;
                    let computed = self.parse_assignment()?;
                    self.consume(TokenKind::RBracket, "expected `]` after computed key")?;
                    PropertyKey::Computed(Box::new(computed))
                }
                _ => return Err(self.error(&key_token, "expected property name")),
            };
            let shorthand = key_token.kind == TokenKind::Identifier
                && matches!(self.token.kind, TokenKind::Comma | TokenKind::RBrace);
            let value = if shorthand {
                Expr {
                    kind: ExprKind::Identifier(key_token.lexeme.clone()),
                    span: key_token.span,
                }
            } else {
                self.consume(TokenKind::Colon, "expected `:` after property name")?;
                self.parse_assignment()?
            };
            properties.push(Property {
                key,
                value,
                shorthand,
                span: SourceSpan::new(start, self.previous_end),
            });
            if !self.matches(TokenKind::Comma)? {
                break;
            }
        }
        self.consume(TokenKind::RBrace, "expected `}` after object literal")?;
        Ok(ExprKind::Object(properties))
    }

    fn at_statement_end(&self) -> bool {
        self.token.newline_before
            || matches!(
                self.token.kind,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            )
    }

    /// Automatic semicolon insertion: a statement may end without `;` before
    /// `}`, at end of input, or when a line break follows it.
    fn consume_semicolon(&mut self) -> Result<(), Diagnostic> {
        if self.matches(TokenKind::Semicolon)? || self.at_statement_end() {
            Ok(())
        } else {
            let message = format!("unexpected token `{}`", self.token.lexeme);
            Err(self.error(&self.token, &message))
        }
    }

    fn finish(&self, start: usize, kind: StmtKind) -> Stmt {
        Stmt {
            kind,
            span: SourceSpan::new(start, self.previous_end),
        }
    }

    fn finish_expr(&self, start: usize, kind: ExprKind) -> Expr {
        Expr {
            kind,
            span: SourceSpan::new(start, self.previous_end),
        }
    }

    fn matches(&mut self, kind: TokenKind) -> Result<bool, Diagnostic> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.error(&self.token, message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> Result<Token, Diagnostic> {
        self.consume(TokenKind::Identifier, message)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    /// Moves to the next token and returns the one just consumed.
    fn advance(&mut self) -> Result<Token, Diagnostic> {
        let next = self.lexer.next_token()?;
        let previous = std::mem::replace(&mut self.token, next);
        self.previous_end = previous.span.end;
        Ok(previous)
    }

    /// An operand is expected, so the current `/` or `/=` opens a regex.
    fn reread_regex(&mut self) -> Result<(), Diagnostic> {
        let newline_before = self.token.newline_before;
        self.token = self.lexer.reread_regex(self.token.span.start)?;
        self.token.newline_before = newline_before;
        Ok(())
    }

    fn error(&self, token: &Token, message: &str) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Parser, message.to_string()).with_span(token.span)
    }
}

fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::DoubleQuestion => (BinaryOp::Nullish, 1),
        TokenKind::DoublePipe => (BinaryOp::Or, 1),
        TokenKind::DoubleAmpersand => (BinaryOp::And, 2),
        TokenKind::Pipe => (BinaryOp::BitOr, 3),
        TokenKind::Caret => (BinaryOp::BitXor, 4),
        TokenKind::Ampersand => (BinaryOp::BitAnd, 5),
        TokenKind::EqualEqual => (BinaryOp::Equal, 6),
        TokenKind::BangEqual => (BinaryOp::NotEqual, 6),
        TokenKind::StrictEqual => (BinaryOp::StrictEqual, 6),
        TokenKind::StrictNotEqual => (BinaryOp::StrictNotEqual, 6),
        TokenKind::Less => (BinaryOp::Less, 7),
        TokenKind::LessEqual => (BinaryOp::LessEqual, 7),
        TokenKind::Greater => (BinaryOp::Greater, 7),
        TokenKind::GreaterEqual => (BinaryOp::GreaterEqual, 7),
        TokenKind::Keyword(Keyword::In) => (BinaryOp::In, 7),
        TokenKind::Keyword(Keyword::Instanceof) => (BinaryOp::Instanceof, 7),
        TokenKind::ShiftLeft => (BinaryOp::ShiftLeft, 8),
        TokenKind::ShiftRight => (BinaryOp::ShiftRight, 8),
        TokenKind::UnsignedShiftRight => (BinaryOp::UnsignedShiftRight, 8),
        TokenKind::Plus => (BinaryOp::Add, 9),
        TokenKind::Minus => (BinaryOp::Sub, 9),
        TokenKind::Star => (BinaryOp::Mul, 10),
        TokenKind::Slash => (BinaryOp::Div, 10),
        TokenKind::Percent => (BinaryOp::Mod, 10),
        TokenKind::StarStar => (BinaryOp::Pow, 11),
        _ => return None,
    };
    Some(entry)
}

fn compound_op(symbol: &str) -> Option<BinaryOp> {
    let op = match symbol {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        "**" => BinaryOp::Pow,
        "<<" => BinaryOp::ShiftLeft,
        ">>" => BinaryOp::ShiftRight,
        ">>>" => BinaryOp::UnsignedShiftRight,
        "&" => BinaryOp::BitAnd,
        "|" => BinaryOp::BitOr,
        "^" => BinaryOp::BitXor,
        "&&" => BinaryOp::And,
        "||" => BinaryOp::Or,
        "??" => BinaryOp::Nullish,
        _ => return None,
    };
    Some(op)
}

fn update_op(kind: &TokenKind) -> UpdateOp {
    if *kind == TokenKind::PlusPlus {
        UpdateOp::Increment
    } else {
        UpdateOp::Decrement
    }
}

fn parse_number(lexeme: &str) -> Option<f64> {
    let digits = lexeme.replace('_', "");
    let radix = match digits.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return digits.parse::<f64>().ok(),
    };
    let body = &digits[2..];
    if body.is_empty() {
        return None;
    }
    body.chars().try_fold(0f64, |acc, ch| {
        ch.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

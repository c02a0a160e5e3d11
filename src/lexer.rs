use crate::diagnostics::{Diagnostic, DiagnosticKind, SourceSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Var,
    Let,
    Const,
    Function,
    If,
    Else,
    While,
    Do,
    For,
    Return,
    Break,
    Continue,
    Throw,
    New,
    This,
    Typeof,
    Void,
    Delete,
    In,
    Instanceof,
    True,
    False,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    Regex,
    Keyword(Keyword),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    Question,
    DoubleQuestion,
    FatArrow,
    Assign,
    CompoundAssign,
    Plus,
    Minus,
    PlusPlus,
    MinusMinus,
    Star,
    StarStar,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    DoubleAmpersand,
    DoublePipe,
    Bang,
    Tilde,
    EqualEqual,
    BangEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token; the cooked value for string literals.
    pub lexeme: String,
    pub span: SourceSpan,
    /// A line terminator separates this token from the previous one.
    pub newline_before: bool,
}

/// Pull-based tokenizer. Tokens are produced on demand so that a parse which
/// stops early never looks at the text beyond its last token.
pub struct Lexer<'a> {
    source: &'a str,
    current: usize,
    regex_allowed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::at(source, 0)
    }

    pub fn at(source: &'a str, offset: usize) -> Self {
        Self {
            source,
            current: offset.min(source.len()),
            regex_allowed: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();
        Some(ch)
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn collect_while<F>(&mut self, mut predicate: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
    }

    /// Skips trivia and reports whether a line terminator was crossed.
    fn skip_whitespace_and_comments(&mut self) -> Result<bool, Diagnostic> {
        let mut newline = false;
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(ch), _) if is_line_terminator(ch) => {
                    newline = true;
                    self.bump();
                }
                (Some(ch), _) if ch.is_whitespace() || ch == '\u{feff}' => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    self.collect_while(|ch| !is_line_terminator(ch));
                }
                (Some('/'), Some('*')) => {
                    let start = self.current;
                    self.bump();
                    self.bump();
                    match self.source[self.current..].find("*/") {
                        Some(len) => {
                            let body = &self.source[self.current..self.current + len];
                            newline |= body.chars().any(is_line_terminator);
                            self.current += len + 2;
                        }
                        None => {
                            return Err(Diagnostic::new(
                                DiagnosticKind::Lexer,
                                "unterminated comment",
                            )
                            .with_span(SourceSpan::new(start, self.source.len())));
                        }
                    }
                }
                _ => return Ok(newline),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        let newline_before = self.skip_whitespace_and_comments()?;
        let start = self.current;
        let Some(ch) = self.bump() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span: SourceSpan::new(start, start),
                newline_before,
            });
        };

        let mut token = match ch {
            c if is_identifier_start(c) => self.identifier_or_keyword(start),
            '0'..='9' => self.number_literal(start, ch)?,
            '.' if matches!(self.peek(), Some('0'..='9')) => self.number_literal(start, ch)?,
            '"' | '\'' => self.string_literal(start, ch)?,
            '/' if self.regex_allowed => self.regex_literal(start)?,
            '(' => self.simple_token(start, TokenKind::LParen),
            ')' => self.simple_token(start, TokenKind::RParen),
            '{' => self.simple_token(start, TokenKind::LBrace),
            '}' => self.simple_token(start, TokenKind::RBrace),
            '[' => self.simple_token(start, TokenKind::LBracket),
            ']' => self.simple_token(start, TokenKind::RBracket),
            ',' => self.simple_token(start, TokenKind::Comma),
            '.' => self.simple_token(start, TokenKind::Dot),
            ';' => self.simple_token(start, TokenKind::Semicolon),
            ':' => self.simple_token(start, TokenKind::Colon),
            '~' => self.simple_token(start, TokenKind::Tilde),
            '?' => {
                if self.match_next('?') {
                    self.operator(start, TokenKind::DoubleQuestion)
                } else {
                    self.simple_token(start, TokenKind::Question)
                }
            }
            '+' => {
                if self.match_next('+') {
                    self.simple_token(start, TokenKind::PlusPlus)
                } else {
                    self.operator(start, TokenKind::Plus)
                }
            }
            '-' => {
                if self.match_next('-') {
                    self.simple_token(start, TokenKind::MinusMinus)
                } else {
                    self.operator(start, TokenKind::Minus)
                }
            }
            '*' => {
                if self.match_next('*') {
                    self.operator(start, TokenKind::StarStar)
                } else {
                    self.operator(start, TokenKind::Star)
                }
            }
            '/' => self.operator(start, TokenKind::Slash),
            '%' => self.operator(start, TokenKind::Percent),
            '^' => self.operator(start, TokenKind::Caret),
            '&' => {
                if self.match_next('&') {
                    self.operator(start, TokenKind::DoubleAmpersand)
                } else {
                    self.operator(start, TokenKind::Ampersand)
                }
            }
            '|' => {
                if self.match_next('|') {
                    self.operator(start, TokenKind::DoublePipe)
                } else {
                    self.operator(start, TokenKind::Pipe)
                }
            }
            '=' => {
                if self.match_next('>') {
                    self.simple_token(start, TokenKind::FatArrow)
                } else if self.match_next('=') {
                    if self.match_next('=') {
                        self.simple_token(start, TokenKind::StrictEqual)
                    } else {
                        self.simple_token(start, TokenKind::EqualEqual)
                    }
                } else {
                    self.simple_token(start, TokenKind::Assign)
                }
            }
            '!' => {
                if self.match_next('=') {
                    if self.match_next('=') {
                        self.simple_token(start, TokenKind::StrictNotEqual)
                    } else {
                        self.simple_token(start, TokenKind::BangEqual)
                    }
                } else {
                    self.simple_token(start, TokenKind::Bang)
                }
            }
            '<' => {
                if self.match_next('<') {
                    self.operator(start, TokenKind::ShiftLeft)
                } else if self.match_next('=') {
                    self.simple_token(start, TokenKind::LessEqual)
                } else {
                    self.simple_token(start, TokenKind::Less)
                }
            }
            '>' => {
                if self.match_next('>') {
                    if self.match_next('>') {
                        self.operator(start, TokenKind::UnsignedShiftRight)
                    } else {
                        self.operator(start, TokenKind::ShiftRight)
                    }
                } else if self.match_next('=') {
                    self.simple_token(start, TokenKind::GreaterEqual)
                } else {
                    self.simple_token(start, TokenKind::Greater)
                }
            }
            other => {
                return Err(Diagnostic::new(
                    DiagnosticKind::Lexer,
                    format!("unexpected character `{other}`"),
                )
                .with_span(SourceSpan::new(start, self.current)));
            }
        };

        token.newline_before = newline_before;
        self.regex_allowed = !matches!(
            token.kind,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Regex
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Keyword(Keyword::This | Keyword::True | Keyword::False | Keyword::Null)
        );
        Ok(token)
    }

    fn identifier_or_keyword(&mut self, start: usize) -> Token {
        self.collect_while(is_identifier_part);
        let lexeme = &self.source[start..self.current];
        let kind = keyword_for(lexeme).unwrap_or(TokenKind::Identifier);
        self.simple_token(start, kind)
    }

    fn number_literal(&mut self, start: usize, first: char) -> Result<Token, Diagnostic> {
        let radix_prefix = first == '0' && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'));
        if radix_prefix {
            self.bump();
            self.collect_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        } else {
            let mut seen_dot = first == '.';
            let mut seen_exp = false;
            while let Some(ch) = self.peek() {
                match ch {
                    '0'..='9' | '_' => {
                        self.bump();
                    }
                    '.' if !seen_dot && !seen_exp => {
                        seen_dot = true;
                        self.bump();
                    }
                    'e' | 'E' if !seen_exp => {
                        seen_exp = true;
                        self.bump();
                        if let Some('+' | '-') = self.peek() {
                            self.bump();
                        }
                    }
                    _ => break,
                }
            }
        }
        if self.peek().is_some_and(is_identifier_start) {
            return Err(Diagnostic::new(
                DiagnosticKind::Lexer,
                "identifier starts immediately after numeric literal",
            )
            .with_span(SourceSpan::new(start, self.current)));
        }
        Ok(self.simple_token(start, TokenKind::Number))
    }

    fn string_literal(&mut self, start: usize, quote: char) -> Result<Token, Diagnostic> {
        let mut value = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                c if c == quote => {
                    return Ok(Token {
                        kind: TokenKind::String,
                        lexeme: value,
                        span: SourceSpan::new(start, self.current),
                        newline_before: false,
                    });
                }
                '\n' | '\r' => break,
                '\\' => {
                    let Some(esc) = self.bump() else { break };
                    match esc {
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        'v' => value.push('\u{b}'),
                        '0'..='7' => value.push(self.octal_escape(esc)),
                        'x' => value.push(self.hex_escape(start, 2)?),
                        'u' => value.push(self.unicode_escape(start)?),
                        '\r' => {
                            self.match_next('\n');
                        }
                        '\n' | '\u{2028}' | '\u{2029}' => {}
                        other => value.push(other),
                    }
                }
                _ => value.push(ch),
            }
        }
        Err(
            Diagnostic::new(DiagnosticKind::Lexer, "unterminated string literal")
                .with_span(SourceSpan::new(start, self.current)),
        )
    }

    /// Legacy octal escape: up to three digits, at most `\377`.
    fn octal_escape(&mut self, first: char) -> char {
        let mut code = first.to_digit(8).unwrap_or_default();
        let max_digits = if first <= '3' { 3 } else { 2 };
        for _ in 1..max_digits {
            match self.peek().and_then(|ch| ch.to_digit(8)) {
                Some(digit) => {
                    code = code * 8 + digit;
                    self.bump();
                }
                None => break,
            }
        }
        char::from_u32(code).unwrap_or_default()
    }

    fn hex_escape(&mut self, start: usize, digits: usize) -> Result<char, Diagnostic> {
        let from = self.current;
        for _ in 0..digits {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    self.bump();
                }
                _ => return Err(self.bad_escape(start)),
            }
        }
        u32::from_str_radix(&self.source[from..self.current], 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.bad_escape(start))
    }

    fn unicode_escape(&mut self, start: usize) -> Result<char, Diagnostic> {
        if !self.match_next('{') {
            return self.hex_escape(start, 4);
        }
        let from = self.current;
        self.collect_while(|ch| ch.is_ascii_hexdigit());
        let digits = &self.source[from..self.current];
        if digits.is_empty() || !self.match_next('}') {
            return Err(self.bad_escape(start));
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.bad_escape(start))
    }

    fn bad_escape(&self, start: usize) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Lexer, "invalid escape sequence")
            .with_span(SourceSpan::new(start, self.current))
    }

    /// Scans again from the `/` at `start`, this time as a regular expression.
    /// The lexer cannot tell a regex from division after `)` or `}`; the
    /// parser calls this when it expects an operand there.
    pub fn reread_regex(&mut self, start: usize) -> Result<Token, Diagnostic> {
        self.current = start + 1;
        let token = self.regex_literal(start)?;
        self.regex_allowed = false;
        Ok(token)
    }

    fn regex_literal(&mut self, start: usize) -> Result<Token, Diagnostic> {
        let mut in_class = false;
        loop {
            match self.bump() {
                Some('\\') => {
                    if self.bump().map_or(true, is_line_terminator) {
                        break;
                    }
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => {
                    self.collect_while(is_identifier_part);
                    return Ok(self.simple_token(start, TokenKind::Regex));
                }
                Some(ch) if !is_line_terminator(ch) => {}
                _ => break,
            }
        }
        Err(
            Diagnostic::new(DiagnosticKind::Lexer, "unterminated regular expression")
                .with_span(SourceSpan::new(start, self.current)),
        )
    }

    /// Binary operators may be followed by `=` to form a compound assignment.
    fn operator(&mut self, start: usize, kind: TokenKind) -> Token {
        if self.match_next('=') {
            self.simple_token(start, TokenKind::CompoundAssign)
        } else {
            self.simple_token(start, kind)
        }
    }

    fn simple_token(&mut self, start: usize, kind: TokenKind) -> Token {
        let end = self.current;
        Token {
            kind,
            lexeme: self.source[start..end].to_string(),
            span: SourceSpan { start, end },
            newline_before: false,
        }
    }
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn keyword_for(ident: &str) -> Option<TokenKind> {
    use self::Keyword as Kw;
    let keyword = match ident {
        "var" => Kw::Var,
        "let" => Kw::Let,
        "const" => Kw::Const,
        "function" => Kw::Function,
        "if" => Kw::If,
        "else" => Kw::Else,
        "while" => Kw::While,
        "do" => Kw::Do,
        "for" => Kw::For,
        "return" => Kw::Return,
        "break" => Kw::Break,
        "continue" => Kw::Continue,
        "throw" => Kw::Throw,
        "new" => Kw::New,
        "this" => Kw::This,
        "typeof" => Kw::Typeof,
        "void" => Kw::Void,
        "delete" => Kw::Delete,
        "in" => Kw::In,
        "instanceof" => Kw::Instanceof,
        "true" => Kw::True,
        "false" => Kw::False,
        "null" => Kw::Null,
        _ => return None,
    };
    Some(TokenKind::Keyword(keyword))
}

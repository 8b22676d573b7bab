use crate::token::{TextRange, Token, TokenKind};
use std::{iter::Peekable, str::CharIndices};

#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
    stream: Peekable<CharIndices<'a>>,
    start: usize,
    current: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            stream: source.char_indices().peekable(),
            start: 0,
            current: 0,
        }
    }

    /// Lexes the whole source, including the trailing `EOF` token.
    pub fn lex_all(mut self) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::default();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::EOF;
            tokens.push(token);
            if done {
                break tokens;
            }
        }
    }

    /// Produces the next token. Once the input is exhausted,
    /// every subsequent call yields an `EOF` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.current;
        match self.advance() {
            Some(c) => match c {
                '=' => self.lookahead_for_token('=', TokenKind::EQUAL_EQUAL, TokenKind::ASSIGN),
                '!' => self.lookahead_for_token('=', TokenKind::BANG_EQUAL, TokenKind::BANG),
                _ => {
                    if let Some(t) = TokenKind::from_char(c) {
                        self.make_token(t)
                    } else if is_letter(c) {
                        self.lex_ident()
                    } else if c.is_ascii_digit() {
                        self.lex_int()
                    } else {
                        self.make_token(TokenKind::ILLEGAL)
                    }
                }
            },
            None => self.make_token(TokenKind::EOF),
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
    }

    fn lex_ident(&mut self) -> Token {
        self.advance_while(is_letter);
        if let Some(t) = TokenKind::from_keyword(self.lexeme_from_range()) {
            self.make_token(t)
        } else {
            self.make_token(TokenKind::IDENT)
        }
    }

    fn lex_int(&mut self) -> Token {
        self.advance_while(|c| c.is_ascii_digit());
        self.make_token(TokenKind::INT)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.text_range(),
            self.lexeme_from_range().to_string(),
        )
    }

    fn lexeme_from_range(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn text_range(&self) -> TextRange {
        TextRange {
            start: self.start,
            end: self.current,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.stream.next()?;
        self.current = idx + c.len_utf8();
        Some(c)
    }

    fn advance_if<F>(&mut self, cond: F) -> Option<char>
    where
        F: FnOnce(char) -> bool,
    {
        if self.stream.peek().filter(|&&(_, c)| cond(c)).is_some() {
            self.advance()
        } else {
            None
        }
    }

    fn advance_while<F>(&mut self, cond: F) -> Option<usize>
    where
        F: Fn(char) -> bool,
    {
        let mut count: usize = 0;
        while self.advance_if(&cond).is_some() {
            count += 1;
        }
        count.ne(&0).then_some(count)
    }

    fn lookahead_for_token(
        &mut self,
        match_char: char,
        if_match: TokenKind,
        no_match: TokenKind,
    ) -> Token {
        if self.advance_if(|c| c == match_char).is_some() {
            self.make_token(if_match)
        } else {
            self.make_token(no_match)
        }
    }
}

// Underscores are allowed anywhere in identifiers, digits are not
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

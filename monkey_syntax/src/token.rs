use std::fmt::Display;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// The enum variants are in SCREAMING_SNAKE_CASE as they technically
/// represent constants, but Rust does not allow const enum variants.
#[allow(nonstandard_style)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenKind {
    // Symbols
    LPAREN,
    RPAREN,
    LBRACE,
    RBRACE,
    COMMA,
    SEMICOLON,
    // Arithmetic
    BANG,
    MINUS,
    PLUS,
    SLASH,
    STAR,
    // Comparisons
    BANG_EQUAL,
    EQUAL_EQUAL,
    GREATER,
    LESS,
    // Literals
    IDENT,
    INT,
    // Keywords
    ELSE,
    FALSE,
    FN,
    IF,
    LET,
    RETURN,
    TRUE,
    // Miscellaneous tokens
    ASSIGN,
    ILLEGAL,
    EOF,
}

impl TokenKind {
    pub fn from_char(c: char) -> Option<Self> {
        let token = match c {
            '(' => Self::LPAREN,
            ')' => Self::RPAREN,
            '{' => Self::LBRACE,
            '}' => Self::RBRACE,
            ',' => Self::COMMA,
            ';' => Self::SEMICOLON,
            '-' => Self::MINUS,
            '+' => Self::PLUS,
            '/' => Self::SLASH,
            '*' => Self::STAR,
            '>' => Self::GREATER,
            '<' => Self::LESS,
            _ => return None,
        };
        Some(token)
    }

    pub fn from_keyword(kw: &str) -> Option<Self> {
        let token = match kw {
            "else" => Self::ELSE,
            "false" => Self::FALSE,
            "fn" => Self::FN,
            "if" => Self::IF,
            "let" => Self::LET,
            "return" => Self::RETURN,
            "true" => Self::TRUE,
            _ => return None,
        };
        Some(token)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::LPAREN => "(",
            Self::RPAREN => ")",
            Self::LBRACE => "{",
            Self::RBRACE => "}",
            Self::COMMA => ",",
            Self::SEMICOLON => ";",
            Self::BANG => "!",
            Self::MINUS => "-",
            Self::PLUS => "+",
            Self::SLASH => "/",
            Self::STAR => "*",
            Self::BANG_EQUAL => "!=",
            Self::EQUAL_EQUAL => "==",
            Self::GREATER => ">",
            Self::LESS => "<",
            Self::IDENT => "IDENTIFIER",
            Self::INT => "INT",
            Self::ELSE => "ELSE",
            Self::FALSE => "FALSE",
            Self::FN => "FUNCTION",
            Self::IF => "IF",
            Self::LET => "LET",
            Self::RETURN => "RETURN",
            Self::TRUE => "TRUE",
            Self::ASSIGN => "=",
            Self::ILLEGAL => "ILLEGAL",
            Self::EOF => "EOF",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
    pub lexeme: String,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lexeme)
    }
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange, lexeme: String) -> Self {
        Self {
            kind,
            range,
            lexeme,
        }
    }
}

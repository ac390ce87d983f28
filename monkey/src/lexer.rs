use std::{fmt, iter::Peekable, str::CharIndices};

/// Kind of a [`Token`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// any character the lexer does not understand
    Illegal,
    /// end of input, repeated forever once reached
    Eof,

    /// add, foobar, x, y, ...
    Ident,
    /// 1337
    Int,
    /// "hello"
    String,

    /// =
    Assign,
    /// +
    Plus,
    /// -
    Minus,
    /// !
    Bang,
    /// *
    Asterisk,
    /// /
    Slash,
    /// <
    Lt,
    /// >
    Gt,
    /// ==
    Eq,
    /// !=
    NotEq,

    /// ,
    Comma,
    /// ;
    Semicolon,
    /// :
    Colon,

    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,

    // keywords
    Function,
    Let,
    If,
    Else,
    Return,
    True,
    False,
}

impl TokenKind {
    /// Classifies an identifier against the keyword table.
    pub fn lookup_ident(ident: &str) -> Self {
        match ident {
            "fn" => Self::Function,
            "let" => Self::Let,
            "if" => Self::If,
            "else" => Self::Else,
            "return" => Self::Return,
            "true" => Self::True,
            "false" => Self::False,
            _ => Self::Ident,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Ident => "IDENT",
            Self::Int => "INT",
            Self::String => "STRING",
            Self::Assign => "ASSIGN",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Bang => "BANG",
            Self::Asterisk => "ASTERISK",
            Self::Slash => "SLASH",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Eq => "EQ",
            Self::NotEq => "NOT_EQ",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::Colon => "COLON",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::Function => "FUNCTION",
            Self::Let => "LET",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::Return => "RETURN",
            Self::True => "TRUE",
            Self::False => "FALSE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.literal)
    }
}

/// Scans source text into [`Token`]s, one [`Lexer::next_token`] call at a time.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    /// set once the EOF token was handed out by the iterator
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            finished: false,
        }
    }

    /// Returns the next token. Keeps returning [`TokenKind::Eof`] once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let Some((start, ch)) = self.chars.next() else {
            return Token::eof();
        };
        let single = |kind| Token::new(kind, ch);
        match ch {
            '=' => self.two_char(start, TokenKind::Assign, TokenKind::Eq),
            '!' => self.two_char(start, TokenKind::Bang, TokenKind::NotEq),
            '+' => single(TokenKind::Plus),
            '-' => single(TokenKind::Minus),
            '*' => single(TokenKind::Asterisk),
            '/' => single(TokenKind::Slash),
            '<' => single(TokenKind::Lt),
            '>' => single(TokenKind::Gt),
            ',' => single(TokenKind::Comma),
            ';' => single(TokenKind::Semicolon),
            ':' => single(TokenKind::Colon),
            '(' => single(TokenKind::LParen),
            ')' => single(TokenKind::RParen),
            '{' => single(TokenKind::LBrace),
            '}' => single(TokenKind::RBrace),
            '[' => single(TokenKind::LBracket),
            ']' => single(TokenKind::RBracket),
            '"' => Token::new(TokenKind::String, self.read_string()),
            c if is_letter(c) => {
                let ident = self.read_while(start, is_letter);
                Token::new(TokenKind::lookup_ident(ident), ident)
            }
            c if c.is_ascii_digit() => {
                Token::new(TokenKind::Int, self.read_while(start, |c| c.is_ascii_digit()))
            }
            _ => single(TokenKind::Illegal),
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .chars
            .next_if(|(_, c)| matches!(c, ' ' | '\t' | '\r' | '\n'))
            .is_some()
        {}
    }

    /// `==` / `!=` need one character of lookahead, otherwise fall back to `single`.
    fn two_char(&mut self, start: usize, single: TokenKind, double: TokenKind) -> Token {
        if self.chars.next_if(|(_, c)| *c == '=').is_some() {
            Token::new(double, &self.source[start..start + 2])
        } else {
            Token::new(single, &self.source[start..start + 1])
        }
    }

    fn read_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> &'src str {
        let mut end = self.source.len();
        while let Some(&(idx, c)) = self.chars.peek() {
            if !pred(c) {
                end = idx;
                break;
            }
            self.chars.next();
        }
        &self.source[start..end]
    }

    /// Reads up to the closing quote, or to the end of input if it never comes.
    fn read_string(&mut self) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => break,
                '\\' => match self.chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                c => out.push(c),
            }
        }
        out
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token including the final EOF, then stops.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind == TokenKind::Eof;
        Some(token)
    }
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

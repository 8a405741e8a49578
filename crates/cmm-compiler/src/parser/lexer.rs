//! Lexer for C-- source.
//!
//! Produces span-based tokens; text is sliced from the source only when a
//! production needs it. Positions are 1-based (line, column) and are computed
//! from byte offsets through a [`LineIndex`] built once per file.

use logos::Logos;

use super::SyntaxError;
use crate::ast::Pos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip(r"[ \t\r\n\x0c]+|//[^\n]*|#[^\n]*", allow_greedy = true))]
pub enum Tok {
    #[token("bool")]
    Bool,
    #[token("int")]
    Int,
    #[token("void")]
    Void,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("struct")]
    Struct,
    #[token("cin")]
    Cin,
    #[token("cout")]
    Cout,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("repeat")]
    Repeat,
    #[token("return")]
    Return,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Id,
    #[regex(r"[0-9]+")]
    IntLit,
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    StrLit,

    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("<<")]
    WriteOp,
    #[token(">>")]
    ReadOp,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Times,
    #[token("/")]
    Divide,
    #[token("!")]
    Not,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("=")]
    Assign,
    #[token("==")]
    Equals,
    #[token("!=")]
    NotEquals,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
}

/// Byte span of a token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// A token: kind plus span, no owned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Tok,
    pub span: Span,
}

/// Slice the source text of a token.
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.span.range()]
}

/// Maps byte offsets to 1-based line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self { line_starts }
    }

    pub fn pos(&self, offset: u32) -> Pos {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Pos::new(line as u32 + 1, offset - self.line_starts[line] + 1)
    }
}

/// Tokenizes the whole source up front.
///
/// The first lexical error aborts: the parser never runs over a stream with
/// holes in it, so recovery would buy nothing.
pub fn lex(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut lexer = Tok::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let span = Span {
            start: span.start as u32,
            end: span.end as u32,
        };
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => {
                let text = &source[span.range()];
                let message = if text.starts_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unrecognized character `{}`", text.chars().next().unwrap_or('?'))
                };
                return Err(SyntaxError {
                    pos: index.pos(span.start),
                    message,
                });
            }
        }
    }

    Ok(tokens)
}

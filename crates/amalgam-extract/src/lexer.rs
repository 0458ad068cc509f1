//! Attribute-list lexer using logos.
//!
//! Tokenizes the attribute region of a script open tag (the text between
//! `<script` and `>`). Quoted values lex as single tokens so that `=`, `/`
//! or whitespace inside a value never split an attribute.

use crate::span::Span;
use logos::Logos;
use text_size::TextSize;

/// A token produced by the attribute lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token, relative to the attribute region.
    pub span: Span,
}

/// Token kinds for a tag attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    /// `=`
    #[token("=", priority = 10)]
    Eq,

    /// `/` (self-closing slash before `>`)
    #[token("/", priority = 10)]
    Slash,

    /// A double-quoted attribute value, quotes included.
    #[regex(r#""[^"]*""#, priority = 10)]
    DoubleQuoted,

    /// A single-quoted attribute value, quotes included.
    #[regex(r"'[^']*'", priority = 10)]
    SingleQuoted,

    /// An attribute name (`editor`, `type`, `data-foo`, `x:bind`).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-:.]*", priority = 4)]
    Ident,

    /// An unquoted attribute value.
    #[regex(r"[^ \t\r\n='/>][^ \t\r\n='/]*", priority = 1)]
    Bare,

    /// End of the attribute region.
    Eof,

    /// Invalid/unknown token.
    #[default]
    Error,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eq => "'='",
            TokenKind::Slash => "'/'",
            TokenKind::DoubleQuoted => "double-quoted value",
            TokenKind::SingleQuoted => "single-quoted value",
            TokenKind::Ident => "identifier",
            TokenKind::Bare => "unquoted value",
            TokenKind::Eof => "end of attributes",
            TokenKind::Error => "invalid token",
        }
    }
}

/// A lexer over a tag's attribute region.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given attribute region.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }

    /// Returns the text of the current token.
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }

    /// Returns the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Some(Token {
                    kind,
                    span: Span::new(
                        TextSize::from(span.start as u32),
                        TextSize::from(span.end as u32),
                    ),
                })
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Some(Token {
                    kind: TokenKind::Error,
                    span: Span::new(
                        TextSize::from(span.start as u32),
                        TextSize::from(span.end as u32),
                    ),
                })
            }
            None => {
                self.finished = true;
                let end = TextSize::from(self.source.len() as u32);
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(end, end),
                })
            }
        }
    }
}

//! Tokenizing scan for the marker-tagged script block.
//!
//! Replaces the historical regex extraction with a cursor scan over the
//! template text: HTML comments are skipped, quoted attribute values cannot
//! leak a `>` into tag-boundary detection, and the marker only matches a
//! real attribute name (never a word inside another attribute's value).

use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::Span;

/// Classification of an extracted script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Plain script: subject to mount-call rewriting.
    #[default]
    Plain,
    /// Framework-flavored script (`type="jsx"`): embedded verbatim.
    Jsx,
}

impl Dialect {
    /// The synthetic module extension for this dialect.
    pub fn extension(&self) -> &'static str {
        match self {
            Dialect::Plain => "ts",
            Dialect::Jsx => "tsx",
        }
    }
}

/// The embedded script block extracted from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'src> {
    /// The script body, trimmed.
    pub body: &'src str,
    /// Plain or framework-flavored.
    pub dialect: Dialect,
    /// The span of the trimmed body in the template source.
    pub span: Span,
}

/// A single attribute from a script open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute<'src> {
    name: &'src str,
    value: Option<&'src str>,
}

/// Extracts the first marker-tagged script block from template source.
///
/// Returns `None` when no `<script ... editor ...>` tag exists, or when the
/// tag is unterminated. Only the first qualifying tag in document order is
/// considered; later blocks are never inspected.
pub fn extract_script(source: &str) -> Option<ScriptBlock<'_>> {
    let mut pos = 0;

    while let Some(rel) = source[pos..].find('<') {
        let at = pos + rel;
        let rest = &source[at..];

        // Skip HTML comments entirely; a marker word inside a comment must
        // not match.
        if rest.starts_with("<!--") {
            match source[at + 4..].find("-->") {
                Some(end) => {
                    pos = at + 4 + end + 3;
                    continue;
                }
                None => return None,
            }
        }

        if !is_script_open_tag(rest) {
            pos = at + 1;
            continue;
        }

        let attrs_start = at + "<script".len();
        let Some(gt) = find_tag_end(&source[attrs_start..]) else {
            // Unterminated open tag: treated as "no script found".
            return None;
        };

        let region = &source[attrs_start..attrs_start + gt];
        let attributes = parse_attributes(region);

        if !has_marker(&attributes) {
            pos = attrs_start + gt + 1;
            continue;
        }

        let body_start = attrs_start + gt + 1;
        let close = find_ignore_ascii_case(source, "</script", body_start)?;
        let raw = &source[body_start..close];
        let body = raw.trim();
        let trim_offset = raw.len() - raw.trim_start().len();
        let span_start = (body_start + trim_offset) as u32;

        return Some(ScriptBlock {
            body,
            dialect: dialect_of(&attributes),
            span: Span::new(span_start, span_start + body.len() as u32),
        });
    }

    None
}

/// Returns true if `rest` begins a `<script` open tag (case-insensitive),
/// with the tag name properly delimited.
fn is_script_open_tag(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    if bytes.len() < 8 || !bytes[..7].eq_ignore_ascii_case(b"<script") {
        return false;
    }
    matches!(bytes[7], b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/')
}

/// Finds the `>` closing the attribute region, honoring quoted values.
fn find_tag_end(attrs: &str) -> Option<usize> {
    let mut in_string = false;
    let mut string_char = ' ';

    for (i, ch) in attrs.char_indices() {
        if in_string {
            if ch == string_char {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                in_string = true;
                string_char = ch;
            }
            '>' => return Some(i),
            _ => {}
        }
    }

    None
}

/// Parses the attribute region into name/value pairs.
///
/// Grammar per attribute: `Ident (= value)?` where a value is a quoted or
/// unquoted token. Anything unexpected is skipped, never fatal.
fn parse_attributes(region: &str) -> Vec<Attribute<'_>> {
    let tokens: Vec<Token> = Lexer::new(region)
        .filter(|t| t.kind != TokenKind::Eof)
        .collect();

    let mut attributes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i].kind != TokenKind::Ident {
            i += 1;
            continue;
        }

        let name = token_text(region, &tokens[i]);
        let mut value = None;

        if tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Eq) {
            if let Some(value_token) = tokens.get(i + 2) {
                match value_token.kind {
                    TokenKind::DoubleQuoted | TokenKind::SingleQuoted => {
                        value = Some(unquote(token_text(region, value_token)));
                        i += 3;
                    }
                    TokenKind::Ident | TokenKind::Bare => {
                        value = Some(token_text(region, value_token));
                        i += 3;
                    }
                    _ => {
                        // `name=` with nothing usable after it.
                        i += 2;
                    }
                }
            } else {
                i += 2;
            }
        } else {
            i += 1;
        }

        attributes.push(Attribute { name, value });
    }

    attributes
}

fn token_text<'src>(region: &'src str, token: &Token) -> &'src str {
    let start: usize = token.span.start.into();
    let end: usize = token.span.end.into();
    &region[start..end]
}

fn unquote(text: &str) -> &str {
    if text.len() >= 2 && (text.starts_with('"') || text.starts_with('\'')) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

fn has_marker(attributes: &[Attribute<'_>]) -> bool {
    attributes
        .iter()
        .any(|a| a.name.eq_ignore_ascii_case("editor"))
}

fn dialect_of(attributes: &[Attribute<'_>]) -> Dialect {
    let is_jsx = attributes
        .iter()
        .any(|a| a.name.eq_ignore_ascii_case("type") && a.value == Some("jsx"));

    if is_jsx {
        Dialect::Jsx
    } else {
        Dialect::Plain
    }
}

/// Case-insensitive substring search starting at `from`. The needle must be
/// ASCII, which keeps every returned offset on a char boundary.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();

    if from > h.len() || h.len() - from < n.len() {
        return None;
    }

    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

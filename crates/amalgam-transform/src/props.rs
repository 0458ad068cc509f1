//! Property-list extraction from a `props : { ... }` declaration block.
//!
//! Supported patterns:
//! - `props: { id: number, label?: string }`
//! - `props: { id, title? }` (shorthand, no type annotations)
//! - `const props: { user: { name: string } } = ...` (nested annotations)
//! - quoted names: `props: { "data-id": string }`
//!
//! The brace is matched with a nesting- and string-aware scan, so nested
//! object or array annotations never truncate the block. Only top-level
//! entries are collected; duplicates are kept; source order is preserved.

use smol_str::SmolStr;

/// Extracts declared property names from a script's `props` block.
///
/// Returns an empty list when no `props : { ... }` declaration is found.
pub fn extract_prop_names(script: &str) -> Vec<SmolStr> {
    match find_props_block(script) {
        Some(content) => parse_properties(content),
        None => Vec::new(),
    }
}

/// Locates the first `props` identifier followed by `:` and `{`, and
/// returns the brace-matched content between the braces.
fn find_props_block(script: &str) -> Option<&str> {
    let mut search = 0;

    while let Some(rel) = script[search..].find("props") {
        let at = search + rel;
        search = at + "props".len();

        // `props` must be a whole word, not a suffix of another identifier.
        let preceded_by_ident = script[..at].chars().next_back().is_some_and(is_ident_char);
        if preceded_by_ident {
            continue;
        }

        let after = script[at + "props".len()..].trim_start();
        let Some(after_colon) = after.strip_prefix(':') else {
            continue;
        };
        let Some(brace_rest) = after_colon.trim_start().strip_prefix('{') else {
            continue;
        };

        if let Some((content, _)) = find_matching_brace(brace_rest) {
            return Some(content);
        }
    }

    None
}

/// Find matching brace and return content and closing index.
fn find_matching_brace(s: &str) -> Option<(&str, usize)> {
    let mut depth = 1;
    let mut in_string = false;
    let mut string_char = ' ';

    for (i, ch) in s.char_indices() {
        if !in_string && (ch == '"' || ch == '\'' || ch == '`') {
            in_string = true;
            string_char = ch;
            continue;
        }
        if in_string {
            if ch == string_char {
                in_string = false;
            }
            continue;
        }

        if ch == '{' {
            depth += 1;
        } else if ch == '}' {
            depth -= 1;
            if depth == 0 {
                return Some((&s[..i], i));
            }
        }
    }

    None
}

/// Splits the block content on top-level commas and parses each entry.
fn parse_properties(content: &str) -> Vec<SmolStr> {
    let mut properties = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut string_char = ' ';

    for ch in content.chars() {
        // Handle strings
        if !in_string && (ch == '"' || ch == '\'' || ch == '`') {
            in_string = true;
            string_char = ch;
            current.push(ch);
            continue;
        }
        if in_string {
            current.push(ch);
            if ch == string_char {
                in_string = false;
            }
            continue;
        }

        // Track nesting
        if ch == '(' || ch == '{' || ch == '[' {
            depth += 1;
            current.push(ch);
            continue;
        }
        if ch == ')' || ch == '}' || ch == ']' {
            depth -= 1;
            current.push(ch);
            continue;
        }

        // Property separator
        if ch == ',' && depth == 0 {
            if let Some(name) = parse_single_property(&current) {
                properties.push(name);
            }
            current.clear();
            continue;
        }

        current.push(ch);
    }

    // Don't forget the last property
    if let Some(name) = parse_single_property(&current) {
        properties.push(name);
    }

    properties
}

/// Parses one block entry: a bare or quoted identifier, an optional `?`,
/// then either nothing or a `:` annotation. Anything else is skipped.
fn parse_single_property(entry: &str) -> Option<SmolStr> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (name, rest) = if let Some(quote) = trimmed.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let inner = &trimmed[1..];
        let close = inner.find(quote)?;
        (&inner[..close], &inner[close + 1..])
    } else {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());
        (&trimmed[..end], &trimmed[end..])
    };

    if name.is_empty() || !is_identifier(name) {
        return None;
    }

    let rest = rest.trim_start();
    let rest = rest.strip_prefix('?').unwrap_or(rest).trim_start();

    if rest.is_empty() || rest.starts_with(':') {
        Some(SmolStr::new(name))
    } else {
        None
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_char)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

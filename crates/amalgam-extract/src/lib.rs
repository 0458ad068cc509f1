//! Script block extraction for Amalgam Blade templates.
//!
//! A Blade template may embed one client-side script block marked with the
//! `editor` attribute:
//!
//! ```text
//! <script editor>mount(props)</script>
//! <script editor type="jsx">/* framework-flavored */</script>
//! ```
//!
//! This crate locates the first such block with a tokenizing scan (no
//! regular expressions), classifies its dialect, and returns the body text.
//!
//! # Example
//!
//! ```
//! use amalgam_extract::{extract_script, Dialect};
//!
//! let source = r#"
//! <div>markup</div>
//! <script editor>mount(props)</script>
//! "#;
//!
//! let block = extract_script(source).unwrap();
//! assert_eq!(block.body, "mount(props)");
//! assert_eq!(block.dialect, Dialect::Plain);
//! ```

mod extract;
mod lexer;
mod span;

pub use extract::{extract_script, Dialect, ScriptBlock};
pub use lexer::{Lexer, Token, TokenKind};
pub use span::Span;

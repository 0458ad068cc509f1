//! Template-to-module transformation for Amalgam.
//!
//! Given a script block extracted from a Blade template, this crate derives
//! the dotted component name, scans the declared property list, rewrites the
//! bare `mount(` call into one carrying the component name and its props,
//! and generates the source text of every synthetic module the plugin
//! serves (per-file, aggregate, template shim).
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use amalgam_transform::{component_name, extract_prop_names, rewrite_mount};
//!
//! let name = component_name(
//!     Utf8Path::new("resources/views"),
//!     Utf8Path::new("resources/views/widgets/card.blade.php"),
//! );
//! assert_eq!(name, "widgets.card");
//!
//! let script = "const props: { id: number, title?: string } = data;\nmount(props)";
//! let props = extract_prop_names(script);
//! let rewritten = rewrite_mount(script, &name, &props);
//! assert!(rewritten.contains(r#"mount("widgets.card", ["id","title"], props)"#));
//! ```

mod codegen;
mod mount;
mod name;
mod props;

pub use codegen::{
    empty_module, generate_aggregate, generate_jsx_module, generate_plain_module,
    generate_template_shim, AGGREGATE_PLACEHOLDER,
};
pub use mount::rewrite_mount;
pub use name::{component_name, TEMPLATE_SUFFIX};
pub use props::extract_prop_names;

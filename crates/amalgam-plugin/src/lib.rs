//! Virtual module router and dev-mode adapter for Amalgam templates.
//!
//! The host bundler calls into [`AmalgamPlugin`] at its lifecycle points
//! (resolve/load/transform/build-start); the plugin maps three kinds of
//! synthetic module ids to generated source text:
//!
//! - the aggregate entry module (`virtual:amalgam`) importing every
//!   derived-script module,
//! - per-template derived-script modules (`<path>.ts?amalgam` /
//!   `<path>.tsx?amalgam`),
//! - the runtime package alias (`amalgam`), resolved to the plain or
//!   framework-flavored runtime file on disk.
//!
//! In dev mode the [`watch`] adapter invalidates the synthetic modules when
//! the underlying template files change.
//!
//! No lifecycle hook ever fails the host build: every error path degrades
//! to an empty module, unchanged content, or a skipped file.

mod discover;
mod error;
mod host;
mod ids;
mod router;
mod watch;

pub use discover::discover_templates;
pub use error::PluginError;
pub use host::DevServer;
pub use ids::{
    candidate_module_ids, derived_module_id, is_script_request, template_path_of, AGGREGATE_ID,
    QUERY_MARKER, RESOLVED_AGGREGATE_ID, RUNTIME_ALIAS,
};
pub use router::{AmalgamPlugin, PluginOptions};
pub use watch::watch;

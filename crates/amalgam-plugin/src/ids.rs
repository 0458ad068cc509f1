//! Synthetic module id scheme.
//!
//! Three reserved ids plus the per-template derived form
//! `<views-relative-path>.<ts|tsx>?amalgam`. All ids are ASCII and
//! case-sensitive.

use amalgam_extract::Dialect;
use amalgam_transform::TEMPLATE_SUFFIX;
use camino::{Utf8Path, Utf8PathBuf};

/// The importable aggregate entry module id.
pub const AGGREGATE_ID: &str = "virtual:amalgam";

/// The resolved (reserved, non-importable) aggregate id.
pub const RESOLVED_AGGREGATE_ID: &str = "\0virtual:amalgam";

/// The runtime package alias id.
pub const RUNTIME_ALIAS: &str = "amalgam";

/// The query marker identifying per-template derived-script requests.
pub const QUERY_MARKER: &str = "?amalgam";

/// Returns true if `id` is a per-template derived-script request.
pub fn is_script_request(id: &str) -> bool {
    id.contains(QUERY_MARKER)
}

/// Builds the derived-script id for a views-relative template path.
pub fn derived_module_id(relative: &Utf8Path, dialect: Dialect) -> String {
    let clean = clean_path(relative);
    format!("{}.{}{}", clean, dialect.extension(), QUERY_MARKER)
}

/// Both candidate derived ids for a views-relative template path. The
/// dialect of a changed file is unknown at invalidation time, so both
/// synthetic extensions are tried.
pub fn candidate_module_ids(relative: &Utf8Path) -> [String; 2] {
    [
        derived_module_id(relative, Dialect::Plain),
        derived_module_id(relative, Dialect::Jsx),
    ]
}

/// Recovers the views-relative template path from a derived-script id.
///
/// Strips the query marker and the synthetic extension, then restores the
/// template suffix. Returns `None` for ids that do not carry the marker or
/// a recognized extension.
pub fn template_path_of(id: &str) -> Option<Utf8PathBuf> {
    let (path, _) = id.split_once('?')?;
    let clean = path
        .strip_suffix(".ts")
        .or_else(|| path.strip_suffix(".tsx"))?;

    Some(Utf8PathBuf::from(format!(
        "{}{}",
        clean.trim_start_matches('/'),
        TEMPLATE_SUFFIX
    )))
}

fn clean_path(relative: &Utf8Path) -> &str {
    let text = relative.as_str();
    text.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(text)
}

//! Component name derivation from template file paths.

use camino::Utf8Path;

/// The file suffix identifying a Blade template.
pub const TEMPLATE_SUFFIX: &str = ".blade.php";

/// Derives the dotted logical component name for a template.
///
/// Strips the views-root prefix and the `.blade.php` suffix, then joins the
/// remaining path segments with `.`. Purely a function of `(root, path)`:
/// distinct relative paths under the same root always produce distinct
/// names.
pub fn component_name(views_root: &Utf8Path, file: &Utf8Path) -> String {
    let relative = file.strip_prefix(views_root).unwrap_or(file);
    let text = relative.as_str();
    let text = text.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(text);

    text.trim_start_matches('/').replace('/', ".")
}

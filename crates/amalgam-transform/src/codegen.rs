//! Generation of synthetic module source text.

use crate::mount::rewrite_mount;
use crate::props::extract_prop_names;

/// Body of the aggregate module when no template qualifies.
pub const AGGREGATE_PLACEHOLDER: &str = "// No blade script blocks found";

/// Generates the derived module for a plain-dialect script block.
///
/// Scans the body for its property declarations and rewrites the mount
/// call to carry the component name and property list.
pub fn generate_plain_module(body: &str, component: &str) -> String {
    let props = extract_prop_names(body);
    rewrite_mount(body, component, &props)
}

/// Generates the derived module for a framework-flavored script block.
///
/// The body is embedded verbatim after an attribution comment; no mount
/// rewriting or property scanning is applied.
pub fn generate_jsx_module(body: &str, template_path: &str) -> String {
    format!(
        "import {{ mount, AdditionalEditContent }} from 'amalgam';\n\n// React component from {}\n{}",
        template_path, body
    )
}

/// Generates the aggregate module importing every derived-script id.
///
/// With no qualifying templates this returns a harmless placeholder, never
/// an empty string.
pub fn generate_aggregate(module_ids: &[String]) -> String {
    if module_ids.is_empty() {
        return AGGREGATE_PLACEHOLDER.to_string();
    }

    module_ids
        .iter()
        .map(|id| format!("import '{}';", id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generates the one-line shim that replaces a template file's output in
/// the transform phase.
pub fn generate_template_shim(module_id: &str) -> String {
    format!("import '{}';", module_id)
}

/// The empty-exports fallback module.
pub fn empty_module() -> &'static str {
    "export {};"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_module() {
        let body = "const props: { id, title? } = window.__data;\nmount(props)";
        let out = generate_plain_module(body, "widgets.card");
        assert!(out.starts_with("import { mount } from 'amalgam';\n\n"));
        assert!(out.contains("mount(\"widgets.card\", [\"id\",\"title\"], props)"));
    }

    #[test]
    fn test_jsx_module() {
        let out = generate_jsx_module(
            "export default () => <Card />;",
            "resources/views/widgets/card.blade.php",
        );
        assert_eq!(
            out,
            "import { mount, AdditionalEditContent } from 'amalgam';\n\n\
             // React component from resources/views/widgets/card.blade.php\n\
             export default () => <Card />;"
        );
    }

    #[test]
    fn test_jsx_module_keeps_body_verbatim() {
        let body = "const props = { id: 1 };\nmount(props)";
        let out = generate_jsx_module(body, "x.blade.php");
        // No rewriting for jsx: the bare mount call survives as written.
        assert!(out.contains("\nmount(props)"));
        assert!(!out.contains("mount(\""));
    }

    #[test]
    fn test_aggregate() {
        let ids = vec![
            "/widgets/card.ts?amalgam".to_string(),
            "/admin/panel.tsx?amalgam".to_string(),
        ];
        assert_eq!(
            generate_aggregate(&ids),
            "import '/widgets/card.ts?amalgam';\nimport '/admin/panel.tsx?amalgam';"
        );
    }

    #[test]
    fn test_aggregate_placeholder() {
        assert_eq!(generate_aggregate(&[]), AGGREGATE_PLACEHOLDER);
    }

    #[test]
    fn test_template_shim() {
        assert_eq!(
            generate_template_shim("home.ts?amalgam"),
            "import 'home.ts?amalgam';"
        );
    }
}

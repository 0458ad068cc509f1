//! Configuration loading from `amalgam.config.js`.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::Arc;
use swc_common::SourceMap;
use swc_ecma_ast::{
    ExportDefaultExpr, Expr, KeyValueProp, Lit, ModuleDecl, ModuleItem, ObjectLit, Prop, PropName,
    PropOrSpread,
};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};
use tracing::warn;

/// Project configuration from an `amalgam.config.{js,mjs,ts}` file.
///
/// All fields are optional; CLI flags take precedence over file values and
/// unset values fall back to the plugin defaults.
#[derive(Debug, Clone, Default)]
pub struct AmalgamConfig {
    /// Root directory to scan for templates (`viewsPath`).
    pub views_path: Option<Utf8PathBuf>,

    /// Enable dev-mode watch wiring (`watchFiles`).
    pub watch_files: Option<bool>,

    /// Ignore globs applied during discovery (`ignore`).
    pub ignore: Vec<String>,
}

impl AmalgamConfig {
    /// Loads configuration from the project root.
    ///
    /// A missing config file is not an error; a malformed one warns and
    /// falls back to defaults.
    pub fn load(project_root: &Utf8Path) -> Self {
        let config_files = ["amalgam.config.js", "amalgam.config.mjs", "amalgam.config.ts"];

        for config_file in config_files {
            let config_path = project_root.join(config_file);
            if config_path.exists() {
                match Self::parse_config(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("failed to parse {}: {}", config_path, e);
                        return Self::default();
                    }
                }
            }
        }

        Self::default()
    }

    /// Parses a config file's default-exported object using SWC.
    fn parse_config(path: &Utf8Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;

        let cm: Arc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            swc_common::FileName::Custom(path.to_string()).into(),
            content,
        );

        let syntax = if path.as_str().ends_with(".ts") {
            Syntax::Typescript(TsSyntax {
                tsx: false,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: false,
                ..Default::default()
            })
        };

        let module = parse_file_as_module(
            &fm,
            syntax,
            swc_ecma_ast::EsVersion::Es2022,
            None,
            &mut Vec::new(),
        )
        .map_err(|e| format!("Parse error: {:?}", e))?;

        let mut config = AmalgamConfig::default();

        // Find the default export
        for item in &module.body {
            if let ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(ExportDefaultExpr {
                expr,
                ..
            })) = item
            {
                if let Expr::Object(obj) = expr.as_ref() {
                    Self::extract_config_from_object(obj, &mut config);
                }
            }
        }

        Ok(config)
    }

    /// Gets a string value from a PropName.
    fn prop_name_str(key: &PropName) -> Option<&str> {
        match key {
            PropName::Ident(ident) => Some(ident.sym.as_str()),
            PropName::Str(s) => s.value.as_str(),
            _ => None,
        }
    }

    /// Extracts configuration from the exported object literal.
    fn extract_config_from_object(obj: &ObjectLit, config: &mut AmalgamConfig) {
        for prop in &obj.props {
            if let PropOrSpread::Prop(prop) = prop {
                if let Prop::KeyValue(KeyValueProp { key, value }) = prop.as_ref() {
                    let Some(key_name) = Self::prop_name_str(key) else {
                        continue;
                    };

                    match key_name {
                        "viewsPath" => {
                            if let Expr::Lit(Lit::Str(s)) = value.as_ref() {
                                if let Some(text) = s.value.as_str() {
                                    config.views_path = Some(Utf8PathBuf::from(text));
                                }
                            }
                        }
                        "watchFiles" => {
                            if let Expr::Lit(Lit::Bool(b)) = value.as_ref() {
                                config.watch_files = Some(b.value);
                            }
                        }
                        "ignore" => {
                            if let Expr::Array(arr) = value.as_ref() {
                                for elem in arr.elems.iter().flatten() {
                                    if let Expr::Lit(Lit::Str(s)) = elem.expr.as_ref() {
                                        if let Some(pattern) = s.value.as_str() {
                                            config.ignore.push(pattern.to_string());
                                        }
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load_from(source: &str, filename: &str) -> AmalgamConfig {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(filename), source).unwrap();
        AmalgamConfig::load(Utf8Path::from_path(dir.path()).unwrap())
    }

    #[test]
    fn test_missing_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AmalgamConfig::load(Utf8Path::from_path(dir.path()).unwrap());
        assert!(config.views_path.is_none());
        assert!(config.watch_files.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = load_from(
            r#"export default {
                viewsPath: 'templates/pages',
                watchFiles: false,
                ignore: ['drafts/**'],
            }"#,
            "amalgam.config.js",
        );
        assert_eq!(
            config.views_path.as_deref().map(|p| p.as_str()),
            Some("templates/pages")
        );
        assert_eq!(config.watch_files, Some(false));
        assert_eq!(config.ignore, vec!["drafts/**"]);
    }

    #[test]
    fn test_typescript_config() {
        let config = load_from(
            "const fallback: string = 'views';\nexport default { viewsPath: 'views' };",
            "amalgam.config.ts",
        );
        assert_eq!(config.views_path.as_deref().map(|p| p.as_str()), Some("views"));
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let config = load_from("export default {", "amalgam.config.js");
        assert!(config.views_path.is_none());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = load_from(
            "export default { somethingElse: 1, watchFiles: true }",
            "amalgam.config.mjs",
        );
        assert_eq!(config.watch_files, Some(true));
    }
}

//! The virtual module router: resolve, load, transform, build-start.

use std::fs;

use amalgam_extract::{extract_script, Dialect};
use amalgam_transform::{
    component_name, empty_module, generate_aggregate, generate_jsx_module, generate_plain_module,
    generate_template_shim, TEMPLATE_SUFFIX,
};
use camino::{Utf8Path, Utf8PathBuf};
use globset::GlobSet;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::discover::{build_ignore_set, discover_templates};
use crate::error::PluginError;
use crate::host::DevServer;
use crate::ids::{
    candidate_module_ids, derived_module_id, is_script_request, template_path_of, AGGREGATE_ID,
    RESOLVED_AGGREGATE_ID, RUNTIME_ALIAS,
};

/// Plugin construction options.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    /// Root directory to scan for templates, relative to the project root.
    pub views_path: Utf8PathBuf,
    /// Enable dev-mode file watching and reload wiring.
    pub watch_files: bool,
    /// Directory holding the runtime implementation files, relative to the
    /// project root.
    pub runtime_dir: Utf8PathBuf,
    /// Extra ignore globs applied during discovery.
    pub ignore: Vec<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            views_path: Utf8PathBuf::from("resources/views"),
            watch_files: true,
            runtime_dir: Utf8PathBuf::from("vendor/dakin/amalgam/js"),
            ignore: Vec::new(),
        }
    }
}

/// The Amalgam plugin: one instance per host session.
///
/// All state is computed at construction (spec'd options, the jsx
/// feature-detection flag, the ignore set); hooks take `&self` and hold no
/// hidden module-level state.
pub struct AmalgamPlugin {
    root: Utf8PathBuf,
    views_root: Utf8PathBuf,
    options: PluginOptions,
    ignore_set: GlobSet,
    has_jsx: bool,
}

impl AmalgamPlugin {
    /// Constructs the plugin for a project root.
    ///
    /// Scans every discovered template once to decide whether any declares
    /// a framework-flavored script; the flag selects the runtime alias
    /// implementation for the whole session.
    pub fn new(root: impl Into<Utf8PathBuf>, options: PluginOptions) -> Result<Self, PluginError> {
        let root = root.into();
        let ignore_set = build_ignore_set(&options.ignore)?;

        let views_root = if options.views_path.is_absolute() {
            options.views_path.clone()
        } else {
            root.join(&options.views_path)
        };

        let files = discover_templates(&views_root, &ignore_set);
        let has_jsx = files.par_iter().any(|file| {
            // Read errors are ignored during detection; the load phase
            // reports them per file.
            fs::read_to_string(file)
                .ok()
                .and_then(|content| extract_script(&content).map(|b| b.dialect))
                == Some(Dialect::Jsx)
        });

        if has_jsx {
            info!("framework-flavored scripts detected; serving the jsx runtime");
        }

        Ok(Self {
            root,
            views_root,
            options,
            ignore_set,
            has_jsx,
        })
    }

    /// The plugin name reported to the host.
    pub fn name(&self) -> &'static str {
        "amalgam"
    }

    /// Whether any discovered template declared a framework-flavored script.
    pub fn has_jsx(&self) -> bool {
        self.has_jsx
    }

    /// The resolved views root directory.
    pub fn views_root(&self) -> &Utf8Path {
        &self.views_root
    }

    /// Whether dev-mode watch wiring is enabled.
    pub fn watch_files(&self) -> bool {
        self.options.watch_files
    }

    /// Enumerates the current template set.
    pub fn discover(&self) -> Vec<Utf8PathBuf> {
        discover_templates(&self.views_root, &self.ignore_set)
    }

    /// Resolve phase: decides what a requested module id refers to.
    ///
    /// Ids this router does not own resolve to `None` and defer to the
    /// host's default resolution.
    pub fn resolve_id(&self, id: &str) -> Option<String> {
        if id == AGGREGATE_ID {
            return Some(RESOLVED_AGGREGATE_ID.to_string());
        }

        if id == RUNTIME_ALIAS {
            let file = if self.has_jsx {
                "amalgam.jsx"
            } else {
                "amalgam.js"
            };
            return Some(self.root.join(&self.options.runtime_dir).join(file).into());
        }

        if is_script_request(id) {
            // Handled in the load phase.
            return Some(id.to_string());
        }

        None
    }

    /// Load phase: produces module source text for a resolved id.
    pub fn load(&self, id: &str) -> Option<String> {
        if id == RESOLVED_AGGREGATE_ID {
            return Some(self.load_aggregate());
        }

        if is_script_request(id) {
            return Some(self.load_script(id));
        }

        None
    }

    fn load_aggregate(&self) -> String {
        let mut module_ids = Vec::new();

        for file in self.discover() {
            let content = match fs::read_to_string(&file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("error processing {}: {}", file, e);
                    continue;
                }
            };

            if let Some(block) = extract_script(&content) {
                if block.dialect == Dialect::Jsx {
                    debug!("framework-flavored script found in {}", file);
                }
                let relative = file.strip_prefix(&self.views_root).unwrap_or(&file);
                module_ids.push(derived_module_id(relative, block.dialect));
            }
        }

        generate_aggregate(&module_ids)
    }

    fn load_script(&self, id: &str) -> String {
        let Some(relative) = template_path_of(id) else {
            warn!("unrecognized script request id {}", id);
            return empty_module().to_string();
        };

        let full = self.views_root.join(&relative);
        let content = match fs::read_to_string(&full) {
            Ok(content) => content,
            Err(e) => {
                error!("error loading blade script {}: {}", full, e);
                return empty_module().to_string();
            }
        };

        // The file may have changed on disk since discovery.
        let Some(block) = extract_script(&content) else {
            warn!("no script block found in {}", full);
            return empty_module().to_string();
        };

        match block.dialect {
            Dialect::Plain => {
                let component = component_name(&self.views_root, &full);
                generate_plain_module(block.body, &component)
            }
            Dialect::Jsx => {
                let attribution = self.options.views_path.join(&relative);
                generate_jsx_module(block.body, attribution.as_str())
            }
        }
    }

    /// Transform phase: replaces a template file's output with the one-line
    /// import of its derived-script module.
    ///
    /// Only ids without the query marker are considered, so derived-script
    /// modules are never processed twice. Content is re-read from disk, as
    /// the host hands templates through earlier transforms untouched.
    pub fn transform(&self, _code: &str, id: &str) -> Option<String> {
        if !id.ends_with(TEMPLATE_SUFFIX) || is_script_request(id) {
            return None;
        }

        let path = Utf8Path::new(id);
        let full = if path.is_absolute() {
            path.to_owned()
        } else {
            self.root.join(path)
        };

        let content = match fs::read_to_string(&full) {
            Ok(content) => content,
            Err(e) => {
                warn!("error transforming blade file {}: {}", full, e);
                return None;
            }
        };

        let block = extract_script(&content)?;
        let relative = full.strip_prefix(&self.views_root).unwrap_or(&full);
        Some(generate_template_shim(&derived_module_id(
            relative,
            block.dialect,
        )))
    }

    /// Build-start hook: registers every template with a qualifying script
    /// block as a watch file.
    pub fn build_start(&self, server: &dyn DevServer) {
        for file in self.discover() {
            match fs::read_to_string(&file) {
                Ok(content) => {
                    if extract_script(&content).is_some() {
                        server.add_watch_file(&file);
                    }
                }
                Err(e) => warn!("error processing {}: {}", file, e),
            }
        }
    }

    /// Change handler for a created, modified or deleted template file.
    ///
    /// Invalidates the aggregate module and the first loaded candidate
    /// per-file module, then always requests a full reload: coarse
    /// invalidation is preferred over precise hot-module patching.
    pub fn handle_file_change(&self, path: &Utf8Path, server: &dyn DevServer) {
        if !path.as_str().ends_with(TEMPLATE_SUFFIX) {
            return;
        }

        server.invalidate_module(RESOLVED_AGGREGATE_ID);

        let relative = path.strip_prefix(&self.views_root).unwrap_or(path);
        for id in candidate_module_ids(relative) {
            if server.invalidate_module(&id) {
                break;
            }
        }

        server.full_reload();
    }
}

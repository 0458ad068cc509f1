//! One-shot module emission and the watch-mode dev-server shim.

use std::collections::HashSet;
use std::fs;
use std::sync::Mutex;

use amalgam_extract::extract_script;
use amalgam_plugin::{
    derived_module_id, template_path_of, AmalgamPlugin, DevServer, RESOLVED_AGGREGATE_ID,
};
use amalgam_transform::generate_template_shim;
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name for the emitted aggregate module (the reserved id itself is
/// not a valid file name).
const AGGREGATE_FILE: &str = "virtual-amalgam.ts";

/// Emission errors.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Failed to write a generated file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Result of a one-shot emission pass.
#[derive(Debug)]
pub struct EmitSummary {
    /// Templates discovered under the views root.
    pub template_count: usize,
    /// Derived modules written (excluding the aggregate).
    pub module_count: usize,
}

impl EmitSummary {
    /// Formats the summary line.
    pub fn format(&self, out_dir: &Utf8Path) -> String {
        format!(
            "{} templates scanned, {} modules written to {}",
            self.template_count, self.module_count, out_dir
        )
    }
}

/// Generates the aggregate, every per-file derived module, and the
/// template shims into `out_dir`.
///
/// Per-file failures are logged and skipped; only output-directory write
/// failures abort the pass.
pub fn run_once(
    plugin: &AmalgamPlugin,
    out_dir: &Utf8Path,
    emit_stdout: bool,
) -> Result<EmitSummary, EmitError> {
    let files = plugin.discover();

    // Generate in parallel, write sequentially.
    let generated: Vec<(String, String)> = files
        .par_iter()
        .filter_map(|file| {
            let content = match fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("error processing {}: {}", file, e);
                    return None;
                }
            };
            let block = extract_script(&content)?;
            let relative = file.strip_prefix(plugin.views_root()).unwrap_or(file);
            let id = derived_module_id(relative, block.dialect);
            let code = plugin.load(&id)?;
            Some((id, code))
        })
        .collect();

    for (id, code) in &generated {
        let path = module_file_path(out_dir, id);
        write_module(&path, code)?;
        write_module(
            &out_dir.join("shims").join(shim_file_name(id)),
            &generate_template_shim(id),
        )?;

        if emit_stdout {
            println!("=== {} ===\n{}\n", id, code);
        }
    }

    let aggregate = plugin
        .load(RESOLVED_AGGREGATE_ID)
        .unwrap_or_default();
    write_module(&out_dir.join(AGGREGATE_FILE), &aggregate)?;

    if emit_stdout {
        println!("=== {} ===\n{}\n", AGGREGATE_FILE, aggregate);
    }

    Ok(EmitSummary {
        template_count: files.len(),
        module_count: generated.len(),
    })
}

/// Maps a derived module id to its on-disk output path.
fn module_file_path(out_dir: &Utf8Path, id: &str) -> Utf8PathBuf {
    let clean = id.split('?').next().unwrap_or(id);
    out_dir.join(clean)
}

/// The shim file mirrors the derived module path, flat under `shims/`.
fn shim_file_name(id: &str) -> String {
    let clean = id.split('?').next().unwrap_or(id);
    clean.replace('/', "__")
}

fn write_module(path: &Utf8Path, code: &str) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| EmitError::Write {
            path: path.to_owned(),
            source,
        })?;
    }
    fs::write(path, code).map_err(|source| EmitError::Write {
        path: path.to_owned(),
        source,
    })
}

/// Dev-server shim for CLI watch mode.
///
/// Invalidations regenerate the corresponding output file; the full-reload
/// fallback is logged only, there being no connected client.
pub struct EmitServer<'a> {
    plugin: &'a AmalgamPlugin,
    out_dir: Utf8PathBuf,
    emitted: Mutex<HashSet<String>>,
}

impl<'a> EmitServer<'a> {
    /// Creates the shim over an already-emitted output directory.
    pub fn new(plugin: &'a AmalgamPlugin, out_dir: Utf8PathBuf, emitted: Vec<String>) -> Self {
        Self {
            plugin,
            out_dir,
            emitted: Mutex::new(emitted.into_iter().collect()),
        }
    }
}

impl DevServer for EmitServer<'_> {
    fn add_watch_file(&self, path: &Utf8Path) {
        debug!("watching {}", path);
    }

    fn invalidate_module(&self, id: &str) -> bool {
        if id == RESOLVED_AGGREGATE_ID {
            if let Some(code) = self.plugin.load(id) {
                if let Err(e) = write_module(&self.out_dir.join(AGGREGATE_FILE), &code) {
                    warn!("{}", e);
                }
            }
            return true;
        }

        // Regenerate the per-file module; a template deleted on disk
        // degrades to the empty-exports placeholder.
        if template_path_of(id).is_some() {
            if let Some(code) = self.plugin.load(id) {
                let path = module_file_path(&self.out_dir, id);
                if let Err(e) = write_module(&path, &code) {
                    warn!("{}", e);
                } else {
                    info!("regenerated {}", id);
                    self.emitted.lock().unwrap().insert(id.to_string());
                }
            }
        }

        self.emitted.lock().unwrap().contains(id)
    }

    fn full_reload(&self) {
        info!("full reload requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amalgam_plugin::PluginOptions;
    use pretty_assertions::assert_eq;

    fn fixture() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let views = root.join("resources/views/widgets");
        fs::create_dir_all(&views).unwrap();
        fs::write(
            views.join("card.blade.php"),
            "<script editor>const props: { id } = x;\nmount(props)</script>",
        )
        .unwrap();
        (dir, root)
    }

    #[test]
    fn test_run_once_writes_modules() {
        let (_dir, root) = fixture();
        let plugin = AmalgamPlugin::new(root.clone(), PluginOptions::default()).unwrap();
        let out_dir = root.join(".amalgam");

        let summary = run_once(&plugin, &out_dir, false).unwrap();
        assert_eq!(summary.template_count, 1);
        assert_eq!(summary.module_count, 1);

        let module = fs::read_to_string(out_dir.join("widgets/card.ts")).unwrap();
        assert!(module.contains(r#"mount("widgets.card", ["id"], props)"#));

        let aggregate = fs::read_to_string(out_dir.join(AGGREGATE_FILE)).unwrap();
        assert_eq!(aggregate, "import 'widgets/card.ts?amalgam';");

        let shim = fs::read_to_string(out_dir.join("shims/widgets__card.ts")).unwrap();
        assert_eq!(shim, "import 'widgets/card.ts?amalgam';");
    }

    #[test]
    fn test_empty_project_writes_placeholder_aggregate() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let plugin = AmalgamPlugin::new(root.clone(), PluginOptions::default()).unwrap();
        let out_dir = root.join(".amalgam");

        let summary = run_once(&plugin, &out_dir, false).unwrap();
        assert_eq!(summary.module_count, 0);

        let aggregate = fs::read_to_string(out_dir.join(AGGREGATE_FILE)).unwrap();
        assert_eq!(aggregate, "// No blade script blocks found");
    }

    #[test]
    fn test_emit_server_regenerates_on_invalidation() {
        let (_dir, root) = fixture();
        let plugin = AmalgamPlugin::new(root.clone(), PluginOptions::default()).unwrap();
        let out_dir = root.join(".amalgam");
        run_once(&plugin, &out_dir, false).unwrap();

        let server = EmitServer::new(
            &plugin,
            out_dir.clone(),
            vec!["widgets/card.ts?amalgam".to_string()],
        );

        // Update the template, then invalidate as the watcher would.
        fs::write(
            root.join("resources/views/widgets/card.blade.php"),
            "<script editor>const props: { id, label } = x;\nmount(props)</script>",
        )
        .unwrap();

        assert!(server.invalidate_module("widgets/card.ts?amalgam"));
        let module = fs::read_to_string(out_dir.join("widgets/card.ts")).unwrap();
        assert!(module.contains(r#"mount("widgets.card", ["id","label"], props)"#));
    }
}

//! Integration tests for the change-notification flow.
//!
//! The handler is driven directly with a recording dev-server double; the
//! notify wiring itself is host/OS plumbing and stays untested here.

use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use amalgam_plugin::{AmalgamPlugin, DevServer, PluginOptions, RESOLVED_AGGREGATE_ID};
use camino::{Utf8Path, Utf8PathBuf};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct RecordingServer {
    loaded: Mutex<HashSet<String>>,
    invalidated: Mutex<Vec<String>>,
    reloads: AtomicUsize,
}

impl RecordingServer {
    fn with_loaded(ids: &[&str]) -> Self {
        let server = Self::default();
        let mut loaded = server.loaded.lock().unwrap();
        for id in ids {
            loaded.insert(id.to_string());
        }
        drop(loaded);
        server
    }

    fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }

    fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl DevServer for RecordingServer {
    fn add_watch_file(&self, _path: &Utf8Path) {}

    fn invalidate_module(&self, id: &str) -> bool {
        self.invalidated.lock().unwrap().push(id.to_string());
        self.loaded.lock().unwrap().contains(id)
    }

    fn full_reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

fn plugin_with_card() -> (tempfile::TempDir, AmalgamPlugin) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
    let card = root.join("resources/views/widgets/card.blade.php");
    fs::create_dir_all(card.parent().unwrap()).unwrap();
    fs::write(&card, "<script editor>mount(props)</script>").unwrap();

    let plugin = AmalgamPlugin::new(root, PluginOptions::default()).unwrap();
    (dir, plugin)
}

#[test]
fn deleted_file_still_issues_full_reload() {
    let (_dir, plugin) = plugin_with_card();
    let server = RecordingServer::default();

    // Nothing is loaded: both candidates are tried, neither hits, and the
    // coarse fallback still fires.
    let path = plugin.views_root().join("widgets/card.blade.php");
    plugin.handle_file_change(&path, &server);

    assert_eq!(
        server.invalidated(),
        vec![
            RESOLVED_AGGREGATE_ID.to_string(),
            "widgets/card.ts?amalgam".to_string(),
            "widgets/card.tsx?amalgam".to_string(),
        ]
    );
    assert_eq!(server.reloads(), 1);
}

#[test]
fn loaded_module_stops_candidate_probing() {
    let (_dir, plugin) = plugin_with_card();
    let server = RecordingServer::with_loaded(&["widgets/card.ts?amalgam"]);

    let path = plugin.views_root().join("widgets/card.blade.php");
    plugin.handle_file_change(&path, &server);

    // The .tsx candidate is never probed once the .ts module hits.
    assert_eq!(
        server.invalidated(),
        vec![
            RESOLVED_AGGREGATE_ID.to_string(),
            "widgets/card.ts?amalgam".to_string(),
        ]
    );
    assert_eq!(server.reloads(), 1);
}

#[test]
fn non_template_paths_are_ignored() {
    let (_dir, plugin) = plugin_with_card();
    let server = RecordingServer::default();

    let path = plugin.views_root().join("styles/app.css");
    plugin.handle_file_change(&path, &server);

    assert!(server.invalidated().is_empty());
    assert_eq!(server.reloads(), 0);
}

#[test]
fn each_change_reloads_once() {
    let (_dir, plugin) = plugin_with_card();
    let server = RecordingServer::with_loaded(&["widgets/card.tsx?amalgam"]);

    let path = plugin.views_root().join("widgets/card.blade.php");
    plugin.handle_file_change(&path, &server);
    plugin.handle_file_change(&path, &server);

    assert_eq!(server.reloads(), 2);
}

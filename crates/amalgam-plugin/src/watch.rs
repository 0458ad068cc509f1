//! Dev-mode change notification.
//!
//! Watches the views root recursively and funnels template file events into
//! [`AmalgamPlugin::handle_file_change`]. Events arrive on a tokio channel
//! fed from the notify callback thread.

use std::time::Duration;

use amalgam_transform::TEMPLATE_SUFFIX;
use camino::Utf8PathBuf;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::error::PluginError;
use crate::host::DevServer;
use crate::router::AmalgamPlugin;

/// Runs the change-notification loop until the watcher fails.
///
/// Registers the current template set as watch files, then invalidates and
/// reloads on every create/modify/delete of a template under the views
/// root. Returns only on watcher failure; the host's process lifecycle
/// bounds the loop otherwise.
pub async fn watch(plugin: &AmalgamPlugin, server: &dyn DevServer) -> Result<(), PluginError> {
    for file in plugin.discover() {
        server.add_watch_file(&file);
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| PluginError::WatchFailed(e.to_string()))?;

    watcher
        .watch(plugin.views_root().as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| PluginError::WatchFailed(e.to_string()))?;

    while let Some(event) = rx.recv().await {
        for path in &event.paths {
            let Ok(path) = Utf8PathBuf::try_from(path.clone()) else {
                continue;
            };
            if path.as_str().ends_with(TEMPLATE_SUFFIX) {
                debug!("template changed: {}", path);
                plugin.handle_file_change(&path, server);
            }
        }
    }

    Err(PluginError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

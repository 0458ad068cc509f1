//! Plugin setup errors.
//!
//! Only construction and watch wiring can fail; lifecycle hooks degrade
//! instead of erroring.

use thiserror::Error;

/// Errors raised while setting up the plugin or its watcher.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Invalid ignore glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

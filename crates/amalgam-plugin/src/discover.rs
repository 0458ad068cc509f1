//! Recursive template discovery under the views root.

use amalgam_transform::TEMPLATE_SUFFIX;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::PluginError;

/// Default ignore globs, always applied.
const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/vendor/**"];

/// Builds the ignore glob set from user patterns plus the defaults.
pub(crate) fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, PluginError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| PluginError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }

    for pattern in DEFAULT_IGNORES {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }

    builder
        .build()
        .map_err(|e| PluginError::InvalidGlob(e.to_string()))
}

/// Enumerates all template files under the views root.
///
/// Best-effort, never-fail walk: a missing root yields an empty set,
/// unreadable entries are skipped with a warning.
pub fn discover_templates(views_root: &Utf8Path, ignore: &GlobSet) -> Vec<Utf8PathBuf> {
    if !views_root.exists() {
        return Vec::new();
    }

    WalkDir::new(views_root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("cannot read directory entry under {}: {}", views_root, e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| p.file_name().unwrap_or("").ends_with(TEMPLATE_SUFFIX))
        .filter(|p| {
            let relative = p.strip_prefix(views_root).unwrap_or(p);
            !ignore.is_match(relative.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &std::path::Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_root_is_empty() {
        let ignore = build_ignore_set(&[]).unwrap();
        let files = discover_templates(Utf8Path::new("/nonexistent/views"), &ignore);
        assert!(files.is_empty());
    }

    #[test]
    fn test_recursive_discovery() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "home.blade.php", "");
        write(dir.path(), "widgets/card.blade.php", "");
        write(dir.path(), "widgets/readme.md", "");

        let root = Utf8Path::from_path(dir.path()).unwrap();
        let ignore = build_ignore_set(&[]).unwrap();
        let mut files = discover_templates(root, &ignore);
        files.sort();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().as_str())
            .collect();
        assert_eq!(names, vec!["home.blade.php", "widgets/card.blade.php"]);
    }

    #[test]
    fn test_default_ignores() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ok.blade.php", "");
        write(dir.path(), "node_modules/pkg/x.blade.php", "");
        write(dir.path(), "vendor/pkg/y.blade.php", "");

        let root = Utf8Path::from_path(dir.path()).unwrap();
        let ignore = build_ignore_set(&[]).unwrap();
        let files = discover_templates(root, &ignore);
        assert_eq!(files.len(), 1);
        assert!(files[0].as_str().ends_with("ok.blade.php"));
    }

    #[test]
    fn test_user_ignore_globs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "keep.blade.php", "");
        write(dir.path(), "drafts/skip.blade.php", "");

        let root = Utf8Path::from_path(dir.path()).unwrap();
        let ignore = build_ignore_set(&["drafts/**".to_string()]).unwrap();
        let files = discover_templates(root, &ignore);
        assert_eq!(files.len(), 1);
        assert!(files[0].as_str().ends_with("keep.blade.php"));
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        assert!(build_ignore_set(&["[".to_string()]).is_err());
    }
}

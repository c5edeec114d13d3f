//! Source traversal.
//!
//! The whole tree is walked and mapped to destination keys before the store
//! is touched, so a key collision aborts the run without side effects.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use blobmirror_core::DestinationKey;

use crate::error::SyncError;

/// A local file and the key it will be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub key: DestinationKey,
}

/// Walk `source` in file-name order and map every file under `prefix`.
///
/// Regular files and symlinks to regular files are included. Symlinked
/// directories are not descended. An entry that cannot be read is an error
/// when `strict` is set; otherwise it is logged and skipped.
pub fn plan(source: &Path, prefix: &str, strict: bool) -> Result<Vec<PlannedFile>, SyncError> {
    let mut files = Vec::new();
    let mut seen: HashMap<DestinationKey, PathBuf> = HashMap::new();

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if strict => {
                let path = err.path().unwrap_or(source).to_path_buf();
                return Err(SyncError::Walk { path, source: err });
            }
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        let file_type = entry.file_type();
        let is_file = if file_type.is_symlink() {
            entry.path().is_file()
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }

        let path = entry.into_path();
        let key = DestinationKey::new(source, prefix, &path)?;
        if let Some(first) = seen.get(&key) {
            return Err(SyncError::KeyCollision {
                key: key.to_string(),
                first: first.clone(),
                second: path,
            });
        }
        seen.insert(key.clone(), path.clone());
        files.push(PlannedFile { path, key });
    }

    tracing::debug!("planned {} file(s) under {}", files.len(), source.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn keys(files: &[PlannedFile]) -> Vec<&str> {
        files.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn empty_tree_plans_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(plan(tmp.path(), "site", false).unwrap().is_empty());
    }

    #[test]
    fn walks_recursively_in_name_order() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub/deeper")).unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("sub/x.txt"), "x").unwrap();
        fs::write(tmp.path().join("sub/deeper/y.txt"), "y").unwrap();

        let files = plan(tmp.path(), "site", false).unwrap();
        assert_eq!(
            keys(&files),
            vec!["site/a.txt", "site/b.txt", "site/sub/deeper/y.txt", "site/sub/x.txt"]
        );
        assert_eq!(files[0].path, tmp.path().join("a.txt"));
    }

    #[test]
    fn empty_directories_produce_no_keys() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("empty/nested")).unwrap();
        fs::write(tmp.path().join("index.html"), "<html>").unwrap();
        assert_eq!(keys(&plan(tmp.path(), "", false).unwrap()), vec!["index.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn file_symlinks_are_followed_but_dir_symlinks_are_not() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("real.txt"), "r").unwrap();
        fs::create_dir_all(outside.path().join("dir")).unwrap();
        fs::write(outside.path().join("dir/inner.txt"), "i").unwrap();

        symlink(outside.path().join("real.txt"), tmp.path().join("link.txt")).unwrap();
        symlink(outside.path().join("dir"), tmp.path().join("linkdir")).unwrap();

        assert_eq!(keys(&plan(tmp.path(), "site", false).unwrap()), vec!["site/link.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_skipped_unless_strict() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), "h").unwrap();
        fs::write(tmp.path().join("index.html"), "<html>").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory regardless of its mode.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let lenient = plan(tmp.path(), "site", false);
        let strict = plan(tmp.path(), "site", true);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(keys(&lenient.unwrap()), vec!["site/index.html"]);
        let err = strict.unwrap_err();
        assert!(matches!(err, SyncError::Walk { .. }), "got: {err}");
        assert!(err.to_string().contains("locked"), "got: {err}");
    }
}

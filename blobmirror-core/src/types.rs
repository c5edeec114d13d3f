//! Domain types for the mirror.
//!
//! Destination keys are always forward-slash separated, whatever the host
//! platform uses for local paths.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path};

use md5::{Digest, Md5};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// DestinationKey
// ---------------------------------------------------------------------------

/// The identifier of a remote object inside the container.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DestinationKey(String);

impl DestinationKey {
    /// Map `file` (somewhere under `source`) to its key under `prefix`.
    ///
    /// `prefix` is expected to be normalised with [`normalize_prefix`]; any
    /// trailing slashes are ignored when joining.
    pub fn new(source: &Path, prefix: &str, file: &Path) -> Result<Self, CoreError> {
        let relative = file
            .strip_prefix(source)
            .map_err(|_| CoreError::OutsideSource {
                path: file.to_path_buf(),
                root: source.to_path_buf(),
            })?;

        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let relative = segments.join("/");

        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            Ok(Self(relative))
        } else {
            Ok(Self(format!("{prefix}/{relative}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for DestinationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DestinationKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DestinationKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Strip leading slashes from a user-supplied DEST.
pub fn normalize_prefix(dest: &str) -> String {
    dest.trim_start_matches('/').to_owned()
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// MD5 digest of a file's exact bytes. Used for change detection only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        let mut digest = [0u8; 16];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }

    /// Build from a raw digest; `None` unless `bytes` is exactly 16 long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 16]> for Fingerprint {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// KeepSet
// ---------------------------------------------------------------------------

/// Destination keys produced by the upload phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepSet(BTreeSet<DestinationKey>);

impl KeepSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, key: DestinationKey) -> bool {
        self.0.insert(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DestinationKey> for KeepSet {
    fn from_iter<I: IntoIterator<Item = DestinationKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case("/a", "site", "/a/sub/x.txt", "site/sub/x.txt")]
    #[case("/a", "site/", "/a/x.txt", "site/x.txt")]
    #[case("/a", "", "/a/sub/x.txt", "sub/x.txt")]
    #[case("/a/", "deep/er", "/a/index.html", "deep/er/index.html")]
    fn key_mapping(
        #[case] source: &str,
        #[case] prefix: &str,
        #[case] file: &str,
        #[case] expected: &str,
    ) {
        let key = DestinationKey::new(Path::new(source), prefix, Path::new(file)).unwrap();
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn leading_slash_stripped_from_dest() {
        let prefix = normalize_prefix("/site");
        let key = DestinationKey::new(Path::new("/a"), &prefix, Path::new("/a/sub/x.txt")).unwrap();
        assert_eq!(key.to_string(), "site/sub/x.txt");
        assert_eq!(normalize_prefix("//"), "");
    }

    #[test]
    fn file_outside_source_is_rejected() {
        let err = DestinationKey::new(Path::new("/a"), "site", Path::new("/b/x.txt")).unwrap_err();
        assert!(matches!(err, CoreError::OutsideSource { .. }), "got: {err}");
        assert!(err.to_string().contains("/b/x.txt"));
    }

    #[test]
    fn fingerprint_is_md5_of_bytes() {
        assert_eq!(
            Fingerprint::of(b"").to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            Fingerprint::of(b"hello").to_hex(),
            "5d41402abc4b2a76b9719d911017c592"
        );
        assert_ne!(Fingerprint::of(b"a"), Fingerprint::of(b"a\n"));
    }

    #[test]
    fn fingerprint_from_slice_requires_sixteen_bytes() {
        let fp = Fingerprint::of(b"data");
        assert_eq!(Fingerprint::from_slice(fp.as_bytes()), Some(fp));
        assert_eq!(Fingerprint::from_slice(b""), None);
        assert_eq!(Fingerprint::from_slice(&[0u8; 20]), None);
    }

    #[test]
    fn keep_set_dedups_and_looks_up_by_str() {
        let mut keep = KeepSet::new();
        assert!(keep.insert(DestinationKey::from("site/a")));
        assert!(keep.insert(DestinationKey::from("site/b")));
        assert!(!keep.insert(DestinationKey::from("site/a")));
        assert_eq!(keep.len(), 2);
        assert!(keep.contains("site/b"));
        assert!(!keep.contains("site/stale"));
    }

    #[cfg(unix)]
    #[test]
    fn relative_components_are_joined_with_forward_slashes() {
        let source = PathBuf::from("/srv/www");
        let file = source.join("css").join("fonts").join("a.ttf");
        let key = DestinationKey::new(&source, "cdn", &file).unwrap();
        assert_eq!(key.as_str(), "cdn/css/fonts/a.ttf");
    }
}

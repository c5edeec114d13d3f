//! Content-type resolution for uploaded objects.
//!
//! Static-site hosting serves each object with its stored content type, so a
//! missing or wrong value makes browsers download pages instead of rendering
//! them.

use std::path::Path;

/// Used when the extension is unknown or overridden.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extensions whose guessed type breaks static-site serving.
const OVERRIDES: &[(&str, &str)] = &[
    ("map", DEFAULT_CONTENT_TYPE),
    ("ttf", DEFAULT_CONTENT_TYPE),
];

/// Resolve the content type for `path` from its final extension.
pub fn resolve(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    let ext = ext.to_ascii_lowercase();

    if let Some(&(_, forced)) = OVERRIDES.iter().find(|&&(e, _)| e == ext) {
        return forced;
    }

    mime_guess::from_ext(&ext)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

//! Virtual directory view over flat object keys.
//!
//! Keys are plain strings; `/` is a separator by convention only. Folders are
//! derived from the live key listing every time and never stored here. A key
//! ending in `/` is a folder marker, never a file.

use std::collections::BTreeSet;

use crate::error::{StoreError, StoreResult};

/// Immediate children of one prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Full keys of the files directly under the prefix.
    pub files: Vec<String>,
    /// Full prefixes (ending in exactly one `/`) of the child folders.
    pub folders: Vec<String>,
}

/// Normalize a prefix: no leading `/`, no empty segments, exactly one
/// trailing `/`, and `""` for the root.
///
/// Collapsing `a//b` to `a/b/` keeps every folder and upload created through
/// a normalized prefix reachable from [`list_children`].
pub fn normalize_prefix(prefix: &str) -> String {
    let segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        String::new()
    } else {
        format!("{}/", segments.join("/"))
    }
}

/// Compute `files(prefix)` and `folders(prefix)` from a key listing.
///
/// Keys outside the prefix are ignored, so the full bucket listing can be
/// passed in as well as a prefix-filtered one.
pub fn list_children<I, K>(prefix: &str, keys: I) -> Listing
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let prefix = normalize_prefix(prefix);
    let mut files = BTreeSet::new();
    let mut folders = BTreeSet::new();

    for key in keys {
        let key = key.as_ref();
        let Some(rest) = key.strip_prefix(prefix.as_str()) else {
            continue;
        };
        match rest.split_once('/') {
            None if !rest.is_empty() => {
                files.insert(key.to_string());
            }
            Some((segment, _)) if !segment.is_empty() => {
                folders.insert(format!("{}{}/", prefix, segment));
            }
            _ => {}
        }
    }

    Listing {
        files: files.into_iter().collect(),
        folders: folders.into_iter().collect(),
    }
}

/// Last path segment of a key, e.g. `b.txt` for `a/b.txt`.
pub fn file_name(key: &str) -> &str {
    let key = key.trim_end_matches('/');
    key.rsplit('/').next().unwrap_or(key)
}

/// Name of `key` relative to `prefix`, as shown inside that folder.
pub fn relative_name<'a>(prefix: &str, key: &'a str) -> &'a str {
    key.strip_prefix(normalize_prefix(prefix).as_str())
        .unwrap_or(key)
}

fn check_segments(path: &str) -> StoreResult<()> {
    for segment in path.split('/') {
        if segment == "." || segment == ".." {
            return Err(StoreError::InvalidInput(format!(
                "path segment '{}' is not allowed",
                segment
            )));
        }
        if segment.chars().any(char::is_control) {
            return Err(StoreError::InvalidInput(
                "control characters are not allowed in paths".to_string(),
            ));
        }
    }
    Ok(())
}

/// Marker key for a folder name: exactly one trailing `/`.
///
/// `"a"`, `"a/"` and `"a//"` all map to `"a/"`.
pub fn folder_marker_key(name: &str) -> StoreResult<String> {
    let prefix = normalize_prefix(name);
    if prefix.is_empty() {
        return Err(StoreError::InvalidInput("Folder name is required".to_string()));
    }
    check_segments(prefix.trim_end_matches('/'))?;
    Ok(prefix)
}

/// Make an uploaded filename safe to use as the last segment of a key.
///
/// Any directory part is dropped, control characters are removed and
/// whitespace runs become `_`. Returns `None` if nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join("_");

    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

/// Key for an upload: `folder/filename`, or just `filename` at the root.
pub fn upload_key(folder: Option<&str>, filename: &str) -> StoreResult<String> {
    let filename = sanitize_filename(filename)
        .ok_or_else(|| StoreError::InvalidInput("No selected file".to_string()))?;

    let prefix = folder.map(normalize_prefix).unwrap_or_default();
    check_segments(prefix.trim_end_matches('/'))?;
    Ok(format!("{}{}", prefix, filename))
}

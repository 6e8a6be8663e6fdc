//! Path handling for template-referenced resources.

/// File name component of a resource path.
///
/// The manifest is keyed by bare filenames, so only the segment after the last
/// `/` takes part in lookups; a path without separators is its own file name.
pub fn file_name_of(resource: &str) -> &str {
    match resource.rfind('/') {
        Some(index) => &resource[index + 1..],
        None => resource,
    }
}

/// Rewrite `resource`, replacing the first occurrence of `file_name` with the
/// hashed `replacement`.
///
/// The match scans the whole string, not just the final segment, so a directory
/// segment equal to the file name is rewritten instead of the file itself.
/// Existing templates depend on this exact behavior.
pub fn rewrite_resource(resource: &str, file_name: &str, replacement: &str) -> String {
    resource.replacen(file_name, replacement, 1)
}

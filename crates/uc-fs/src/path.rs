//! Chrome-relative paths
//!
//! Import lines always use forward slashes, so the loader keeps every path
//! below the chrome directory in that form and converts to a native path
//! only when touching the filesystem.

use std::path::{Path, PathBuf};

/// Native path for the forward-slash `relative` below `base`.
///
/// Empty segments are skipped; callers normalize first when `relative` may
/// contain `..`.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

/// Normalize a relative path to its canonical forward-slash form.
///
/// Returns `None` when the input is absolute (Unix root, UNC, or a Windows
/// drive prefix), empty, or when a `..` segment climbs above the starting
/// directory.
pub fn normalize_relative(input: &str) -> Option<String> {
    let input = input.trim().replace('\\', "/");
    if input.is_empty() || input.starts_with('/') {
        return None;
    }
    let bytes = input.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return None;
    }

    let mut parts: Vec<&str> = Vec::new();
    for part in input.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Validate that a string is safe to use as a single path component.
///
/// Used for mod folder names and backup names before they are joined onto a
/// directory. Returns a human-readable message on failure.
pub fn validate_path_identifier(value: &str, label: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err(format!("{label} cannot be empty"));
    }
    if value.len() > 128 {
        return Err(format!("{label} cannot exceed 128 characters"));
    }
    if value.contains('/') || value.contains('\\') || value == "." || value.contains("..") {
        return Err(format!("{label} cannot contain path separators or '..'"));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(format!("{label} cannot contain control characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_relative_cleans_dot_segments() {
        assert_eq!(normalize_relative("mods/./a.css").as_deref(), Some("mods/a.css"));
        assert_eq!(normalize_relative("mods/x/../a.css").as_deref(), Some("mods/a.css"));
        assert_eq!(normalize_relative("mods\\nord\\mod.css").as_deref(), Some("mods/nord/mod.css"));
    }

    #[test]
    fn normalize_relative_rejects_escapes() {
        assert_eq!(normalize_relative("../a.css"), None);
        assert_eq!(normalize_relative("mods/../../a.css"), None);
        assert_eq!(normalize_relative("/etc/passwd"), None);
        assert_eq!(normalize_relative("C:/Windows/a.css"), None);
        assert_eq!(normalize_relative(""), None);
    }

    #[test]
    fn join_relative_builds_native_path() {
        let joined = join_relative(Path::new("/p/chrome"), "mods//nord/mod.css");
        assert_eq!(joined, Path::new("/p/chrome").join("mods").join("nord").join("mod.css"));
    }

    #[test]
    fn validate_identifier() {
        assert!(validate_path_identifier("nord-theme", "Mod name").is_ok());
        assert!(validate_path_identifier("../x", "Mod name").is_err());
        assert!(validate_path_identifier("", "Mod name").is_err());
    }
}

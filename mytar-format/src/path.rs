use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Checks that `name` can be stored as a NUL-terminated header string.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name is empty",
        });
    }

    if name.as_bytes().contains(&0) {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "name contains a NUL byte",
        });
    }

    Ok(())
}

/// Converts a supplied path into the name stored verbatim in the header.
pub fn entry_name<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let name = path.to_str().ok_or_else(|| Error::InvalidName {
        name: path.to_string_lossy().into_owned(),
        reason: "name is not valid UTF-8",
    })?;

    validate_name(name)?;
    Ok(name.to_string())
}

/// Returns true if `name` only has normal or `.` components.
pub fn is_contained(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Resolves where an entry is written under `destination`.
///
/// Unless `allow_unsafe` is set, names with a root, a prefix, or a `..` component are rejected.
pub(crate) fn output_path(destination: &Path, name: &str, allow_unsafe: bool) -> Result<PathBuf> {
    if !allow_unsafe && !is_contained(name) {
        return Err(Error::UnsafePath {
            name: name.to_string(),
        });
    }

    Ok(destination.join(name))
}

//! Resolution of caller-supplied folder and file names under a client root.
//!
//! Every segment must be exactly one normal path component, so a resolved
//! path can never leave the client root.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use lexvault_core::error::AppError;
use lexvault_core::result::AppResult;

/// Check that `value` is a single, normal path component.
///
/// `what` names the field in the error message (`"folder"`, `"file name"`).
pub fn validate_segment<'a>(what: &str, value: &'a str) -> AppResult<&'a str> {
    if value.is_empty() {
        return Err(AppError::invalid_input(format!("Missing {what}")));
    }
    if value.contains('\0') || value.contains('/') || value.contains('\\') {
        return Err(AppError::invalid_input(format!(
            "Invalid {what} '{}': must not contain path separators",
            value.escape_default()
        )));
    }

    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == OsStr::new(value) => Ok(value),
        _ => Err(AppError::invalid_input(format!(
            "Invalid {what} '{value}': must be a plain name"
        ))),
    }
}

/// Resolve a folder directly under `client_root`.
pub fn resolve_folder(client_root: &Path, folder: &str) -> AppResult<PathBuf> {
    Ok(client_root.join(validate_segment("folder", folder)?))
}

/// Resolve `client_root/folder[/file]`.
///
/// Pure; the caller decides whether the target has to exist.
pub fn resolve(client_root: &Path, folder: &str, file: Option<&str>) -> AppResult<PathBuf> {
    let dir = resolve_folder(client_root, folder)?;
    match file {
        Some(name) => Ok(dir.join(validate_segment("file name", name)?)),
        None => Ok(dir),
    }
}

//! The `name_vN.ext` versioning scheme.
//!
//! A bare `stem.ext` counts as version 1 and `stem_vN.ext` as version `N`.
//! A new file takes the desired name when nothing matches, otherwise
//! `stem_v{max + 1}.ext`.

use std::path::Path;

use tokio::fs;

use lexvault_core::error::AppError;
use lexvault_core::result::AppResult;

/// Split a file name into `(stem, extension)`.
///
/// The extension runs from the last `.` inclusive, except that a name whose
/// only dot is its first character has no extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// The version `candidate` represents for `(stem, ext)`, if it is one.
fn version_of(candidate: &str, stem: &str, ext: &str) -> Option<u64> {
    let inner = candidate.strip_suffix(ext)?.strip_prefix(stem)?;
    if inner.is_empty() {
        return Some(1);
    }
    let digits = inner.strip_prefix("_v")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}

/// Pick the next free name for `desired` given the names already present.
///
/// Fails when the highest existing version has no successor.
pub fn pick_name<'a, I>(existing: I, desired: &str) -> AppResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let (stem, ext) = split_name(desired);
    let highest = existing
        .into_iter()
        .filter_map(|name| version_of(name, stem, ext))
        .max();

    match highest {
        None => Ok(desired.to_string()),
        Some(max) => max
            .checked_add(1)
            .map(|next| format!("{stem}_v{next}{ext}"))
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "No version of '{desired}' is left after '{stem}_v{max}{ext}'"
                ))
            }),
    }
}

/// Compute the name a new `desired` file should take inside `dir`.
///
/// Reads the directory once, non-recursively. A missing directory has no
/// entries.
pub async fn next_name(dir: &Path, desired: &str) -> AppResult<String> {
    let mut names = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(desired.to_string());
        }
        Err(e) => return Err(AppError::io_at("Failed to read directory", dir, e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::io_at("Failed to read directory", dir, e))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    pick_name(names.iter().map(String::as_str), desired)
}

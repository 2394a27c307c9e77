use std::path::{Component, Path, PathBuf};

use crate::{Result, StackError};

const MODULE_MANIFEST: &str = "Cargo.toml";

/// Find the root directory of the package owning `path`.
///
/// Starts at `path` when it is a directory, otherwise at its parent, and ascends until a
/// directory containing `Cargo.toml` is found. The returned path has no trailing separator.
pub fn find_module_root(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)?;
    let mut current = if metadata.is_dir() {
        Some(path)
    } else {
        path.parent()
    };

    while let Some(dir) = current {
        if dir.join(MODULE_MANIFEST).is_file() {
            return Ok(dir.to_path_buf());
        }
        current = dir.parent();
    }

    Err(StackError::ModuleRootNotFound(path.to_path_buf()))
}

/// Path of `path` relative to its package root, written as `./src/lib.rs`.
pub fn relative_module_path(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let root = find_module_root(path)?;
    let relative = path
        .strip_prefix(&root)
        .map_err(|_| StackError::ModuleRootNotFound(path.to_path_buf()))?;

    let mut display = String::from(".");
    for component in relative.components() {
        if let Component::Normal(part) = component {
            display.push('/');
            display.push_str(&part.to_string_lossy());
        }
    }
    Ok(display)
}

/// Best-effort display form of a module reference found in a trace.
///
/// Absolute paths inside a package become package relative. Anything else, bare names like
/// `module.js`, relative paths, or files that no longer exist, is returned unchanged.
pub fn display_module_path(module: &str) -> String {
    let path = Path::new(module);
    if !path.is_absolute() {
        return module.to_string();
    }
    match relative_module_path(path) {
        Ok(relative) => relative,
        Err(err) => {
            tracing::debug!(module, error = %err, "keeping module path as is");
            module.to_string()
        }
    }
}

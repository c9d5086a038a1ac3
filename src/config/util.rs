//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`
/// Returns the path to the config file if found
///
/// # Example
/// ```text
/// /home/user/app/conf/local/  ← start
/// /home/user/app/resloc.toml  ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Expand a leading `~` and anchor relative paths at `root`.
///
/// `.` components are dropped so the result compares cleanly as a prefix.
///
/// # Examples
/// ```ignore
/// expand_path(Path::new("~/app"), root)     -> "/home/user/app"
/// expand_path(Path::new("conf"), "/srv/x")  -> "/srv/x/conf"
/// expand_path(Path::new("/etc/x"), root)    -> "/etc/x"
/// ```
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let path = match path.to_str() {
        Some(text) => PathBuf::from(shellexpand::tilde(text).into_owned()),
        None => path.to_path_buf(),
    };
    let full_path = if path.is_relative() {
        root.join(path)
    } else {
        path
    };
    full_path.components().collect()
}

// ============================================================================
// tests
// ============================================================================

//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects besides reading the
//! current directory in [`absolute_path`].

use std::path::{Component, Path, PathBuf};

/// Make a file system path absolute without touching the file system.
///
/// Symlinks and `..` are left as written so that a locator built from a
/// path still starts with the directories the caller passed in. Interior
/// `.` components are dropped.
///
/// # Example
/// ```ignore
/// let abs = absolute_path(Path::new("conf/app.properties"));
/// // -> "/current/dir/conf/app.properties"
/// ```
#[inline]
pub fn absolute_path(path: &Path) -> PathBuf {
    let full_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    full_path.components().collect()
}

/// Join a relative path onto a home directory with exactly one `/` between them.
///
/// Examples:
/// - home="/opt/app",  rel="config/db"  -> "/opt/app/config/db"
/// - home="/opt/app/", rel="/config/db" -> "/opt/app/config/db"
/// - home="/",         rel="etc"        -> "/etc"
pub fn home_join(home: &str, rel: &str) -> String {
    let base = home.trim_end_matches('/');
    let rel = rel.trim_start_matches('/');
    format!("{base}/{rel}")
}

/// Strip `home` and the separator after it from `path`.
///
/// The prefix must match on whole path components: `/opt/app` is not a
/// prefix of `/opt/application/x`. Returns `None` when `path` is not under
/// `home`.
pub fn strip_home(path: &str, home: &str) -> Option<String> {
    let base = home.trim_end_matches('/');
    if base.is_empty() {
        // home is the root directory
        return path.strip_prefix('/').map(str::to_string);
    }

    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix('/').map(str::to_string)
}

/// Check whether a relative name stays inside the directory it is joined to.
///
/// Rejects absolute names, drive prefixes and any `..` component.
pub fn is_contained(name: &Path) -> bool {
    name.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

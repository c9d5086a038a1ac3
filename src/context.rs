//! Named resource namespaces.
//!
//! A [`ResourceContext`] maps a resource name like `conf/db.properties` to a
//! [`Locator`]. The resolver consults a per-call or default context first and
//! a system-wide context after it.
//!
//! | Context         | Lookup                                         |
//! |-----------------|------------------------------------------------|
//! | `SearchPath`    | first root directory containing the name       |
//! | `MemoryContext` | fixed name → locator table                     |
//! | `EmptyContext`  | never finds anything                           |

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::locator::Locator;
use crate::path::is_contained;

/// A namespace of named resources.
pub trait ResourceContext: Send + Sync {
    /// Look up `name`, returning `None` when this context does not have it.
    fn get_resource(&self, name: &str) -> Option<Locator>;

    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

// ============================================================================
// SearchPath
// ============================================================================

/// Ordered list of root directories searched like a classpath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    roots: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a `PATH`-style list (`:` separated, `;` on Windows).
    pub fn from_path_list(list: &OsStr) -> Self {
        Self::new(std::env::split_paths(list).filter(|p| !p.as_os_str().is_empty()))
    }

    /// Build from a `PATH`-style environment variable; unset means empty.
    pub fn from_env(var: &str) -> Self {
        std::env::var_os(var)
            .map(|list| Self::from_path_list(&list))
            .unwrap_or_default()
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl ResourceContext for SearchPath {
    fn get_resource(&self, name: &str) -> Option<Locator> {
        let rel = Path::new(name);
        if rel.as_os_str().is_empty() || !is_contained(rel) {
            return None;
        }

        self.roots
            .iter()
            .map(|root| root.join(rel))
            .find(|candidate| candidate.exists())
            .and_then(|found| Locator::from_file_path(&found))
    }

    fn describe(&self) -> String {
        if self.roots.is_empty() {
            return "search path (empty)".to_string();
        }
        let roots: Vec<_> = self.roots.iter().map(|r| r.display().to_string()).collect();
        format!("search path [{}]", roots.join(", "))
    }
}

// ============================================================================
// MemoryContext
// ============================================================================

/// Fixed table of name → locator entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryContext {
    entries: HashMap<String, Locator>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: impl Into<String>, locator: Locator) -> Self {
        self.entries.insert(name.into(), locator);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceContext for MemoryContext {
    fn get_resource(&self, name: &str) -> Option<Locator> {
        self.entries.get(name).cloned()
    }

    fn describe(&self) -> String {
        format!("memory ({} entries)", self.entries.len())
    }
}

// ============================================================================
// EmptyContext
// ============================================================================

/// Context that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContext;

impl ResourceContext for EmptyContext {
    fn get_resource(&self, _name: &str) -> Option<Locator> {
        None
    }

    fn describe(&self) -> String {
        "empty".to_string()
    }
}

impl fmt::Debug for dyn ResourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

//! Resource resolution.
//!
//! [`ResourceResolver::resolve_by_name`] tries these steps in order and
//! returns the first hit:
//!
//! | Step | Source              | Lookup                                         |
//! |------|---------------------|------------------------------------------------|
//! | 1    | `Context`           | `name` in the given (or default) context       |
//! | 2    | `ContextProperties` | `name.properties` in the same context          |
//! | 3    | `System`            | `name` in the system context                   |
//! | 4    | `SystemProperties`  | `name.properties` in the system context        |
//! | 5    | `Filesystem`        | `name` as a file path                          |
//! | 6    | `Home`              | `name` relative to the home directory          |
//! | 7    | `Url`               | `name` as an absolute URL (not fetched)        |
//!
//! Steps 2 and 4 are skipped when `name` already ends in `.properties`.
//! Step 6 is skipped for an empty name.
//! Named contexts shadow literal paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::context::{EmptyContext, ResourceContext};
use crate::error::ResolveError;
use crate::locator::Locator;
use crate::path::{absolute_path, home_join, strip_home};
use crate::{debug, log};

pub const PROPERTIES_SUFFIX: &str = ".properties";

// ============================================================================
// Resolution result
// ============================================================================

/// Which step of the chain produced a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Context,
    ContextProperties,
    System,
    SystemProperties,
    Filesystem,
    Home,
    Url,
}

impl Source {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::ContextProperties => "context_properties",
            Self::System => "system",
            Self::SystemProperties => "system_properties",
            Self::Filesystem => "filesystem",
            Self::Home => "home",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A locator together with the step that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub locator: Locator,
    pub source: Source,
}

impl Resolved {
    const fn new(locator: Locator, source: Source) -> Self {
        Self { locator, source }
    }
}

// ============================================================================
// Stateless lookups
// ============================================================================

/// `file:` locator for `path` if something exists there.
pub fn resolve_from_filename(path: &Path) -> Option<Locator> {
    if path.exists() {
        Locator::from_file_path(path)
    } else {
        None
    }
}

/// Parse `text` as an absolute URL. Existence is not checked.
pub fn parse_url(text: &str) -> Result<Locator, ResolveError> {
    Locator::parse(text).map_err(|source| ResolveError::MalformedUrl {
        text: text.to_string(),
        source,
    })
}

/// [`parse_url`] with malformed input treated as not found.
pub fn resolve_from_url_string(text: &str) -> Option<Locator> {
    parse_url(text).ok()
}

/// Derive a resource name from a fully-qualified type name.
///
/// Generic arguments are dropped, then everything after the last `::` or
/// `.` is replaced with `.properties`.
///
/// Examples:
/// - "my_app::config::Settings"    -> "my_app::config.properties"
/// - "org.example.util.Settings"   -> "org.example.util.properties"
/// - "alloc::vec::Vec<u8>"         -> "alloc::vec.properties"
/// - "Settings"                    -> "Settings.properties"
pub fn type_resource_name(qualified: &str) -> String {
    let base = qualified.split('<').next().unwrap_or(qualified);
    let cut = base.rfind("::").max(base.rfind('.'));
    let stem = match cut {
        Some(idx) => &base[..idx],
        None => base,
    };
    format!("{stem}{PROPERTIES_SUFFIX}")
}

/// Resource name derived from `T`'s type name.
pub fn resource_name_for<T: ?Sized>() -> String {
    type_resource_name(std::any::type_name::<T>())
}

// ============================================================================
// ResourceResolver
// ============================================================================

/// Resolves resource names through the fixed fallback chain.
///
/// Holds only immutable state and is cheap to clone; share it freely
/// across threads.
#[derive(Clone)]
pub struct ResourceResolver {
    context: Arc<dyn ResourceContext>,
    system: Arc<dyn ResourceContext>,
    home: Option<String>,
}

impl Default for ResourceResolver {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ResourceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceResolver")
            .field("context", &self.context.describe())
            .field("system", &self.system.describe())
            .field("home", &self.home)
            .finish()
    }
}

impl ResourceResolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// Configured home directory, if any.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref().map(Path::new)
    }

    pub fn default_context(&self) -> &dyn ResourceContext {
        &*self.context
    }

    pub fn system_context(&self) -> &dyn ResourceContext {
        &*self.system
    }

    /// Resolve the `.properties` resource named after `T`'s enclosing path.
    ///
    /// Type names come from [`std::any::type_name`], whose exact text is not
    /// guaranteed across compiler versions.
    pub fn resolve_from_type<T: ?Sized>(
        &self,
        context: Option<&dyn ResourceContext>,
    ) -> Option<Locator> {
        self.resolve_by_name(&resource_name_for::<T>(), context)
    }

    /// Resolve the `.properties` resource derived from a qualified name.
    pub fn resolve_from_qualified_name(
        &self,
        qualified: &str,
        context: Option<&dyn ResourceContext>,
    ) -> Option<Locator> {
        self.resolve_by_name(&type_resource_name(qualified), context)
    }

    /// Resolve `name` through the full chain. `None` means not found anywhere.
    pub fn resolve_by_name(
        &self,
        name: &str,
        context: Option<&dyn ResourceContext>,
    ) -> Option<Locator> {
        self.resolve_traced(name, context).map(|r| r.locator)
    }

    /// [`resolve_by_name`](Self::resolve_by_name), also reporting the step that matched.
    pub fn resolve_traced(
        &self,
        name: &str,
        context: Option<&dyn ResourceContext>,
    ) -> Option<Resolved> {
        let context = context.unwrap_or(&*self.context);
        let found = self.run_chain(name, context);

        match &found {
            Some(resolved) => {
                debug!("resolve"; "`{}` -> {} ({})", name, resolved.locator, resolved.source);
            }
            None => debug!("resolve"; "`{}` not found", name),
        }
        found
    }

    fn run_chain(&self, name: &str, context: &dyn ResourceContext) -> Option<Resolved> {
        if let Some(locator) = context.get_resource(name) {
            return Some(Resolved::new(locator, Source::Context));
        }

        let properties_name =
            (!name.ends_with(PROPERTIES_SUFFIX)).then(|| format!("{name}{PROPERTIES_SUFFIX}"));

        if let Some(props) = &properties_name
            && let Some(locator) = context.get_resource(props)
        {
            return Some(Resolved::new(locator, Source::ContextProperties));
        }

        if let Some(locator) = self.system.get_resource(name) {
            return Some(Resolved::new(locator, Source::System));
        }

        if let Some(props) = &properties_name
            && let Some(locator) = self.system.get_resource(props)
        {
            return Some(Resolved::new(locator, Source::SystemProperties));
        }

        if let Some(locator) = resolve_from_filename(Path::new(name)) {
            return Some(Resolved::new(locator, Source::Filesystem));
        }

        // an empty name would match the home directory itself
        if !name.is_empty()
            && let Some(locator) = self.resolve_home_relative(name)
        {
            return Some(Resolved::new(locator, Source::Home));
        }

        resolve_from_url_string(name).map(|locator| Resolved::new(locator, Source::Url))
    }

    /// Look up `path` under the home directory.
    ///
    /// Logs a warning and returns `None` when no home directory is configured.
    pub fn resolve_home_relative(&self, path: &str) -> Option<Locator> {
        self.try_resolve_home_relative(path).unwrap_or_else(|e| {
            log!("warning"; "{}, skipping home-relative lookup of `{}`", e, path);
            None
        })
    }

    /// Look up `path` under the home directory.
    ///
    /// # Errors
    ///
    /// [`ResolveError::HomeUnset`] when no home directory is configured.
    pub fn try_resolve_home_relative(&self, path: &str) -> Result<Option<Locator>, ResolveError> {
        let home = self.home.as_deref().ok_or(ResolveError::HomeUnset)?;
        let joined = home_join(home, path);
        Ok(resolve_from_filename(Path::new(&joined)))
    }

    /// Path of `locator` relative to the home directory.
    ///
    /// Returns the locator's path unchanged when it is not under the home
    /// directory or no home directory is configured.
    pub fn relative_to_home(&self, locator: &Locator) -> String {
        let path = locator.path();
        self.home
            .as_deref()
            .and_then(|home| strip_home(&path, home))
            .unwrap_or(path)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ResourceResolver`]. Unset contexts find nothing.
#[derive(Default)]
pub struct ResolverBuilder {
    context: Option<Arc<dyn ResourceContext>>,
    system: Option<Arc<dyn ResourceContext>>,
    home: Option<PathBuf>,
}

impl ResolverBuilder {
    /// Default context, used when a call passes no context.
    pub fn context(self, context: impl ResourceContext + 'static) -> Self {
        self.shared_context(Arc::new(context))
    }

    pub fn shared_context(mut self, context: Arc<dyn ResourceContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// System-wide context, consulted after the default one.
    pub fn system(self, system: impl ResourceContext + 'static) -> Self {
        self.shared_system(Arc::new(system))
    }

    pub fn shared_system(mut self, system: Arc<dyn ResourceContext>) -> Self {
        self.system = Some(system);
        self
    }

    /// Home directory, made absolute against the current directory.
    pub fn home(mut self, home: impl AsRef<Path>) -> Self {
        self.home = Some(absolute_path(home.as_ref()));
        self
    }

    pub fn maybe_home(self, home: Option<impl AsRef<Path>>) -> Self {
        match home {
            Some(home) => self.home(home),
            None => self,
        }
    }

    pub fn build(self) -> ResourceResolver {
        ResourceResolver {
            context: self.context.unwrap_or_else(|| Arc::new(EmptyContext)),
            system: self.system.unwrap_or_else(|| Arc::new(EmptyContext)),
            home: self
                .home
                .map(|home| home.to_string_lossy().into_owned()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

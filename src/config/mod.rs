//! Resolver configuration from `resloc.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[home]`    | Home directory for home-relative lookups         |
//! | `[context]` | Root directories of the default context          |
//! | `[system]`  | Root directories of the system-wide context      |
//!
//! ```toml
//! [home]
//! path = "~/app"
//!
//! [context]
//! roots = ["conf", "resources"]
//!
//! [system]
//! roots = ["/etc/resloc"]
//! ```
//!
//! Relative paths are taken from the directory holding the config file.
//! When a value is missing from the file, the environment fills it in:
//! `RESLOC_HOME` for the home directory and `RESLOC_PATH` (`PATH` syntax)
//! for the system roots. All of this is read once, at startup.

mod util;

pub use util::{expand_path, find_config_file};

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::SearchPath;
use crate::debug;
use crate::error::ConfigError;
use crate::path::absolute_path;
use crate::resolver::ResourceResolver;

/// Default config file name, searched upward from the current directory.
pub const CONFIG_FILE: &str = "resloc.toml";

/// Environment variable holding the home directory.
pub const HOME_ENV: &str = "RESLOC_HOME";

/// Environment variable holding the system search path.
pub const PATH_ENV: &str = "RESLOC_PATH";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing resloc.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Path of the loaded config file (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Base for relative paths - parent of config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub home: HomeConfig,

    #[serde(default)]
    pub context: RootsConfig,

    #[serde(default)]
    pub system: RootsConfig,
}

/// `[home]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeConfig {
    pub path: Option<PathBuf>,
}

/// `[context]` and `[system]` sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootsConfig {
    pub roots: Option<Vec<PathBuf>>,
}

impl ResolverConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `resloc.toml` is searched
    /// upward from the current directory; if none is found the defaults are
    /// used with the current directory as root.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let cwd = absolute_path(Path::new("."));

        match explicit {
            Some(path) => {
                let path = absolute_path(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_path(&path)
            }
            None => match find_config_file(&cwd, Path::new(CONFIG_FILE)) {
                Some(path) => Self::from_path(&path),
                None => {
                    debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                    Ok(Self {
                        root: cwd,
                        ..Self::default()
                    })
                }
            },
        }
    }

    /// Read and parse a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config = Self::parse(&content, path)?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = Some(path.to_path_buf());
        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse config text; `origin` is only used for error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Toml(origin.to_path_buf(), e))
    }

    /// Fill values the file left unset from the environment.
    ///
    /// `lookup` is `std::env::var_os` outside of tests.
    /// Environment values are tilde-expanded and taken relative to the
    /// current directory.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let cwd = absolute_path(Path::new("."));

        if self.home.path.is_none()
            && let Some(home) = lookup(HOME_ENV).filter(|v| !v.is_empty())
        {
            self.home.path = Some(expand_path(Path::new(&home), &cwd));
        }

        if self.system.roots.is_none()
            && let Some(list) = lookup(PATH_ENV)
        {
            let roots = SearchPath::from_path_list(&list).roots().to_vec();
            self.system.roots = Some(roots.iter().map(|r| expand_path(r, &cwd)).collect());
        }

        self
    }

    /// Override the home directory (e.g. from `--home`).
    pub fn with_home(mut self, home: Option<&Path>) -> Self {
        if let Some(home) = home {
            self.home.path = Some(absolute_path(home));
        }
        self
    }

    /// Home directory, expanded and absolute.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.home
            .path
            .as_deref()
            .map(|p| expand_path(p, &self.root))
    }

    pub fn context_path(&self) -> SearchPath {
        self.search_path(&self.context)
    }

    pub fn system_path(&self) -> SearchPath {
        self.search_path(&self.system)
    }

    fn search_path(&self, section: &RootsConfig) -> SearchPath {
        SearchPath::new(
            section
                .roots
                .iter()
                .flatten()
                .map(|root| expand_path(root, &self.root)),
        )
    }

    /// Build the resolver this configuration describes.
    pub fn build_resolver(&self) -> ResourceResolver {
        ResourceResolver::builder()
            .context(self.context_path())
            .system(self.system_path())
            .maybe_home(self.home_dir())
            .build()
    }
}

// ============================================================================
// tests
// ============================================================================

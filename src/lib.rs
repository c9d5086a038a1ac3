//! resloc - resolve named resources (usually `.properties` files) to URLs.
//!
//! A name is tried against a resolution context, its `.properties` variant,
//! a system-wide context, the file system, a home directory and finally as a
//! literal URL. See [`resolver`] for the exact order.
//!
//! ```ignore
//! use resloc::{ResourceResolver, SearchPath, read_text};
//!
//! let resolver = ResourceResolver::builder()
//!     .context(SearchPath::new(["conf"]))
//!     .home("/opt/app")
//!     .build();
//!
//! if let Some(locator) = resolver.resolve_by_name("db", None) {
//!     let text = read_text(&locator)?;
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod locator;
pub mod logger;
pub mod path;
pub mod read;
pub mod resolver;

pub use error::{ConfigError, Error, ReadError, ResolveError, Result};

pub use config::ResolverConfig;
pub use context::{EmptyContext, MemoryContext, ResourceContext, SearchPath};
pub use locator::Locator;
pub use path::home_join;
pub use read::{LINE_SEPARATOR, ResourceStream, open_stream, read_stream_text, read_text};
pub use resolver::{
    PROPERTIES_SUFFIX, Resolved, ResolverBuilder, ResourceResolver, Source, parse_url,
    resolve_from_filename, resolve_from_url_string, resource_name_for, type_resource_name,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Resolved resource handles.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use url::Url;

use crate::path::absolute_path;

/// Where a resolved resource lives.
///
/// Always a well-formed absolute URL: `file:` for anything found on disk,
/// otherwise whatever a context or the caller supplied. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(Url);

impl Locator {
    /// Build a `file:` locator for `path`, made absolute against the current directory.
    ///
    /// Returns `None` if the path cannot be expressed as a file URL.
    pub fn from_file_path(path: &Path) -> Option<Self> {
        Url::from_file_path(absolute_path(path)).ok().map(Self)
    }

    /// Parse an absolute URL string.
    pub fn parse(text: &str) -> Result<Self, url::ParseError> {
        Url::parse(text).map(Self)
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn is_file(&self) -> bool {
        self.0.scheme() == "file"
    }

    /// File system path of a `file:` locator (percent-decoded).
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_file() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    /// Path part of the locator as text.
    ///
    /// `file:` locators yield the decoded file system path, other schemes
    /// yield the URL path as written.
    pub fn path(&self) -> String {
        match self.to_file_path() {
            Some(path) => path.to_string_lossy().into_owned(),
            None => self.0.path().to_string(),
        }
    }
}

impl From<Url> for Locator {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_path_absolute() {
        let locator = Locator::from_file_path(Path::new("/opt/app/db.properties")).unwrap();
        assert!(locator.is_file());
        assert_eq!(locator.as_str(), "file:///opt/app/db.properties");
        assert_eq!(locator.path(), "/opt/app/db.properties");
    }

    #[test]
    fn test_from_file_path_relative_is_made_absolute() {
        let locator = Locator::from_file_path(Path::new("conf/app.properties")).unwrap();
        let path = locator.to_file_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("conf/app.properties"));
    }

    #[test]
    fn test_path_is_percent_decoded_for_files() {
        let locator = Locator::from_file_path(Path::new("/opt/my app/x.properties")).unwrap();
        assert_eq!(locator.as_str(), "file:///opt/my%20app/x.properties");
        assert_eq!(locator.path(), "/opt/my app/x.properties");
    }

    #[test]
    fn test_parse_non_file() {
        let locator = Locator::parse("https://example.com/conf/app.properties").unwrap();
        assert!(!locator.is_file());
        assert_eq!(locator.scheme(), "https");
        assert_eq!(locator.to_file_path(), None);
        assert_eq!(locator.path(), "/conf/app.properties");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(Locator::parse("conf/app.properties").is_err());
        assert!(Locator::parse("").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let locator = Locator::parse("https://example.com/a").unwrap();
        assert_eq!(
            serde_json::to_string(&locator).unwrap(),
            "\"https://example.com/a\""
        );
    }
}

use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical package-relative path used in findings and reports.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - never empty (the package root is `.`)
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct PackagePath(String);

impl Default for PackagePath {
    fn default() -> Self {
        PackagePath::new(".")
    }
}

impl PackagePath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// File extension without the dot, lowercased (`content.JS` -> `js`).
    pub fn extension(&self) -> Option<String> {
        Utf8Path::new(self.as_str())
            .extension()
            .map(|ext| ext.to_ascii_lowercase())
    }
}

impl From<&Utf8Path> for PackagePath {
    fn from(value: &Utf8Path) -> Self {
        PackagePath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for PackagePath {
    fn from(value: Utf8PathBuf) -> Self {
        PackagePath::new(value.as_str())
    }
}

impl From<&str> for PackagePath {
    fn from(value: &str) -> Self {
        PackagePath::new(value)
    }
}

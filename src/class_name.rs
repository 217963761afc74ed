use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identity of a JVM class.
///
/// Always stored as the fully qualified, dot-separated name without a file
/// suffix (`com.example.Foo`, `com.example.Foo$Inner`). Construction accepts
/// the binary (slash-separated) form, the dotted form, and names carrying a
/// trailing `.class` suffix, and normalizes all of them to the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let name = name.strip_suffix(".class").unwrap_or(name);
        Self(name.replace(['/', '\\'], "."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package portion of the name, empty for the default package.
    pub fn package(&self) -> &str {
        self.0.rsplit_once('.').map_or("", |(pkg, _)| pkg)
    }

    /// Simple name, including any `$Inner` part.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit_once('.').map_or(self.0.as_str(), |(_, n)| n)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Key identifying a stored object, structured as a `/`-separated path.
///
/// The only constraint enforced is that the key is non-empty. Everything
/// else (allowed characters, length, leading slashes) is left to the
/// storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pathname(String);

impl Pathname {
    /// Validates and wraps a pathname.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyPathname`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::EmptyPathname);
        }
        Ok(Self(value))
    }

    /// Returns the pathname as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last `/`-separated segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the pathname with its last segment replaced by `new_name`.
    ///
    /// `a/b.png` with `c.png` becomes `a/c.png`; a single-segment pathname
    /// is replaced outright. `new_name` is used verbatim, so a name that
    /// itself contains `/` nests the object deeper.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyName`] if `new_name` is empty.
    pub fn with_leaf(&self, new_name: &str) -> Result<Self, CoreError> {
        if new_name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        let renamed = match self.0.rfind('/') {
            Some(idx) => format!("{}/{new_name}", &self.0[..idx]),
            None => new_name.to_owned(),
        };
        Ok(Self(renamed))
    }
}

impl fmt::Display for Pathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pathname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pathname {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Pathname {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Pathname> for String {
    fn from(p: Pathname) -> Self {
        p.0
    }
}

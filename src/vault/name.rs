//! Validated vault names.
//!
//! A `VaultName` is checked once when it is built and is only ever bound
//! as a query parameter afterwards.

use std::fmt;
use std::str::FromStr;

use crate::errors::{PwVaultError, Result};

/// Maximum length of a vault name in bytes.
const MAX_LEN: usize = 64;

/// The name of a vault, unique within its store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultName(String);

impl VaultName {
    /// Validate and wrap a vault name.
    ///
    /// Allowed: lowercase ASCII letters, digits, underscores, hyphens.
    /// Must start with a letter or digit and be at most 64 characters.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(PwVaultError::InvalidVaultName(
                "vault name cannot be empty".into(),
            ));
        }

        if name.len() > MAX_LEN {
            return Err(PwVaultError::InvalidVaultName(format!(
                "vault name cannot exceed {MAX_LEN} characters"
            )));
        }

        if !name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(PwVaultError::InvalidVaultName(format!(
                "'{name}' — only lowercase letters, digits, underscores, and hyphens are allowed"
            )));
        }

        if !name.as_bytes()[0].is_ascii_alphanumeric() {
            return Err(PwVaultError::InvalidVaultName(format!(
                "'{name}' must start with a letter or digit"
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VaultName {
    type Err = PwVaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for VaultName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VaultName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

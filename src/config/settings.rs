use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{PwVaultError, Result};

/// File holding vault salts and credential records.
pub const STORE_FILE: &str = "vaults.db";

/// Project-level configuration, loaded from `.pwvault.toml`.
///
/// Every field has a default so the tool works without any config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the
    /// vault store and the audit log.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Argon2 memory cost in KiB for newly created vaults (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count for newly created vaults (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree for newly created vaults (default: 2).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Word list used by `pwvault check`.
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,

    /// Origin recorded on every audit entry.
    #[serde(default = "default_audit_origin")]
    pub audit_origin: String,

    /// Length used by `pwvault generate` when `--length` is omitted.
    #[serde(default = "default_password_length")]
    pub default_password_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".pwvault".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    2
}

fn default_audit_origin() -> String {
    "local".to_string()
}

fn default_password_length() -> usize {
    16
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            dictionary_path: None,
            audit_origin: default_audit_origin(),
            default_password_length: default_password_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".pwvault.toml";

    /// Load settings from `<project_dir>/.pwvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PwVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Directory holding `vaults.db` and `audit.db`.
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }

    /// Full path to the SQLite vault store.
    ///
    /// Example: `project_dir/.pwvault/vaults.db`
    pub fn store_path(&self, project_dir: &Path) -> PathBuf {
        self.data_path(project_dir).join(STORE_FILE)
    }

    /// Dictionary location, resolved against the project directory.
    pub fn dictionary(&self, project_dir: &Path) -> Option<PathBuf> {
        self.dictionary_path.as_ref().map(|p| project_dir.join(p))
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.data_dir, ".pwvault");
        assert_eq!(s.argon2_params(), Argon2Params::default());
        assert_eq!(s.audit_origin, "local");
        assert_eq!(s.default_password_length, 16);
        assert!(s.dictionary_path.is_none());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, ".pwvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
data_dir = "secrets"
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
dictionary_path = "words.txt"
audit_origin = "ci"
default_password_length = 24
"#;
        fs::write(tmp.path().join(".pwvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "secrets");
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);
        assert_eq!(settings.audit_origin, "ci");
        assert_eq!(settings.default_password_length, 24);
        assert_eq!(
            settings.dictionary(tmp.path()),
            Some(tmp.path().join("words.txt"))
        );
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwvault.toml"), "argon2_iterations = 1\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.argon2_iterations, 1);
        assert_eq!(settings.data_dir, ".pwvault");
        assert_eq!(settings.argon2_parallelism, 2);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(PwVaultError::ConfigError(_))));
    }

    #[test]
    fn store_path_builds_correct_path() {
        let s = Settings::default();
        let project = Path::new("/home/user/project");
        assert_eq!(
            s.store_path(project),
            PathBuf::from("/home/user/project/.pwvault/vaults.db")
        );
    }

    #[test]
    fn store_path_respects_custom_data_dir() {
        let s = Settings {
            data_dir: "secrets".to_string(),
            ..Settings::default()
        };
        let project = Path::new("/home/user/project");
        assert_eq!(
            s.store_path(project),
            PathBuf::from("/home/user/project/secrets/vaults.db")
        );
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory converted themes are written to.
    /// When unset, output goes next to the input file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Default input directory for `batch`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_dir: Option<String>,
    /// Pretty-print output JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: None,
            theme_dir: None,
            pretty: default_pretty(),
        }
    }
}

impl Settings {
    /// Returns the config directory path (~/.monaco-theme)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".monaco-theme"))
    }

    /// Returns the config file path (~/.monaco-theme/settings.json)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.json"))
    }

    /// Loads settings from the config file, returns default if not found or invalid
    pub fn load() -> Self {
        match Self::load_with_error() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::debug!(%err, "using default settings");
                Self::default()
            }
        }
    }

    /// Loads settings from the config file with error information.
    /// A missing file is not an error.
    pub fn load_with_error() -> Result<Self> {
        let config_path = Self::config_path().ok_or(ThemeError::NoConfigDir)?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ThemeError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Saves settings to the config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path().ok_or(ThemeError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    /// Saves settings using atomic write pattern
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
                // Set directory permissions to user-only on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = fs::Permissions::from_mode(0o700);
                    let _ = fs::set_permissions(dir, perms);
                }
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        crate::convert::write_atomic(path, &content)
    }

    /// Output directory as a path, if configured
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output_dir.as_deref().map(PathBuf::from)
    }

    /// Input directory for batch conversion, falling back to the current directory
    pub fn theme_dir(&self) -> PathBuf {
        self.theme_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.pretty);
        assert_eq!(settings.output_dir, None);
        assert_eq!(settings.theme_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_parse_partial_json() {
        let json = r#"{"output_dir":"/tmp/monaco"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.output_dir(), Some(PathBuf::from("/tmp/monaco")));
        assert!(settings.pretty);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            output_dir: Some("/out".to_string()),
            theme_dir: Some("/themes".to_string()),
            pretty: false,
        };
        settings.save_to(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ThemeError::Json { .. }));
        assert!(err.to_string().contains("settings.json"));
    }
}

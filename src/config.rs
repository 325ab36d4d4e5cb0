use crate::error::LocationError;
use crate::search::DEFAULT_RESULT_CAP;
use crate::selection::TypingPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "picker_config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Rows kept by every filtered list.
    pub result_cap: usize,
    /// Typing over a selected value drops the selection and its children.
    pub invalidate_on_type: bool,
    /// Directory with replacement `regions.json`, `provinces.json`,
    /// `cities.json` and `barangays.json`. Bundled tables when unset.
    pub dataset_dir: Option<PathBuf>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            result_cap: DEFAULT_RESULT_CAP,
            invalidate_on_type: false,
            dataset_dir: None,
        }
    }
}

impl PickerConfig {
    pub fn typing_policy(&self) -> TypingPolicy {
        TypingPolicy {
            invalidate_on_type: self.invalidate_on_type,
        }
    }
}

/// Where the config lives inside `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE)
}

/// [`load_config`] on the default file name inside `dir`.
pub fn load_config_in(dir: &Path) -> Result<PickerConfig, LocationError> {
    load_config(&config_path(dir))
}

/// Read the config at `path`; defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<PickerConfig, LocationError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(PickerConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| LocationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LocationError::Config {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_config(path: &Path, config: &PickerConfig) -> Result<(), LocationError> {
    let content = serde_json::to_string_pretty(config).map_err(|source| LocationError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(|source| LocationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&config_path(dir.path())).unwrap();
        assert_eq!(config, PickerConfig::default());
        assert_eq!(config.result_cap, 100);
        assert!(!config.typing_policy().invalidate_on_type);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());
        fs::write(&path, r#"{"invalidate_on_type": true}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.invalidate_on_type);
        assert_eq!(config.result_cap, DEFAULT_RESULT_CAP);
        assert_eq!(config.dataset_dir, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());
        let config = PickerConfig {
            result_cap: 25,
            invalidate_on_type: true,
            dataset_dir: Some(PathBuf::from("/srv/psgc")),
        };
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config_in(dir.path()).unwrap(), PickerConfig::default());

        let config = PickerConfig {
            result_cap: 40,
            ..Default::default()
        };
        save_config(&config_path(dir.path()), &config).unwrap();
        assert!(dir.path().join("picker_config.json").exists());
        assert_eq!(load_config_in(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());
        fs::write(&path, "result_cap = 5").unwrap();
        assert!(matches!(load_config(&path), Err(LocationError::Config { .. })));
    }
}

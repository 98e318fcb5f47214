use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::util::paths::{default_image_path, default_save_path};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Name of the config file, looked up in the tournament directory
pub const CONFIG_FILENAME: &str = "config.toml";

/// Solver name shipped in the example config
const PLACEHOLDER_USER: &str = "Solver";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Please set your user name in {0}")]
    PlaceholderUser(PathBuf),
}

/// Tool configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Solver name written into exported solutions
    pub user: String,
    /// Game user whose save is used for play, export, copy and stats
    pub play_save: String,
    /// Game user whose save receives imported solutions
    pub import_save: String,
    /// Directory holding `.locals` and `save/`
    pub save_path: PathBuf,
    /// The game's texture directory
    pub image_path: PathBuf,
    /// Tournament directory (rounds are its subdirectories)
    pub working_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: PLACEHOLDER_USER.to_string(),
            play_save: "TournamentPlay".to_string(),
            import_save: "TournamentImport".to_string(),
            save_path: default_save_path(),
            image_path: default_image_path(),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub user: Option<String>,
    pub play_save: Option<String>,
    pub import_save: Option<String>,
    pub save_path: Option<PathBuf>,
    pub image_path: Option<PathBuf>,
}

impl Config {
    /// Load `config.toml` from the tournament directory, merging with
    /// defaults. The bundled example is written out on first run.
    pub fn load(working_dir: &Path) -> Result<Self, ConfigError> {
        let config_file = working_dir.join(CONFIG_FILENAME);

        if !config_file.exists() {
            println!("Writing default config to {}", config_file.display());
            Self::create_default_config(&config_file);
        }

        println!("Reading config from {}", config_file.display());
        let contents = fs::read_to_string(&config_file).map_err(|source| ConfigError::Io {
            path: config_file.clone(),
            source,
        })?;
        let toml_config =
            toml::from_str::<TomlConfig>(&contents).map_err(|source| ConfigError::Parse {
                path: config_file.clone(),
                source,
            })?;

        let config = Config::default()
            .with_working_dir(working_dir.to_path_buf())
            .merge(toml_config);

        if config.user == PLACEHOLDER_USER {
            return Err(ConfigError::PlaceholderUser(config_file));
        }
        Ok(config)
    }

    /// Apply the values set in a config file on top of this one
    pub fn merge(mut self, toml_config: TomlConfig) -> Self {
        if let Some(user) = toml_config.user {
            self.user = user;
        }
        if let Some(play_save) = toml_config.play_save {
            self.play_save = play_save;
        }
        if let Some(import_save) = toml_config.import_save {
            self.import_save = import_save;
        }
        if let Some(save_path) = toml_config.save_path {
            self.save_path = save_path;
        }
        if let Some(image_path) = toml_config.image_path {
            self.image_path = image_path;
        }
        self
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write default config");
            eprintln!("Failed to write default config: {}", e);
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_example_config_parses() {
        let parsed: TomlConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed.user.as_deref(), Some(PLACEHOLDER_USER));
    }

    #[test]
    fn test_first_run_writes_example_and_rejects_placeholder() {
        let dir = tempdir().unwrap();
        let result = Config::load(dir.path());
        assert!(matches!(result, Err(ConfigError::PlaceholderUser(_))));
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap(),
            EXAMPLE_CONFIG
        );
    }

    #[test]
    fn test_load_merges_over_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "user = \"Alice\"\nplay_save = \"Play\"\nsave_path = \"/tmp/spacechem\"\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.user, "Alice");
        assert_eq!(config.play_save, "Play");
        assert_eq!(config.import_save, Config::default().import_save);
        assert_eq!(config.save_path, PathBuf::from("/tmp/spacechem"));
        assert_eq!(config.working_dir, dir.path());
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "user = ").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}

mod settings;

pub use settings::{Config, ConfigError, TomlConfig, CONFIG_FILENAME, EXAMPLE_CONFIG};

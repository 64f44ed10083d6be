/// Player configuration
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use ytmp_core::RepeatMode;
use ytmp_storage::DEFAULT_PREFIX;

/// Construction-time options for [`crate::Player`]
///
/// Unset options leave the built-in defaults alone; a restored snapshot then
/// overrides both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Host element the provider renders into
    pub container_id: String,

    #[serde(default)]
    pub autoplay: Option<bool>,

    /// Initial volume (0-100)
    #[serde(default)]
    pub volume: Option<u8>,

    #[serde(default)]
    pub repeat: Option<RepeatMode>,

    #[serde(default)]
    pub shuffle: Option<bool>,

    /// Persist and restore snapshots
    #[serde(default = "default_save_state")]
    pub save_state: bool,

    /// Key prefix for persisted data
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_save_state() -> bool {
    true
}

fn default_storage_key() -> String {
    DEFAULT_PREFIX.to_string()
}

impl PlayerConfig {
    /// Configuration with only the container set
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            autoplay: None,
            volume: None,
            repeat: None,
            shuffle: None,
            save_state: default_save_state(),
            storage_key: default_storage_key(),
        }
    }

    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = Some(repeat);
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = Some(shuffle);
        self
    }

    #[must_use]
    pub fn with_save_state(mut self, save_state: bool) -> Self {
        self.save_state = save_state;
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables prefixed with `YTMP_` (for example
    /// `YTMP_CONTAINER_ID`, `YTMP_VOLUME`) override the file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        if let Some(path) = path {
            if path.exists() {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
        }

        // Override with environment variables (prefixed with YTMP_)
        settings = settings.add_source(config::Environment::with_prefix("YTMP").try_parsing(true));

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without consulting the environment
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "container_id must not be empty".to_string(),
            ));
        }

        if let Some(volume) = self.volume {
            if volume > 100 {
                return Err(ConfigError::Invalid(format!(
                    "volume must be between 0 and 100, got {volume}"
                )));
            }
        }

        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PlayerConfig::new("player");
        assert!(config.save_state);
        assert_eq!(config.storage_key, "ytMusicPlayer");
        assert_eq!(config.volume, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_toml() {
        let config = PlayerConfig::from_toml(
            r#"
            container_id = "yt-player"
            volume = 40
            repeat = "one"
            shuffle = true
            save_state = false
            "#,
        )
        .unwrap();

        assert_eq!(config.container_id, "yt-player");
        assert_eq!(config.volume, Some(40));
        assert_eq!(config.repeat, Some(RepeatMode::One));
        assert_eq!(config.shuffle, Some(true));
        assert_eq!(config.autoplay, None);
        assert!(!config.save_state);
        assert_eq!(config.storage_key, "ytMusicPlayer");
    }

    #[test]
    fn missing_container_is_an_error() {
        assert!(matches!(
            PlayerConfig::from_toml("volume = 10"),
            Err(ConfigError::Load(_))
        ));
        assert!(matches!(
            PlayerConfig::from_toml("container_id = \"  \""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let config = PlayerConfig::new("player").with_volume(101);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ytmp.toml");
        std::fs::write(
            &path,
            "container_id = \"from-file\"\nstorage_key = \"custom\"\n",
        )
        .unwrap();

        let config = PlayerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.container_id, "from-file");
        assert_eq!(config.storage_key, "custom");
    }
}

//! TOML options store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::OptionsStore;
use crate::domain::error::ConfigError;
use crate::domain::options::Options;

/// Options file under the user's config directory
pub struct TomlOptionsStore {
    path: PathBuf,
}

impl TomlOptionsStore {
    /// Store at `<config dir>/onlyr/options.toml`
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("onlyr");

        Self {
            path: config_dir.join("options.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<Options, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(options: &Options) -> Result<String, ConfigError> {
        toml::to_string_pretty(options).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for TomlOptionsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptionsStore for TomlOptionsStore {
    async fn load(&self) -> Result<Options, ConfigError> {
        if !self.exists() {
            return Ok(Options::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    async fn save(&self, options: &Options) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(options)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&Options::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::AudioCodec;
    use tempfile::TempDir;

    #[test]
    fn default_path_is_under_onlyr() {
        let path = TomlOptionsStore::new().path();
        assert!(path.to_string_lossy().contains("onlyr"));
        assert!(path.to_string_lossy().ends_with("options.toml"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let options = TomlOptionsStore::parse_toml(
            r#"
sample_rate = 22050
codec = "wav"
"#,
        )
        .unwrap();

        assert_eq!(options.sample_rate(), 22050);
        assert_eq!(options.codec(), AudioCodec::Wav);
        assert_eq!(options.mp3_bit_rate(), 96);
        assert!(options.fade_out());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        assert!(matches!(
            TomlOptionsStore::parse_toml("sample_rate = [oops"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = TomlOptionsStore::with_path(dir.path().join("options.toml"));

        assert!(!store.exists());
        assert_eq!(store.load().await.unwrap(), Options::default());
    }

    #[tokio::test]
    async fn save_creates_parent_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = TomlOptionsStore::with_path(dir.path().join("nested/options.toml"));

        let mut options = Options::default();
        options.set_genre("Lecture");
        options.set_sample_rate(48000).unwrap();
        store.save(&options).await.unwrap();

        assert_eq!(store.load().await.unwrap(), options);
    }

    #[tokio::test]
    async fn init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = TomlOptionsStore::with_path(dir.path().join("options.toml"));

        store.init().await.unwrap();
        assert!(matches!(
            store.init().await,
            Err(ConfigError::AlreadyExists(_))
        ));
    }
}

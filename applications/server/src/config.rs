/// Server configuration
use crate::error::{Result, ServerError};
use mooseek_metadata::ScanConfig;
use mooseek_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default)]
    pub assets: AssetSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_sync")]
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Directory the catalog is built from and streams are served out of
    #[serde(default = "default_library_root")]
    pub root: PathBuf,

    /// Audio file extensions to index (lowercase, no dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetSettings {
    /// Directory of companion UI files; the embedded bundle is used when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSettings {
    /// Outbound messages buffered per client before it is dropped
    #[serde(default = "default_client_buffer")]
    pub client_buffer: usize,
}

impl LibrarySettings {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            extensions: self.extensions.iter().map(|e| e.to_lowercase()).collect(),
            ..ScanConfig::default()
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` is required to exist when given; otherwise `./config.toml` is
    /// read if present. Variables such as `MOOSEEK_SERVER__PORT=9000`
    /// override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("MOOSEEK")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library.extensions")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("server.port must not be 0".to_string()));
        }

        if self.sync.client_buffer == 0 {
            return Err(ServerError::Config(
                "sync.client_buffer must be at least 1".to_string(),
            ));
        }

        if self.library.extensions.is_empty() {
            return Err(ServerError::Config(
                "library.extensions must list at least one extension".to_string(),
            ));
        }

        if let Some(dir) = &self.assets.dir {
            if !dir.is_dir() {
                return Err(ServerError::Config(format!(
                    "assets.dir {:?} is not a directory",
                    dir
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        root: default_library_root(),
        extensions: default_extensions(),
    }
}

fn default_library_root() -> PathBuf {
    PathBuf::from("./music")
}

fn default_extensions() -> Vec<String> {
    ScanConfig::default().extensions
}

fn default_sync() -> SyncSettings {
    SyncSettings {
        client_buffer: default_client_buffer(),
    }
}

fn default_client_buffer() -> usize {
    32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            library: default_library(),
            assets: AssetSettings::default(),
            playback: PlaybackConfig::default(),
            sync: default_sync(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mooseek_core::{RepeatMode, ShuffleStrategyId};
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.sync.client_buffer, 32);
        assert_eq!(config.playback.restart_threshold_ms, 3000);
        assert_eq!(config.playback.shuffle_strategy, ShuffleStrategyId::Miller);
        assert!(config.library.extensions.iter().any(|e| e == "flac"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9123

[library]
root = "/srv/music"
extensions = ["mp3"]

[playback]
repeat = "all"
shuffle_strategy = "cycle"

[sync]
client_buffer = 4
"#
        )
        .unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 9123);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.library.root, PathBuf::from("/srv/music"));
        assert_eq!(config.library.extensions, vec!["mp3".to_string()]);
        assert_eq!(config.playback.repeat, RepeatMode::All);
        assert_eq!(config.playback.shuffle_strategy, ShuffleStrategyId::Cycle);
        assert_eq!(config.playback.restart_threshold_ms, 3000);
        assert_eq!(config.sync.client_buffer, 4);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = ServerConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ServerError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_client_buffer() {
        let mut config = ServerConfig::default();
        config.sync.client_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_extensions() {
        let mut config = ServerConfig::default();
        config.library.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn scan_config_lowercases_extensions() {
        let mut config = ServerConfig::default();
        config.library.extensions = vec!["MP3".to_string(), "Flac".to_string()];
        assert_eq!(
            config.library.scan_config().extensions,
            vec!["mp3".to_string(), "flac".to_string()]
        );
    }
}

/// CLI configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,

    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            ytdlp_path: default_ytdlp_path(),
        }
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` is read if
    /// present. `CADENCE_`-prefixed variables override both
    /// (`CADENCE_LIBRARY_DIR=/srv/music`).
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings.build()?.try_deserialize()
    }
}

// Default values
fn default_library_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_sources() {
        let config = CliConfig::default();
        assert_eq!(config.library_dir, PathBuf::from("."));
        assert_eq!(config.ytdlp_path, PathBuf::from("yt-dlp"));
    }

    #[test]
    fn reads_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            r#"
library_dir = "/srv/music"
ytdlp_path = "/opt/bin/yt-dlp"
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();

        assert_eq!(config.library_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.ytdlp_path, PathBuf::from("/opt/bin/yt-dlp"));
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}

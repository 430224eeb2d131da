use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where game files are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetSource {
    /// Loose files in a directory.
    Directory { path: PathBuf },
    /// A packed `.arx` archive.
    Arx { path: PathBuf },
}

impl Default for AssetSource {
    fn default() -> Self {
        Self::Directory {
            path: PathBuf::from("."),
        }
    }
}

impl AssetSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Directory { .. } => "Directory",
            Self::Arx { .. } => "Arx archive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theaters_file: PathBuf,
    pub rules_file: PathBuf,
    /// Theater loaded at startup.
    pub theater: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub assets: AssetSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theaters_file: PathBuf::from("theaters.toml"),
            rules_file: PathBuf::from("rules.toml"),
            theater: "Temperate".to_string(),
            log_filter: "info".to_string(),
            assets: AssetSource::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings = toml::from_str(
            r#"
theater = "Snow"

[assets]
kind = "arx"
path = "game.arx"
"#,
        )
        .unwrap();

        assert_eq!(settings.theater, "Snow");
        assert_eq!(
            settings.assets,
            AssetSource::Arx {
                path: PathBuf::from("game.arx")
            }
        );
        assert_eq!(settings.log_filter, "info");
        assert_eq!(settings.rules_file, PathBuf::from("rules.toml"));
    }

    #[test]
    fn round_trips_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);
    }
}

//! Application-level configuration loading, including the target catalog and
//! the player color palette.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use rand::seq::IndexedRandom;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "NEON_HUNT_BACK_CONFIG_PATH";

/// Number of rounds in a full game.
pub const MAX_ROUNDS: u32 = 10;
/// Points awarded for a correct capture.
pub const SCORE_AWARD: u32 = 100;
/// Shortest accepted round duration, in seconds.
pub const MIN_ROUND_SECS: u64 = 5;
/// Longest accepted round duration, in seconds.
pub const MAX_ROUND_SECS: u64 = 90;
/// Round duration used when the start request carries none (or garbage).
pub const DEFAULT_ROUND_SECS: u64 = 25;
/// Display names are truncated to this many characters.
pub const MAX_NAME_LEN: usize = 10;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    catalog: Vec<String>,
    palette: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in catalog and palette.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        targets = app_config.catalog.len(),
                        colors = app_config.palette.len(),
                        "loaded catalog and palette from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Immutable list of recognizable object labels.
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Pick a random color tag from the palette. No uniqueness guarantee.
    pub fn random_color(&self) -> String {
        let mut rng = rand::rng();
        self.palette
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| "#FFFFFF".into())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            palette: default_palette(),
        }
    }
}

/// Clamp a requested round duration into `[MIN_ROUND_SECS, MAX_ROUND_SECS]`.
///
/// Clients send the duration as whatever their form produced: a number, a
/// numeric string, or garbage. Anything unparseable (or absent) falls back to
/// [`DEFAULT_ROUND_SECS`] instead of being rejected.
pub fn clamp_duration(requested: Option<&Value>) -> u64 {
    let parsed = match requested {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(secs) => secs.clamp(MIN_ROUND_SECS as i64, MAX_ROUND_SECS as i64) as u64,
        None => DEFAULT_ROUND_SECS,
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    catalog: Vec<String>,
    #[serde(default)]
    palette: Vec<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let catalog = if value.catalog.is_empty() {
            default_catalog()
        } else {
            value.catalog
        };
        let palette = if value.palette.is_empty() {
            default_palette()
        } else {
            value.palette
        };
        Self { catalog, palette }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in target catalog shipped with the binary. Common household objects
/// only; rare detector classes make for unwinnable rounds.
fn default_catalog() -> Vec<String> {
    [
        "bottle", "cup", "keyboard", "mouse", "cell phone", "laptop", "remote", "scissors",
        "book", "backpack", "spoon", "fork", "chair", "banana", "apple", "sandwich", "orange",
        "bowl",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Built-in neon color palette for player tags.
fn default_palette() -> Vec<String> {
    ["#FF0055", "#00FF41", "#00E5FF", "#FFFF00", "#BD00FF"]
        .into_iter()
        .map(String::from)
        .collect()
}

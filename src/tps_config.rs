// User preferences persisted as TOML
// Only the selected difficulty and display options are kept; games are never saved

use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::tps_game::Difficulty;

pub const APP_NAME: &str = "tapswpr";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty, // Applied to the first board and to every new game
    pub ascii_icons: bool,      // Use ASCII fallback glyphs
    pub language: String,       // Language code ("en" or "zh")
    pub log_level: String,      // Level name (error..trace, off) used when RUST_LOG is unset
}

impl Default for Config {
    fn default() -> Self {
        // Pick up the system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let language = if system_lang.to_lowercase().starts_with("zh") {
            "zh"
        } else {
            "en"
        };

        Config {
            difficulty: Difficulty::Easy,
            ascii_icons: false,
            language: language.to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "tapswpr", APP_NAME)
}

/// Get the configuration file path
/// Falls back to the current directory if no per-user config directory exists
pub fn config_path() -> Option<PathBuf> {
    let file = format!("{}.toml", APP_NAME);
    if let Some(proj) = project_dirs() {
        return Some(proj.config_dir().join(file));
    }
    env::current_dir().ok().map(|dir| dir.join(file))
}

/// Directory for runtime data such as the log file
pub fn data_dir() -> Option<PathBuf> {
    match project_dirs() {
        Some(proj) => Some(proj.data_local_dir().to_path_buf()),
        None => env::current_dir().ok(),
    }
}

/// Parse a config file body; unknown or missing keys fall back to defaults
pub fn parse_config(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load configuration from disk, or create the default file if missing
pub fn load_or_create_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if path.exists() {
        match fs::read_to_string(&path).map(|s| parse_config(&s)) {
            Ok(Ok(cfg)) => return cfg,
            Ok(Err(e)) => warn!("ignoring malformed config {}: {}", path.display(), e),
            Err(e) => warn!("cannot read config {}: {}", path.display(), e),
        }
        return Config::default();
    }
    let cfg = Config::default();
    save_config(&cfg);
    cfg
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    let Some(path) = config_path() else {
        return;
    };
    let body = match toml::to_string(cfg) {
        Ok(s) => s,
        Err(e) => {
            warn!("cannot serialize config: {}", e);
            return;
        }
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(e) = fs::write(&path, body) {
        warn!("cannot write config {}: {}", path.display(), e);
    }
}

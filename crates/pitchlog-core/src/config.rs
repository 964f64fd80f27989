// Configuration loading and parsing (config/pitchlog.toml under the data home).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::events::EventKind;
use crate::formation;
use crate::session::{self, GameType};

/// Built-in configuration, written to `config/pitchlog.toml` on first run.
pub const DEFAULT_CONFIG: &str = include_str!("../defaults/pitchlog.toml");

/// Environment variable that overrides the data home.
pub const HOME_ENV: &str = "PITCHLOG_HOME";

const CONFIG_FILE: &str = "pitchlog.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to write default config: {message}")]
    DefaultsWriteError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Fully loaded configuration plus the directory relative paths resolve
/// against.
#[derive(Debug, Clone)]
pub struct Config {
    pub user: UserConfig,
    pub session: SessionConfig,
    pub pitch: PitchConfig,
    pub storage: StorageConfig,
    pub data_home: PathBuf,
}

/// Raw deserialization target for pitchlog.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    user: UserConfig,
    session: SessionConfig,
    pitch: PitchConfig,
    storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub id: String,
}

/// Initial values for a new capture screen.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub game_type: GameType,
    pub formation: String,
    pub event_kind: EventKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PitchConfig {
    /// Pixel threshold for picking a formation slot, in widget units.
    pub slot_hit_radius: f64,
    /// Height of one terminal cell in widget units (a column is one unit).
    pub cell_aspect: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub history_dir: String,
    pub db_path: String,
}

impl Config {
    /// Where exported sessions go.
    pub fn history_dir(&self) -> PathBuf {
        self.resolve(&self.storage.history_dir)
    }

    /// SQLite journal location. `:memory:` is passed through untouched.
    pub fn db_path(&self) -> PathBuf {
        if self.storage.db_path == ":memory:" {
            return PathBuf::from(":memory:");
        }
        self.resolve(&self.storage.db_path)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_home.join("logs")
    }

    fn resolve(&self, p: &str) -> PathBuf {
        let path = Path::new(p);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_home.join(path)
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// The directory holding config, logs, the journal and exports:
/// `$PITCHLOG_HOME`, else the platform data directory, else the current
/// directory.
pub fn data_home() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home);
    }
    if let Some(dirs) = directories::ProjectDirs::from("", "", "pitchlog") {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load and validate `config/pitchlog.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not write defaults.
/// Prefer `load_config()` which handles first-run initialization.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path, base_dir)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(text: &str, path: &Path, base_dir: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Config {
        user: file.user,
        session: file.session,
        pitch: file.pitch,
        storage: file.storage,
        data_home: base_dir.to_path_buf(),
    })
}

/// Write the built-in config to `config/pitchlog.toml` unless one exists.
/// Returns the path when a file was written.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsWriteError {
        message: format!("failed to create config directory {}: {e}", config_dir.display()),
    })?;

    let target = config_dir.join(CONFIG_FILE);
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, DEFAULT_CONFIG.as_bytes()).map_err(|e| {
                ConfigError::DefaultsWriteError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsWriteError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Convenience wrapper: loads config from the data home, writing the
/// default file first if needed.
pub fn load_config() -> Result<Config, ConfigError> {
    let home = data_home();
    ensure_config_file(&home)?;
    load_config_from(&home)
}

/// The built-in configuration, rooted at `base_dir`, without touching disk.
pub fn builtin_config(base_dir: &Path) -> Result<Config, ConfigError> {
    let config = parse_config(DEFAULT_CONFIG, Path::new("<built-in>"), base_dir)?;
    validate(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if !session::is_valid_user_id(&config.user.id) {
        return Err(invalid(
            "user.id",
            format!("must be a plain directory name, got {:?}", config.user.id),
        ));
    }

    if !formation::is_known_formation(&config.session.formation) {
        let known: Vec<&str> = formation::formation_names().collect();
        return Err(invalid(
            "session.formation",
            format!(
                "unknown formation {:?}, expected one of {}",
                config.session.formation,
                known.join(", ")
            ),
        ));
    }

    let pitch_fields: &[(&str, f64)] = &[
        ("pitch.slot_hit_radius", config.pitch.slot_hit_radius),
        ("pitch.cell_aspect", config.pitch.cell_aspect),
    ];
    for (name, val) in pitch_fields {
        if !val.is_finite() || *val <= 0.0 {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }

    let storage_fields: &[(&str, &str)] = &[
        ("storage.history_dir", config.storage.history_dir.as_str()),
        ("storage.db_path", config.storage.db_path.as_str()),
    ];
    for (name, val) in storage_fields {
        if val.trim().is_empty() {
            return Err(invalid(name, "must not be empty"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh directory with `config/pitchlog.toml` holding `text`.
    fn write_config(name: &str, text: &str) -> PathBuf {
        let tmp =
            std::env::temp_dir().join(format!("pitchlog_config_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn defaults_parse_and_validate() {
        let tmp = write_config("defaults", DEFAULT_CONFIG);
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.user.id, "default_user");
        assert_eq!(config.session.game_type, GameType::Match);
        assert_eq!(config.session.formation, "4-4-2");
        assert_eq!(config.session.event_kind, EventKind::ShotOn);
        assert!((config.pitch.slot_hit_radius - 6.0).abs() < f64::EPSILON);
        assert!((config.pitch.cell_aspect - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.history_dir(), tmp.join("data/matches_history"));
        assert_eq!(config.db_path(), tmp.join("pitchlog.db"));
        assert_eq!(config.log_dir(), tmp.join("logs"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn builtin_config_needs_no_file() {
        let base = std::env::temp_dir().join("pitchlog_config_never_created");
        let config = builtin_config(&base).unwrap();
        assert_eq!(config.data_home, base);
        assert_eq!(config.history_dir(), base.join("data/matches_history"));
        assert!(!base.exists());
    }

    #[test]
    fn ensure_config_file_writes_once() {
        let tmp =
            std::env::temp_dir().join(format!("pitchlog_config_ensure_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);

        let written = ensure_config_file(&tmp).unwrap();
        assert_eq!(written, Some(tmp.join("config").join(CONFIG_FILE)));

        // A user edit survives the second call.
        let path = tmp.join("config").join(CONFIG_FILE);
        let edited = DEFAULT_CONFIG.replace("default_user", "sam");
        fs::write(&path, &edited).unwrap();
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        assert_eq!(load_config_from(&tmp).unwrap().user.id, "sam");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp =
            std::env::temp_dir().join(format!("pitchlog_config_missing_{}", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("config/pitchlog.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn parse_error_names_the_file() {
        let tmp = write_config("parse", "[user\nid = 1");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("pitchlog.toml"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_event_kind_is_a_parse_error() {
        let tmp = write_config("kind", &DEFAULT_CONFIG.replace("\"shot_on\"", "\"header\""));
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn game_type_uses_display_labels() {
        let tmp = write_config("game_type", &DEFAULT_CONFIG.replace("\"Match\"", "\"Fun Game\""));
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.session.game_type, GameType::FunGame);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_formation() {
        let tmp = write_config("formation", &DEFAULT_CONFIG.replace("\"4-4-2\"", "\"4-2-4\""));
        expect_field(load_config_from(&tmp).unwrap_err(), "session.formation");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_path_like_user_id() {
        let tmp = write_config("user", &DEFAULT_CONFIG.replace("\"default_user\"", "\"../etc\""));
        expect_field(load_config_from(&tmp).unwrap_err(), "user.id");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_positive_pitch_values() {
        let tmp = write_config(
            "radius",
            &DEFAULT_CONFIG.replace("slot_hit_radius = 6.0", "slot_hit_radius = 0.0"),
        );
        expect_field(load_config_from(&tmp).unwrap_err(), "pitch.slot_hit_radius");
        let _ = fs::remove_dir_all(&tmp);

        let tmp = write_config(
            "aspect",
            &DEFAULT_CONFIG.replace("cell_aspect = 2.0", "cell_aspect = -1.0"),
        );
        expect_field(load_config_from(&tmp).unwrap_err(), "pitch.cell_aspect");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_storage_paths() {
        let tmp = write_config(
            "storage",
            &DEFAULT_CONFIG.replace("\"pitchlog.db\"", "\"  \""),
        );
        expect_field(load_config_from(&tmp).unwrap_err(), "storage.db_path");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn absolute_and_memory_paths_are_kept() {
        let text = DEFAULT_CONFIG
            .replace("\"pitchlog.db\"", "\":memory:\"")
            .replace("\"data/matches_history\"", "\"/srv/history\"");
        let tmp = write_config("absolute", &text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.db_path(), PathBuf::from(":memory:"));
        assert_eq!(config.history_dir(), PathBuf::from("/srv/history"));
        let _ = fs::remove_dir_all(&tmp);
    }
}

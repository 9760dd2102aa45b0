//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.aurora/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AuroraConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    /// Seconds; 0 or absent means no timeout.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub show_sidebar: Option<bool>,
    pub sidebar_width: Option<u16>,
    pub scroll_tolerance: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SIDEBAR_WIDTH: u16 = 32;
pub const MIN_SIDEBAR_WIDTH: u16 = 16;
/// Rows from the bottom within which the message list keeps following.
pub const DEFAULT_SCROLL_TOLERANCE: u16 = 5;
pub const DEFAULT_LOG_FILE: &str = "aurora.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub show_sidebar: bool,
    pub sidebar_width: u16,
    pub scroll_tolerance: u16,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    /// Problems noticed while resolving. Resolution runs before the logger
    /// exists, so `main` logs these once it is up.
    pub warnings: Vec<String>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub log_level: Option<String>,
    pub no_sidebar: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.aurora/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".aurora").join("config.toml"))
}

/// Load config from `~/.aurora/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AuroraConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AuroraConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AuroraConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AuroraConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AuroraConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AuroraConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Aurora Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:5000"   # Or set AURORA_BASE_URL, or --base-url
# request_timeout_secs = 0             # 0 = wait forever

# [ui]
# show_sidebar = true                  # --no-sidebar hides it at startup
# sidebar_width = 32
# scroll_tolerance = 5                 # rows from the bottom that still auto-scroll

# [logging]
# file = "aurora.log"
# level = "debug"                      # "off", "error", "warn", "info", "debug", "trace"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AuroraConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup injected.
pub fn resolve_with_env<F>(config: &AuroraConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("AURORA_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let request_timeout = config
        .backend
        .request_timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    let mut warnings = Vec::new();

    // Log level: CLI → env → config → default; unparseable values fall through
    let log_level = [
        cli.log_level.clone(),
        env("AURORA_LOG_LEVEL"),
        config.logging.level.clone(),
    ]
    .into_iter()
    .flatten()
    .find_map(|level| match level.parse::<LevelFilter>() {
        Ok(filter) => Some(filter),
        Err(_) => {
            warnings.push(format!("Ignoring unknown log level '{level}'"));
            None
        }
    })
    .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        base_url,
        request_timeout,
        show_sidebar: !cli.no_sidebar && config.ui.show_sidebar.unwrap_or(true),
        sidebar_width: config
            .ui
            .sidebar_width
            .unwrap_or(DEFAULT_SIDEBAR_WIDTH)
            .max(MIN_SIDEBAR_WIDTH),
        scroll_tolerance: config
            .ui
            .scroll_tolerance
            .unwrap_or(DEFAULT_SCROLL_TOLERANCE),
        log_file: PathBuf::from(
            config
                .logging
                .file
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        ),
        log_level,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = AuroraConfig::default();
        assert!(config.backend.base_url.is_none());
        assert!(config.ui.show_sidebar.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = AuroraConfig::default();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.request_timeout, None);
        assert!(resolved.show_sidebar);
        assert_eq!(resolved.sidebar_width, DEFAULT_SIDEBAR_WIDTH);
        assert_eq!(resolved.scroll_tolerance, DEFAULT_SCROLL_TOLERANCE);
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = AuroraConfig {
            backend: BackendConfig {
                base_url: Some("http://10.0.0.2:8000".to_string()),
                request_timeout_secs: Some(30),
            },
            ui: UiConfig {
                show_sidebar: Some(false),
                sidebar_width: Some(40),
                scroll_tolerance: Some(2),
            },
            logging: LoggingConfig {
                file: Some("/tmp/a.log".to_string()),
                level: Some("warn".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "http://10.0.0.2:8000");
        assert_eq!(resolved.request_timeout, Some(Duration::from_secs(30)));
        assert!(!resolved.show_sidebar);
        assert_eq!(resolved.sidebar_width, 40);
        assert_eq!(resolved.scroll_tolerance, 2);
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/a.log"));
        assert_eq!(resolved.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = AuroraConfig {
            backend: BackendConfig {
                request_timeout_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.request_timeout, None);
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = AuroraConfig {
            backend: BackendConfig {
                base_url: Some("http://from-config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "AURORA_BASE_URL" => Some("http://from-env".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.base_url, "http://from-env");

        let cli = CliOverrides {
            base_url: Some("http://from-cli".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.base_url, "http://from-cli");
    }

    #[test]
    fn test_no_sidebar_flag_wins() {
        let config = AuroraConfig {
            ui: UiConfig {
                show_sidebar: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            no_sidebar: true,
            ..Default::default()
        };
        assert!(!resolve_with_env(&config, &cli, no_env).show_sidebar);
    }

    #[test]
    fn test_bad_log_level_falls_through() {
        let config = AuroraConfig {
            logging: LoggingConfig {
                level: Some("info".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, no_env);
        assert_eq!(resolved.log_level, LevelFilter::Info);
        assert_eq!(resolved.warnings, vec!["Ignoring unknown log level 'loud'"]);
    }

    #[test]
    fn test_clean_resolution_has_no_warnings() {
        let resolved = resolve_with_env(&AuroraConfig::default(), &CliOverrides::default(), no_env);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_sidebar_width_clamped() {
        let config = AuroraConfig {
            ui: UiConfig {
                sidebar_width: Some(3),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.sidebar_width, MIN_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; the rest stays default
        let toml_str = r#"
[backend]
base_url = "http://localhost:9000"
"#;
        let config: AuroraConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(config.backend.request_timeout_secs.is_none());
        assert!(config.ui.sidebar_width.is_none());
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let config: AuroraConfig = toml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_load_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("aurora-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.backend.base_url.is_none());
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("aurora-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[backend\nbase_url = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nudges::{
    ThrottlePolicy, DEFAULT_DISPLAY_TIMEOUT_SECS, DEFAULT_MAX_NUDGES, DEFAULT_SCAN_INTERVAL,
};
use crate::savings::{SavingsCalculator, DEFAULT_CURRENCY_SYMBOL};

pub const DEFAULT_CONFIG_FILE: &str = "smartshop.toml";
pub const NESTED_CONFIG_FILE: &str = "config/smartshop.toml";

/// Largest display timeout `chrono` can represent.
pub const MAX_DISPLAY_TIMEOUT_SECS: u64 = (i64::MAX / 1_000) as u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub nudges: NudgeConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NudgeConfig {
    pub scan_interval: u32,
    pub max_nudges: u32,
    pub display_timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Dataset file; the built-in demo catalog is used when unset.
    pub path: Option<PathBuf>,
    pub currency_symbol: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub scan_interval: Option<u32>,
    pub max_nudges: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nudges: NudgeConfig {
                scan_interval: DEFAULT_SCAN_INTERVAL,
                max_nudges: DEFAULT_MAX_NUDGES,
                display_timeout_secs: DEFAULT_DISPLAY_TIMEOUT_SECS,
            },
            catalog: CatalogConfig {
                path: None,
                currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl NudgeConfig {
    pub fn throttle_policy(&self) -> ThrottlePolicy {
        ThrottlePolicy { scan_interval: self.scan_interval, max_nudges: self.max_nudges }
    }

    /// Falls back to the default timeout for values `validate` would reject.
    pub fn display_timeout(&self) -> chrono::Duration {
        timeout_duration(self.display_timeout_secs)
            .or_else(|| timeout_duration(DEFAULT_DISPLAY_TIMEOUT_SECS))
            .unwrap_or_else(chrono::Duration::zero)
    }
}

impl CatalogConfig {
    pub fn savings_calculator(&self) -> SavingsCalculator {
        SavingsCalculator::new(self.currency_symbol.clone())
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(nudges) = patch.nudges {
            if let Some(scan_interval) = nudges.scan_interval {
                self.nudges.scan_interval = scan_interval;
            }
            if let Some(max_nudges) = nudges.max_nudges {
                self.nudges.max_nudges = max_nudges;
            }
            if let Some(display_timeout_secs) = nudges.display_timeout_secs {
                self.nudges.display_timeout_secs = display_timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
            if let Some(currency_symbol) = catalog.currency_symbol {
                self.catalog.currency_symbol = currency_symbol;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(interval) = env_override("SMARTSHOP_NUDGES_SCAN_INTERVAL")? {
            self.nudges.scan_interval = interval;
        }
        if let Some(cap) = env_override("SMARTSHOP_NUDGES_MAX_NUDGES")? {
            self.nudges.max_nudges = cap;
        }
        if let Some(secs) = env_override("SMARTSHOP_NUDGES_DISPLAY_TIMEOUT_SECS")? {
            self.nudges.display_timeout_secs = secs;
        }
        if let Some(path) = read_env("SMARTSHOP_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Some(symbol) = read_env("SMARTSHOP_CATALOG_CURRENCY_SYMBOL") {
            self.catalog.currency_symbol = symbol;
        }

        // Short aliases are accepted for the two logging knobs.
        let level = read_env("SMARTSHOP_LOGGING_LEVEL").or_else(|| read_env("SMARTSHOP_LOG_LEVEL"));
        if let Some(level) = level {
            self.logging.level = level;
        }
        let format =
            read_env("SMARTSHOP_LOGGING_FORMAT").or_else(|| read_env("SMARTSHOP_LOG_FORMAT"));
        if let Some(format) = format {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(scan_interval) = overrides.scan_interval {
            self.nudges.scan_interval = scan_interval;
        }
        if let Some(max_nudges) = overrides.max_nudges {
            self.nudges.max_nudges = max_nudges;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_nudges(&self.nudges)?;
        validate_catalog(&self.catalog)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Config file that [`AppConfig::load`] would read without an explicit path.
pub fn detect_config_path() -> Option<PathBuf> {
    resolve_config_path(None)
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Expands `${VAR}` references; an unset variable is an error, not an empty string.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("${") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let close = after_open.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &after_open[..close];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after_open[close + 1..];
    }
    output.push_str(rest);

    Ok(output)
}

fn validate_nudges(nudges: &NudgeConfig) -> Result<(), ConfigError> {
    if nudges.scan_interval == 0 {
        return Err(ConfigError::Validation(
            "nudges.scan_interval must be greater than zero".to_string(),
        ));
    }

    if nudges.display_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "nudges.display_timeout_secs must be greater than zero".to_string(),
        ));
    }

    if timeout_duration(nudges.display_timeout_secs).is_none() {
        return Err(ConfigError::Validation(format!(
            "nudges.display_timeout_secs must be at most {}",
            MAX_DISPLAY_TIMEOUT_SECS
        )));
    }

    Ok(())
}

fn timeout_duration(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs).ok().and_then(chrono::Duration::try_seconds)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.currency_symbol.trim().is_empty() {
        return Err(ConfigError::Validation(
            "catalog.currency_symbol must not be empty".to_string(),
        ));
    }

    if let Some(path) = &catalog.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.path must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_override<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    read_env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: raw })
        })
        .transpose()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    nudges: Option<NudgesPatch>,
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct NudgesPatch {
    scan_interval: Option<u32>,
    max_nudges: Option<u32>,
    display_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
    currency_symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_match_the_standard_throttling_policy() -> Result<(), String> {
        let config = AppConfig::default();

        ensure(config.nudges.scan_interval == 3, "default scan interval should be 3")?;
        ensure(config.nudges.max_nudges == 6, "default nudge cap should be 6")?;
        ensure(config.nudges.display_timeout_secs == 6, "default display timeout should be 6s")?;
        ensure(config.catalog.currency_symbol == "£", "default currency should be sterling")?;
        ensure(config.catalog.path.is_none(), "default catalog should be the built-in one")?;
        ensure(config.validate().is_ok(), "defaults should validate")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_SMARTSHOP_CATALOG", "/data/catalog.json");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("smartshop.toml");
            fs::write(
                &path,
                r#"
[catalog]
path = "${TEST_SMARTSHOP_CATALOG}"
currency_symbol = "€"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.catalog.path == Some(PathBuf::from("/data/catalog.json")),
                "catalog path should be interpolated from environment",
            )?;
            ensure(config.catalog.currency_symbol == "€", "currency should be read from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_SMARTSHOP_CATALOG"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["TEST_SMARTSHOP_UNSET_VAR"]);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("smartshop.toml");
        fs::write(&path, "[logging]\nlevel = \"${TEST_SMARTSHOP_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let error =
            match AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
            {
                Ok(_) => return Err("expected interpolation failure".to_string()),
                Err(error) => error,
            };
        ensure(
            matches!(
                error,
                ConfigError::MissingEnvInterpolation { ref var }
                    if var == "TEST_SMARTSHOP_UNSET_VAR"
            ),
            "error should name the missing variable",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SMARTSHOP_LOG_LEVEL", "warn");
        env::set_var("SMARTSHOP_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["SMARTSHOP_LOG_LEVEL", "SMARTSHOP_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SMARTSHOP_NUDGES_MAX_NUDGES", "9");
        env::set_var("SMARTSHOP_NUDGES_SCAN_INTERVAL", "4");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("smartshop.toml");
            fs::write(
                &path,
                r#"
[nudges]
scan_interval = 5
max_nudges = 2
display_timeout_secs = 10

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    scan_interval: Some(2),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.nudges.scan_interval == 2, "override scan interval should win")?;
            ensure(config.nudges.max_nudges == 9, "env nudge cap should win over file")?;
            ensure(
                config.nudges.display_timeout_secs == 10,
                "file timeout should win over default",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            Ok(())
        })();

        clear_vars(&["SMARTSHOP_NUDGES_MAX_NUDGES", "SMARTSHOP_NUDGES_SCAN_INTERVAL"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SMARTSHOP_NUDGES_SCAN_INTERVAL", "0");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("nudges.scan_interval")
            );
            ensure(has_message, "validation failure should mention nudges.scan_interval")
        })();

        clear_vars(&["SMARTSHOP_NUDGES_SCAN_INTERVAL"]);
        result
    }

    #[test]
    fn oversized_display_timeout_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SMARTSHOP_NUDGES_DISPLAY_TIMEOUT_SECS", "10000000000000000");

        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected an out-of-range timeout to fail validation".to_string()),
            Err(error) => ensure(
                matches!(
                    error,
                    ConfigError::Validation(ref message)
                        if message.contains("nudges.display_timeout_secs")
                ),
                "validation failure should mention nudges.display_timeout_secs",
            ),
        };

        clear_vars(&["SMARTSHOP_NUDGES_DISPLAY_TIMEOUT_SECS"]);
        result
    }

    #[test]
    fn largest_accepted_timeout_converts_without_panicking() -> Result<(), String> {
        let mut config = AppConfig::default();
        config.nudges.display_timeout_secs = super::MAX_DISPLAY_TIMEOUT_SECS;
        ensure(config.validate().is_ok(), "the documented maximum should validate")?;
        ensure(
            config.nudges.display_timeout().num_seconds() == i64::MAX / 1_000,
            "maximum timeout should convert exactly",
        )?;

        config.nudges.display_timeout_secs = u64::MAX;
        ensure(config.validate().is_err(), "u64::MAX should not validate")?;
        ensure(
            config.nudges.display_timeout().num_seconds() == 6,
            "unrepresentable timeout should fall back to the default",
        )
    }

    #[test]
    fn malformed_numeric_env_override_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SMARTSHOP_NUDGES_MAX_NUDGES", "lots");

        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected env override failure".to_string()),
            Err(error) => ensure(
                matches!(
                    error,
                    ConfigError::InvalidEnvOverride { ref key, .. }
                        if key == "SMARTSHOP_NUDGES_MAX_NUDGES"
                ),
                "error should name the offending variable",
            ),
        };

        clear_vars(&["SMARTSHOP_NUDGES_MAX_NUDGES"]);
        result
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing = dir.path().join("absent.toml");

        let error = match AppConfig::load(LoadOptions {
            config_path: Some(missing.clone()),
            require_file: true,
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected missing file failure".to_string()),
            Err(error) => error,
        };

        ensure(
            matches!(error, ConfigError::MissingConfigFile(ref path) if path == &missing),
            "error should name the missing file",
        )
    }
}

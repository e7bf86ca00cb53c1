use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub groupme: GroupMeConfig,
    pub groups: Vec<GroupBotConfig>,
    pub delivery: DeliveryConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct GroupMeConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
}

/// One chat group the bot listens to and the bot identity that answers in it.
#[derive(Clone, Debug)]
pub struct GroupBotConfig {
    pub group_id: String,
    pub bot_id: SecretString,
    pub bot_user_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DeliveryConfig {
    pub async_retries: u32,
    pub sync_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
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
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub groupme_api_base_url: Option<String>,
    /// Replaces the configured group table wholesale.
    pub groups: Option<Vec<(String, String)>>,
    pub server_port: Option<u16>,
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
            database: DatabaseConfig {
                url: "sqlite://memebot.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            groupme: GroupMeConfig {
                api_base_url: "https://api.groupme.com/v3".to_string(),
                timeout_secs: 10,
            },
            groups: Vec::new(),
            delivery: DeliveryConfig {
                async_retries: 2,
                sync_retries: 1,
                base_delay_ms: 250,
                max_delay_ms: 5_000,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
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

impl GroupBotConfig {
    pub fn new(group_id: impl Into<String>, bot_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            bot_id: SecretString::from(bot_id.into()),
            bot_user_id: None,
        }
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
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("memebot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(groupme) = patch.groupme {
            if let Some(api_base_url) = groupme.api_base_url {
                self.groupme.api_base_url = api_base_url;
            }
            if let Some(timeout_secs) = groupme.timeout_secs {
                self.groupme.timeout_secs = timeout_secs;
            }
        }

        if let Some(groups) = patch.groups {
            self.groups = groups
                .into_iter()
                .map(|group| GroupBotConfig {
                    group_id: group.group_id,
                    bot_id: SecretString::from(group.bot_id),
                    bot_user_id: group.bot_user_id,
                })
                .collect();
        }

        if let Some(delivery) = patch.delivery {
            if let Some(async_retries) = delivery.async_retries {
                self.delivery.async_retries = async_retries;
            }
            if let Some(sync_retries) = delivery.sync_retries {
                self.delivery.sync_retries = sync_retries;
            }
            if let Some(base_delay_ms) = delivery.base_delay_ms {
                self.delivery.base_delay_ms = base_delay_ms;
            }
            if let Some(max_delay_ms) = delivery.max_delay_ms {
                self.delivery.max_delay_ms = max_delay_ms;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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
        if let Some(value) = read_env("MEMEBOT_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("MEMEBOT_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("MEMEBOT_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("MEMEBOT_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("MEMEBOT_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("MEMEBOT_GROUPME_API_BASE_URL") {
            self.groupme.api_base_url = value;
        }
        if let Some(value) = read_env("MEMEBOT_GROUPME_TIMEOUT_SECS") {
            self.groupme.timeout_secs = parse_u64("MEMEBOT_GROUPME_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("MEMEBOT_GROUPS") {
            self.groups = parse_group_table("MEMEBOT_GROUPS", &value)?
                .into_iter()
                .map(|(group_id, bot_id)| GroupBotConfig::new(group_id, bot_id))
                .collect();
        }

        if let Some(value) = read_env("MEMEBOT_DELIVERY_ASYNC_RETRIES") {
            self.delivery.async_retries = parse_u32("MEMEBOT_DELIVERY_ASYNC_RETRIES", &value)?;
        }
        if let Some(value) = read_env("MEMEBOT_DELIVERY_SYNC_RETRIES") {
            self.delivery.sync_retries = parse_u32("MEMEBOT_DELIVERY_SYNC_RETRIES", &value)?;
        }

        if let Some(value) = read_env("MEMEBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("MEMEBOT_SERVER_PORT").or_else(|| read_env("PORT")) {
            self.server.port = parse_u16("MEMEBOT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("MEMEBOT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("MEMEBOT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("MEMEBOT_LOGGING_LEVEL").or_else(|| read_env("MEMEBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MEMEBOT_LOGGING_FORMAT").or_else(|| read_env("MEMEBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(api_base_url) = overrides.groupme_api_base_url {
            self.groupme.api_base_url = api_base_url;
        }
        if let Some(groups) = overrides.groups {
            self.groups = groups
                .into_iter()
                .map(|(group_id, bot_id)| GroupBotConfig::new(group_id, bot_id))
                .collect();
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_groupme(&self.groupme)?;
        validate_groups(&self.groups)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("memebot.toml"), PathBuf::from("config/memebot.toml")]
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

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

/// Parses `group=bot,group=bot` pairs.
fn parse_group_table(key: &str, value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (group_id, bot_id) = entry.split_once('=').ok_or_else(|| {
                ConfigError::InvalidEnvOverride { key: key.to_string(), value: entry.to_string() }
            })?;
            Ok((group_id.trim().to_string(), bot_id.trim().to_string()))
        })
        .collect()
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_groupme(groupme: &GroupMeConfig) -> Result<(), ConfigError> {
    let base_url = groupme.api_base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "groupme.api_base_url must start with http:// or https://".to_string(),
        ));
    }

    if groupme.timeout_secs == 0 || groupme.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "groupme.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    Ok(())
}

fn validate_groups(groups: &[GroupBotConfig]) -> Result<(), ConfigError> {
    if groups.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[groups]] entry is required (or set MEMEBOT_GROUPS=group_id=bot_id)"
                .to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for group in groups {
        if group.group_id.trim().parse::<i64>().is_err() {
            return Err(ConfigError::Validation(format!(
                "groups.group_id `{}` must be numeric",
                group.group_id
            )));
        }
        if !seen.insert(group.group_id.trim()) {
            return Err(ConfigError::Validation(format!(
                "groups.group_id `{}` is configured more than once",
                group.group_id
            )));
        }
        if group.bot_id.expose_secret().trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "groups.bot_id is required for group `{}`",
                group.group_id
            )));
        }
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
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

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    groupme: Option<GroupMePatch>,
    groups: Option<Vec<GroupPatch>>,
    delivery: Option<DeliveryPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct GroupMePatch {
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GroupPatch {
    group_id: String,
    bot_id: String,
    bot_user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeliveryPatch {
    async_retries: Option<u32>,
    sync_retries: Option<u32>,
    base_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
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
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
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
    fn file_load_reads_group_table_with_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_MEMEBOT_BOT_ID", "bot-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("memebot.toml");
            fs::write(
                &path,
                r#"
[[groups]]
group_id = "30154628"
bot_id = "${TEST_MEMEBOT_BOT_ID}"

[[groups]]
group_id = "46818924"
bot_id = "testing-bot"
bot_user_id = "555"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.groups.len() == 2, "both groups should be loaded")?;
            ensure(
                config.groups[0].bot_id.expose_secret() == "bot-from-env",
                "bot id should be interpolated from environment",
            )?;
            ensure(
                config.groups[1].bot_user_id.as_deref() == Some("555"),
                "bot user id should be read from file",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_MEMEBOT_BOT_ID"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MEMEBOT_GROUPS", "1=bot-1");
        env::set_var("MEMEBOT_LOG_LEVEL", "warn");
        env::set_var("MEMEBOT_LOG_FORMAT", "pretty");

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

        clear_vars(&["MEMEBOT_GROUPS", "MEMEBOT_LOG_LEVEL", "MEMEBOT_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MEMEBOT_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("MEMEBOT_GROUPS", "100=env-bot, 200=env-bot-2");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("memebot.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[[groups]]
group_id = "1"
bot_id = "file-bot"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.groups.len() == 2, "env group table should replace the file table")?;
            ensure(config.groups[1].group_id == "200", "env groups keep their order")?;
            ensure(
                config.groups[1].bot_id.expose_secret() == "env-bot-2",
                "env bot id should win over file",
            )?;
            Ok(())
        })();

        clear_vars(&["MEMEBOT_DATABASE_URL", "MEMEBOT_GROUPS"]);
        result
    }

    #[test]
    fn validation_requires_a_group() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&["MEMEBOT_GROUPS"]);

        let error = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };
        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("[[groups]]")
        );
        ensure(has_message, "validation failure should mention the groups table")
    }

    #[test]
    fn validation_rejects_non_numeric_and_duplicate_group_ids() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let non_numeric = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                groups: Some(vec![("tsce".to_string(), "bot".to_string())]),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        ensure(
            matches!(non_numeric, Err(ConfigError::Validation(ref m)) if m.contains("numeric")),
            "non numeric group id should fail validation",
        )?;

        let duplicate = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                groups: Some(vec![
                    ("1".to_string(), "bot-a".to_string()),
                    ("1".to_string(), "bot-b".to_string()),
                ]),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        ensure(
            matches!(duplicate, Err(ConfigError::Validation(ref m)) if m.contains("more than once")),
            "duplicate group id should fail validation",
        )
    }

    #[test]
    fn malformed_group_env_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MEMEBOT_GROUPS", "12345");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&["MEMEBOT_GROUPS"]);

        ensure(
            matches!(result, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "MEMEBOT_GROUPS"),
            "group entry without `=` should be rejected",
        )
    }

    #[test]
    fn bot_ids_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MEMEBOT_GROUPS", "1=secret-bot-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("secret-bot-value"), "debug output should not contain bot id")?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["MEMEBOT_GROUPS"]);
        result
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use memebot_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => render(&config),
        Err(error) => format!("config validation failed: {error}"),
    }
}

pub fn render(config: &AppConfig) -> String {
    let path = detect_config_path();
    let doc = load_config_file_doc(path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, Some(env_key), doc.as_ref(), path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "database.url",
        &config.database.url,
        source("database.url", "MEMEBOT_DATABASE_URL"),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        source("database.max_connections", "MEMEBOT_DATABASE_MAX_CONNECTIONS"),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        source("database.timeout_secs", "MEMEBOT_DATABASE_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "groupme.api_base_url",
        &config.groupme.api_base_url,
        source("groupme.api_base_url", "MEMEBOT_GROUPME_API_BASE_URL"),
    ));
    lines.push(render_line(
        "groupme.timeout_secs",
        &config.groupme.timeout_secs.to_string(),
        source("groupme.timeout_secs", "MEMEBOT_GROUPME_TIMEOUT_SECS"),
    ));

    let groups_source = source("groups", "MEMEBOT_GROUPS");
    for (index, group) in config.groups.iter().enumerate() {
        let bot_user = group.bot_user_id.as_deref().unwrap_or("<unset>");
        lines.push(render_line(
            &format!("groups[{index}]"),
            &format!(
                "group_id={} bot_id={} bot_user_id={bot_user}",
                group.group_id,
                redact_bot_id(group.bot_id.expose_secret())
            ),
            groups_source.clone(),
        ));
    }

    lines.push(render_line(
        "delivery.async_retries",
        &config.delivery.async_retries.to_string(),
        source("delivery.async_retries", "MEMEBOT_DELIVERY_ASYNC_RETRIES"),
    ));
    lines.push(render_line(
        "delivery.sync_retries",
        &config.delivery.sync_retries.to_string(),
        source("delivery.sync_retries", "MEMEBOT_DELIVERY_SYNC_RETRIES"),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "MEMEBOT_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "MEMEBOT_SERVER_PORT"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "MEMEBOT_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "MEMEBOT_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("memebot.toml"), PathBuf::from("config/memebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the first four characters so operators can tell bots apart.
fn redact_bot_id(bot_id: &str) -> String {
    let trimmed = bot_id.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let visible: String = trimmed.chars().take(4).collect();
    if visible.len() == trimmed.len() {
        return "<redacted>".to_string();
    }
    format!("{visible}***")
}

use std::time::Duration;

use super::schema::Config;
use crate::input::DEFAULT_REV_ID_COLUMN;
use crate::service::{ServiceConfig, DEFAULT_USER_AGENT};

pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_RETRIES: usize = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Values given on the command line. `None` falls back to the settings file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub user_agent: Option<String>,
    pub batch_size: Option<usize>,
    pub rev_id_column: Option<String>,
}

/// Effective settings for a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: ServiceConfig,
    pub rev_id_column: String,
}

/// Merge command-line overrides over the settings file and validate.
/// Returns all validation errors at once (not just the first).
pub fn resolve_settings(file: Config, overrides: Overrides) -> Result<Settings, Vec<String>> {
    let mut errors = Vec::new();

    let host = overrides.host.or(file.host).unwrap_or_default();
    let host = host.trim().to_string();
    if host.is_empty() {
        errors.push("host: required (pass --host or set it in the config file)".to_string());
    } else if !(host.starts_with("http://") || host.starts_with("https://")) {
        errors.push(format!("host: '{}' must be an http:// or https:// URL", host));
    }

    let batch_size = overrides
        .batch_size
        .or(file.batch_size)
        .unwrap_or(DEFAULT_BATCH_SIZE);
    if batch_size == 0 {
        errors.push("batch_size: must be at least 1".to_string());
    }

    let timeout = match file.timeout.as_deref() {
        None => DEFAULT_TIMEOUT,
        Some(raw) => match humantime::parse_duration(raw.trim()) {
            Ok(d) if !d.is_zero() => d,
            Ok(_) => {
                errors.push("timeout: must be greater than zero".to_string());
                DEFAULT_TIMEOUT
            }
            Err(e) => {
                errors.push(format!("timeout: invalid duration '{}' - {}", raw, e));
                DEFAULT_TIMEOUT
            }
        },
    };

    let rev_id_column = overrides
        .rev_id_column
        .or(file.rev_id_column)
        .unwrap_or_else(|| DEFAULT_REV_ID_COLUMN.to_string());
    if rev_id_column.trim().is_empty() {
        errors.push("rev_id_column: must not be empty".to_string());
    }

    let user_agent = overrides
        .user_agent
        .or(file.user_agent)
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Settings {
        service: ServiceConfig {
            host,
            user_agent,
            timeout,
            retries: file.retries.unwrap_or(DEFAULT_RETRIES),
            batch_size,
        },
        rev_id_column,
    })
}

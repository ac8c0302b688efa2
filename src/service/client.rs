use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "Quality bias study <ahalfaker@wikimedia.org>";

/// Connection settings for the scoring service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures
    pub retries: usize,
    pub batch_size: usize,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to scoring service failed")]
    Transport(#[source] reqwest::Error),

    #[error("scoring service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("scoring service returned an unreadable body")]
    Body(#[source] reqwest::Error),

    #[error("scoring service response has no scores for '{0}'")]
    MissingContext(String),
}

impl ServiceError {
    /// Failures worth retrying: connection problems, timeouts, throttling and
    /// server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ServiceError::Status { status, .. } => *status == 429 || *status >= 500,
            ServiceError::Body(_) | ServiceError::MissingContext(_) => false,
        }
    }
}

/// Create the HTTP client used for all scoring requests
pub fn create_client(config: &ServiceConfig) -> Result<reqwest::Client> {
    // rustls 0.23+ needs a process-wide crypto provider. Err means one is
    // already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .build()
        .context("Failed to create HTTP client")
}

use serde::Deserialize;

/// Optional settings file. Every key can also be given on the command line,
/// which takes precedence.
///
/// Example YAML:
/// ```yaml
/// host: https://ores.wikimedia.org
/// user_agent: "Quality bias study <me@example.org>"
/// batch_size: 50
/// timeout: 30s
/// retries: 3
/// rev_id_column: page_latest
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the scoring service
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Revisions per scoring request
    #[serde(default)]
    pub batch_size: Option<usize>,

    /// Per-request timeout, humantime format ("30s", "2m")
    #[serde(default)]
    pub timeout: Option<String>,

    /// Retries for transient request failures
    #[serde(default)]
    pub retries: Option<usize>,

    /// Input column holding the revision id
    #[serde(default)]
    pub rev_id_column: Option<String>,
}

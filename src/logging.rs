use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Targets from the HTTP stack, held at `warn` whatever the chosen level.
const QUIET_TARGETS: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

/// Build the log filter: `debug` with `--debug`, otherwise `RUST_LOG` or
/// `info`.
pub fn build_filter(debug: bool) -> Result<EnvFilter> {
    let mut filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    for target in QUIET_TARGETS {
        let directive: Directive = format!("{}=warn", target)
            .parse()
            .with_context(|| format!("Invalid log directive for {}", target))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

/// Install the global subscriber. Log lines go to stderr, next to the
/// progress marks.
pub fn init_logging(debug: bool) -> Result<()> {
    let filter = build_filter(debug)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_filter() {
        let filter = build_filter(true).unwrap().to_string();
        assert!(filter.contains("debug"));
        assert!(filter.contains("reqwest=warn"));
        assert!(filter.contains("hyper=warn"));
    }

    #[test]
    fn test_http_targets_always_quiet() {
        let filter = build_filter(false).unwrap().to_string();
        for target in QUIET_TARGETS {
            assert!(filter.contains(&format!("{}=warn", target)));
        }
    }
}

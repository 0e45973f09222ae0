use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global compact subscriber.
pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    fmt()
        .with_env_filter(log_filter(default_level))
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to init logging")
}

/// `RUST_LOG` wins over the configured level; an unparsable level falls back to `info`.
fn log_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::log_filter;

    #[test]
    fn configured_directives_are_kept() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = log_filter("blogicum_server=debug,tower_http=warn");
        let rendered = filter.to_string();
        assert!(rendered.contains("blogicum_server=debug"));
        assert!(rendered.contains("tower_http=warn"));
    }
}

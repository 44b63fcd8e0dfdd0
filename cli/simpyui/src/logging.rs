use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SIMPYUI_LOG";

const DEFAULT_FILTER: &str = "simpyui=warn,simpyui_registry=warn";
const VERBOSE_FILTER: &str = "simpyui=debug,simpyui_registry=debug";

/// Initialize logging for the simpyui CLI.
///
/// Diagnostics go to stderr so stdout stays reserved for command output.
/// The filter comes from `SIMPYUI_LOG` when set, for example
/// `SIMPYUI_LOG=simpyui_registry=trace simpyui add modal`. Otherwise
/// `--verbose` selects debug level and the default is warnings only.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(())
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level() {
        assert!(default_filter(true).contains("debug"));
        assert!(default_filter(false).contains("warn"));
    }

    #[test]
    fn default_filters_parse() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        assert!(EnvFilter::try_new(VERBOSE_FILTER).is_ok());
    }
}

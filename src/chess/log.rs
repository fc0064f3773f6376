use std::env;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "CHESS_FILTER_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

fn env_filter(raw: Option<&str>) -> EnvFilter {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the stderr subscriber. Level comes from `CHESS_FILTER_LOG`
/// (any `EnvFilter` directive, e.g. `warn` or `chess_filter=debug`).
pub fn init() {
    let raw = env::var(LOG_ENV_VAR).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(raw.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::env_filter;

    #[test]
    fn test_missing_value_defaults_to_info() {
        assert_eq!(env_filter(None).to_string(), "info");
        assert_eq!(env_filter(Some("   ")).to_string(), "info");
    }

    #[test]
    fn test_explicit_level_is_used() {
        assert_eq!(env_filter(Some("warn")).to_string(), "warn");
    }
}

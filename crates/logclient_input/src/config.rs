use std::{env, path::PathBuf, sync::Arc};

use collector_core::EntrySink;
use serde::Deserialize;

use crate::{input::LogClientInput, process::CommandSpec, BuildError};

pub(crate) const DEFAULT_ENDPOINT: &str = ":32767";
pub(crate) const DEFAULT_LOG_FILTER: &str = "all";
pub(crate) const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;
pub(crate) const DEFAULT_BINARY: &str = "logClient";
pub(crate) const LOGCLIENT_BINARY_ENV: &str = "LOGCLIENT_BINARY";

/// Configuration for the logClient input stage.
///
/// Hydrated by the collector's configuration loader; every field has a
/// default so an empty table is a valid configuration. Frozen once
/// [`LogClientConfig::build`] runs.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogClientConfig {
    /// gRPC listen address handed to the child via `--gRPC=<endpoint>`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Log-category selector handed to the child via `--logFilter=<filter>`.
    /// Opaque to this stage; `"all"` disables filtering.
    #[serde(default = "default_log_filter", rename = "logfilter")]
    pub log_filter: String,
    /// Child executable override. Falls back to the `LOGCLIENT_BINARY`
    /// environment variable, then `logClient` on `PATH`.
    #[serde(default)]
    pub binary: Option<PathBuf>,
    /// Upper bound for a single stdout line; longer lines are skipped with a
    /// warning instead of growing the read buffer without limit.
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

impl Default for LogClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            log_filter: default_log_filter(),
            binary: None,
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

impl LogClientConfig {
    /// Validates the configuration and freezes it into an inactive input
    /// bound to `output`. No process is launched until `start`.
    pub fn build(self, output: Arc<dyn EntrySink>) -> Result<LogClientInput, BuildError> {
        if self.endpoint.is_empty() {
            return Err(BuildError::EmptyEndpoint);
        }
        let has_port = self
            .endpoint
            .rsplit_once(':')
            .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
        if !has_port {
            return Err(BuildError::InvalidEndpoint {
                endpoint: self.endpoint,
            });
        }
        if self.log_filter.is_empty() {
            return Err(BuildError::EmptyLogFilter);
        }
        if self.max_line_bytes == 0 {
            return Err(BuildError::ZeroLineLimit);
        }

        let spec = CommandSpec {
            binary: self.resolve_binary(),
            endpoint: self.endpoint,
            log_filter: self.log_filter,
        };
        Ok(LogClientInput::new(spec, self.max_line_bytes, output))
    }

    fn resolve_binary(&self) -> PathBuf {
        if let Some(binary) = &self.binary {
            return binary.clone();
        }
        match env::var_os(LOGCLIENT_BINARY_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_BINARY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collector_core::ChannelSink;

    fn sink() -> Arc<dyn EntrySink> {
        let (sink, _rx) = ChannelSink::channel(1);
        Arc::new(sink)
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = LogClientConfig::default();
        assert_eq!(config.endpoint, ":32767");
        assert_eq!(config.log_filter, "all");
        assert_eq!(config.binary, None);
        assert_eq!(config.max_line_bytes, 1024 * 1024);
    }

    #[test]
    fn empty_toml_hydrates_to_defaults() {
        let config: LogClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.endpoint, ":32767");
        assert_eq!(config.log_filter, "all");
    }

    #[test]
    fn toml_overrides_are_applied() {
        let config: LogClientConfig = toml::from_str(
            r#"
            endpoint = "127.0.0.1:9999"
            logfilter = "system"
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "127.0.0.1:9999");
        assert_eq!(config.log_filter, "system");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<LogClientConfig>("endpont = \":1\"").is_err());
    }

    #[test]
    fn invalid_endpoints_fail_build() {
        for endpoint in ["", "no-port", "host:", "host:notaport"] {
            let config = LogClientConfig {
                endpoint: endpoint.to_string(),
                ..LogClientConfig::default()
            };
            assert!(config.build(sink()).is_err(), "accepted `{endpoint}`");
        }
    }

    #[test]
    fn empty_filter_and_zero_limit_fail_build() {
        let config = LogClientConfig {
            log_filter: String::new(),
            ..LogClientConfig::default()
        };
        assert!(matches!(
            config.build(sink()),
            Err(BuildError::EmptyLogFilter)
        ));

        let config = LogClientConfig {
            max_line_bytes: 0,
            ..LogClientConfig::default()
        };
        assert!(matches!(
            config.build(sink()),
            Err(BuildError::ZeroLineLimit)
        ));
    }

    #[test]
    fn explicit_binary_wins_over_default() {
        let config = LogClientConfig {
            binary: Some(PathBuf::from("/opt/agent/logClient")),
            ..LogClientConfig::default()
        };
        assert_eq!(
            config.resolve_binary(),
            PathBuf::from("/opt/agent/logClient")
        );
    }
}

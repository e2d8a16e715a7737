//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use ecos_core::ConnectionInfo;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Console connection settings.
    pub console: ConsoleConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Console connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Console host name or IP.
    pub host: String,
    /// Console TCP port.
    pub port: u16,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-command reply timeout in milliseconds (0 = wait forever).
    pub request_timeout_ms: u64,
    /// Train addressed by train-scoped commands.
    pub train_id: u32,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level, used when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.20".into(),
            port: 15471,
            connect_timeout_ms: 1000,
            request_timeout_ms: 5000,
            train_id: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

// ── Accessors ────────────────────────────────────────────────────

impl ConsoleConfig {
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo::new(self.host.clone(), self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl CliConfig {
    /// Load from a TOML file. A missing file means defaults; a file that
    /// does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, toml::de::Error> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents),
            Err(_) => Ok(Self::default()),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = CliConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("host"));
        assert!(text.contains("train_id"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = CliConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.console.port, 15471);
        assert_eq!(parsed.console.train_id, 1000);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let parsed: CliConfig = toml::from_str("[console]\nhost = \"ecos.local\"\n").unwrap();
        assert_eq!(parsed.console.host, "ecos.local");
        assert_eq!(parsed.console.port, 15471);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn zero_request_timeout_disables_deadline() {
        let mut console = ConsoleConfig::default();
        assert_eq!(console.request_timeout(), Some(Duration::from_millis(5000)));
        console.request_timeout_ms = 0;
        assert_eq!(console.request_timeout(), None);
        assert_eq!(console.connection_info().to_string(), "192.168.1.20:15471");
    }

    #[test]
    fn missing_file_falls_back() {
        let cfg = CliConfig::load(Path::new("/nonexistent/ecos.toml")).unwrap();
        assert_eq!(cfg.console.connect_timeout_ms, 1000);
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("ecos-broken-{}.toml", std::process::id()));
        std::fs::write(&path, "[console\nport = \"not a number\"\n").unwrap();
        let result = CliConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}

use codegrant_auth::config::AuthConfig;
use codegrant_auth::types::{Client, Scope};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Authorization endpoint configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Clients, scopes and login sessions seeded into storage at startup
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.cleanup_interval_secs == 0 {
            return Err("server.cleanup_interval_secs must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Auth validation
        self.auth
            .validate()
            .map_err(|e| format!("auth config error: {e}"))?;
        // Bootstrap validation
        for client in &self.bootstrap.clients {
            client
                .validate()
                .map_err(|e| format!("bootstrap client '{}': {e}", client.client_id))?;
        }
        if self.bootstrap.scopes.iter().any(|s| s.name.trim().is_empty()) {
            return Err("bootstrap.scopes entries must have a name".into());
        }
        if self.bootstrap.sessions.iter().any(|s| s.token.is_empty()) {
            return Err("bootstrap.sessions entries must have a token".into());
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.server.cleanup_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// How often expired authorization codes are purged.
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_cleanup_interval_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Data seeded into the in-memory store on startup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    /// Registered OAuth clients
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Scope registry
    #[serde(default)]
    pub scopes: Vec<Scope>,
    /// Pre-established login sessions, for development setups without a
    /// login service
    #[serde(default)]
    pub sessions: Vec<SessionSeed>,
}

/// A login session token bound to a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSeed {
    /// Value of the session cookie
    pub token: String,
    /// Principal identifier
    pub principal_id: String,
    /// Principal login name (optional)
    #[serde(default)]
    pub username: Option<String>,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_PATH: &str = "codegrant.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        } else if path.is_some() {
            return Err(format!("config file not found: {}", pathbuf.display()));
        }
        // Environment variable overrides, e.g., CODEGRANT__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("CODEGRANT")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        // Validate
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.cleanup_interval(), Duration::from_secs(60));
        assert!(cfg.auth.oauth.ssl_only);
    }

    #[test]
    fn test_validate_rejects_bad_log_level() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_bootstrap_client() {
        let mut cfg = AppConfig::default();
        cfg.bootstrap
            .clients
            .push(Client::new("my-app", "My App").with_redirect_uri("not a url"));
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("my-app"));
    }

    #[test]
    fn test_addr_falls_back_to_unspecified() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not-an-ip".into();
        cfg.server.port = 9000;
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:9000");
    }
}

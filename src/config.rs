// src/config.rs
// Runtime settings: where the server listens, the run used when a request leaves fields out, and the
// integrator tolerances. Every field has a default, so an absent or partial TOML file is fine.

use crate::logic::IntegratorOptions;
use serde::Deserialize;
use std::io;
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PENDULUM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "pendulum.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Run parameters used when a request omits them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub initial_angle_deg: f64,
    pub gravity: f64,
    pub length: f64,
    pub t_max: f64,
    pub dt: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_angle_deg: 150.0,
            gravity: 10.0,
            length: 1.0,
            t_max: 10.0,
            dt: 0.025,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub run: RunConfig,
    pub integrator: IntegratorOptions,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> io::Result<Self> {
        toml::from_str(text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Loads from `$PENDULUM_CONFIG`, falling back to `pendulum.toml`.
    pub fn from_env() -> io::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 9000

            [run]
            initial_angle_deg = 45.0

            [integrator]
            rtol = 1e-8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.run.initial_angle_deg, 45.0);
        assert_eq!(cfg.run.dt, 0.025);
        assert_eq!(cfg.integrator.rtol, 1e-8);
        assert_eq!(cfg.integrator.atol, 1e-6);
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = AppConfig::load(Path::new("/nonexistent/pendulum.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = AppConfig::from_toml("[run]\ngravity = \"strong\"").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}

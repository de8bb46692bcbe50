use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Behaviour of the mock console itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_seed")]
    pub seed_sample_data: bool,
    /// Address of the `/healthz` + `/metrics` listener; disabled when unset.
    #[serde(default)]
    pub admin_addr: Option<String>,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Applied to `GET /api/logs` when the caller sends no `limit`.
    #[serde(default)]
    pub default_log_limit: Option<usize>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: default_seed(),
            admin_addr: None,
            log_format: default_log_format(),
            default_log_limit: None,
        }
    }
}

fn default_seed() -> bool { true }
fn default_log_format() -> String { "compact".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file when present, otherwise environment variables over defaults.
    pub fn load_or_env() -> Result<Self> {
        Self::load_path_or_env(&config_path())
    }

    /// Only a missing file falls back to the environment; a file that cannot
    /// be read, parsed or validated is an error.
    pub fn load_path_or_env(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => {
                parse(&content).with_context(|| format!("failed to parse config file {}", path))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read config file {}", path));
            }
        };
        cfg.normalize_and_validate().with_context(|| format!("invalid configuration in {}", path))?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        let port = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok());
        if let Some(port) = port {
            cfg.server.port = port;
        }
        let workers =
            std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
        if let Some(w) = workers {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(addr) = std::env::var("CONSOLE_ADMIN_ADDR") {
            cfg.console.admin_addr = Some(addr);
        }
        if let Ok(seed) = std::env::var("CONSOLE_SEED") {
            cfg.console.seed_sample_data = !matches!(seed.trim(), "0" | "false" | "no");
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.console.normalize()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl ConsoleConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Some(addr) = &self.admin_addr {
            if addr.trim().is_empty() {
                self.admin_addr = None;
            }
        }
        let fmt = self.log_format.trim().to_ascii_lowercase();
        if fmt != "compact" && fmt != "json" {
            return Err(anyhow!("console.log_format must be \"compact\" or \"json\""));
        }
        self.log_format = fmt;
        if self.default_log_limit == Some(0) {
            self.default_log_limit = None;
        }
        Ok(())
    }
}

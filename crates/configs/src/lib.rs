use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            service_name: default_service_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding the user records.
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,
    /// Front-end assets served for every non-API path.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { users_path: default_users_path(), static_dir: default_static_dir() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_service_name() -> String { "DC Nexus Pro".into() }
fn default_users_path() -> PathBuf { PathBuf::from("database/users.json") }
fn default_static_dir() -> PathBuf { PathBuf::from("public") }

/// Path of the TOML file: `CONFIG_PATH` or `config.toml`.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (if present) → environment overrides → validation.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from `lookup`, which maps an environment variable name to its value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = v;
        }
        if let Some(v) = lookup("TOKIO_WORKER_THREADS").and_then(|p| p.parse::<usize>().ok()) {
            self.server.worker_threads = Some(v);
        }
        if let Some(v) = lookup("SERVICE_NAME") {
            self.server.service_name = v;
        }
        if let Some(v) = lookup("USERS_DB_PATH") {
            self.storage.users_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("STATIC_DIR") {
            self.storage.static_dir = PathBuf::from(v);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        if self.service_name.trim().is_empty() {
            self.service_name = default_service_name();
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        let raw = self.users_path.to_string_lossy();
        if raw.trim().is_empty() {
            return Err(anyhow!("storage.users_path is empty; set it in config.toml or USERS_DB_PATH"));
        }
        if raw.ends_with('/') || raw.ends_with('\\') {
            return Err(anyhow!("storage.users_path must name a file, got directory {raw}"));
        }
        Ok(())
    }

    /// Directory that must exist before the users document can be written.
    pub fn data_dir(&self) -> PathBuf {
        self.users_path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Directory served under `/app`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: None,
            assets_dir: default_assets_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default)]
    pub polka_api_key: Option<String>,
    #[serde(default = "default_access_token_max_secs")]
    pub access_token_max_secs: i64,
    #[serde(default = "default_refresh_token_ttl_hours")]
    pub refresh_token_ttl_hours: i64,
    /// argon2 time cost; kept low so hashing stays fast in development.
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            polka_api_key: None,
            access_token_max_secs: default_access_token_max_secs(),
            refresh_token_ttl_hours: default_refresh_token_ttl_hours(),
            password_cost: default_password_cost(),
        }
    }
}

fn default_assets_dir() -> String { ".".into() }
fn default_store_path() -> String { "./database.json".into() }
fn default_access_token_max_secs() -> i64 { 3600 }
fn default_refresh_token_ttl_hours() -> i64 { 60 }
fn default_password_cost() -> u32 { 1 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Like [`load_from_file`], but a missing file yields the defaults.
/// Unreadable or malformed files are still errors.
pub fn load_from_file_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Ok(cfg) => Ok(cfg),
        // 仅文件不存在时回退默认值；解析失败必须报错
        Err(e) if is_not_found(&e) => Ok(AppConfig::default()),
        Err(e) => Err(e.context(format!("failed to load config from {path}"))),
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl AppConfig {
    /// Load `config.toml` (or defaults when it is absent), overlay the
    /// environment and validate. A config file that exists but does not
    /// parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut cfg = load_from_file_or_default(&config_path())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.validate()?;
        self.storage.normalize_from_env();
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            self.path = path;
        }
        if self.path.trim().is_empty() {
            self.path = default_store_path();
        }
    }
}

impl AuthSettings {
    fn normalize_from_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Ok(key) = std::env::var("POLKA_WEBHOOK_API_KEY") {
            self.polka_api_key = Some(key);
        }
        if self.polka_api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.polka_api_key = None;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.access_token_max_secs <= 0 || self.refresh_token_ttl_hours <= 0 {
            return Err(anyhow!("token lifetimes must be positive"));
        }
        if self.password_cost == 0 {
            return Err(anyhow!("auth.password_cost must be >= 1"));
        }
        Ok(())
    }
}

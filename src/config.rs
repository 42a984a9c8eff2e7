use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub mail: MailConfig,

    pub seed: SeedConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/email_engine.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Directory holding the built admin UI. Served as a fallback for
    /// non-API paths when set.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5002,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret used to sign bearer tokens.
    pub jwt_secret: String,

    /// Lifetime of an issued bearer token.
    pub token_ttl_hours: u32,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-email-engine-secret".to_string(),
            token_ttl_hours: 24,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// Deliver through an SMTP relay.
    Smtp,
    /// Log messages instead of delivering them. Opt-in only.
    Console,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub backend: MailBackend,

    pub host: String,

    pub port: u16,

    /// Implicit TLS from the first byte (usually port 465). When false the
    /// connection upgrades with STARTTLS if the server offers it.
    pub secure: bool,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Sender address. Falls back to `username` when empty.
    pub from_address: String,

    pub accept_invalid_certs: bool,

    /// Per-command SMTP timeout.
    pub timeout_seconds: u64,

    /// Probe the SMTP server once at startup and log the outcome.
    pub verify_on_startup: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::Smtp,
            host: String::new(),
            port: 587,
            secure: false,
            username: None,
            password: None,
            from_address: "noreply@emailengine.com".to_string(),
            accept_invalid_certs: false,
            timeout_seconds: 30,
            verify_on_startup: true,
        }
    }
}

impl MailConfig {
    /// Address used in the `From` header.
    #[must_use]
    pub fn sender(&self) -> String {
        if self.from_address.trim().is_empty() {
            self.username.clone().unwrap_or_default()
        } else {
            self.from_address.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub admin_username: String,

    pub admin_password: String,

    /// Populate the users table with demo recipients when it is empty.
    pub demo_users: bool,

    pub demo_user_count: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            demo_users: true,
            demo_user_count: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub json_logs: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "email-engine".to_string());

        Self {
            metrics_enabled: true,
            json_logs: false,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            mail: MailConfig::default(),
            seed: SeedConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then `.env`, then environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies the deployment variables the admin portal has always honoured.
    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("DATABASE_URL") {
            self.general.database_path = url;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{port}'"))?;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(host) = var("EMAIL_HOST") {
            self.mail.host = host;
        }
        if let Some(port) = var("EMAIL_PORT") {
            self.mail.port = port
                .parse()
                .with_context(|| format!("EMAIL_PORT must be a port number, got '{port}'"))?;
        }
        if let Some(secure) = var("EMAIL_SECURE") {
            self.mail.secure = secure.eq_ignore_ascii_case("true");
        }
        if let Some(user) = var("EMAIL_USER") {
            self.mail.username = Some(user);
        }
        if let Some(pass) = var("EMAIL_PASS") {
            self.mail.password = Some(pass);
        }
        if let Some(from) = var("EMAIL_FROM") {
            self.mail.from_address = from;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("email-engine").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".email-engine").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default config with a freshly generated signing secret.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            return Ok(false);
        }

        let mut config = Self::default();
        config.security.jwt_secret = generate_secret();
        config.save_to_path(&path)?;
        info!("Created default config file: {}", path.display());
        Ok(true)
    }

    /// Full check run before serving: storage, security and mail.
    pub fn validate(&self) -> Result<()> {
        self.validate_core()?;

        if self.mail.backend == MailBackend::Smtp && self.mail.host.trim().is_empty() {
            anyhow::bail!(
                "mail.host (or EMAIL_HOST) is required; set mail.backend = \"console\" to log mail instead"
            );
        }

        Ok(())
    }

    /// Checks needed by every command, including those that never send mail.
    pub fn validate_core(&self) -> Result<()> {
        if self.security.jwt_secret.trim().is_empty() {
            anyhow::bail!("security.jwt_secret cannot be empty");
        }

        if self.security.token_ttl_hours == 0 {
            anyhow::bail!("security.token_ttl_hours must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }
}

/// 64 hex characters of OS randomness.
#[must_use]
pub fn generate_secret() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

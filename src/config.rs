use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreKind {
    Sqlite,
    Memory,
}

impl SessionStoreKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" | "database" => Some(Self::Sqlite),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub database_url: String,
    pub session_store: SessionStoreKind,
    pub healthcheck_endpoint: String,
    /// Directory for the daily rolling log file; `None` logs to stdout only.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| normalize_database_url(&value))
            .unwrap_or_else(|| format!("sqlite:{}?mode=rwc", default_sqlite_path().display()));

        let session_store = std::env::var("SESSION_STORE")
            .ok()
            .and_then(|value| SessionStoreKind::parse(&value))
            .unwrap_or(SessionStoreKind::Sqlite);

        let healthcheck_endpoint = normalize_healthcheck_endpoint(
            std::env::var("HEALTHCHECK_ENDPOINT")
                .ok()
                .as_deref()
                .unwrap_or("/health"),
        );

        let log_dir = resolve_log_dir(
            env_bool("ENABLE_FILE_LOGS"),
            std::env::var("LOG_DIR").ok().as_deref(),
        );

        Self {
            host,
            port,
            log_level,
            database_url,
            session_store,
            healthcheck_endpoint,
            log_dir,
        }
    }

    /// Settings for tests and throwaway instances: in-memory database and sessions.
    pub fn in_memory() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            log_level: "warn".to_string(),
            database_url: "sqlite::memory:".to_string(),
            session_store: SessionStoreKind::Memory,
            healthcheck_endpoint: "/health".to_string(),
            log_dir: None,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_in_memory_db(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

pub fn default_sqlite_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordset")
        .join("data.db")
}

/// Accepts either a `sqlite:` URL or a bare file path.
fn normalize_database_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite:{trimmed}?mode=rwc")
    }
}

/// File logs are opt-in. Without `LOG_DIR` they go next to the default database.
fn resolve_log_dir(enabled: Option<bool>, dir: Option<&str>) -> Option<PathBuf> {
    if enabled != Some(true) {
        return None;
    }
    match dir.map(str::trim).filter(|dir| !dir.is_empty()) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => default_sqlite_path().parent().map(|data| data.join("logs")),
    }
}

pub fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    match normalized.as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn normalize_healthcheck_endpoint(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/health".to_string();
    }

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

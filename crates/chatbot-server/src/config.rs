use std::net::SocketAddr;

use chat_common::openai::OpenAiClientConfig;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";

/// Application configuration loaded explicitly from environment variables.
///
/// The provider key is optional here; a missing key is reported per chat request.
#[derive(Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Postgres connection URL for the course catalog.
    pub database_url: String,
    pub database_max_connections: u32,
    pub openai: OpenAiClientConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("openai", &self.openai)
            .finish()
    }
}

impl Config {
    /// Required:
    /// - `DATABASE_URL`: Postgres connection string for the catalog
    ///
    /// Optional:
    /// - `BIND_ADDR`: listen address (default `0.0.0.0:4000`)
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default 5)
    /// - `GROQ_*`: provider settings, see `OpenAiClientConfig::from_env`
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            AppError::Config("DATABASE_URL environment variable is required".to_string())
        })?;

        let bind_addr = parse_bind_addr(std::env::var("BIND_ADDR").ok().as_deref())?;

        let database_max_connections =
            parse_max_connections(std::env::var("DATABASE_MAX_CONNECTIONS").ok().as_deref())?;

        Ok(Self {
            bind_addr,
            database_url,
            database_max_connections,
            openai: OpenAiClientConfig::from_env(),
        })
    }
}

fn parse_bind_addr(raw: Option<&str>) -> Result<SocketAddr, AppError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_BIND_ADDR);
    raw.parse::<SocketAddr>()
        .map_err(|_| AppError::Config(format!("BIND_ADDR is not a socket address: {raw}")))
}

fn parse_max_connections(raw: Option<&str>) -> Result<u32, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(5),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got {value}"
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_bind_addr_default_and_override() {
        assert_eq!(
            parse_bind_addr(None).unwrap(),
            "0.0.0.0:4000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_bind_addr(Some(" 127.0.0.1:8080 ")).unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            parse_bind_addr(Some("localhost")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_max_connections() {
        assert_eq!(parse_max_connections(None).unwrap(), 5);
        assert_eq!(parse_max_connections(Some("12")).unwrap(), 12);
        assert!(parse_max_connections(Some("0")).is_err());
        assert!(parse_max_connections(Some("many")).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = Config {
            bind_addr: "127.0.0.1:4000".parse().unwrap(),
            database_url: "postgres://app:hunter2@db/catalog".to_string(),
            database_max_connections: 5,
            openai: OpenAiClientConfig {
                base_url: "https://api.groq.com/openai/v1".to_string(),
                api_key: Some("gsk_secret".to_string()),
                model: "llama-3.1-8b-instant".to_string(),
                max_tokens: 1024,
                default_timeout: Duration::from_secs(30),
                max_error_body_bytes: 8192,
            },
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("gsk_secret"));
        assert!(printed.contains("llama-3.1-8b-instant"));
    }
}

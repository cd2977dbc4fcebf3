use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the database lives: either a full URL or its separate parts.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same rules as `from_env`, reading keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| read(key).ok_or(ConfigError::Missing(key));

        let database = match read("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: read("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(read("DB_PORT"), "DB_PORT", 5432)?,
                user: required("DB_USER")?,
                password: read("DB_PASSWORD").unwrap_or_default(),
                name: required("DB_NAME")?,
            },
        };

        Ok(Self {
            database,
            max_connections: parse_or(read("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            server_port: parse_or(read("SERVER_PORT"), "SERVER_PORT", 8080)?,
            server_host: read("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.database {
            DatabaseConfig::Url(url) => url.parse().map_err(|_| ConfigError::Invalid {
                key: "DATABASE_URL",
                value: url.clone(),
            }),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                name,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(name)),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_from_parts() {
        let config = config_from(&[("DB_USER", "app"), ("DB_NAME", "rollcall")]).unwrap();

        assert_eq!(
            config.database,
            DatabaseConfig::Parts {
                host: "localhost".into(),
                port: 5432,
                user: "app".into(),
                password: String::new(),
                name: "rollcall".into(),
            }
        );
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_database_url_wins() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://app:pw@db:5432/rollcall"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
        ])
        .unwrap();

        assert_eq!(
            config.database,
            DatabaseConfig::Url("postgres://app:pw@db:5432/rollcall".into())
        );
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert!(matches!(
            config_from(&[("DB_NAME", "rollcall")]),
            Err(ConfigError::Missing("DB_USER"))
        ));
        assert!(matches!(
            config_from(&[
                ("DB_USER", "app"),
                ("DB_NAME", "rollcall"),
                ("SERVER_PORT", "eighty")
            ]),
            Err(ConfigError::Invalid { key: "SERVER_PORT", .. })
        ));
    }
}

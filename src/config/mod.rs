// region:    --- Imports
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("필수 환경 변수 누락: {0}")]
    Missing(&'static str),

    #[error("잘못된 환경 변수 값: {key}={value}")]
    Invalid { key: &'static str, value: String },
}

// endregion: --- Config Error

// region:    --- Storage Backend
/// 저장소 종류
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

// endregion: --- Storage Backend

// region:    --- Config
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// 서버 측 문장 시간 제한 (쓰기 시간 제한은 DB 가 보장)
    pub statement_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub operation_timeout: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub placeholder_seller: String,
}

impl Config {
    /// 환경 변수(.env 포함)에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 조회 함수로부터 설정 구성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = parse_or(&lookup, "STORAGE_BACKEND", StorageBackend::Postgres)?;
        let operation_timeout =
            Duration::from_secs(parse_or(&lookup, "OPERATION_TIMEOUT_SECS", 10)?);

        let database = match lookup("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    30,
                )?),
                statement_timeout: operation_timeout,
            }),
            None if storage_backend == StorageBackend::Postgres => {
                return Err(ConfigError::Missing("DATABASE_URL"))
            }
            None => None,
        };

        Ok(Config {
            storage_backend,
            database,
            operation_timeout,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 3000)?,
            placeholder_seller: lookup("PLACEHOLDER_SELLER").unwrap_or_else(|| "test".to_string()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

// endregion: --- Config

// endregion: --- Tests

//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다. 설정은
//! 기본값 → 설정 파일 → `GOLDRATE` 접두사 환경 변수 순으로 적용됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 시세 파이프라인 설정
    #[serde(default)]
    pub pricing: PricingConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// 데이터베이스 설정.
///
/// 접속 URL은 관례대로 `DATABASE_URL` 환경 변수에서 읽습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout_secs: 3,
        }
    }
}

/// 시세 파이프라인 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// 외부 시세 소스 URL
    pub source_url: String,
    /// 외부 조회 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 시세 캐시 TTL (초)
    pub cache_ttl_secs: u64,
    /// 톨라-그램 환산 상수
    pub tola_weight_grams: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            source_url: "https://www.goldrateupdate.com/".to_string(),
            fetch_timeout_secs: 10,
            cache_ttl_secs: 60,
            tola_weight_grams: dec!(11.664),
        }
    }
}

impl PricingConfig {
    /// 외부 조회 타임아웃을 `Duration`으로 반환합니다.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// 캐시 TTL을 `Duration`으로 반환합니다.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    /// 기본 경로(`config/default.toml`)에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load_or_default() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config/default").required(false))
    }

    fn build(file: config::File<config::FileSourceFile, config::FileFormat>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("pricing.source_url", "https://www.goldrateupdate.com/")?
            .set_default("pricing.fetch_timeout_secs", 10)?
            .set_default("pricing.cache_ttl_secs", 60)?
            .set_default("pricing.tola_weight_grams", "11.664")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(file)
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("GOLDRATE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

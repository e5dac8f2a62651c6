//! 데이터 계층 에러 타입.

use goldrate_core::CoreError;
use thiserror::Error;

/// 데이터 계층 에러.
#[derive(Error, Debug)]
pub enum DataError {
    /// 외부 시세 소스 조회 실패 (접속 불가, 타임아웃, 파싱 실패)
    #[error("Rate source unavailable: {0}")]
    FetchUnavailable(String),

    /// 실시간 조회와 저장소 폴백이 모두 비어 있음
    #[error("No rate data available")]
    NoDataAvailable,

    /// 요청한 연도의 이력 없음
    #[error("No history records for year {0}")]
    YearNotFound(i32),

    /// 쿼리 실행 에러
    #[error("Query error: {0}")]
    QueryError(String),

    /// 마이그레이션 에러
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// 레코드 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 중복 레코드
    #[error("Duplicate record: {0}")]
    DuplicateError(String),

    /// 저장 에러
    #[error("Insert error: {0}")]
    InsertError(String),

    /// 유효하지 않은 데이터
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 구성 에러
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 커넥션 풀 고갈
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

/// 데이터 계층 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("row not found".to_string()),
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                // 23505: unique_violation
                if let Some(code) = db_err.code() {
                    if code == "23505" {
                        return DataError::DuplicateError(db_err.to_string());
                    }
                }
                DataError::QueryError(db_err.to_string())
            }
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::FetchUnavailable(format!("request timed out: {}", err))
        } else {
            DataError::FetchUnavailable(err.to_string())
        }
    }
}

impl From<CoreError> for DataError {
    fn from(err: CoreError) -> Self {
        DataError::InvalidData(err.to_string())
    }
}

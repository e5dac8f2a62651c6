//! PostgreSQL 저장소 모듈.
//!
//! - [`RateStore`] / [`RateQuoteRepository`]: 캐럿별 시세 저장
//! - [`HistoryStore`] / [`RateHistoryRepository`]: 연도별 평균가 이력 저장

pub mod history;
pub mod rates;

pub use history::{RateHistoryRepository, RateHistoryRow};
pub use rates::{RateQuoteRecord, RateQuoteRepository};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

use goldrate_core::{Karat, NewRateQuote, RateHistoryRecord, RateQuote};

use crate::error::{DataError, Result};

/// 워크스페이스 `migrations/` 디렉터리에 포함된 스키마 마이그레이션.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// 데이터베이스 마이그레이션을 실행합니다.
///
/// 두 저장소 테이블(`gold_rates`, `gold_rate_history`)과 조회 인덱스를
/// 생성합니다. 이미 적용된 마이그레이션은 건너뜁니다.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DataError::MigrationError(e.to_string()))?;

    info!("Migrations completed successfully");
    Ok(())
}

/// 캐럿별 시세 저장소 trait.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// 시세 배치 저장. 전체가 저장되거나 아무것도 저장되지 않습니다.
    ///
    /// 배치의 모든 행은 동일한 `created_at`을 공유합니다.
    async fn insert_batch(
        &self,
        quotes: &[NewRateQuote],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<RateQuote>>;

    /// 단일 시세 저장.
    async fn insert_one(&self, quote: &NewRateQuote, created_at: DateTime<Utc>)
        -> Result<RateQuote>;

    /// 최근 시세 조회 (최신순).
    async fn recent(&self, limit: i64) -> Result<Vec<RateQuote>>;
}

/// 연도별 평균가 이력 저장소 trait.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 이력 레코드 저장.
    async fn insert(
        &self,
        year: i32,
        karat: Karat,
        avg_price_per_tola: Decimal,
        avg_price_per_gram: Decimal,
    ) -> Result<RateHistoryRecord>;

    /// 한 연도의 이력을 저장 순서대로 조회.
    async fn for_year(&self, year: i32) -> Result<Vec<RateHistoryRecord>>;
}

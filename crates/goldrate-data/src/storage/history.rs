//! 연도별 평균가 이력 저장소.
//!
//! `gold_rate_history` 테이블을 다룹니다. 이력은 추가 전용 장부이며
//! 실시간 시세 테이블과 독립적입니다. 연도 조회는 저장 순서(id)를
//! 그대로 유지해 반환합니다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use goldrate_core::{Karat, RateHistoryRecord};

use crate::error::Result;
use crate::storage::HistoryStore;

/// 이력 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct RateHistoryRow {
    pub id: i64,
    pub year: i32,
    pub karat: i32,
    pub avg_price_per_tola: Decimal,
    pub avg_price_per_gram: Decimal,
}

impl RateHistoryRow {
    /// 도메인 타입으로 변환.
    pub fn into_record(self) -> Result<RateHistoryRecord> {
        Ok(RateHistoryRecord {
            id: self.id,
            year: self.year,
            karat: Karat::try_from(self.karat)?,
            avg_price_per_tola: self.avg_price_per_tola,
            avg_price_per_gram: self.avg_price_per_gram,
        })
    }
}

/// 연도별 평균가 PostgreSQL 저장소.
#[derive(Clone)]
pub struct RateHistoryRepository {
    pool: PgPool,
}

impl RateHistoryRepository {
    /// 새 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for RateHistoryRepository {
    async fn insert(
        &self,
        year: i32,
        karat: Karat,
        avg_price_per_tola: Decimal,
        avg_price_per_gram: Decimal,
    ) -> Result<RateHistoryRecord> {
        let row: RateHistoryRow = sqlx::query_as(
            r#"
            INSERT INTO gold_rate_history (year, karat, avg_price_per_tola, avg_price_per_gram)
            VALUES ($1, $2, $3, $4)
            RETURNING id, year, karat, avg_price_per_tola, avg_price_per_gram
            "#,
        )
        .bind(year)
        .bind(karat.as_i32())
        .bind(avg_price_per_tola)
        .bind(avg_price_per_gram)
        .fetch_one(&self.pool)
        .await?;

        row.into_record()
    }

    async fn for_year(&self, year: i32) -> Result<Vec<RateHistoryRecord>> {
        let rows: Vec<RateHistoryRow> = sqlx::query_as(
            r#"
            SELECT id, year, karat, avg_price_per_tola, avg_price_per_gram
            FROM gold_rate_history
            WHERE year = $1
            ORDER BY id ASC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RateHistoryRow::into_record).collect()
    }
}

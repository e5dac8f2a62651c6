//! 캐럿별 시세 저장소.
//!
//! `gold_rates` 테이블을 다룹니다. 한 번의 실시간 산출은 6개 캐럿
//! 행을 하나의 배치로 저장하며, 배치는 단일 INSERT 문으로 실행되어
//! 부분 저장이 발생하지 않습니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use goldrate_core::{Karat, NewRateQuote, RateQuote, RateSource};

use crate::error::Result;
use crate::storage::RateStore;

/// 시세 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct RateQuoteRecord {
    pub id: i64,
    pub karat: i32,
    pub price_per_tola: Decimal,
    pub price_per_gram: Decimal,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl RateQuoteRecord {
    /// 도메인 타입으로 변환.
    pub fn into_quote(self) -> Result<RateQuote> {
        Ok(RateQuote {
            id: self.id,
            karat: Karat::try_from(self.karat)?,
            price_per_tola: self.price_per_tola,
            price_per_gram: self.price_per_gram,
            source: self.source.parse::<RateSource>()?,
            created_at: self.created_at,
        })
    }
}

/// 캐럿별 시세 PostgreSQL 저장소.
#[derive(Clone)]
pub struct RateQuoteRepository {
    pool: PgPool,
}

impl RateQuoteRepository {
    /// 새 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateStore for RateQuoteRepository {
    async fn insert_batch(
        &self,
        quotes: &[NewRateQuote],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<RateQuote>> {
        if quotes.is_empty() {
            return Ok(Vec::new());
        }

        let karats: Vec<i32> = quotes.iter().map(|q| q.karat.as_i32()).collect();
        let tola_prices: Vec<Decimal> = quotes.iter().map(|q| q.price_per_tola).collect();
        let gram_prices: Vec<Decimal> = quotes.iter().map(|q| q.price_per_gram).collect();
        let sources: Vec<&str> = quotes.iter().map(|q| q.source.as_str()).collect();
        let timestamps: Vec<DateTime<Utc>> = vec![created_at; quotes.len()];

        // UNNEST 배치 INSERT: 단일 문장이므로 전체 성공 또는 전체 실패
        let records: Vec<RateQuoteRecord> = sqlx::query_as(
            r#"
            INSERT INTO gold_rates (karat, price_per_tola, price_per_gram, source, created_at)
            SELECT * FROM UNNEST(
                $1::int[], $2::numeric[], $3::numeric[], $4::text[], $5::timestamptz[]
            )
            RETURNING id, karat, price_per_tola, price_per_gram, source, created_at
            "#,
        )
        .bind(&karats)
        .bind(&tola_prices)
        .bind(&gram_prices)
        .bind(&sources)
        .bind(&timestamps)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "시세 배치 저장 완료");
        records.into_iter().map(RateQuoteRecord::into_quote).collect()
    }

    async fn insert_one(
        &self,
        quote: &NewRateQuote,
        created_at: DateTime<Utc>,
    ) -> Result<RateQuote> {
        let record: RateQuoteRecord = sqlx::query_as(
            r#"
            INSERT INTO gold_rates (karat, price_per_tola, price_per_gram, source, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, karat, price_per_tola, price_per_gram, source, created_at
            "#,
        )
        .bind(quote.karat.as_i32())
        .bind(quote.price_per_tola)
        .bind(quote.price_per_gram)
        .bind(quote.source.as_str())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        record.into_quote()
    }

    async fn recent(&self, limit: i64) -> Result<Vec<RateQuote>> {
        let records: Vec<RateQuoteRecord> = sqlx::query_as(
            r#"
            SELECT id, karat, price_per_tola, price_per_gram, source, created_at
            FROM gold_rates
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(RateQuoteRecord::into_quote).collect()
    }
}

//! 테스트 더블.
//!
//! 데이터베이스나 네트워크 없이 파이프라인을 구동하기 위한 인메모리
//! 구현체를 제공합니다. `test-utils` feature로 다른 크레이트의
//! 테스트에서도 사용할 수 있습니다.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use goldrate_core::{Karat, NewRateQuote, RateHistoryRecord, RateQuote};

use crate::error::{DataError, Result};
use crate::provider::PriceSource;
use crate::storage::{HistoryStore, RateStore};

/// 고정 가격 또는 실패를 반환하는 시세 소스.
pub struct StubSource {
    price: Option<Decimal>,
    delay_ms: u64,
    calls: AtomicUsize,
}

impl StubSource {
    /// 항상 같은 24K 기준가를 반환하는 소스.
    pub fn fixed(price: Decimal) -> Self {
        Self {
            price: Some(price),
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// 항상 실패하는 소스.
    pub fn failing() -> Self {
        Self {
            price: None,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// 응답 전에 지연을 두는 소스. 동시성 테스트용.
    pub fn slow(price: Decimal, delay_ms: u64) -> Self {
        Self {
            price: Some(price),
            delay_ms,
            calls: AtomicUsize::new(0),
        }
    }

    /// 지금까지의 조회 횟수.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_current_24k(&self) -> Result<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.price
            .ok_or_else(|| DataError::FetchUnavailable("stub source down".to_string()))
    }
}

/// 인메모리 시세 저장소.
#[derive(Default)]
pub struct MemoryRateStore {
    rows: Mutex<Vec<RateQuote>>,
    batch_inserts: AtomicUsize,
    recent_calls: AtomicUsize,
}

impl MemoryRateStore {
    /// 미리 채워진 저장소.
    pub fn with_rows(rows: Vec<RateQuote>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    /// 저장된 행 수.
    pub async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// 배치 저장 호출 횟수.
    pub fn batch_insert_count(&self) -> usize {
        self.batch_inserts.load(Ordering::SeqCst)
    }

    /// 최근 조회 호출 횟수.
    pub fn recent_call_count(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn insert_batch(
        &self,
        quotes: &[NewRateQuote],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<RateQuote>> {
        self.batch_inserts.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().await;
        let mut stored = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let row = RateQuote {
                id: rows.len() as i64 + 1,
                karat: quote.karat,
                price_per_tola: quote.price_per_tola,
                price_per_gram: quote.price_per_gram,
                source: quote.source,
                created_at,
            };
            rows.push(row.clone());
            stored.push(row);
        }
        Ok(stored)
    }

    async fn insert_one(
        &self,
        quote: &NewRateQuote,
        created_at: DateTime<Utc>,
    ) -> Result<RateQuote> {
        let mut rows = self.rows.lock().await;
        let row = RateQuote {
            id: rows.len() as i64 + 1,
            karat: quote.karat,
            price_per_tola: quote.price_per_tola,
            price_per_gram: quote.price_per_gram,
            source: quote.source,
            created_at,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<RateQuote>> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().await;
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }
}

/// 인메모리 이력 저장소.
#[derive(Default)]
pub struct MemoryHistoryStore {
    rows: Mutex<Vec<RateHistoryRecord>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn insert(
        &self,
        year: i32,
        karat: Karat,
        avg_price_per_tola: Decimal,
        avg_price_per_gram: Decimal,
    ) -> Result<RateHistoryRecord> {
        let mut rows = self.rows.lock().await;
        let record = RateHistoryRecord {
            id: rows.len() as i64 + 1,
            year,
            karat,
            avg_price_per_tola,
            avg_price_per_gram,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn for_year(&self, year: i32) -> Result<Vec<RateHistoryRecord>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|r| r.year == year).cloned().collect())
    }
}

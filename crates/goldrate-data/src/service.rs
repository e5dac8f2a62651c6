//! 시세 파이프라인 서비스.
//!
//! 스크래핑, 캐럿별 환산, 캐시, 영속화, 폴백을 하나의 흐름으로 묶습니다.
//!
//! # 주요 기능
//!
//! - **캐시 우선**: TTL 이내의 스냅샷은 재계산 없이 반환
//! - **동시성 제어**: 캐시 만료 시 갱신 작업은 한 번에 하나만 실행
//! - **원자적 배치**: 6개 캐럿 시세는 전체 저장 또는 전체 실패
//! - **DB 폴백**: 외부 소스 장애 시 최근 저장분으로 응답
//!
//! # 동작 흐름
//!
//! ```text
//! 요청
//!   │
//!   ▼
//! ┌───────────────┐
//! │ 1. 캐시 확인   │ ← TTL 이내면 바로 반환
//! └───────┬───────┘
//!         │ 만료
//!         ▼
//! ┌───────────────┐
//! │ 2. 갱신 Lock   │ ← 대기 후 캐시 재확인
//! └───────┬───────┘
//!         │
//!         ▼
//! ┌───────────────┐  실패  ┌───────────────┐
//! │ 3. 소스 조회   │ ─────▶ │ 4. DB 폴백    │
//! └───────┬───────┘        └───────┬───────┘
//!         │ 성공                   │
//!         ▼                        │
//! ┌───────────────┐                │
//! │ 5. 환산 + 저장 │                │
//! └───────┬───────┘                │
//!         ▼                        ▼
//! ┌─────────────────────────────────┐
//! │ 6. 캐시 교체 후 반환             │
//! └─────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use goldrate_core::{
    analyze_year, gram_price, live_quote_set, manual_quote, summarize_trend, Karat, PricingConfig,
    RateHistoryRecord, RateQuote, TrendSummary, YearAnalysis,
};

use crate::error::{DataError, Result};
use crate::provider::PriceSource;
use crate::storage::{HistoryStore, RateStore};

/// 추세 분석에 사용하는 최근 시세 조회 건수.
pub const TREND_FETCH_LIMIT: i64 = 30;

/// 캐시 스냅샷.
///
/// 계산 시각과 시세 목록을 하나의 불변 값으로 묶어 교체 단위로
/// 사용합니다. 스냅샷 내부는 수정되지 않습니다.
#[derive(Debug)]
struct CachedRates {
    computed_at: DateTime<Utc>,
    quotes: Vec<RateQuote>,
}

/// 캐시와 폴백을 포함한 시세 파이프라인 서비스.
///
/// 실시간 시세는 24K 기준가 하나를 조회해 전체 캐럿으로 환산한 뒤
/// 한 배치로 저장합니다. 소스 장애 시에는 최근 저장분으로 응답하며,
/// 폴백 결과도 동일한 TTL로 캐시됩니다.
pub struct RatePricingService {
    source: Arc<dyn PriceSource>,
    rates: Arc<dyn RateStore>,
    history: Arc<dyn HistoryStore>,
    /// 톨라 중량 상수 (그램)
    tola_weight_grams: Decimal,
    /// 캐시 유효 기간
    cache_ttl: Duration,
    cache: RwLock<Option<Arc<CachedRates>>>,
    /// 갱신 동시성 제어 Lock
    refresh_lock: Mutex<()>,
}

impl RatePricingService {
    /// 새 파이프라인 서비스 생성.
    pub fn new(
        source: Arc<dyn PriceSource>,
        rates: Arc<dyn RateStore>,
        history: Arc<dyn HistoryStore>,
        config: &PricingConfig,
    ) -> Self {
        Self {
            source,
            rates,
            history,
            tola_weight_grams: config.tola_weight_grams,
            cache_ttl: Duration::seconds(config.cache_ttl_secs as i64),
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// 캐시 유효 기간 설정.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// 현재 캐럿별 시세 조회.
    ///
    /// TTL 이내의 캐시가 있으면 재계산 없이 반환합니다. 만료 시에는
    /// 외부 소스에서 24K 기준가를 조회해 전체 캐럿을 환산 후 저장하고,
    /// 소스 장애 시 최근 저장분으로 폴백합니다. 저장분도 없으면
    /// [`DataError::NoDataAvailable`]을 반환합니다.
    #[instrument(skip(self))]
    pub async fn latest_rates(&self) -> Result<Vec<RateQuote>> {
        // 1. 캐시 확인
        if let Some(snapshot) = self.fresh_snapshot().await {
            debug!(count = snapshot.quotes.len(), "캐시 적중");
            return Ok(snapshot.quotes.clone());
        }

        // 2. 갱신은 한 번에 하나만
        let _guard = self.refresh_lock.lock().await;

        // 대기 중 다른 요청이 갱신을 끝냈으면 그 결과를 재사용
        if let Some(snapshot) = self.fresh_snapshot().await {
            debug!(count = snapshot.quotes.len(), "대기 중 갱신 완료, 캐시 재사용");
            return Ok(snapshot.quotes.clone());
        }

        self.refresh_rates().await
    }

    /// 수동 시세 저장.
    ///
    /// 그램당 가격은 실시간 경로와 동일한 공식으로 파생됩니다.
    /// 캐시는 갱신하지 않으므로 다음 캐시 만료 때까지 실시간 응답에
    /// 반영되지 않습니다.
    #[instrument(skip(self))]
    pub async fn record_manual_rate(
        &self,
        karat: Karat,
        price_per_tola: Decimal,
    ) -> Result<RateQuote> {
        let quote = manual_quote(karat, price_per_tola, self.tola_weight_grams)?;
        let stored = self.rates.insert_one(&quote, Utc::now()).await?;

        info!(
            karat = %stored.karat,
            price_per_tola = %stored.price_per_tola,
            "수동 시세 저장 완료"
        );
        Ok(stored)
    }

    /// 한 연도의 이력 분석 조회.
    ///
    /// 해당 연도의 레코드가 없으면 [`DataError::YearNotFound`].
    #[instrument(skip(self))]
    pub async fn rates_for_year(&self, year: i32) -> Result<YearAnalysis> {
        let records = self.history.for_year(year).await?;
        analyze_year(year, records).ok_or(DataError::YearNotFound(year))
    }

    /// 연도별 평균가 이력 저장.
    ///
    /// 그램당 평균가는 톨라당 평균가에서 파생됩니다.
    #[instrument(skip(self))]
    pub async fn add_history_record(
        &self,
        year: i32,
        karat: Karat,
        avg_price_per_tola: Decimal,
    ) -> Result<RateHistoryRecord> {
        let avg_price_per_gram = gram_price(avg_price_per_tola, self.tola_weight_grams)?;
        let record = self
            .history
            .insert(year, karat, avg_price_per_tola, avg_price_per_gram)
            .await?;

        info!(year, karat = %record.karat, "이력 레코드 저장 완료");
        Ok(record)
    }

    /// 최근 시세 기반 추세 요약.
    ///
    /// 최근 [`TREND_FETCH_LIMIT`]건을 최신순으로 분석합니다.
    /// 표본이 2건 미만이면 중립 요약을 반환합니다.
    #[instrument(skip(self))]
    pub async fn current_trend(&self) -> Result<TrendSummary> {
        let quotes = self.rates.recent(TREND_FETCH_LIMIT).await?;
        let prices: Vec<Decimal> = quotes.iter().map(|q| q.price_per_tola).collect();
        Ok(summarize_trend(&prices))
    }

    /// TTL 이내의 캐시 스냅샷 조회.
    async fn fresh_snapshot(&self) -> Option<Arc<CachedRates>> {
        let cache = self.cache.read().await;
        let snapshot = cache.as_ref()?;

        if Utc::now() - snapshot.computed_at < self.cache_ttl {
            Some(Arc::clone(snapshot))
        } else {
            None
        }
    }

    /// 캐시 만료 후 실제 갱신 수행. 호출 측에서 갱신 Lock을 보유해야 합니다.
    async fn refresh_rates(&self) -> Result<Vec<RateQuote>> {
        match self.source.fetch_current_24k().await {
            Ok(reference) => {
                // 3. 소스 조회 성공: 전체 캐럿 환산 후 한 배치로 저장
                let new_quotes = live_quote_set(reference, self.tola_weight_grams)?;
                let computed_at = Utc::now();
                let quotes = self.rates.insert_batch(&new_quotes, computed_at).await?;

                info!(
                    source = self.source.name(),
                    reference = %reference,
                    count = quotes.len(),
                    "실시간 시세 산출 및 저장 완료"
                );

                self.replace_cache(computed_at, quotes.clone()).await;
                Ok(quotes)
            }
            Err(e) => {
                // 4. 소스 장애: 최근 저장분으로 폴백
                warn!(
                    source = self.source.name(),
                    error = %e,
                    "실시간 조회 실패, 저장된 시세로 폴백"
                );

                let quotes = self.rates.recent(Karat::ALL.len() as i64).await?;
                if quotes.is_empty() {
                    return Err(DataError::NoDataAvailable);
                }

                // 폴백 결과도 동일한 TTL로 캐시해 소스 장애 중 반복 조회를 막는다
                self.replace_cache(Utc::now(), quotes.clone()).await;
                Ok(quotes)
            }
        }
    }

    /// 캐시 스냅샷 교체.
    async fn replace_cache(&self, computed_at: DateTime<Utc>, quotes: Vec<RateQuote>) {
        let mut cache = self.cache.write().await;
        *cache = Some(Arc::new(CachedRates {
            computed_at,
            quotes,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryHistoryStore, MemoryRateStore, StubSource};
    use goldrate_core::{RateSource, TrendDirection};
    use rust_decimal_macros::dec;

    fn build_service(
        source: Arc<StubSource>,
        rates: Arc<MemoryRateStore>,
        history: Arc<MemoryHistoryStore>,
        cache_ttl_secs: u64,
    ) -> RatePricingService {
        let config = PricingConfig {
            cache_ttl_secs,
            ..Default::default()
        };
        RatePricingService::new(source, rates, history, &config)
    }

    fn seeded_quotes() -> Vec<RateQuote> {
        Karat::ALL
            .iter()
            .enumerate()
            .map(|(i, karat)| RateQuote {
                id: i as i64 + 1,
                karat: *karat,
                price_per_tola: dec!(10000) * Decimal::from(karat.as_i32()),
                price_per_gram: dec!(857.34),
                source: RateSource::Live,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_live_rates_compute_and_persist_batch() {
        let source = Arc::new(StubSource::fixed(dec!(240000)));
        let rates = Arc::new(MemoryRateStore::default());
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let quotes = service.latest_rates().await.unwrap();

        assert_eq!(quotes.len(), Karat::ALL.len());
        assert_eq!(quotes[0].karat, Karat::K24);
        assert_eq!(quotes[0].price_per_tola, dec!(240000));
        assert_eq!(quotes[1].price_per_tola, dec!(220000)); // 22K
        assert!(quotes.iter().all(|q| q.source == RateSource::Live));
        // 배치의 모든 행이 같은 시각을 공유한다
        assert!(quotes.iter().all(|q| q.created_at == quotes[0].created_at));
        assert_eq!(rates.batch_insert_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let source = Arc::new(StubSource::fixed(dec!(240000)));
        let rates = Arc::new(MemoryRateStore::default());
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let first = service.latest_rates().await.unwrap();
        let second = service.latest_rates().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.call_count(), 1);
        assert_eq!(rates.row_count().await, Karat::ALL.len());
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let source = Arc::new(StubSource::fixed(dec!(240000)));
        let rates = Arc::new(MemoryRateStore::default());
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            0,
        );

        service.latest_rates().await.unwrap();
        service.latest_rates().await.unwrap();

        assert_eq!(source.call_count(), 2);
        assert_eq!(rates.row_count().await, Karat::ALL.len() * 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests_fetch_once() {
        let source = Arc::new(StubSource::slow(dec!(240000), 50));
        let rates = Arc::new(MemoryRateStore::default());
        let service = Arc::new(build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        ));

        let a = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.latest_rates().await })
        };
        let b = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.latest_rates().await })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(source.call_count(), 1);
        assert_eq!(rates.batch_insert_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_to_stored_rates() {
        let source = Arc::new(StubSource::failing());
        let rates = Arc::new(MemoryRateStore::with_rows(seeded_quotes()));
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let quotes = service.latest_rates().await.unwrap();

        assert_eq!(quotes.len(), Karat::ALL.len());
        // 최신순: 마지막으로 저장된 행이 먼저 온다
        assert_eq!(quotes[0].id, Karat::ALL.len() as i64);
        assert_eq!(rates.batch_insert_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_result_is_cached() {
        let source = Arc::new(StubSource::failing());
        let rates = Arc::new(MemoryRateStore::with_rows(seeded_quotes()));
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        service.latest_rates().await.unwrap();
        service.latest_rates().await.unwrap();

        assert_eq!(source.call_count(), 1);
        assert_eq!(rates.recent_call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_data_available_when_all_paths_fail() {
        let source = Arc::new(StubSource::failing());
        let service = build_service(
            source,
            Arc::new(MemoryRateStore::default()),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let err = service.latest_rates().await.unwrap_err();
        assert!(matches!(err, DataError::NoDataAvailable));
    }

    #[tokio::test]
    async fn test_invalid_reference_aborts_without_persisting() {
        let source = Arc::new(StubSource::fixed(dec!(-5)));
        let rates = Arc::new(MemoryRateStore::default());
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let err = service.latest_rates().await.unwrap_err();

        assert!(matches!(err, DataError::InvalidData(_)));
        assert_eq!(rates.row_count().await, 0);
        // 실패는 캐시되지 않으므로 다음 요청은 다시 소스를 조회한다
        let _ = service.latest_rates().await;
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_manual_rate_does_not_touch_cache() {
        let source = Arc::new(StubSource::fixed(dec!(240000)));
        let rates = Arc::new(MemoryRateStore::default());
        let service = build_service(
            source.clone(),
            rates.clone(),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let before = service.latest_rates().await.unwrap();
        let manual = service
            .record_manual_rate(Karat::K22, dec!(999999))
            .await
            .unwrap();
        let after = service.latest_rates().await.unwrap();

        assert_eq!(manual.source, RateSource::Manual);
        assert_eq!(manual.price_per_gram, dec!(999999) / dec!(11.664));
        // 수동 입력은 저장만 되고 캐시 응답에는 섞이지 않는다
        assert_eq!(before, after);
        assert_eq!(source.call_count(), 1);
        assert_eq!(rates.row_count().await, Karat::ALL.len() + 1);
    }

    #[tokio::test]
    async fn test_year_analysis_for_stored_records() {
        let history = Arc::new(MemoryHistoryStore::default());
        let service = build_service(
            Arc::new(StubSource::failing()),
            Arc::new(MemoryRateStore::default()),
            history.clone(),
            60,
        );

        service
            .add_history_record(2023, Karat::K24, dec!(100000))
            .await
            .unwrap();
        service
            .add_history_record(2023, Karat::K24, dec!(120000))
            .await
            .unwrap();
        service
            .add_history_record(2022, Karat::K24, dec!(90000))
            .await
            .unwrap();

        let analysis = service.rates_for_year(2023).await.unwrap();

        assert_eq!(analysis.year, 2023);
        assert_eq!(analysis.records.len(), 2);
        assert_eq!(analysis.average_price, dec!(110000));
        assert_eq!(analysis.highest_price, dec!(120000));
        assert_eq!(analysis.change_pct, dec!(20));
        assert_eq!(analysis.trend, TrendDirection::Bullish);
    }

    #[tokio::test]
    async fn test_year_analysis_missing_year() {
        let service = build_service(
            Arc::new(StubSource::failing()),
            Arc::new(MemoryRateStore::default()),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let err = service.rates_for_year(1999).await.unwrap_err();
        assert!(matches!(err, DataError::YearNotFound(1999)));
    }

    #[tokio::test]
    async fn test_history_record_derives_gram_price() {
        let service = build_service(
            Arc::new(StubSource::failing()),
            Arc::new(MemoryRateStore::default()),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let record = service
            .add_history_record(2024, Karat::K22, dec!(116640))
            .await
            .unwrap();
        assert_eq!(record.avg_price_per_gram, dec!(10000));

        let err = service
            .add_history_record(2024, Karat::K22, dec!(0))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_trend_from_recent_rates() {
        // 오래된 것부터 80 → 90 → 100 순으로 저장
        let rows: Vec<RateQuote> = [dec!(80000), dec!(90000), dec!(100000)]
            .iter()
            .enumerate()
            .map(|(i, price)| RateQuote {
                id: i as i64 + 1,
                karat: Karat::K24,
                price_per_tola: *price,
                price_per_gram: *price / dec!(11.664),
                source: RateSource::Live,
                created_at: Utc::now(),
            })
            .collect();
        let service = build_service(
            Arc::new(StubSource::failing()),
            Arc::new(MemoryRateStore::with_rows(rows)),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let summary = service.current_trend().await.unwrap();

        assert_eq!(summary.trend, TrendDirection::Bullish);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.current_price, Some(dec!(100000)));
        assert_eq!(summary.monthly_average, Some(dec!(90000)));
    }

    #[tokio::test]
    async fn test_trend_with_insufficient_samples() {
        let rows = vec![RateQuote {
            id: 1,
            karat: Karat::K24,
            price_per_tola: dec!(100000),
            price_per_gram: dec!(8573.39),
            source: RateSource::Live,
            created_at: Utc::now(),
        }];
        let service = build_service(
            Arc::new(StubSource::failing()),
            Arc::new(MemoryRateStore::with_rows(rows)),
            Arc::new(MemoryHistoryStore::default()),
            60,
        );

        let summary = service.current_trend().await.unwrap();

        assert_eq!(summary.trend, TrendDirection::Neutral);
        assert_eq!(summary.sample_count, 1);
        assert!(summary.message.is_some());
        assert!(summary.recommendation.is_none());
    }
}

//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 시세 파이프라인 서비스와 DB 풀을 담아 Axum의 State
//! extractor를 통해 핸들러에 주입됩니다. Arc로 래핑되어 여러 요청
//! 간에 안전하게 공유됩니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use goldrate_data::RatePricingService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 시세 파이프라인 서비스 - 스크래핑, 캐시, 폴백, 분석
    pub pricing: Arc<RatePricingService>,

    /// 데이터베이스 연결 풀 (헬스 체크용)
    pub db_pool: Option<PgPool>,

    /// 설정된 시세 페이지 URL (헬스 체크 표시용)
    pub source_url: String,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(pricing: Arc<RatePricingService>, source_url: impl Into<String>) -> Self {
        Self {
            pricing,
            db_pool: None,
            source_url: source_url.into(),
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// DB 풀 연결.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 AppState 생성.
///
/// 인메모리 저장소와 고정 가격 소스로 파이프라인을 구성합니다.
/// DB 풀은 연결하지 않습니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use goldrate_core::PricingConfig;
    use goldrate_data::testing::{MemoryHistoryStore, MemoryRateStore, StubSource};
    use rust_decimal_macros::dec;

    let config = PricingConfig::default();
    let pricing = RatePricingService::new(
        Arc::new(StubSource::fixed(dec!(240000))),
        Arc::new(MemoryRateStore::default()),
        Arc::new(MemoryHistoryStore::default()),
        &config,
    );

    AppState::new(Arc::new(pricing), config.source_url)
}

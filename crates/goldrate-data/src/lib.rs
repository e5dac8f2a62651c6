//! 금 시세 데이터 파이프라인.
//!
//! 외부 페이지 스크래핑, 캐럿별 가격 산출, 캐시, 영속화까지
//! 시세 데이터의 수집과 보관을 담당합니다.
//!
//! ## 구성
//! - `provider`: 외부 24K 기준가 소스 ([`PriceSource`], [`GoldPageScraper`])
//! - `storage`: PostgreSQL 저장소 ([`RateQuoteRepository`], [`RateHistoryRepository`])
//! - `service`: 캐시와 폴백을 포함한 시세 파이프라인 ([`RatePricingService`])

pub mod error;
pub mod provider;
pub mod service;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{DataError, Result};
pub use provider::{GoldPageScraper, PriceSource};
pub use service::{RatePricingService, TREND_FETCH_LIMIT};
pub use storage::{
    run_migrations, HistoryStore, RateHistoryRepository, RateHistoryRow, RateQuoteRecord,
    RateQuoteRepository, RateStore,
};

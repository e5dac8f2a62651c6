//! 외부 시세 Provider 모듈.
//!
//! 24K 톨라당 기준가를 조회하는 소스를 정의합니다.
//!
//! - [`PriceSource`]: 기준가 소스 trait
//! - [`GoldPageScraper`]: 공개 시세 페이지 스크래퍼

pub mod goldpage;

pub use goldpage::GoldPageScraper;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;

/// 24K 기준가 소스 trait.
///
/// 구현체는 24K 순금의 톨라당 가격 하나만 제공합니다.
/// 나머지 캐럿 가격은 항상 이 기준가에서 수학적으로 파생되며,
/// 소스별로 캐럿 가격을 따로 조회하지 않습니다.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 소스 이름.
    fn name(&self) -> &str;

    /// 현재 24K 톨라당 기준가 조회.
    async fn fetch_current_24k(&self) -> Result<Decimal>;
}

//! 공개 금 시세 페이지 스크래퍼.
//!
//! 시세 페이지의 렌더링된 텍스트에서 "24K" 표기 바로 뒤에 오는
//! 숫자 토큰을 24K 톨라당 기준가로 읽습니다. 페이지 구조(DOM)에
//! 의존하지 않으므로 마크업이 바뀌어도 표기 순서만 유지되면 동작합니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::Html;
use tracing::{debug, instrument};

use goldrate_core::PricingConfig;

use crate::error::{DataError, Result};
use crate::provider::PriceSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 공개 시세 페이지에서 24K 기준가를 수집하는 스크래퍼.
pub struct GoldPageScraper {
    client: Client,
    source_url: String,
}

impl GoldPageScraper {
    /// 새 스크래퍼 생성.
    pub fn new(source_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            source_url: source_url.into(),
        })
    }

    /// 설정에서 스크래퍼 생성.
    pub fn from_config(config: &PricingConfig) -> Result<Self> {
        Self::new(config.source_url.clone(), config.fetch_timeout())
    }
}

#[async_trait]
impl PriceSource for GoldPageScraper {
    fn name(&self) -> &str {
        "goldpage"
    }

    #[instrument(skip(self), fields(url = %self.source_url))]
    async fn fetch_current_24k(&self) -> Result<Decimal> {
        let response = self.client.get(&self.source_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::FetchUnavailable(format!(
                "HTTP {} from {}",
                status, self.source_url
            )));
        }

        let body = response.text().await?;
        let price = parse_24k_tola(&body).ok_or_else(|| {
            DataError::FetchUnavailable("24K price token not found in page".to_string())
        })?;

        if price <= Decimal::ZERO {
            return Err(DataError::FetchUnavailable(format!(
                "non-positive 24K price: {}",
                price
            )));
        }

        debug!(%price, "24K 기준가 파싱 완료");
        Ok(price)
    }
}

// ==================== 파싱 유틸리티 함수 ====================

/// HTML 본문에서 24K 톨라당 가격을 추출합니다.
///
/// 마크업을 제거한 전체 텍스트에서 첫 "24K" 뒤의 공백 구분 토큰을
/// 숫자로 읽습니다. 토큰이 없거나 숫자가 아니면 `None`.
fn parse_24k_tola(body: &str) -> Option<Decimal> {
    let document = Html::parse_document(body);
    let text = document.root_element().text().collect::<String>();

    let after_marker = text.split("24K").nth(1)?;
    let token = after_marker.split_whitespace().next()?;
    parse_price_token(token)
}

/// 천 단위 구분자가 포함된 가격 토큰을 파싱합니다.
///
/// "245,800" -> 245800, "245800.50" -> 245800.50
fn parse_price_token(token: &str) -> Option<Decimal> {
    let cleaned = token.replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

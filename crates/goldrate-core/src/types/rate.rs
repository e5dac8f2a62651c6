//! 금 시세 타입 및 구조체.
//!
//! 이 모듈은 시세 파이프라인의 핵심 타입을 정의합니다:
//! - `RateQuote` - 저장된 단일 캐럿 시세
//! - `NewRateQuote` - 저장 전의 계산된 시세
//! - `RateHistoryRecord` - 연도별 집계 이력
//! - `TrendSummary` / `YearAnalysis` - 분석 결과

use crate::error::{CoreError, CoreResult};
use crate::types::Karat;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 시세의 출처 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// 외부 소스에서 실시간으로 가져온 시세
    Live,
    /// 수동으로 입력된 시세
    Manual,
}

impl RateSource {
    /// 저장소 표기 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Live => "live",
            RateSource::Manual => "manual",
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RateSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(RateSource::Live),
            "manual" => Ok(RateSource::Manual),
            _ => Err(CoreError::InvalidInput(format!("잘못된 시세 출처: {}", s))),
        }
    }
}

/// 저장 전의 계산된 시세.
///
/// 톨라당 가격과 그램당 가격은 항상 같은 환산 상수에서 함께 파생되며,
/// 독립적으로 설정되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRateQuote {
    /// 캐럿 등급
    pub karat: Karat,
    /// 톨라당 가격
    pub price_per_tola: Decimal,
    /// 그램당 가격
    pub price_per_gram: Decimal,
    /// 시세 출처
    pub source: RateSource,
}

impl NewRateQuote {
    /// 톨라당 가격에서 시세를 생성합니다.
    ///
    /// 그램당 가격은 항상 `price_per_tola / tola_weight_grams`로 파생됩니다.
    pub fn from_tola(
        karat: Karat,
        price_per_tola: Decimal,
        tola_weight_grams: Decimal,
        source: RateSource,
    ) -> CoreResult<Self> {
        if price_per_tola <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(format!(
                "톨라당 가격은 양수여야 합니다: {}",
                price_per_tola
            )));
        }
        if tola_weight_grams <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(format!(
                "톨라 중량 상수는 양수여야 합니다: {}",
                tola_weight_grams
            )));
        }

        Ok(Self {
            karat,
            price_per_tola,
            price_per_gram: price_per_tola / tola_weight_grams,
            source,
        })
    }
}

/// 저장된 단일 캐럿 금 시세.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    /// 레코드 ID
    pub id: i64,
    /// 캐럿 등급
    #[cfg_attr(feature = "utoipa-support", schema(value_type = i32, example = 24))]
    pub karat: Karat,
    /// 톨라당 가격
    pub price_per_tola: Decimal,
    /// 그램당 가격
    pub price_per_gram: Decimal,
    /// 시세 출처
    pub source: RateSource,
    /// 생성 시각 (불변)
    pub created_at: DateTime<Utc>,
}

impl RateQuote {
    /// 실시간 시세인지 확인합니다.
    pub fn is_live(&self) -> bool {
        self.source == RateSource::Live
    }
}

/// 연도별 시세 집계 레코드.
///
/// 실시간 시세와 외래 키 관계가 없는 독립적인 추가 전용 장부입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RateHistoryRecord {
    /// 레코드 ID (저장 순서 키)
    pub id: i64,
    /// 연도
    pub year: i32,
    /// 캐럿 등급
    #[cfg_attr(feature = "utoipa-support", schema(value_type = i32, example = 22))]
    pub karat: Karat,
    /// 톨라당 평균 가격
    pub avg_price_per_tola: Decimal,
    /// 그램당 평균 가격
    pub avg_price_per_gram: Decimal,
}

/// 시장 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// 상승
    Bullish,
    /// 하락
    Bearish,
    /// 판단 불가 (데이터 부족)
    Neutral,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Bullish => "bullish",
            TrendDirection::Bearish => "bearish",
            TrendDirection::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

/// 매수 추천 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Recommendation {
    /// 매수 적기
    Buy,
    /// 보유 유지
    Hold,
    /// 관망
    Wait,
}

/// 최근 시세 기반 추세 요약.
///
/// 데이터가 부족하면 `trend`가 `neutral`이고 분석 필드는 생략됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    /// 추세 방향
    pub trend: TrendDirection,
    /// 분석에 사용된 표본 수
    pub sample_count: usize,
    /// 가장 최근에 저장된 톨라당 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
    /// 최근 7건 평균
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_average: Option<Decimal>,
    /// 전체 조회 구간 평균
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_average: Option<Decimal>,
    /// 변동성 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility_pct: Option<Decimal>,
    /// 매수 추천
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    /// 데이터 부족 시 설명 메시지
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TrendSummary {
    /// 데이터 부족 시의 중립 요약을 생성합니다.
    pub fn insufficient(sample_count: usize) -> Self {
        Self {
            trend: TrendDirection::Neutral,
            sample_count,
            current_price: None,
            weekly_average: None,
            monthly_average: None,
            volatility_pct: None,
            recommendation: None,
            message: Some("Insufficient data for trend analysis".to_string()),
        }
    }
}

/// 연도별 시세 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct YearAnalysis {
    /// 분석 대상 연도
    pub year: i32,
    /// 해당 연도의 이력 레코드 (저장 순서)
    pub records: Vec<RateHistoryRecord>,
    /// 톨라당 평균 가격의 평균
    pub average_price: Decimal,
    /// 최고가
    pub highest_price: Decimal,
    /// 최저가
    pub lowest_price: Decimal,
    /// 추세 방향
    pub trend: TrendDirection,
    /// 등락률 (%)
    pub change_pct: Decimal,
    /// 투자 조언
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_source_roundtrip() {
        assert_eq!("live".parse::<RateSource>().unwrap(), RateSource::Live);
        assert_eq!(RateSource::Manual.as_str(), "manual");
        assert!("scraped".parse::<RateSource>().is_err());
    }

    #[test]
    fn test_new_quote_derives_gram_price() {
        let quote =
            NewRateQuote::from_tola(Karat::K24, dec!(116640), dec!(11.664), RateSource::Live)
                .unwrap();

        assert_eq!(quote.price_per_gram, dec!(10000));
        // 그램당 가격은 항상 톨라당 가격과 대수적으로 일치한다
        assert_eq!(quote.price_per_gram * dec!(11.664), quote.price_per_tola);
    }

    #[test]
    fn test_new_quote_rejects_non_positive() {
        assert!(
            NewRateQuote::from_tola(Karat::K24, dec!(0), dec!(11.664), RateSource::Live).is_err()
        );
        assert!(
            NewRateQuote::from_tola(Karat::K24, dec!(-10), dec!(11.664), RateSource::Manual)
                .is_err()
        );
        assert!(NewRateQuote::from_tola(Karat::K24, dec!(100), dec!(0), RateSource::Live).is_err());
    }

    #[test]
    fn test_insufficient_summary_omits_analysis_fields() {
        let summary = TrendSummary::insufficient(1);
        assert_eq!(summary.trend, TrendDirection::Neutral);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["trend"], "neutral");
        assert!(json.get("currentPrice").is_none());
        assert!(json.get("recommendation").is_none());
        assert!(json["message"].as_str().unwrap().contains("Insufficient"));
    }

    #[test]
    fn test_recommendation_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&Recommendation::Buy).unwrap(),
            "\"Buy\""
        );
        assert_eq!(
            serde_json::to_string(&Recommendation::Wait).unwrap(),
            "\"Wait\""
        );
    }
}

//! 추세 및 변동성 분석 공통 로직.
//!
//! 최근 시세와 연도별 이력을 입력으로 받아 순수 계산만 수행합니다.
//! 저장소 조회와 정렬은 호출 측의 책임입니다.

use crate::types::{
    RateHistoryRecord, Recommendation, TrendDirection, TrendSummary, YearAnalysis,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 추세 분석에 필요한 최소 표본 수.
pub const MIN_TREND_SAMPLES: usize = 2;

/// 주간 평균 윈도우 크기.
pub const WEEKLY_WINDOW: usize = 7;

/// "안정" 판정 변동성 임계값 (%).
pub const STABLE_VOLATILITY_PCT: Decimal = dec!(5);

/// 평균을 계산합니다. 빈 입력은 0을 반환합니다.
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().sum();
    sum / Decimal::from(values.len())
}

/// 시작 대비 등락률(%)을 계산합니다. 시작 값이 0 이하이면 0을 반환합니다.
pub fn change_pct(first: Decimal, last: Decimal) -> Decimal {
    if first > Decimal::ZERO {
        (last - first) / first * dec!(100)
    } else {
        Decimal::ZERO
    }
}

/// 변동성(%)을 계산합니다: `(최고가 - 최저가) / 기준 평균 * 100`, 소수 둘째 자리 반올림.
///
/// 입력이 비어 있거나 기준 평균이 0 이하이면 0을 반환합니다.
pub fn volatility_pct(values: &[Decimal], baseline: Decimal) -> Decimal {
    let (Some(max), Some(min)) = (values.iter().max(), values.iter().min()) else {
        return Decimal::ZERO;
    };
    if baseline <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((max - min) / baseline * dec!(100)).round_dp(2)
}

/// 현재가가 기준 평균을 웃돌면 상승, 아니면 하락으로 분류합니다.
pub fn classify(current: Decimal, baseline: Decimal) -> TrendDirection {
    if current > baseline {
        TrendDirection::Bullish
    } else {
        TrendDirection::Bearish
    }
}

/// 추세와 변동성에서 매수 추천을 도출합니다.
///
/// 상승 추세면 매수, 하락 추세에서는 변동성이 임계값 미만이면 보유,
/// 아니면 관망입니다.
pub fn recommend(trend: TrendDirection, volatility_pct: Decimal) -> Recommendation {
    match trend {
        TrendDirection::Bullish => Recommendation::Buy,
        _ if volatility_pct < STABLE_VOLATILITY_PCT => Recommendation::Hold,
        _ => Recommendation::Wait,
    }
}

/// 전체/최근 등락률에서 투자 조언 문구를 도출합니다.
pub fn investment_advice(overall_change_pct: Decimal, recent_change_pct: Decimal) -> &'static str {
    if overall_change_pct > dec!(20) && recent_change_pct > dec!(5) {
        "Strong bullish trend - Good time to invest"
    } else if overall_change_pct > dec!(10) && recent_change_pct > Decimal::ZERO {
        "Moderate growth - Consider investing"
    } else if overall_change_pct < dec!(-10) {
        "Market downturn - Good buying opportunity"
    } else {
        "Market stable - Good time for long-term investment"
    }
}

/// 최신순으로 정렬된 최근 가격에서 추세 요약을 계산합니다.
///
/// 표본이 [`MIN_TREND_SAMPLES`] 미만이면 중립 요약을 반환합니다.
/// 주간 평균의 분모는 실제 표본 수로 고정되며, 고정 상수 7로 나누지
/// 않습니다.
pub fn summarize_trend(prices_desc: &[Decimal]) -> TrendSummary {
    let count = prices_desc.len();
    if count < MIN_TREND_SAMPLES {
        return TrendSummary::insufficient(count);
    }

    let current = prices_desc[0];
    let weekly_average = mean(&prices_desc[..count.min(WEEKLY_WINDOW)]);
    let monthly_average = mean(prices_desc);
    let trend = classify(current, monthly_average);
    let volatility = volatility_pct(prices_desc, monthly_average);

    TrendSummary {
        trend,
        sample_count: count,
        current_price: Some(current),
        weekly_average: Some(weekly_average),
        monthly_average: Some(monthly_average),
        volatility_pct: Some(volatility),
        recommendation: Some(recommend(trend, volatility)),
        message: None,
    }
}

/// 저장 순서로 정렬된 연도별 이력에서 분석 결과를 계산합니다.
///
/// 레코드가 없으면 `None`을 반환합니다. 추세의 처음/마지막 비교는
/// 입력 순서를 그대로 따르므로, 호출 측은 저장 순서 키로 정렬해야
/// 합니다.
pub fn analyze_year(year: i32, records: Vec<RateHistoryRecord>) -> Option<YearAnalysis> {
    let first = records.first()?.avg_price_per_tola;
    let last = records.last()?.avg_price_per_tola;

    let prices: Vec<Decimal> = records.iter().map(|r| r.avg_price_per_tola).collect();
    let average_price = mean(&prices);
    let highest_price = *prices.iter().max()?;
    let lowest_price = *prices.iter().min()?;

    let trend = if last > first {
        TrendDirection::Bullish
    } else {
        TrendDirection::Bearish
    };
    let overall_change = change_pct(first, last);

    // 최근 등락률은 마지막 최대 7건 구간으로 계산한다
    let recent_first = prices[prices.len() - prices.len().min(WEEKLY_WINDOW)];
    let recent_change = change_pct(recent_first, last);

    Some(YearAnalysis {
        year,
        records,
        average_price,
        highest_price,
        lowest_price,
        trend,
        change_pct: overall_change,
        advice: investment_advice(overall_change, recent_change).to_string(),
    })
}

//! 캐럿/단위 환산 공통 로직.
//!
//! 모든 캐럿 가격은 24K 기준가에서 선형 비율로 파생되며, 그램당 가격은
//! 톨라당 가격에서 고정 중량 상수로 파생됩니다. 환산 값을 개별적으로
//! 설정하는 경로는 없습니다.

use crate::error::{CoreError, CoreResult};
use crate::types::{Karat, NewRateQuote, RateSource};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 24K 기준가에서 주어진 캐럿의 톨라당 가격을 계산합니다.
///
/// `tola_price = reference_24k * karat / 24`
pub fn tola_price_for_karat(reference_24k: Decimal, karat: Karat) -> Decimal {
    reference_24k * Decimal::from(karat.as_i32()) / dec!(24)
}

/// 24K 기준가에서 단일 캐럿의 실시간 시세를 계산합니다.
pub fn live_quote(
    reference_24k: Decimal,
    karat: Karat,
    tola_weight_grams: Decimal,
) -> CoreResult<NewRateQuote> {
    NewRateQuote::from_tola(
        karat,
        tola_price_for_karat(reference_24k, karat),
        tola_weight_grams,
        RateSource::Live,
    )
}

/// 24K 기준가에서 전체 캐럿 집합의 실시간 시세 배치를 계산합니다.
///
/// 어느 한 캐럿의 환산이라도 실패하면 전체 배치가 실패합니다.
/// 부분 배치는 반환되지 않습니다.
pub fn live_quote_set(
    reference_24k: Decimal,
    tola_weight_grams: Decimal,
) -> CoreResult<Vec<NewRateQuote>> {
    if reference_24k <= Decimal::ZERO {
        return Err(CoreError::InvalidInput(format!(
            "24K 기준가는 양수여야 합니다: {}",
            reference_24k
        )));
    }

    Karat::ALL
        .iter()
        .map(|karat| live_quote(reference_24k, *karat, tola_weight_grams))
        .collect()
}

/// 수동 입력 시세를 생성합니다.
///
/// 그램당 가격은 실시간 경로와 동일한 공식으로 파생됩니다.
pub fn manual_quote(
    karat: Karat,
    price_per_tola: Decimal,
    tola_weight_grams: Decimal,
) -> CoreResult<NewRateQuote> {
    NewRateQuote::from_tola(karat, price_per_tola, tola_weight_grams, RateSource::Manual)
}

/// 톨라당 가격에서 그램당 가격을 파생합니다.
pub fn gram_price(price_per_tola: Decimal, tola_weight_grams: Decimal) -> CoreResult<Decimal> {
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
    Ok(price_per_tola / tola_weight_grams)
}

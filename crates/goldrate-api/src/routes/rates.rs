//! 실시간 시세 라우트.
//!
//! - `GET /api/v1/rates` - 전체 캐럿 등급의 현재 시세 조회
//! - `POST /api/v1/rates` - 수동 시세 입력

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use goldrate_core::{Karat, RateQuote};

use crate::error::{from_data_error, from_validation_errors, ApiResult};
use crate::state::AppState;

// ==================== 검증 함수 ====================

/// 캐럿 등급 검증 (취급 등급: 24, 22, 21, 18, 12, 10)
pub(crate) fn validate_karat(value: i32) -> Result<(), ValidationError> {
    if Karat::from_i32(value).is_none() {
        return Err(ValidationError::new("unsupported_karat")
            .with_message("지원하지 않는 캐럿 등급입니다 (24, 22, 21, 18, 12, 10 중 하나)".into()));
    }
    Ok(())
}

/// 가격 검증 (양수)
pub(crate) fn validate_positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("price_not_positive")
            .with_message("가격은 0보다 커야 합니다".into()));
    }
    Ok(())
}

// ==================== 요청/응답 타입 ====================

/// 수동 시세 입력 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualRateRequest {
    /// 캐럿 등급 (24, 22, 21, 18, 12, 10)
    #[validate(custom(function = "validate_karat"))]
    #[schema(example = 22)]
    pub karat: i32,
    /// 톨라당 가격 (양수)
    #[validate(custom(function = "validate_positive_price"))]
    pub price_per_tola: Decimal,
}

/// 현재 시세 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    /// 캐럿 등급별 시세 (24K부터 내림차순)
    pub rates: Vec<RateQuote>,
    /// 시세 건수
    pub count: usize,
}

// ==================== 라우터 ====================

/// 실시간 시세 라우터 생성.
pub fn rates_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_rates).post(create_manual_rate))
}

/// 현재 시세 조회.
///
/// 캐시가 유효하면 캐시를, 아니면 외부 소스를 조회합니다.
/// 외부 소스 실패 시 최근 저장분으로 폴백합니다.
#[utoipa::path(
    get,
    path = "/api/v1/rates",
    tag = "rates",
    responses(
        (status = 200, description = "현재 시세 목록", body = RatesResponse),
        (status = 503, description = "실시간 조회 실패 및 폴백 데이터 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_rates(State(state): State<Arc<AppState>>) -> ApiResult<Json<RatesResponse>> {
    let rates = state
        .pricing
        .latest_rates()
        .await
        .map_err(from_data_error)?;

    let count = rates.len();
    Ok(Json(RatesResponse { rates, count }))
}

/// 수동 시세 입력.
///
/// 저장만 수행하며 실시간 시세 캐시에는 반영되지 않습니다.
#[utoipa::path(
    post,
    path = "/api/v1/rates",
    tag = "rates",
    request_body = ManualRateRequest,
    responses(
        (status = 201, description = "저장된 시세", body = RateQuote),
        (status = 400, description = "유효하지 않은 입력", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn create_manual_rate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualRateRequest>,
) -> ApiResult<(StatusCode, Json<RateQuote>)> {
    request.validate().map_err(|e| from_validation_errors(&e))?;

    let karat = Karat::try_from(request.karat).map_err(|e| from_data_error(e.into()))?;
    let stored = state
        .pricing
        .record_manual_rate(karat, request.price_per_tola)
        .await
        .map_err(from_data_error)?;

    Ok((StatusCode::CREATED, Json(stored)))
}

//! 연도별 이력 라우트.
//!
//! - `POST /api/v1/rates/history` - 연도별 평균가 이력 입력
//! - `GET /api/v1/rates/history/{year}` - 연도별 분석 조회

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use goldrate_core::{Karat, RateHistoryRecord, YearAnalysis};

use crate::error::{from_data_error, from_validation_errors, ApiResult};
use crate::routes::rates::{validate_karat, validate_positive_price};
use crate::state::AppState;

/// 이력 입력 요청.
///
/// 그램당 평균가는 서버에서 파생되므로 받지 않습니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInsertRequest {
    /// 연도
    #[validate(range(min = 1900, max = 2100, message = "연도는 1900-2100 사이여야 합니다"))]
    #[schema(example = 2024)]
    pub year: i32,
    /// 캐럿 등급 (24, 22, 21, 18, 12, 10)
    #[validate(custom(function = "validate_karat"))]
    #[schema(example = 22)]
    pub karat: i32,
    /// 톨라당 평균 가격 (양수)
    #[validate(custom(function = "validate_positive_price"))]
    pub avg_price_per_tola: Decimal,
}

/// 이력 라우터 생성.
pub fn history_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_history_record))
        .route("/{year}", get(get_year_analysis))
}

/// 연도별 평균가 이력 입력.
#[utoipa::path(
    post,
    path = "/api/v1/rates/history",
    tag = "history",
    request_body = HistoryInsertRequest,
    responses(
        (status = 201, description = "저장된 이력 레코드", body = RateHistoryRecord),
        (status = 400, description = "유효하지 않은 입력", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn create_history_record(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HistoryInsertRequest>,
) -> ApiResult<(StatusCode, Json<RateHistoryRecord>)> {
    request.validate().map_err(|e| from_validation_errors(&e))?;

    let karat = Karat::try_from(request.karat).map_err(|e| from_data_error(e.into()))?;
    let record = state
        .pricing
        .add_history_record(request.year, karat, request.avg_price_per_tola)
        .await
        .map_err(from_data_error)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// 연도별 분석 조회.
///
/// 저장 순서대로 처음/마지막을 비교해 추세와 등락률을 계산합니다.
#[utoipa::path(
    get,
    path = "/api/v1/rates/history/{year}",
    tag = "history",
    params(
        ("year" = i32, Path, description = "분석 대상 연도", example = 2024)
    ),
    responses(
        (status = 200, description = "연도별 분석 결과", body = YearAnalysis),
        (status = 404, description = "해당 연도의 이력 없음", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_year_analysis(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> ApiResult<Json<YearAnalysis>> {
    let analysis = state
        .pricing
        .rates_for_year(year)
        .await
        .map_err(from_data_error)?;

    Ok(Json(analysis))
}

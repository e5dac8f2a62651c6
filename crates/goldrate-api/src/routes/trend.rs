//! 추세 분석 라우트.
//!
//! `GET /api/v1/rates/trend` - 최근 저장 시세 기반 추세 요약.
//! 데이터가 부족해도 에러가 아니라 중립 요약(200)을 반환합니다.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use goldrate_core::TrendSummary;

use crate::error::{from_data_error, ApiResult};
use crate::state::AppState;

/// 추세 라우터 생성.
pub fn trend_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_trend))
}

/// 최근 시세 기반 추세 요약 조회.
#[utoipa::path(
    get,
    path = "/api/v1/rates/trend",
    tag = "trend",
    responses(
        (status = 200, description = "추세 요약 (데이터 부족 시 중립)", body = TrendSummary),
        (status = 500, description = "저장소 조회 실패", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_trend(State(state): State<Arc<AppState>>) -> ApiResult<Json<TrendSummary>> {
    let summary = state
        .pricing
        .current_trend()
        .await
        .map_err(from_data_error)?;

    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use goldrate_core::{Recommendation, TrendDirection};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_trend_on_empty_store_is_neutral_200() {
        let app = trend_router().with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["trend"], "neutral");
        assert_eq!(json["sampleCount"], 0);
        assert!(json["message"].as_str().unwrap().contains("Insufficient"));
        assert!(json.get("currentPrice").is_none());
        assert!(json.get("recommendation").is_none());
    }

    #[tokio::test]
    async fn test_trend_over_stored_rates() {
        let state = Arc::new(create_test_state());

        // 실시간 조회로 6건(캐럿별 1건)을 저장한다
        state.pricing.latest_rates().await.unwrap();

        let app = trend_router().with_state(Arc::clone(&state));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let summary: TrendSummary = serde_json::from_slice(&body_bytes(response).await).unwrap();

        // 최신 행은 마지막으로 저장된 10K 시세이므로 전체 평균을 밑돈다
        assert_eq!(summary.sample_count, 6);
        assert_eq!(summary.trend, TrendDirection::Bearish);
        assert_eq!(summary.current_price, Some(dec!(100000)));
        assert_eq!(summary.volatility_pct, Some(dec!(78.50)));
        assert_eq!(summary.recommendation, Some(Recommendation::Wait));
        assert!(summary.message.is_none());
    }
}

//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (컴포넌트 상태 포함)
//! - `/api/v1/rates` - 현재 시세 조회 / 수동 시세 입력
//! - `/api/v1/rates/history` - 연도별 이력 입력 / 분석 조회
//! - `/api/v1/rates/trend` - 최근 시세 추세 분석

pub mod health;
pub mod history;
pub mod rates;
pub mod trend;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use history::{history_router, HistoryInsertRequest};
pub use rates::{rates_router, ManualRateRequest, RatesResponse};
pub use trend::trend_router;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/rates", rates_router())
        .nest("/api/v1/rates/history", history_router())
        .nest("/api/v1/rates/trend", trend_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn full_app() -> Router {
        create_api_router().with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn test_all_routes_reachable() {
        for path in ["/health", "/api/v1/rates", "/api/v1/rates/trend"] {
            let response = full_app()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", path);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let response = full_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

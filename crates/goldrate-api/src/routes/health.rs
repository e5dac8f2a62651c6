//! 헬스체크 라우트.
//!
//! 서비스 상태와 의존 컴포넌트(데이터베이스, 시세 소스)의 상태를 보고합니다.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 개별 컴포넌트 상태.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    /// 정상 동작
    Up,
    /// 응답 없음 또는 에러
    Down,
    /// 구성되지 않음 (선택적 컴포넌트)
    NotConfigured,
}

/// 컴포넌트별 상태 목록.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    /// 데이터베이스 연결 상태
    pub database: ComponentStatus,
    /// 시세 소스 URL 구성 여부
    pub price_source: ComponentStatus,
}

/// 헬스체크 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// 전체 상태 ("healthy" | "degraded")
    pub status: String,
    /// 서버 버전
    pub version: String,
    /// 기동 후 경과 시간 (초)
    pub uptime_secs: i64,
    /// 응답 생성 시각 (Unix timestamp)
    pub timestamp: i64,
    /// 컴포넌트별 상태
    pub components: ComponentHealth,
}

/// 헬스체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}

/// 헬스체크 핸들러.
///
/// 데이터베이스가 구성되지 않은 경우(테스트 등)는 `not_configured`로 보고하며
/// 전체 상태에는 영향을 주지 않습니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "서비스 정상", body = HealthResponse),
        (status = 503, description = "의존 컴포넌트 이상", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(_) => {
            if state.is_db_healthy().await {
                ComponentStatus::Up
            } else {
                ComponentStatus::Down
            }
        }
        None => ComponentStatus::NotConfigured,
    };

    let price_source = if state.source_url.is_empty() {
        ComponentStatus::NotConfigured
    } else {
        ComponentStatus::Up
    };

    let degraded = database == ComponentStatus::Down;
    let status = if degraded { "degraded" } else { "healthy" };

    let response = HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().timestamp(),
        components: ComponentHealth {
            database,
            price_source,
        },
    };

    let code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (code, Json(response))
}

//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! # 예시
//!
//! ```json
//! {
//!   "code": "YEAR_NOT_FOUND",
//!   "message": "No history records for year 1999",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use goldrate_data::DataError;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "NO_DATA_AVAILABLE", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// 요청 HTTP 메서드 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 데이터 계층 에러를 HTTP 응답으로 변환.
///
/// - `NoDataAvailable` → 503
/// - `YearNotFound` → 404
/// - `FetchUnavailable` → 502
/// - `InvalidData` → 400
/// - 그 외 저장소 에러 → 500
pub fn from_data_error(err: DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = match &err {
        DataError::NoDataAvailable => (StatusCode::SERVICE_UNAVAILABLE, "NO_DATA_AVAILABLE"),
        DataError::YearNotFound(_) => (StatusCode::NOT_FOUND, "YEAR_NOT_FOUND"),
        DataError::FetchUnavailable(_) => (StatusCode::BAD_GATEWAY, "FETCH_UNAVAILABLE"),
        DataError::InvalidData(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        DataError::DuplicateError(_) => (StatusCode::CONFLICT, "DUPLICATE_RECORD"),
        DataError::PoolExhausted => (StatusCode::SERVICE_UNAVAILABLE, "POOL_EXHAUSTED"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
    };

    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}

/// 요청 본문 검증 실패를 HTTP 400 응답으로 변환.
pub fn from_validation_errors(
    errors: &validator::ValidationErrors,
) -> (StatusCode, Json<ApiErrorResponse>) {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ");

    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

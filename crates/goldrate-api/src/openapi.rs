//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! # 자동 생성 구조
//!
//! 각 라우트 모듈은 자체 스키마를 정의하고, 중앙 `ApiDoc`에서 집계합니다.
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ==================== 각 모듈에서 스키마 Import ====================

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, HistoryInsertRequest, ManualRateRequest,
    RatesResponse,
};
use goldrate_core::{
    RateHistoryRecord, RateQuote, RateSource, Recommendation, TrendDirection, TrendSummary,
    YearAnalysis,
};

// ==================== OpenAPI 문서 정의 ====================

/// Gold Rate API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gold Rate API",
        version = "0.1.0",
        description = r#"
# 금 시세 REST API

실시간 금 시세 산출, 수동 입력, 연도별 이력 분석을 위한 REST API입니다.

## 주요 기능

- **실시간 시세**: 외부 소스의 24K 기준가에서 전체 캐럿 등급 시세 산출
- **수동 입력**: 관리자의 수동 시세 보정 입력
- **이력 분석**: 연도별 평균가 이력과 등락률/투자 조언
- **추세 분석**: 최근 저장 시세 기반 추세/변동성/매수 추천

## 시세 산출 규칙

모든 캐럿 가격은 24K 톨라당 기준가의 선형 비율이며, 그램당 가격은
톨라 중량 상수(11.664g)로 파생됩니다. 실시간 조회가 실패하면 최근
저장분으로 폴백합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(
            name = "Goldrate Team",
            url = "https://github.com/user/goldrate"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "rates", description = "시세 - 실시간 조회 및 수동 입력"),
        (name = "history", description = "이력 - 연도별 평균가 입력 및 분석"),
        (name = "trend", description = "추세 - 최근 시세 추세/변동성 분석")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Rates =====
            RatesResponse,
            ManualRateRequest,
            RateQuote,
            RateSource,

            // ===== History =====
            HistoryInsertRequest,
            RateHistoryRecord,
            YearAnalysis,

            // ===== Trend =====
            TrendSummary,
            TrendDirection,
            Recommendation,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,

        // ===== Rates =====
        crate::routes::rates::get_rates,
        crate::routes::rates::create_manual_rate,

        // ===== History =====
        crate::routes::history::create_history_record,
        crate::routes::history::get_year_analysis,

        // ===== Trend =====
        crate::routes::trend::get_trend,
    )
)]
pub struct ApiDoc;

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

//! # Goldrate Core
//!
//! 금 시세 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시세 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 캐럿(순도) 및 시세 타입
//! - 톨라/그램 단위 환산 로직
//! - 추세 및 변동성 분석 로직
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;

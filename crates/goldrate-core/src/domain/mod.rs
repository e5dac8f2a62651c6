//! 시세 파이프라인의 도메인 로직.

mod analytics;
mod conversion;

pub use analytics::*;
pub use conversion::*;

//! 금 순도(캐럿) 정의.
//!
//! 이 모듈은 서비스가 취급하는 캐럿 등급을 닫힌 열거형으로 정의합니다.

use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 금 순도 등급 (24분율 캐럿).
///
/// 취급 등급은 고정 집합이며, 가격은 항상 24K 기준가에서 선형 비율로
/// 파생됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Karat {
    /// 순금 (24K)
    K24,
    /// 22K
    K22,
    /// 21K
    K21,
    /// 18K
    K18,
    /// 12K
    K12,
    /// 10K
    K10,
}

impl Karat {
    /// 서비스가 취급하는 전체 캐럿 등급 (표시 순서 고정).
    pub const ALL: [Karat; 6] = [
        Karat::K24,
        Karat::K22,
        Karat::K21,
        Karat::K18,
        Karat::K12,
        Karat::K10,
    ];

    /// 캐럿 수치를 반환합니다.
    pub fn as_i32(&self) -> i32 {
        match self {
            Karat::K24 => 24,
            Karat::K22 => 22,
            Karat::K21 => 21,
            Karat::K18 => 18,
            Karat::K12 => 12,
            Karat::K10 => 10,
        }
    }

    /// 24K 대비 순도 비율을 반환합니다 (예: 18K → 0.75).
    pub fn purity_ratio(&self) -> Decimal {
        Decimal::from(self.as_i32()) / dec!(24)
    }

    /// 캐럿 수치에서 변환합니다. 취급하지 않는 값이면 `None`을 반환합니다.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            24 => Some(Karat::K24),
            22 => Some(Karat::K22),
            21 => Some(Karat::K21),
            18 => Some(Karat::K18),
            12 => Some(Karat::K12),
            10 => Some(Karat::K10),
            _ => None,
        }
    }
}

impl From<Karat> for i32 {
    fn from(karat: Karat) -> Self {
        karat.as_i32()
    }
}

impl TryFrom<i32> for Karat {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Karat::from_i32(value).ok_or(CoreError::InvalidKarat(value))
    }
}

impl fmt::Display for Karat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.as_i32())
    }
}

impl FromStr for Karat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches(['K', 'k']);
        let value: i32 = digits
            .parse()
            .map_err(|_| CoreError::InvalidInput(format!("잘못된 캐럿 표기: {}", s)))?;
        Karat::try_from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_karat_values() {
        assert_eq!(Karat::K24.as_i32(), 24);
        assert_eq!(Karat::K10.as_i32(), 10);
        assert_eq!(Karat::ALL.len(), 6);
    }

    #[test]
    fn test_karat_purity_ratio() {
        assert_eq!(Karat::K24.purity_ratio(), dec!(1));
        assert_eq!(Karat::K18.purity_ratio(), dec!(0.75));
        assert_eq!(Karat::K12.purity_ratio(), dec!(0.5));
    }

    #[test]
    fn test_karat_from_i32() {
        assert_eq!(Karat::from_i32(22), Some(Karat::K22));
        assert_eq!(Karat::from_i32(15), None);
        assert!(Karat::try_from(15).is_err());
    }

    #[test]
    fn test_karat_parse() {
        assert_eq!("24K".parse::<Karat>().unwrap(), Karat::K24);
        assert_eq!("18k".parse::<Karat>().unwrap(), Karat::K18);
        assert_eq!("21".parse::<Karat>().unwrap(), Karat::K21);
        assert!("gold".parse::<Karat>().is_err());
    }

    #[test]
    fn test_karat_serde_roundtrip() {
        let json = serde_json::to_string(&Karat::K22).unwrap();
        assert_eq!(json, "22");

        let parsed: Karat = serde_json::from_str("18").unwrap();
        assert_eq!(parsed, Karat::K18);

        assert!(serde_json::from_str::<Karat>("15").is_err());
    }
}

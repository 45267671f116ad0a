use serde::{Deserialize, Serialize, de::Deserializer, ser::Serializer};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

/// One ray: 27-decimal fixed point, the protocol's rate unit.
pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;

///
/// RateError
///

#[derive(Debug, ThisError)]
pub enum RateError {
    #[error("rate is not a decimal number: {0}")]
    BadDigits(String),

    #[error("rate has more than 27 fractional digits: {0}")]
    TooPrecise(String),

    #[error("rate overflows the ray range: {0}")]
    Overflow(String),
}

///
/// Ray
/// A borrow-rate (or utilization) value in ray units. Configs write these
/// as decimal fractions ("0.039" is 3.9%); the wrapper keeps the full
/// 27-decimal precision as an integer.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ray(u128);

impl Ray {
    #[must_use]
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u128 {
        self.0
    }

    // Canonical decimal-fraction rendering, exact (no floats).
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        let int = self.0 / RAY;
        let frac = self.0 % RAY;

        if frac == 0 {
            return int.to_string();
        }

        let frac = format!("{frac:027}");
        let frac = frac.trim_end_matches('0');

        format!("{int}.{frac}")
    }
}

impl FromStr for Ray {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(RateError::BadDigits(s.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(RateError::BadDigits(s.to_string()));
        }
        if frac_part.len() > 27 {
            return Err(RateError::TooPrecise(s.to_string()));
        }

        let int: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| RateError::Overflow(s.to_string()))?
        };

        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let digits: u128 = frac_part
                .parse()
                .map_err(|_| RateError::Overflow(s.to_string()))?;
            digits * 10u128.pow(27 - frac_part.len() as u32)
        };

        int.checked_mul(RAY)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or_else(|| RateError::Overflow(s.to_string()))
    }
}

#[allow(clippy::cast_precision_loss)]
impl Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // default format as a percentage for log lines
        write!(f, "{:.2}%", self.0 as f64 / RAY as f64 * 100.0)
    }
}

impl Serialize for Ray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Ray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;

        s.parse().map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///

use serde::{Deserialize, Serialize, de::Deserializer, ser::Serializer};
use std::{
    fmt::{self, Display},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// AddressError
///

#[derive(Debug, ThisError)]
pub enum AddressError {
    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("address must be 20 bytes: {0}")]
    BadLength(String),

    #[error("address is not valid hex: {0}")]
    BadHex(String),
}

///
/// Address
/// A 20-byte account or contract identifier. The all-zero value doubles as
/// the "configured as absent" sentinel, which is how per-network address
/// tables express deliberately blank entries.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;

        if hex_part.len() != 40 {
            return Err(AddressError::BadLength(s.to_string()));
        }

        let bytes = hex::decode(hex_part).map_err(|_| AddressError::BadHex(s.to_string()))?;

        let mut buf = [0u8; 20];
        buf.copy_from_slice(&bytes);

        Ok(Self(buf))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    // The empty string is accepted and maps to the zero sentinel: upstream
    // market tables leave entries blank to mean "not deployed here".
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Self::ZERO);
        }

        s.parse().map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///

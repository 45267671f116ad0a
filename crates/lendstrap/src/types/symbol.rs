use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// Symbol
/// Ticker of a reserve asset ("DAI", "WETH", …) or the quote-currency
/// pseudo-symbol. Plain string underneath; the newtype keeps table keys
/// from mixing with derived token names.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

//! Order identifiers and their generator.
//!
//! Generated IDs look like `ORD-1760778900123-k3x9q2mz`: a 13-digit
//! millisecond time component followed by a random lowercase suffix.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every generated order ID.
pub const ORDER_ID_PREFIX: &str = "ORD";

/// Length of the random suffix.
pub const ORDER_ID_SUFFIX_LEN: usize = 8;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Unique identifier for an order, assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an identifier from an existing string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Generator combining a monotonic time component with a random suffix.
///
/// If the clock has not moved past the last issued time component (same
/// millisecond, or the clock stepped back), the last value + 1 is used, so
/// two IDs from one generator never share a time component.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last_millis: i64,
}

impl OrderIdGenerator {
    /// Create a generator with no history.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_millis: 0 }
    }

    /// Generate an ID using the current wall clock.
    pub fn generate(&mut self) -> OrderId {
        self.generate_at(chrono::Utc::now().timestamp_millis())
    }

    /// Generate an ID for the given epoch milliseconds.
    pub fn generate_at(&mut self, now_millis: i64) -> OrderId {
        let millis = if now_millis > self.last_millis {
            now_millis
        } else {
            self.last_millis + 1
        };
        self.last_millis = millis;

        let mut rng = rand::rng();
        let suffix: String = (0..ORDER_ID_SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())]))
            .collect();

        OrderId(format!("{ORDER_ID_PREFIX}-{millis:013}-{suffix}"))
    }
}

//! Order type (market, limit, stop limit).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order type specifying which prices the order carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Market order - no price fields.
    Market,
    /// Limit order - requires a price.
    Limit,
    /// Stop-limit order - requires a price and a stop price.
    #[serde(rename = "Stop Limit", alias = "StopLimit")]
    StopLimit,
}

impl OrderType {
    /// Every order type, in display order.
    pub const ALL: [Self; 3] = [Self::Market, Self::Limit, Self::StopLimit];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "Market",
            Self::Limit => "Limit",
            Self::StopLimit => "Stop Limit",
        }
    }

    /// Returns true if this order type requires a price.
    #[must_use]
    pub const fn requires_price(&self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit)
    }

    /// Returns true if this order type requires a stop price.
    #[must_use]
    pub const fn requires_stop_price(&self) -> bool {
        matches!(self, Self::StopLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "market" => Ok(Self::Market),
            "limit" => Ok(Self::Limit),
            "stoplimit" => Ok(Self::StopLimit),
            _ => Err(format!("unknown order type: {}", s.trim())),
        }
    }
}

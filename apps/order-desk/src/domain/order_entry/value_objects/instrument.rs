//! Tradable instruments offered by the order form.

use std::fmt;
use std::str::FromStr;

use crate::domain::shared::Symbol;

/// The fixed set of instruments the form lets a user pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Instrument {
    /// Nifty 50 index.
    #[default]
    Nifty,
    /// Nifty Bank index.
    BankNifty,
    /// Reliance Industries.
    Reliance,
    /// Tata Consultancy Services.
    Tcs,
    /// Infosys.
    Infy,
    /// HDFC Bank.
    HdfcBank,
    /// ICICI Bank.
    IciciBank,
    /// State Bank of India.
    Sbin,
}

impl Instrument {
    /// Every instrument, in the order the form lists them.
    pub const ALL: [Self; 8] = [
        Self::Nifty,
        Self::BankNifty,
        Self::Reliance,
        Self::Tcs,
        Self::Infy,
        Self::HdfcBank,
        Self::IciciBank,
        Self::Sbin,
    ];

    /// Ticker as sent to the server.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nifty => "NIFTY",
            Self::BankNifty => "BANKNIFTY",
            Self::Reliance => "RELIANCE",
            Self::Tcs => "TCS",
            Self::Infy => "INFY",
            Self::HdfcBank => "HDFCBANK",
            Self::IciciBank => "ICICIBANK",
            Self::Sbin => "SBIN",
        }
    }

    /// Convert to a domain symbol.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        Symbol::new(self.as_str())
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| format!("unknown instrument: {}", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_instrument_is_nifty() {
        assert_eq!(Instrument::default(), Instrument::Nifty);
    }

    #[test]
    fn instrument_parses_case_insensitively() {
        assert_eq!("reliance".parse::<Instrument>().unwrap(), Instrument::Reliance);
        assert_eq!("TCS".parse::<Instrument>().unwrap(), Instrument::Tcs);
        assert!("AAPL".parse::<Instrument>().is_err());
    }

    #[test]
    fn tickers_are_unique() {
        let mut tickers: Vec<_> = Instrument::ALL.iter().map(Instrument::as_str).collect();
        tickers.sort_unstable();
        tickers.dedup();
        assert_eq!(tickers.len(), Instrument::ALL.len());
    }
}

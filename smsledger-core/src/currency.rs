//! Currency codes seen in SMS bodies and normalization into the base currency (RWF).

use serde::{Deserialize, Serialize};

/// Default USD → RWF conversion rate.
pub const USD_TO_RWF: f64 = 1440.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Rwandan franc, the base currency.
    #[serde(rename = "RWF")]
    Rwf,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// Map a currency token as it appears in a message body.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "RWF" => Some(Currency::Rwf),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }

    /// Convert `amount` into the base currency using `usd_to_rwf`.
    ///
    /// Base-currency amounts pass through unchanged; USD is multiplied by the rate exactly once.
    pub fn to_base(&self, amount: f64, usd_to_rwf: f64) -> f64 {
        match self {
            Currency::Rwf => amount,
            Currency::Usd => amount * usd_to_rwf,
        }
    }
}

/// Parse a numeric literal captured from a message body.
///
/// Thousands separators are stripped. Returns `None` for anything that is not a
/// finite number, so callers can fall back to zero without panicking.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    let value: f64 = cleaned.parse().ok()?;
    value.is_finite().then_some(value)
}

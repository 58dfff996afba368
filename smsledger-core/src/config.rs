//! Ingest configuration: known senders, classifier phrase lists and the conversion rate.
//!
//! Everything has a compiled-in default; all of it can be overridden (config file, CLI
//! flags, tests) by building a different `IngestConfig`.

use serde::{Deserialize, Serialize};

use crate::currency::USD_TO_RWF;
use crate::error::{Error, Result};

pub const EQUITY_BANK_SENDER: &str = "EQUITYBANK";
pub const MOBILE_MONEY_SENDER: &str = "M-MONEY";

/// Phrases that mark a message as non-transactional even if it mentions money.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "Never share this code",
    "One-Time-Pin",
    "OTM",
    "Use code",
    "Do no share",
    "Customer Care",
    "balance of accumulated interest",
];

/// Phrases suggesting a message describes a financial event.
pub const DEFAULT_TRANSACTION_INDICATORS: &[&str] = &[
    "RWF",
    "USD",
    "transferred",
    "received",
    "sent",
    "withdrawn",
    "deposited",
    "payment",
    "completed",
    "successfully",
    "balance:",
    "new balance",
    "Fee",
    "TxId:",
    "Ref.",
    "Transaction Id",
];

/// The two institutions whose messages are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Institution {
    #[serde(rename = "equity_bank")]
    EquityBank,
    #[serde(rename = "mtn_momo")]
    MobileMoney,
}

impl Institution {
    /// Wallet the institution's transactions are booked against.
    pub fn wallet_id(&self) -> &'static str {
        match self {
            Institution::EquityBank => "equity_bank",
            Institution::MobileMoney => "mtn_momo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Senders {
    pub bank: String,
    pub mobile_money: String,
}

impl Default for Senders {
    fn default() -> Self {
        Self {
            bank: EQUITY_BANK_SENDER.to_string(),
            mobile_money: MOBILE_MONEY_SENDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// RWF per USD
    pub usd_to_rwf: f64,
    pub exclude_patterns: Vec<String>,
    pub transaction_indicators: Vec<String>,
    pub senders: Senders,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            usd_to_rwf: USD_TO_RWF,
            exclude_patterns: to_owned(DEFAULT_EXCLUDE_PATTERNS),
            transaction_indicators: to_owned(DEFAULT_TRANSACTION_INDICATORS),
            senders: Senders::default(),
        }
    }
}

impl IngestConfig {
    pub fn with_usd_rate(mut self, usd_to_rwf: f64) -> Self {
        self.usd_to_rwf = usd_to_rwf;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.usd_to_rwf.is_finite() || self.usd_to_rwf <= 0.0 {
            return Err(Error::Config(format!(
                "usd_to_rwf must be a positive number, got {}",
                self.usd_to_rwf
            )));
        }
        if self.senders.bank.trim().is_empty() || self.senders.mobile_money.trim().is_empty() {
            return Err(Error::Config("sender ids must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolve a sender address against the allow-list (exact match after uppercasing).
    pub fn institution_for(&self, address: &str) -> Option<Institution> {
        let address = address.to_uppercase();
        if address == self.senders.bank.to_uppercase() {
            Some(Institution::EquityBank)
        } else if address == self.senders.mobile_money.to_uppercase() {
            Some(Institution::MobileMoney)
        } else {
            None
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

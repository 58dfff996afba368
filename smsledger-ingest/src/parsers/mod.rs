//! Sender-specific SMS template parsers.

pub mod equity_bank;
pub mod mobile_money;

use regex::Captures;
use smsledger_core::{TransactionDraft, parse_amount};

pub use equity_bank::{BankEvent, EquityBankParser};
pub use mobile_money::{MobileMoneyParser, MomoEvent};

/// Fills a draft from the body of one institution's messages.
///
/// Templates are tried in a fixed priority order and the first match wins. A body
/// matching no template is not an error: the draft comes back with its defaults,
/// plus whatever loose fields (reference, balance) could be scavenged.
pub trait SmsParser {
    fn extract(&self, body: &str, draft: TransactionDraft) -> TransactionDraft;
}

/// Numeric capture with separators stripped; `None` if absent or malformed.
pub(crate) fn capture_amount(caps: &Captures<'_>, name: &str) -> Option<f64> {
    caps.name(name).and_then(|m| parse_amount(m.as_str()))
}

pub(crate) fn capture_str<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
    caps.name(name).map(|m| m.as_str())
}

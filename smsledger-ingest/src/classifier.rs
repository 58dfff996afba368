//! Decides whether a raw SMS is a transaction notification worth parsing.
//!
//! Rules, first failing rule rejects:
//! 1. sender must be one of the configured institutions
//! 2. no exclusion phrase (OTP warnings, customer-care boilerplate)
//! 3. at least one transaction indicator phrase
//!
//! Phrase matching is case-sensitive substring matching.

use smsledger_core::{IngestConfig, RawMessage};

pub fn is_transaction_message(message: &RawMessage, config: &IngestConfig) -> bool {
    if config.institution_for(&message.address).is_none() {
        return false;
    }

    let body = &message.body;
    if config
        .exclude_patterns
        .iter()
        .any(|pattern| body.contains(pattern.as_str()))
    {
        return false;
    }

    config
        .transaction_indicators
        .iter()
        .any(|indicator| body.contains(indicator.as_str()))
}

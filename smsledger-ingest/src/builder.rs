//! Builds the initial draft for a message that passed the classifier.

use smsledger_core::{Institution, RawMessage, TransactionDraft};

/// Seed a draft for `message`, the `index`-th entry of the filtered sequence.
///
/// The id (and default reference) is `sms_<local id>`, or `sms_<index>` when the
/// message has no local id.
pub fn build_draft(message: &RawMessage, index: usize, institution: Institution) -> TransactionDraft {
    let id = match message.local_id() {
        Some(local) => format!("sms_{local}"),
        None => format!("sms_{index}"),
    };
    TransactionDraft::new(id, institution, message.body.clone(), message.timestamp())
}

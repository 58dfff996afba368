//! MTN Mobile Money (M-Money) SMS parser
//!
//! Every amount is in RWF. When a message reports the account's new balance, that
//! figure is stored as the draft balance in place of the transaction amount.
//!
//! Recognized shapes, in priority order:
//!   *165*S*1,000 RWF transferred to JOHN DOE (250788123456) ... Fee was: 100. Your new balance: 5,000 RWF
//!   You have received 20,000 RWF from ALICE UWASE (*********456) ...
//!   *162*TxId:123*S*Your payment of 2,000 RWF to MTN Cash Power ... Fee was 0 ...
//!   *164*S*Y'ello, A transaction of 3,000 RWF by NETFLIX on your MOMO account ...
//!   You have withdrawn 10,000 RWF from your mobile money account ... Fee paid: 350 ...

use regex::Regex;
use smsledger_core::{Category, Result, TransactionDraft, TransactionType};
use tracing::trace;

use super::{SmsParser, capture_amount, capture_str};

const AMOUNT: &str = r"\d[\d,]*";

#[derive(Debug, Clone, PartialEq)]
pub enum MomoEvent<'a> {
    Transfer {
        amount: Option<f64>,
        recipient: &'a str,
        phone: &'a str,
    },
    Received {
        amount: Option<f64>,
        sender: &'a str,
        phone: &'a str,
    },
    Payment {
        amount: Option<f64>,
        merchant: &'a str,
    },
    /// Merchant-initiated charge against the MoMo account
    MerchantCharge {
        amount: Option<f64>,
        merchant: &'a str,
    },
    AgentWithdrawal {
        amount: Option<f64>,
    },
}

impl MomoEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            MomoEvent::Transfer { .. } => "transfer",
            MomoEvent::Received { .. } => "received",
            MomoEvent::Payment { .. } => "payment",
            MomoEvent::MerchantCharge { .. } => "merchant_charge",
            MomoEvent::AgentWithdrawal { .. } => "agent_withdrawal",
        }
    }
}

pub struct MobileMoneyParser {
    transfer_re: Regex,
    received_re: Regex,
    payment_re: Regex,
    txid_payment_re: Regex,
    merchant_re: Regex,
    agent_withdraw_re: Regex,
    fee_was_re: Regex,
    fee_paid_re: Regex,
    new_balance_re: Regex,
    txid_re: Regex,
}

impl MobileMoneyParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            transfer_re: Regex::new(&format!(
                r"(?P<amount>{AMOUNT})\s+RWF transferred to\s+(?P<recipient>[^(]+)\((?P<phone>\d+)\)"
            ))?,
            received_re: Regex::new(&format!(
                r"You have received\s+(?P<amount>{AMOUNT})\s+RWF from\s+(?P<sender>[^(]+)\(\*+(?P<phone>\d+)\)"
            ))?,
            payment_re: Regex::new(&format!(
                r"Your payment of\s+(?P<amount>{AMOUNT})\s+RWF to\s+(?P<merchant>[^0-9]+)"
            ))?,
            txid_payment_re: Regex::new(&format!(
                r"TxId:\s+\d+\.\s+Your payment of\s+(?P<amount>{AMOUNT})\s+RWF to\s+(?P<merchant>[^0-9]+)"
            ))?,
            merchant_re: Regex::new(&format!(
                r"transaction of\s+(?P<amount>{AMOUNT})\s+RWF by\s+(?P<merchant>.+?)\s*on your MOMO"
            ))?,
            agent_withdraw_re: Regex::new(&format!(
                r"withdrawn\s+(?P<amount>{AMOUNT})\s+RWF from your mobile money"
            ))?,
            fee_was_re: Regex::new(&format!(r"Fee was:?\s+(?P<amount>{AMOUNT})"))?,
            fee_paid_re: Regex::new(&format!(r"Fee paid:\s+(?P<amount>{AMOUNT})"))?,
            new_balance_re: Regex::new(&format!(
                r"[Nn]ew balance:\s*(?P<amount>{AMOUNT})\s+RWF"
            ))?,
            txid_re: Regex::new(r"TxId:\s*(?P<txid>\d+)|Transaction Id:\s*(?P<transaction_id>\d+)")?,
        })
    }

    /// Match `body` against the templates in priority order.
    pub fn match_template<'a>(&self, body: &'a str) -> Option<MomoEvent<'a>> {
        if let Some(caps) = self.transfer_re.captures(body) {
            return Some(MomoEvent::Transfer {
                amount: capture_amount(&caps, "amount"),
                recipient: capture_str(&caps, "recipient")?.trim(),
                phone: capture_str(&caps, "phone")?,
            });
        }
        if let Some(caps) = self.received_re.captures(body) {
            return Some(MomoEvent::Received {
                amount: capture_amount(&caps, "amount"),
                sender: capture_str(&caps, "sender")?.trim(),
                phone: capture_str(&caps, "phone")?,
            });
        }
        let payment = self
            .payment_re
            .captures(body)
            .or_else(|| self.txid_payment_re.captures(body));
        if let Some(caps) = payment {
            return Some(MomoEvent::Payment {
                amount: capture_amount(&caps, "amount"),
                merchant: capture_str(&caps, "merchant")?.trim(),
            });
        }
        if let Some(caps) = self.merchant_re.captures(body) {
            return Some(MomoEvent::MerchantCharge {
                amount: capture_amount(&caps, "amount"),
                merchant: capture_str(&caps, "merchant")?.trim(),
            });
        }
        if let Some(caps) = self.agent_withdraw_re.captures(body) {
            return Some(MomoEvent::AgentWithdrawal {
                amount: capture_amount(&caps, "amount"),
            });
        }
        None
    }

    fn scan(re: &Regex, body: &str) -> Option<f64> {
        re.captures(body)
            .and_then(|caps| capture_amount(&caps, "amount"))
    }

    /// Balance to store: the reported new balance when present and non-zero, else the
    /// transaction amount. An emptied account still books the transaction.
    fn stored_balance(&self, body: &str, amount: Option<f64>) -> f64 {
        Self::scan(&self.new_balance_re, body)
            .filter(|b| *b != 0.0)
            .or(amount)
            .unwrap_or(0.0)
    }

    fn apply(&self, body: &str, event: MomoEvent<'_>, draft: TransactionDraft) -> TransactionDraft {
        match event {
            MomoEvent::Transfer {
                amount,
                recipient,
                phone,
            } => draft
                .with_kind(TransactionType::Expense)
                .with_category(Category::Transfer)
                .with_balance(self.stored_balance(body, amount))
                .with_fee(Self::scan(&self.fee_was_re, body).unwrap_or(0.0))
                .with_note_line(&format!("Transfer to {recipient} ({phone})")),
            MomoEvent::Received {
                amount,
                sender,
                phone,
            } => draft
                .with_kind(TransactionType::Income)
                .with_category(Category::ReceivedMoney)
                .with_balance(self.stored_balance(body, amount))
                .with_note_line(&format!("Received from {sender} ({phone})")),
            MomoEvent::Payment { amount, merchant } => draft
                .with_kind(TransactionType::Expense)
                .with_category(payment_category(body))
                .with_balance(self.stored_balance(body, amount))
                .with_fee(Self::scan(&self.fee_was_re, body).unwrap_or(0.0))
                .with_note_line(&format!("Payment to {merchant}")),
            MomoEvent::MerchantCharge { amount, merchant } => draft
                .with_kind(TransactionType::Expense)
                .with_category(Category::MerchantPayment)
                .with_balance(self.stored_balance(body, amount))
                .with_note_line(&format!("Payment to {merchant}")),
            MomoEvent::AgentWithdrawal { amount } => draft
                .with_kind(TransactionType::Expense)
                .with_category(Category::CashWithdrawal)
                .with_balance(self.stored_balance(body, amount))
                .with_fee(Self::scan(&self.fee_paid_re, body).unwrap_or(0.0))
                .with_note_line("Cash withdrawal"),
        }
    }

    fn scavenge(&self, body: &str, draft: TransactionDraft) -> TransactionDraft {
        let txid = self.txid_re.captures(body).and_then(|caps| {
            capture_str(&caps, "txid").or_else(|| capture_str(&caps, "transaction_id"))
        });
        match txid {
            Some(txid) => draft.with_reference(txid),
            None => draft,
        }
    }
}

/// Bill payments are split by what was bought.
fn payment_category(body: &str) -> Category {
    if body.contains("Cash Power") || body.contains("MTN cash Power") {
        Category::Electricity
    } else if body.contains("Airtime") {
        Category::Airtime
    } else {
        Category::Payment
    }
}

impl SmsParser for MobileMoneyParser {
    fn extract(&self, body: &str, draft: TransactionDraft) -> TransactionDraft {
        match self.match_template(body) {
            Some(event) => {
                trace!(id = %draft.id, template = event.name(), "mobile money template matched");
                self.apply(body, event, draft)
            }
            None => {
                trace!(id = %draft.id, "no mobile money template matched");
                self.scavenge(body, draft)
            }
        }
    }
}

//! Equity Bank SMS parser
//!
//! Amounts arrive in RWF or USD and are normalized to RWF with the configured rate.
//!
//! Recognized shapes, in priority order:
//!   50.00 USD was successfully sent to JANE SMITH 250788000000. Charges 1.00 USD ...
//!   You have received 120.00 USD from JOHN DOE ...
//!   ... you have withdrawn USD 100 withdraw charges 2 ref 5512 ...
//!   ... you have deposited RWF 20000 ...
//!   Auth for card 4***1234 Amt: USD 12.50 Details:NETFLIX.COM ...
//!   Debit for card 4***1234 ... Amt: USD 12.50

use regex::Regex;
use smsledger_core::{Category, Currency, Result, TransactionDraft, TransactionType, parse_amount};
use tracing::trace;

use super::{SmsParser, capture_amount, capture_str};

const AMOUNT: &str = r"\d[\d,]*(?:\.\d+)?";

/// The template an Equity Bank body matched, with its captured fields.
#[derive(Debug, Clone, PartialEq)]
pub enum BankEvent<'a> {
    Sent {
        amount: Option<f64>,
        currency: Currency,
        recipient: &'a str,
        /// Plain phone number; `None` for masked-card destinations.
        phone: Option<&'a str>,
    },
    Received {
        amount: Option<f64>,
        currency: Currency,
        sender: &'a str,
    },
    Withdrawn {
        amount: Option<f64>,
        currency: Currency,
    },
    Deposited {
        amount: Option<f64>,
        currency: Currency,
    },
    Card {
        amount: Option<f64>,
        currency: Currency,
        details: Option<&'a str>,
    },
}

impl BankEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            BankEvent::Sent { .. } => "sent",
            BankEvent::Received { .. } => "received",
            BankEvent::Withdrawn { .. } => "withdrawn",
            BankEvent::Deposited { .. } => "deposited",
            BankEvent::Card { .. } => "card",
        }
    }
}

pub struct EquityBankParser {
    usd_to_rwf: f64,
    sent_re: Regex,
    received_re: Regex,
    withdrawn_re: Regex,
    deposited_re: Regex,
    card_auth_re: Regex,
    card_debit_re: Regex,
    transfer_charges_re: Regex,
    withdraw_charges_re: Regex,
    balance_re: Regex,
    reference_re: Regex,
}

impl EquityBankParser {
    pub fn new(usd_to_rwf: f64) -> Result<Self> {
        Ok(Self {
            usd_to_rwf,
            sent_re: Regex::new(&format!(
                r"(?P<amount>{AMOUNT})\s+(?P<currency>RWF|USD)\s+(?:was|has been) successfully sent to\s+(?P<recipient>[^0-9]+?)(?:\s+4\*+\d+|\s+(?P<phone>\d+))"
            ))?,
            received_re: Regex::new(&format!(
                r"You have received\s+(?P<amount>{AMOUNT})\s+(?P<currency>RWF|USD)\s+from\s+(?P<sender>[^0-9]+)"
            ))?,
            withdrawn_re: Regex::new(&format!(
                r"withdrawn\s+(?P<currency>USD|RWF)\s+(?P<amount>{AMOUNT})"
            ))?,
            deposited_re: Regex::new(&format!(
                r"deposited\s+(?P<currency>USD|RWF)\s+(?P<amount>{AMOUNT})"
            ))?,
            card_auth_re: Regex::new(&format!(
                r"Amt:\s+(?P<currency>USD|RWF)\s+(?P<amount>{AMOUNT})\s+Details:(?P<details>[^.]+)"
            ))?,
            card_debit_re: Regex::new(&format!(
                r"Debit for card.*Amt:\s+(?P<currency>USD|RWF)\s+(?P<amount>{AMOUNT})"
            ))?,
            transfer_charges_re: Regex::new(&format!(
                r"Charges\s+(?P<amount>{AMOUNT})\s+(?P<currency>USD|RWF)"
            ))?,
            withdraw_charges_re: Regex::new(&format!(r"charges\s+(?P<amount>{AMOUNT})"))?,
            balance_re: Regex::new(r"(?i)balance[:\s]+(?P<amount>\d[\d,]*)")?,
            reference_re: Regex::new(r"[Rr]ef[.:\s]+(?P<reference>\d+)")?,
        })
    }

    /// Match `body` against the templates in priority order.
    pub fn match_template<'a>(&self, body: &'a str) -> Option<BankEvent<'a>> {
        if let Some(caps) = self.sent_re.captures(body) {
            return Some(BankEvent::Sent {
                amount: capture_amount(&caps, "amount"),
                currency: Currency::from_code(capture_str(&caps, "currency")?)?,
                recipient: capture_str(&caps, "recipient")?.trim(),
                phone: capture_str(&caps, "phone"),
            });
        }
        if let Some(caps) = self.received_re.captures(body) {
            return Some(BankEvent::Received {
                amount: capture_amount(&caps, "amount"),
                currency: Currency::from_code(capture_str(&caps, "currency")?)?,
                sender: capture_str(&caps, "sender")?.trim(),
            });
        }
        if let Some(caps) = self.withdrawn_re.captures(body) {
            return Some(BankEvent::Withdrawn {
                amount: capture_amount(&caps, "amount"),
                currency: Currency::from_code(capture_str(&caps, "currency")?)?,
            });
        }
        if let Some(caps) = self.deposited_re.captures(body) {
            return Some(BankEvent::Deposited {
                amount: capture_amount(&caps, "amount"),
                currency: Currency::from_code(capture_str(&caps, "currency")?)?,
            });
        }
        let card = self
            .card_auth_re
            .captures(body)
            .or_else(|| self.card_debit_re.captures(body));
        if let Some(caps) = card {
            return Some(BankEvent::Card {
                amount: capture_amount(&caps, "amount"),
                currency: Currency::from_code(capture_str(&caps, "currency")?)?,
                details: capture_str(&caps, "details")
                    .map(str::trim)
                    .filter(|d| !d.is_empty()),
            });
        }
        None
    }

    fn to_rwf(&self, amount: Option<f64>, currency: Currency) -> f64 {
        amount
            .map(|a| currency.to_base(a, self.usd_to_rwf))
            .unwrap_or(0.0)
    }

    fn apply(&self, body: &str, event: BankEvent<'_>, draft: TransactionDraft) -> TransactionDraft {
        match event {
            BankEvent::Sent {
                amount,
                currency,
                recipient,
                phone,
            } => {
                let fee = self
                    .transfer_charges_re
                    .captures(body)
                    .and_then(|caps| {
                        let charge = capture_amount(&caps, "amount")?;
                        let currency = Currency::from_code(capture_str(&caps, "currency")?)?;
                        Some(currency.to_base(charge, self.usd_to_rwf))
                    })
                    .unwrap_or(0.0);
                draft
                    .with_kind(TransactionType::Expense)
                    .with_category(Category::Transfer)
                    .with_balance(self.to_rwf(amount, currency))
                    .with_fee(fee)
                    .with_note_line(&format!(
                        "Transfer to {} ({})",
                        recipient,
                        phone.unwrap_or("N/A")
                    ))
            }
            BankEvent::Received {
                amount,
                currency,
                sender,
            } => draft
                .with_kind(TransactionType::Income)
                .with_category(Category::ReceivedMoney)
                .with_balance(self.to_rwf(amount, currency))
                .with_note_line(&format!("Received from {sender}")),
            BankEvent::Withdrawn { amount, currency } => {
                // Withdrawal charges carry no currency token and are taken as RWF.
                let fee = self
                    .withdraw_charges_re
                    .captures(body)
                    .and_then(|caps| capture_amount(&caps, "amount"))
                    .unwrap_or(0.0);
                draft
                    .with_kind(TransactionType::Expense)
                    .with_category(Category::AtmWithdrawal)
                    .with_balance(self.to_rwf(amount, currency))
                    .with_fee(fee)
                    .with_note_line("ATM Withdrawal")
            }
            BankEvent::Deposited { amount, currency } => draft
                .with_kind(TransactionType::Income)
                .with_category(Category::CashDeposit)
                .with_balance(self.to_rwf(amount, currency))
                .with_note_line("Cash Deposit"),
            BankEvent::Card {
                amount,
                currency,
                details,
            } => draft
                .with_kind(TransactionType::Expense)
                .with_category(Category::CardPayment)
                .with_balance(self.to_rwf(amount, currency))
                .with_note_line(details.unwrap_or("Card Payment")),
        }
    }

    /// Fallback for unrecognized bodies: pick up a raw balance figure and a reference.
    fn scavenge(&self, body: &str, mut draft: TransactionDraft) -> TransactionDraft {
        if let Some(balance) = self
            .balance_re
            .captures(body)
            .and_then(|caps| parse_amount(capture_str(&caps, "amount")?))
        {
            draft = draft.with_balance(balance);
        }
        if let Some(reference) = self
            .reference_re
            .captures(body)
            .and_then(|caps| capture_str(&caps, "reference"))
        {
            draft = draft.with_reference(reference);
        }
        draft
    }
}

impl SmsParser for EquityBankParser {
    fn extract(&self, body: &str, draft: TransactionDraft) -> TransactionDraft {
        match self.match_template(body) {
            Some(event) => {
                trace!(id = %draft.id, template = event.name(), "equity bank template matched");
                self.apply(body, event, draft)
            }
            None => {
                trace!(id = %draft.id, "no equity bank template matched");
                self.scavenge(body, draft)
            }
        }
    }
}

//! Transaction drafts produced from SMS messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Institution;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "expenses")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

/// Category metadata as the ledger layer expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDescriptor {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub icon: String,
}

/// Categories this crate can assign. The registry itself lives with the consumer;
/// only ids and labels are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Other,
    Transfer,
    ReceivedMoney,
    AtmWithdrawal,
    CashDeposit,
    CardPayment,
    Payment,
    Electricity,
    Airtime,
    MerchantPayment,
    CashWithdrawal,
}

impl Category {
    pub fn id(&self) -> &'static str {
        self.parts().0
    }

    pub fn descriptor(&self) -> CategoryDescriptor {
        let (id, parent_id, name, icon) = self.parts();
        CategoryDescriptor {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }

    // (id, parent id, display name, icon code)
    fn parts(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Category::Other => ("other", "other", "Other", "ic020"),
            Category::Transfer => ("transfer", "expenses", "Transfer", "ic023"),
            Category::ReceivedMoney => ("received", "income", "Received Money", "ic024"),
            Category::AtmWithdrawal => ("withdrawal", "expenses", "ATM Withdrawal", "ic014"),
            Category::CashDeposit => ("deposit", "income", "Cash Deposit", "ic025"),
            Category::CardPayment => ("card_payment", "expenses", "Card Payment", "ic015"),
            Category::Payment => ("payment", "expenses", "Payment", "ic001"),
            Category::Electricity => ("electricity", "expenses", "Electricity", "ic008"),
            Category::Airtime => ("airtime", "expenses", "Airtime", "ic019"),
            Category::MerchantPayment => ("merchant_payment", "expenses", "others", "ic002"),
            Category::CashWithdrawal => ("agent_withdrawal", "expenses", "Cash Withdrawal", "ic014"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Original SMS body, followed by one line per extractor summary.
    pub text_note: String,
}

impl Note {
    /// Append a summary line, keeping everything already there.
    pub fn appended(&self, line: &str) -> Note {
        Note {
            text_note: format!("{}\n{}", self.text_note, line),
        }
    }
}

/// A transaction record built from one SMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub id: String,
    pub wallet_id: String,
    pub category_id: String,
    pub category: CategoryDescriptor,
    /// Amount in RWF. For mobile-money messages this may hold the post-transaction
    /// account balance instead, when the message reports one.
    pub balance: f64,
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub note: Note,
    pub fee: f64,
    pub reference: String,
    pub is_auto_imported: bool,
}

impl TransactionDraft {
    /// Fresh draft with builder defaults: `Other` category, expense, zero balance and fee.
    pub fn new(
        id: impl Into<String>,
        institution: Institution,
        body: impl Into<String>,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        let id = id.into();
        Self {
            reference: id.clone(),
            id,
            wallet_id: institution.wallet_id().to_string(),
            category_id: Category::Other.id().to_string(),
            category: Category::Other.descriptor(),
            balance: 0.0,
            date,
            kind: TransactionType::Expense,
            note: Note {
                text_note: body.into(),
            },
            fee: 0.0,
            is_auto_imported: true,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category_id = category.id().to_string();
        self.category = category.descriptor();
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_note_line(mut self, line: &str) -> Self {
        self.note = self.note.appended(line);
        self
    }

    /// Whether the draft carries a usable amount. Drafts failing this are dropped.
    pub fn has_amount(&self) -> bool {
        self.balance.is_finite() && self.balance != 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

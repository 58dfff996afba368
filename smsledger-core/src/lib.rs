//! smsledger-core: message, draft and configuration types shared by the SMS ingest pipeline

pub mod config;
pub mod currency;
pub mod draft;
pub mod error;
pub mod message;

pub use config::{IngestConfig, Institution, Senders};
pub use currency::{Currency, USD_TO_RWF, parse_amount};
pub use draft::{Category, CategoryDescriptor, Note, TransactionDraft, TransactionType};
pub use error::{Error, Result};
pub use message::{DEFAULT_MAX_COUNT, MessageFilter, RawMessage};

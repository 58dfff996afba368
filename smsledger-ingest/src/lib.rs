//! smsledger-ingest: SMS classification, bank/mobile-money template parsers and the inbox pipeline.

pub mod builder;
pub mod classifier;
pub mod parsers;
pub mod pipeline;
pub mod source;

pub use builder::build_draft;
pub use classifier::is_transaction_message;
pub use parsers::{EquityBankParser, MobileMoneyParser, SmsParser};
pub use pipeline::SmsPipeline;
pub use source::{JsonFileSource, MessageSource};

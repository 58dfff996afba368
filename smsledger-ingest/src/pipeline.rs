//! Inbox → transaction drafts.
//!
//! fetch → classify → build draft → sender-specific extraction → drop drafts without an amount.
//! Each message is handled independently; nothing is shared between drafts.

use smsledger_core::{
    Error, IngestConfig, Institution, MessageFilter, RawMessage, Result, TransactionDraft,
};
use tracing::{debug, warn};

use crate::builder::build_draft;
use crate::classifier::is_transaction_message;
use crate::parsers::{EquityBankParser, MobileMoneyParser, SmsParser};
use crate::source::MessageSource;

pub struct SmsPipeline {
    config: IngestConfig,
    filter: MessageFilter,
    bank: EquityBankParser,
    mobile_money: MobileMoneyParser,
}

impl SmsPipeline {
    /// Validate `config` and compile both parsers. Requests default to the inbox, capped at 10,000.
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bank: EquityBankParser::new(config.usd_to_rwf)?,
            mobile_money: MobileMoneyParser::new()?,
            filter: MessageFilter::default(),
            config,
        })
    }

    pub fn with_filter(mut self, filter: MessageFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn parser_for(&self, institution: Institution) -> &dyn SmsParser {
        match institution {
            Institution::EquityBank => &self.bank,
            Institution::MobileMoney => &self.mobile_money,
        }
    }

    pub fn is_transaction_message(&self, message: &RawMessage) -> bool {
        is_transaction_message(message, &self.config)
    }

    /// Classify, parse and filter an already-fetched message list.
    pub fn filter_and_parse(&self, messages: &[RawMessage]) -> Vec<TransactionDraft> {
        let accepted: Vec<&RawMessage> = messages
            .iter()
            .filter(|m| self.is_transaction_message(m))
            .collect();

        let parsed: Vec<TransactionDraft> = accepted
            .iter()
            .enumerate()
            .filter_map(|(index, message)| {
                let institution = self.config.institution_for(&message.address)?;
                let draft = build_draft(message, index, institution);
                Some(self.parser_for(institution).extract(&message.body, draft))
            })
            .collect();

        let kept: Vec<TransactionDraft> = parsed.into_iter().filter(|d| d.has_amount()).collect();

        debug!(
            messages = messages.len(),
            accepted = accepted.len(),
            kept = kept.len(),
            "parsed sms transactions"
        );
        kept
    }

    /// Deserialize a JSON message list, cap it at `max_count` and parse it.
    pub fn parse_payload(&self, payload: &str) -> Result<Vec<TransactionDraft>> {
        let mut messages: Vec<RawMessage> = serde_json::from_str(payload)?;
        messages.truncate(self.filter.max_count);
        Ok(self.filter_and_parse(&messages))
    }

    /// Fetch from `source` and parse.
    pub async fn parse_inbox<S: MessageSource>(&self, source: &S) -> Result<Vec<TransactionDraft>> {
        let payload = source.list(&self.filter).await?;
        self.parse_payload(&payload)
    }

    /// Callback form of [`parse_inbox`](Self::parse_inbox): exactly one of the two callbacks runs,
    /// exactly once. Retrieval failures are handed to `on_error` verbatim and never retried.
    pub async fn read_and_parse_transactions<S, F, E>(&self, source: &S, on_success: F, on_error: E)
    where
        S: MessageSource,
        F: FnOnce(Vec<TransactionDraft>),
        E: FnOnce(Error),
    {
        match self.parse_inbox(source).await {
            Ok(transactions) => on_success(transactions),
            Err(e) => {
                warn!(error = %e, "failed to read sms");
                on_error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smsledger_core::TransactionType;

    struct StaticSource(std::result::Result<&'static str, &'static str>);

    impl MessageSource for StaticSource {
        async fn list(&self, filter: &MessageFilter) -> Result<String> {
            assert_eq!(filter.mailbox, "inbox");
            self.0
                .map(str::to_string)
                .map_err(|detail| Error::Retrieval(detail.to_string()))
        }
    }

    fn pipeline() -> SmsPipeline {
        SmsPipeline::new(IngestConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let cfg = IngestConfig::default().with_usd_rate(-1.0);
        assert!(matches!(SmsPipeline::new(cfg), Err(Error::Config(_))));
    }

    #[test]
    fn test_filter_and_parse_end_to_end() {
        let messages = vec![
            RawMessage::new("M-MONEY", "You have received 20,000 RWF from Alice Uwase (*123456)").with_id("10"),
            RawMessage::new("M-MONEY", "One-Time-Pin 4521, Never share this code"),
            RawMessage::new("SAFARICOM", "You have received 20,000 RWF from Bob (*1)"),
            RawMessage::new("EQUITYBANK", "50.00 USD was successfully sent to Jane Smith 250788000000. Charges 1.00 USD"),
            RawMessage::new("M-MONEY", "Y'ello. TxId: 42 is pending"),
        ];
        let drafts = pipeline().filter_and_parse(&messages);
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].id, "sms_10");
        assert_eq!(drafts[0].kind, TransactionType::Income);
        assert_eq!(drafts[0].balance, 20_000.0);

        // index counts positions in the filtered sequence
        assert_eq!(drafts[1].id, "sms_1");
        assert_eq!(drafts[1].wallet_id, "equity_bank");
        assert_eq!(drafts[1].balance, 72_000.0);
        assert_eq!(drafts[1].fee, 1440.0);
    }

    #[test]
    fn test_emptied_momo_account_still_booked() {
        let messages = vec![
            RawMessage::new("M-MONEY", "*165*S*5,000 RWF transferred to John Doe (250788123456). Fee was: 100. Your new balance: 0 RWF"),
            RawMessage::new("M-MONEY", "You have via agent: Jean (250788), withdrawn 10,000 RWF from your mobile money account. Your new balance: 0 RWF. Fee paid: 350 RWF"),
        ];
        let balances: Vec<f64> = pipeline()
            .filter_and_parse(&messages)
            .iter()
            .map(|d| d.balance)
            .collect();
        assert_eq!(balances, vec![5_000.0, 10_000.0]);
    }

    #[test]
    fn test_output_never_holds_default_drafts() {
        let messages = vec![
            RawMessage::new("M-MONEY", "Your request TxId: 1 received"),
            RawMessage::new("EQUITYBANK", "Ref. 55 payment completed"),
            RawMessage::new("EQUITYBANK", "0 RWF was successfully sent to X 0788000000"),
        ];
        assert!(pipeline().filter_and_parse(&messages).is_empty());
    }

    #[test]
    fn test_parse_payload_respects_max_count() {
        let payload = r#"[
            {"_id": 1, "address": "M-MONEY", "body": "You have received 100 RWF from A (*1)", "date": "1700000000000"},
            {"_id": 2, "address": "M-MONEY", "body": "You have received 200 RWF from B (*2)", "date": 1700000000001}
        ]"#;
        let p = pipeline().with_filter(MessageFilter {
            mailbox: "inbox".to_string(),
            max_count: 1,
        });
        let drafts = p.parse_payload(payload).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, "sms_1");
        assert_eq!(drafts[0].date.unwrap().timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_parse_payload_rejects_non_list() {
        assert!(matches!(pipeline().parse_payload("{\"oops\": 1}"), Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_success_callback() {
        let source = StaticSource(Ok(
            r#"[{"address": "m-money", "body": "1,000 RWF transferred to John Doe (250788123456). Fee was: 100. Your new balance: 5,000 RWF"}]"#,
        ));
        let mut got = None;
        let mut failed = false;
        pipeline()
            .read_and_parse_transactions(&source, |txns| got = Some(txns), |_| failed = true)
            .await;
        assert!(!failed);
        let txns = got.unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].id, "sms_0");
        assert_eq!(txns[0].balance, 5_000.0);
    }

    #[tokio::test]
    async fn test_error_callback_gets_detail_verbatim() {
        let source = StaticSource(Err("Permission Denial: READ_SMS"));
        let mut succeeded = false;
        let mut detail = None;
        pipeline()
            .read_and_parse_transactions(&source, |_| succeeded = true, |e| detail = Some(e))
            .await;
        assert!(!succeeded);
        match detail {
            Some(Error::Retrieval(d)) => assert_eq!(d, "Permission Denial: READ_SMS"),
            other => panic!("expected retrieval failure, got {:?}", other),
        }
    }
}

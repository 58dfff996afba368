use smsledger_core::{IngestConfig, MessageFilter, RawMessage, Result, TransactionType};
use smsledger_ingest::{MessageSource, SmsPipeline, is_transaction_message};

/// Stand-in for the device store: serves a fixed inbox as JSON.
struct Inbox(Vec<RawMessage>);

impl MessageSource for Inbox {
    async fn list(&self, filter: &MessageFilter) -> Result<String> {
        assert_eq!(filter.max_count, 10_000);
        Ok(serde_json::to_string(&self.0)?)
    }
}

fn momo(body: &str) -> RawMessage {
    RawMessage::new("M-MONEY", body)
}

fn bank(body: &str) -> RawMessage {
    RawMessage::new("EQUITYBANK", body)
}

fn realistic_inbox() -> Vec<RawMessage> {
    vec![
        momo("*165*S*1,000 RWF transferred to John Doe (250788123456) from 3690 at 2024-06-01 10:12:44 . Fee was: 100. Your new balance: 5,000 RWF. Message from debit receiver: .*EN#").with_id("101").with_date(1_717_236_764_000),
        momo("You have received 20,000 RWF from Alice Uwase (*123456) on your mobile money account at 2024-06-01 12:00:00.").with_id("102"),
        momo("Your One-Time-Pin is 4521. Never share this code with anyone. 500 RWF").with_id("103"),
        bank("50.00 USD was successfully sent to Jane Smith 250788000000. Charges 1.00 USD").with_id("104"),
        RawMessage::new("+250788999999", "I sent you 5,000 RWF yesterday").with_id("105"),
        momo("*162*TxId:14098463509*S*Your payment of 3,000 RWF to MTN Airtime has been completed at 2024-06-02. Fee was 0. Your new balance: 2,000 RWF").with_id("106"),
        bank("Dear customer, your account statement is ready. Ref. 99812 completed").with_id("107"),
        momo("Happy Eid from MTN Rwanda!").with_id("108"),
    ]
}

#[tokio::test]
async fn test_realistic_inbox() {
    let pipeline = SmsPipeline::new(IngestConfig::default()).unwrap();
    let drafts = pipeline.parse_inbox(&Inbox(realistic_inbox())).await.unwrap();

    let ids: Vec<&str> = drafts.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["sms_101", "sms_102", "sms_104", "sms_106"]);

    let transfer = &drafts[0];
    assert_eq!(transfer.kind, TransactionType::Expense);
    assert_eq!(transfer.category_id, "transfer");
    assert_eq!(transfer.balance, 5_000.0);
    assert_eq!(transfer.fee, 100.0);
    assert!(transfer.note.text_note.ends_with("Transfer to John Doe (250788123456)"));
    assert_eq!(transfer.date.unwrap().timestamp_millis(), 1_717_236_764_000);

    let received = &drafts[1];
    assert_eq!(received.kind, TransactionType::Income);
    assert_eq!(received.category_id, "received");
    assert_eq!(received.balance, 20_000.0);

    let sent = &drafts[2];
    assert_eq!(sent.category_id, "transfer");
    assert_eq!(sent.balance, 72_000.0);
    assert_eq!(sent.fee, 1_440.0);

    let airtime = &drafts[3];
    assert_eq!(airtime.category_id, "airtime");
    assert_eq!(airtime.balance, 2_000.0);
    assert_eq!(airtime.fee, 0.0);
}

#[tokio::test]
async fn test_every_output_has_amount_and_original_body() {
    let inbox = realistic_inbox();
    let pipeline = SmsPipeline::new(IngestConfig::default()).unwrap();
    let drafts = pipeline.parse_inbox(&Inbox(inbox.clone())).await.unwrap();

    for d in &drafts {
        assert!(d.balance != 0.0, "{} kept with zero balance", d.id);
        assert!(d.is_auto_imported);
        let original = inbox
            .iter()
            .find(|m| format!("sms_{}", m.id.as_deref().unwrap()) == d.id)
            .unwrap();
        assert!(d.note.text_note.starts_with(&original.body));
        assert!(d.note.text_note.len() > original.body.len());
    }
}

#[test]
fn test_otp_message_excluded_even_with_indicators() {
    let cfg = IngestConfig::default();
    let otp = momo("One-Time-Pin 4521, Never share this code. You have received 1,000 RWF");
    assert!(!is_transaction_message(&otp, &cfg));

    let pipeline = SmsPipeline::new(cfg).unwrap();
    assert!(pipeline.filter_and_parse(&[otp]).is_empty());
}

#[test]
fn test_non_allow_listed_senders_never_classified() {
    let cfg = IngestConfig::default();
    for body in [
        "You have received 20,000 RWF from Alice Uwase (*123456)",
        "50.00 USD was successfully sent to Jane Smith 250788000000",
        "TxId: 1 Fee RWF USD",
    ] {
        for sender in ["MTN", "EQUITY", "M MONEY", "BK", ""] {
            assert!(!is_transaction_message(&RawMessage::new(sender, body), &cfg));
        }
    }
}

#[test]
fn test_conversion_rate_override() {
    let cfg = IngestConfig::default().with_usd_rate(1_300.0);
    let pipeline = SmsPipeline::new(cfg).unwrap();
    let drafts = pipeline.filter_and_parse(&[
        bank("10.00 USD was successfully sent to Jane Smith 250788000000. Charges 1.00 USD"),
        bank("10.00 RWF was successfully sent to Jane Smith 250788000000. Charges 1.00 RWF"),
    ]);
    assert_eq!(drafts[0].balance, 13_000.0);
    assert_eq!(drafts[0].fee, 1_300.0);
    assert_eq!(drafts[1].balance, 10.0);
    assert_eq!(drafts[1].fee, 1.0);
}

//! End-to-end relay flow: event batch in, forwarded messages out.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use macroscope_relay::config::RelayConfig;
use macroscope_relay::dispatch::MailDispatcher;
use macroscope_relay::envelope::Envelope;
use macroscope_relay::error::{DispatchError, FetchError};
use macroscope_relay::handler::Relay;
use macroscope_relay::store::ObjectStore;

// ── Test doubles ────────────────────────────────────────────────────

struct InMemoryStore {
    objects: Vec<((String, String), Vec<u8>)>,
}

impl InMemoryStore {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    fn put(mut self, bucket: &str, key: &str, raw: &str) -> Self {
        self.objects.push((
            (bucket.to_string(), key.to_string()),
            raw.as_bytes().to_vec(),
        ));
        self
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        self.objects
            .iter()
            .find(|((b, k), _)| b == bucket && k == key)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| FetchError::Status {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: 404,
            })
    }
}

#[derive(Default)]
struct RecordingDispatcher {
    sent: Mutex<Vec<Envelope>>,
}

#[async_trait]
impl MailDispatcher for RecordingDispatcher {
    async fn dispatch(&self, envelope: &Envelope) -> Result<String, DispatchError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(format!("msg-{}", self.sent.lock().unwrap().len()))
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

const BUCKET: &str = "macroscope-email-storage";

const PLAIN_EMAIL: &str = "From: Carol <carol@example.com>\r\n\
    To: inbox@macroscope.info\r\n\
    Subject: Invoice overdue\r\n\
    Content-Type: text/plain\r\n\
    \r\n\
    Please pay invoice #42.";

const MULTIPART_EMAIL: &str = "From: Dave <dave@example.com>\r\n\
    To: inbox@macroscope.info\r\n\
    Subject: Weekly digest\r\n\
    MIME-Version: 1.0\r\n\
    Content-Type: multipart/alternative; boundary=\"B1\"\r\n\
    \r\n\
    --B1\r\n\
    Content-Type: text/html\r\n\
    \r\n\
    <p>hi</p>\r\n\
    --B1\r\n\
    Content-Type: text/plain\r\n\
    \r\n\
    hi\r\n\
    --B1--\r\n";

fn s3_record(key: &str) -> serde_json::Value {
    json!({
        "eventSource": "aws:s3",
        "s3": {
            "bucket": {"name": BUCKET},
            "object": {"key": key}
        }
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn mixed_batch_forwards_stored_records_only() {
    let store = Arc::new(
        InMemoryStore::new()
            .put(BUCKET, "inbox/plain", PLAIN_EMAIL)
            .put(BUCKET, "inbox/multipart", MULTIPART_EMAIL),
    );
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let relay = Relay::new(
        Arc::clone(&store) as Arc<dyn ObjectStore>,
        Arc::clone(&dispatcher) as Arc<dyn MailDispatcher>,
        RelayConfig::default(),
    );

    let event = json!({
        "Records": [
            s3_record("inbox/plain"),
            {"eventSource": "aws:ses", "ses": {"mail": {"messageId": "direct-1"}}},
            {"eventSource": "aws:sns", "Sns": {"Message": "ignored"}},
            s3_record("inbox/multipart"),
        ]
    });

    let result = relay.handle(&event).await;
    assert_eq!(result.status_code, 200);
    assert_eq!(result.body, "\"Email forwarding completed successfully\"");

    let sent = dispatcher.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 2, "only the two stored records forward");

    assert_eq!(sent[0].subject, "[FORWARDED] Invoice overdue");
    assert_eq!(
        sent[0].body,
        "--- Forwarded Message ---\n\
         From: Carol <carol@example.com>\n\
         To: inbox@macroscope.info\n\
         Subject: Invoice overdue\n\
         \n\
         Please pay invoice #42.\n\
         \n\
         ---\n\
         This email was automatically forwarded from MacroScope email system.\n"
    );

    // Multipart: the first text/plain part was selected over the html part.
    assert_eq!(sent[1].subject, "[FORWARDED] Weekly digest");
    assert!(sent[1].body.contains("\nhi\n"));
    assert!(!sent[1].body.contains("<p>hi</p>"));
}

#[tokio::test]
async fn missing_object_fails_the_invocation() {
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let relay = Relay::new(
        store as Arc<dyn ObjectStore>,
        Arc::clone(&dispatcher) as Arc<dyn MailDispatcher>,
        RelayConfig::default(),
    );

    let result = relay
        .handle(&json!({"Records": [s3_record("inbox/gone")]}))
        .await;

    assert_eq!(result.status_code, 500);
    assert!(result.body.contains("404"));
    assert!(dispatcher.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_batch_succeeds_without_sending() {
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let relay = Relay::new(
        store as Arc<dyn ObjectStore>,
        Arc::clone(&dispatcher) as Arc<dyn MailDispatcher>,
        RelayConfig::default(),
    );

    let result = relay.handle(&json!({"Records": []})).await;

    assert_eq!(result.status_code, 200);
    assert!(dispatcher.sent.lock().unwrap().is_empty());
}

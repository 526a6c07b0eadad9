//! Inbound event decoding and the invocation result.
//!
//! The triggering event arrives as JSON with a `Records` array. Each record
//! is decoded once, at the boundary, into a tagged [`EventRecord`] so the
//! rest of the pipeline never touches raw JSON.

use serde::{Deserialize, Serialize};

use crate::error::EventError;

// ── Wire shape ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "Records")]
    records: Option<Vec<RawRecord>>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "eventSource")]
    event_source: Option<String>,
    s3: Option<RawS3>,
    ses: Option<RawSes>,
}

#[derive(Debug, Deserialize)]
struct RawS3 {
    bucket: Option<RawBucket>,
    object: Option<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawBucket {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSes {
    mail: Option<RawMail>,
}

#[derive(Debug, Deserialize)]
struct RawMail {
    #[serde(rename = "messageId")]
    message_id: Option<String>,
}

// ── Decoded records ─────────────────────────────────────────────────

/// One decoded record from the inbound event batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    /// A stored-message notification: raw bytes await at (bucket, key).
    ObjectStorage(ObjectStorageRecord),
    /// A direct-delivery notification carrying the message id only.
    DirectDelivery(DirectDeliveryRecord),
    /// Any other record kind. Skipped without error.
    Unknown { event_source: Option<String> },
}

/// Reference to raw message bytes in the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStorageRecord {
    pub bucket: String,
    pub key: String,
}

/// Direct-delivery notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDeliveryRecord {
    pub message_id: String,
}

/// A decoded inbound event: an ordered batch of records.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub records: Vec<EventRecord>,
}

impl InboundEvent {
    /// Decode an invocation payload.
    ///
    /// Fails with [`EventError::MissingRecords`] when the `Records` field is
    /// absent, and with [`EventError::MalformedRecord`] when a recognized
    /// record kind is missing its required fields. Unrecognized record kinds
    /// decode to [`EventRecord::Unknown`] rather than failing.
    pub fn decode(value: &serde_json::Value) -> Result<Self, EventError> {
        let raw: RawEvent =
            serde_json::from_value(value.clone()).map_err(|e| EventError::Decode(e.to_string()))?;

        let raw_records = raw.records.ok_or(EventError::MissingRecords)?;

        let records = raw_records
            .into_iter()
            .map(decode_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }
}

fn decode_record(raw: RawRecord) -> Result<EventRecord, EventError> {
    match raw.event_source.as_deref() {
        Some("aws:s3") => {
            let s3 = raw.s3.ok_or_else(|| malformed("aws:s3", "missing s3 payload"))?;
            let bucket = s3
                .bucket
                .and_then(|b| b.name)
                .ok_or_else(|| malformed("aws:s3", "missing bucket name"))?;
            let key = s3
                .object
                .and_then(|o| o.key)
                .ok_or_else(|| malformed("aws:s3", "missing object key"))?;
            Ok(EventRecord::ObjectStorage(ObjectStorageRecord {
                bucket,
                key,
            }))
        }
        Some("aws:ses") => {
            let message_id = raw
                .ses
                .and_then(|s| s.mail)
                .and_then(|m| m.message_id)
                .ok_or_else(|| malformed("aws:ses", "missing mail messageId"))?;
            Ok(EventRecord::DirectDelivery(DirectDeliveryRecord {
                message_id,
            }))
        }
        other => Ok(EventRecord::Unknown {
            event_source: other.map(str::to_string),
        }),
    }
}

fn malformed(source_kind: &str, reason: &str) -> EventError {
    EventError::MalformedRecord {
        source_kind: source_kind.to_string(),
        reason: reason.to_string(),
    }
}

// ── Invocation result ───────────────────────────────────────────────

/// The single outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded string message.
    pub body: String,
}

impl InvocationResult {
    /// 200 — all records processed.
    pub fn ok(message: &str) -> Self {
        Self::with_status(200, message)
    }

    /// 400 — malformed invocation input.
    pub fn bad_request(message: &str) -> Self {
        Self::with_status(400, message)
    }

    /// 500 — processing failed partway through the batch.
    pub fn internal_error(message: &str) -> Self {
        Self::with_status(500, message)
    }

    fn with_status(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::Value::String(message.to_string()).to_string(),
        }
    }
}

//! Event router — drives the fetch → parse → forward pipeline.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::RelayConfig;
use crate::dispatch::MailDispatcher;
use crate::envelope;
use crate::error::{Error, EventError};
use crate::event::{EventRecord, InboundEvent, InvocationResult, ObjectStorageRecord};
use crate::message;
use crate::store::ObjectStore;

/// The relay: decodes one invocation event and forwards each stored message.
///
/// Clients are injected so tests can substitute doubles; nothing here holds
/// state across invocations.
pub struct Relay {
    store: Arc<dyn ObjectStore>,
    dispatcher: Arc<dyn MailDispatcher>,
    config: RelayConfig,
}

impl Relay {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        dispatcher: Arc<dyn MailDispatcher>,
        config: RelayConfig,
    ) -> Self {
        Self {
            store,
            dispatcher,
            config,
        }
    }

    /// Handle one invocation. Records are processed strictly in order and
    /// the first failure aborts the rest of the batch.
    pub async fn handle(&self, event: &serde_json::Value) -> InvocationResult {
        let decoded = match InboundEvent::decode(event) {
            Ok(decoded) => decoded,
            Err(EventError::MissingRecords) => {
                error!("No Records found in event");
                return InvocationResult::bad_request("No Records in event");
            }
            Err(e) => {
                error!("Error processing email: {e}");
                return InvocationResult::internal_error(&format!("Error: {e}"));
            }
        };

        for record in &decoded.records {
            match record {
                EventRecord::ObjectStorage(stored) => {
                    if let Err(e) = self.forward_stored(stored).await {
                        error!("Error processing email: {e}");
                        return InvocationResult::internal_error(&format!("Error: {e}"));
                    }
                }
                EventRecord::DirectDelivery(direct) => {
                    // Intentional no-op: direct-delivery records are logged
                    // only, never forwarded.
                    info!(
                        message_id = %direct.message_id,
                        "Processing direct delivery notification"
                    );
                }
                EventRecord::Unknown { event_source } => {
                    debug!(?event_source, "Skipping unrecognized record kind");
                }
            }
        }

        InvocationResult::ok("Email forwarding completed successfully")
    }

    async fn forward_stored(&self, record: &ObjectStorageRecord) -> Result<(), Error> {
        info!("Processing email from S3: {}/{}", record.bucket, record.key);

        let raw = self.store.fetch(&record.bucket, &record.key).await?;
        let parsed = message::parse(&raw)?;
        let headers = message::extract_headers(&parsed);
        let body = message::select_body(&parsed)?;
        let envelope = envelope::build(&headers, &body, &self.config);

        let message_id = self.dispatcher.dispatch(&envelope).await?;
        info!("Email forwarded successfully. MessageId: {message_id}");
        Ok(())
    }
}

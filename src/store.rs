//! Object store access — one read per stored message.

use async_trait::async_trait;

use crate::error::FetchError;

/// Read access to the message store, keyed by (bucket, key).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the raw bytes of one stored object.
    ///
    /// A single read with no retry: the triggering event is taken to
    /// guarantee the object exists, so any failure propagates unchanged.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError>;
}

/// Object store client over an S3-style HTTP endpoint.
///
/// Issues `GET {endpoint}/{bucket}/{key}` per fetch. Authentication is
/// the endpoint's concern (presigned gateway or VPC-internal access).
pub struct HttpObjectStore {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.endpoint)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self
            .client
            .get(self.object_url(bucket, key))
            .send()
            .await
            .map_err(|e| FetchError::Request {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| FetchError::Request {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}

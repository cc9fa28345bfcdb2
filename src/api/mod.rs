// ABOUTME: Persistence boundary for finished templates
// The wizard only sees the TemplateStore trait; the HTTP client is one implementation

pub mod client;
pub mod types;

use std::future::Future;
use std::time::Duration;

use crate::wizard::TemplatePayload;

pub use client::TemplateApiClient;
pub use types::{parse_create_response, SubmissionError};

/// Something that can persist a flattened template and return its identifier
pub trait TemplateStore {
    fn create_template(
        &self,
        payload: TemplatePayload,
    ) -> impl Future<Output = Result<String, SubmissionError>> + Send;
}

/// Submit through `store`, turning an elapsed deadline into a retryable error
pub async fn submit_with_timeout<S: TemplateStore>(
    store: &S,
    payload: TemplatePayload,
    timeout: Duration,
) -> Result<String, SubmissionError> {
    tokio::time::timeout(timeout, store.create_template(payload))
        .await
        .unwrap_or(Err(SubmissionError::Timeout(timeout)))
}

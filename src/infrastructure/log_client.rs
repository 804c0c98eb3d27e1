use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::DomainError;
use crate::domain::order::OrderSummary;
use crate::domain::ports::LogForwarder;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts processed-order summaries to the order-processing-log service.
///
/// The request timeout keeps an unreachable sink from stalling a pipeline
/// tick; a timeout or non-2xx response surfaces as a forwarding failure.
pub struct HttpLogForwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLogForwarder {
    pub fn new(endpoint: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self { client, endpoint }
    }
}

#[async_trait]
impl LogForwarder for HttpLogForwarder {
    async fn forward(&self, summary: &OrderSummary) -> Result<(), DomainError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(summary)
            .send()
            .await
            .map_err(|e| DomainError::Forwarding(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::Forwarding(format!(
                "log service returned {}",
                response.status()
            )));
        }

        log::info!(
            "Logged order {} to log service. Response: {}",
            summary.order_id,
            response.status()
        );
        Ok(())
    }
}

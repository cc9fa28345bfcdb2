// ABOUTME: Template API client that persists finished wizard payloads over HTTP

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use super::types::{parse_create_response, SubmissionError};
use super::TemplateStore;
use crate::config::ApiConfig;
use crate::wizard::TemplatePayload;

#[derive(Debug, Clone)]
pub struct TemplateApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl TemplateApiClient {
    /// Create a client from the `[api]` config section
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn templates_url(&self) -> String {
        format!("{}/api/templates", self.base_url)
    }

    async fn post_template(&self, payload: &TemplatePayload) -> Result<String, SubmissionError> {
        let url = self.templates_url();
        debug!(%url, components = payload.components.len(), "Posting template");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        parse_create_response(status, &body)
    }
}

impl TemplateStore for TemplateApiClient {
    async fn create_template(&self, payload: TemplatePayload) -> Result<String, SubmissionError> {
        match self.post_template(&payload).await {
            Ok(id) => {
                info!(template_id = %id, name = %payload.name, "Template created");
                Ok(id)
            }
            Err(e) => {
                error!("Template submission failed: {}", e);
                Err(e)
            }
        }
    }
}

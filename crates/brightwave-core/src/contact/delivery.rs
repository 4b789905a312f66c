use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::payload::ContactPayload;
use crate::config::EmailConfig;
use crate::{Error, Result};

/// Outbound email delivery for contact submissions
#[async_trait::async_trait]
pub trait EmailDelivery: Send + Sync {
    /// Deliver one submission; any failure is reported, never retried here
    async fn send(&self, payload: &ContactPayload) -> Result<()>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a ContactPayload,
}

/// Client for the hosted email API (service ID + template ID + public key)
///
/// A malformed endpoint is kept as its parse error and reported by `send`,
/// so it fails a submission rather than construction.
pub struct EmailJsClient {
    client: Client,
    endpoint: std::result::Result<Url, url::ParseError>,
    config: EmailConfig,
}

impl EmailJsClient {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_http_client(config, client))
    }

    /// Use a preconfigured HTTP client
    pub fn with_http_client(config: &EmailConfig, client: Client) -> Self {
        let endpoint = Url::parse(&config.endpoint);
        if let Err(e) = &endpoint {
            tracing::warn!(endpoint = %config.endpoint, error = %e, "Invalid email endpoint");
        }
        Self {
            client,
            endpoint,
            config: config.clone(),
        }
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref().ok()
    }
}

#[async_trait::async_trait]
impl EmailDelivery for EmailJsClient {
    async fn send(&self, payload: &ContactPayload) -> Result<()> {
        // Missing identifiers fail this submission only
        let credentials = self.config.credentials()?;
        let endpoint = self.endpoint.clone()?;

        let request = SendRequest {
            service_id: &credentials.service_id,
            template_id: &credentials.template_id,
            user_id: &credentials.public_key,
            template_params: payload,
        };

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(email = %payload.email, "Contact submission delivered");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            let body = body.trim();
            tracing::warn!(status = %status, body, "Email service rejected submission");
            Err(Error::Delivery(if body.is_empty() {
                status.to_string()
            } else {
                format!("{}: {}", status, body)
            }))
        }
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, AppResult, TransportError, REJECTION_FALLBACK};
use crate::models::CreateEventRequest;

const EVENTS_PATH: &str = "/api/events";

/// Status and decoded JSON body of a backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Message to show for a refused request: the server's `message`, then
    /// the first entry of `errors`, then a generic fallback.
    pub fn rejection_message(&self) -> String {
        let message = self.body.get("message").and_then(non_empty_str);
        let first_error = || {
            self.body
                .get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(|error| error.get("msg"))
                .and_then(non_empty_str)
        };

        message
            .or_else(first_error)
            .unwrap_or(REJECTION_FALLBACK)
            .to_string()
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Outbound side of event creation.
#[async_trait]
pub trait EventTransport: Send + Sync + 'static {
    async fn create_event(
        &self,
        token: &str,
        request: &CreateEventRequest,
    ) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpEventApi {
    client: Client,
    base_url: String,
}

impl HttpEventApi {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.api.request_timeout())
            .build()
            .map_err(AppError::Request)?;

        Ok(Self::with_client(client, &config.api.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}{}", self.base_url, EVENTS_PATH)
    }

    fn auth_header(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

#[async_trait]
impl EventTransport for HttpEventApi {
    async fn create_event(
        &self,
        token: &str,
        request: &CreateEventRequest,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.api_url();
        tracing::debug!("POST {} (title={:?})", url, request.title);

        let response = self
            .client
            .post(&url)
            .header("Authorization", Self::auth_header(token))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text)
            .map_err(|e| TransportError::Decode(format!("Invalid JSON response: {}", e)))?;

        Ok(ApiResponse { status, body })
    }
}

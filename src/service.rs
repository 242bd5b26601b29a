// Remote catalog/booking service client. The wire contract is small: one
// authenticated review endpoint and one order-creation endpoint, both JSON
// over POST.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// The only response message that counts as an affirmative acknowledgement
// for a review submission. A 2xx status alone does not commit anything.
pub const REVIEW_ADDED: &str = "Review added";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("rejected by service: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

// Client configuration. The defaults carry the values the deployed client
// runs with; tests override `base_url` to point at a mock server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub checkout_key: String,
    pub merchant_name: String,
    pub booking_description: String,
    pub theme_color: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/user".to_string(),
            checkout_key: "rzp_test_gijcvzVIahNMp1".to_string(),
            merchant_name: "WildLens Tours".to_string(),
            booking_description: "Tour booking".to_string(),
            theme_color: "#28523E".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub tour_id: String,
    pub rating: u8,
    pub content: String,
}

// The review record as returned by the service. Like/dislike counters are
// not part of the payload; they start at zero on commit.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NewReview {
    pub author: String,
    pub rating: u8,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewResponse {
    pub message: String,
    #[serde(default)]
    pub new_review: Option<NewReview>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateOrderRequest {
    pub amount: f64,
}

// A provider order as returned by `/tour/create-order`. `amount` is in the
// provider's minor units.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OrderResponse {
    pub id: String,
    pub currency: String,
    pub amount: u64,
}

#[async_trait]
pub trait TourService: Send + Sync + 'static {
    // Submit a review on behalf of an authenticated user. The bearer
    // credential must be non-empty; enforcing that is the caller's job.
    async fn add_review(
        &self,
        credential: &str,
        request: AddReviewRequest,
    ) -> Result<AddReviewResponse, ServiceError>;

    // Request a payment order for the given amount.
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError>;
}

pub struct HttpTourService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTourService {
    pub fn new(config: ClientConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    // Reads the body, treating an empty one as a protocol violation rather
    // than a deserialization quirk.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let response = response.error_for_status()?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ServiceError::Protocol("empty response body".to_string()));
        }
        serde_json::from_slice(&body)
            .map_err(|err| ServiceError::Protocol(format!("malformed response: {}", err)))
    }
}

#[async_trait]
impl TourService for HttpTourService {
    async fn add_review(
        &self,
        credential: &str,
        request: AddReviewRequest,
    ) -> Result<AddReviewResponse, ServiceError> {
        tracing::debug!("POST /tour/addreview for tour {}", request.tour_id);
        let response = self
            .client
            .post(self.endpoint("/tour/addreview"))
            .bearer_auth(credential)
            .json(&request)
            .send()
            .await?;
        tracing::debug!("addreview response status: {}", response.status());
        Self::read_json(response).await
    }

    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        tracing::debug!("POST /tour/create-order for amount {}", request.amount);
        let response = self
            .client
            .post(self.endpoint("/tour/create-order"))
            .json(&request)
            .send()
            .await?;
        tracing::debug!("create-order response status: {}", response.status());
        Self::read_json(response).await
    }
}

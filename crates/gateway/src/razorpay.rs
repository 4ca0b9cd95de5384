//! Razorpay HTTP implementation of [`PaymentGateway`].
//!
//! Orders are created with `POST /v1/orders` under basic auth. Amounts go
//! over the wire in paise, which is already the system's canonical unit,
//! so no conversion happens at this boundary.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use agrirent_core::money::Paise;
use agrirent_core::signing;

use crate::{GatewayError, PaymentGateway, PaymentSession};

/// HTTP request timeout for a single gateway call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Settlement currency for all orders.
const CURRENCY: &str = "INR";

/// Credentials and endpoint configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Public key ID (also handed to the client checkout widget).
    pub key_id: String,
    /// Secret used for basic auth and payment-proof signatures.
    pub key_secret: String,
    /// Shared secret for webhook body signatures.
    pub webhook_secret: String,
    /// API base URL; overridable for staging or a local stub.
    pub base_url: String,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                     |
    /// |---------------------------|-----------------------------|
    /// | `RAZORPAY_KEY_ID`         | required                    |
    /// | `RAZORPAY_KEY_SECRET`     | required                    |
    /// | `RAZORPAY_WEBHOOK_SECRET` | required                    |
    /// | `RAZORPAY_BASE_URL`       | `https://api.razorpay.com`  |
    pub fn from_env() -> Self {
        Self {
            key_id: std::env::var("RAZORPAY_KEY_ID").expect("RAZORPAY_KEY_ID must be set"),
            key_secret: std::env::var("RAZORPAY_KEY_SECRET")
                .expect("RAZORPAY_KEY_SECRET must be set"),
            webhook_secret: std::env::var("RAZORPAY_WEBHOOK_SECRET")
                .expect("RAZORPAY_WEBHOOK_SECRET must be set"),
            base_url: std::env::var("RAZORPAY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        }
    }
}

/// Response body for a created order. Only the fields we use.
#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
}

/// Production gateway adapter talking to the Razorpay REST API.
pub struct RazorpayGateway {
    client: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayGateway {
    /// Create a new adapter with a pre-configured HTTP client.
    pub fn new(config: RazorpayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_session(
        &self,
        amount: Paise,
        reference: &str,
    ) -> Result<PaymentSession, GatewayError> {
        let url = format!("{}/v1/orders", self.config.base_url);
        let body = serde_json::json!({
            "amount": amount.value(),
            "currency": CURRENCY,
            "receipt": reference,
        });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), reference, "Order creation rejected");
            return Err(GatewayError::HttpStatus(status.as_u16()));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        tracing::info!(order_id = %order.id, reference, amount = %amount, "Payment session created");

        Ok(PaymentSession {
            order_id: order.id,
            amount,
            currency: CURRENCY.to_string(),
            key_id: self.config.key_id.clone(),
        })
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let expected = signing::payment_signature(&self.config.key_secret, order_id, payment_id);
        signing::verify_signature(&expected, signature)
    }

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        let expected = signing::hmac_sha256_hex(&self.config.webhook_secret, body);
        signing::verify_signature(&expected, signature)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Payment gateway adapter.
//!
//! The booking lifecycle only needs three things from a gateway: create a
//! payment session for an amount, verify a client-submitted payment proof,
//! and verify a webhook body. [`PaymentGateway`] captures exactly that
//! contract; [`razorpay::RazorpayGateway`] is the production HTTP
//! implementation and `mock::MockGateway` (behind the `mock` feature) is
//! the test double.

pub mod razorpay;

#[cfg(feature = "mock")]
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;

use agrirent_core::money::Paise;

/// Error type for gateway failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway returned HTTP {0}")]
    HttpStatus(u16),

    /// The gateway's response body could not be interpreted.
    #[error("Malformed gateway response: {0}")]
    Malformed(String),
}

/// A gateway-issued handle used to collect payment and later verify it.
///
/// Returned to the client as checkout configuration; `order_id` comes back
/// in the payment proof and the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSession {
    pub order_id: String,
    pub amount: Paise,
    pub currency: String,
    /// Public key the client-side checkout widget needs.
    pub key_id: String,
}

/// The payment gateway contract the booking lifecycle depends on.
///
/// Session creation is I/O; signature verification is pure HMAC math and
/// never touches the network, so a failed verification is always safe to
/// retry with a corrected proof.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Request a payment session for `amount`, tagged with `reference`
    /// (an opaque string echoed back by the gateway, e.g. `booking-42`).
    async fn create_session(
        &self,
        amount: Paise,
        reference: &str,
    ) -> Result<PaymentSession, GatewayError>;

    /// Verify a client-submitted payment proof against the key secret.
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    /// Verify a webhook body against the webhook secret. Must be called
    /// on the raw bytes before the payload is parsed or trusted.
    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool;
}

//! In-memory gateway test double.
//!
//! Behaves like the real adapter with a fixed secret: issued order IDs are
//! sequential, payment proofs verify against [`MockGateway::sign_payment`],
//! and webhook bodies against [`MockGateway::sign_webhook`]. Session
//! creation can be forced to fail to exercise the rollback path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;

use agrirent_core::money::Paise;
use agrirent_core::signing;

use crate::{GatewayError, PaymentGateway, PaymentSession};

const MOCK_KEY_SECRET: &str = "mock-key-secret";
const MOCK_WEBHOOK_SECRET: &str = "mock-webhook-secret";

/// Deterministic [`PaymentGateway`] implementation for tests.
#[derive(Default)]
pub struct MockGateway {
    next_order: AtomicU64,
    fail_sessions: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create_session` calls fail with an HTTP 502.
    pub fn fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    /// Produce the payment-proof signature the mock will accept.
    pub fn sign_payment(order_id: &str, payment_id: &str) -> String {
        signing::payment_signature(MOCK_KEY_SECRET, order_id, payment_id)
    }

    /// Produce the webhook-body signature the mock will accept.
    pub fn sign_webhook(body: &[u8]) -> String {
        signing::hmac_sha256_hex(MOCK_WEBHOOK_SECRET, body)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_session(
        &self,
        amount: Paise,
        _reference: &str,
    ) -> Result<PaymentSession, GatewayError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(GatewayError::HttpStatus(502));
        }
        let n = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PaymentSession {
            order_id: format!("order_mock_{n}"),
            amount,
            currency: "INR".to_string(),
            key_id: "rzp_mock".to_string(),
        })
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signing::verify_signature(&Self::sign_payment(order_id, payment_id), signature)
    }

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        signing::verify_signature(&Self::sign_webhook(body), signature)
    }
}

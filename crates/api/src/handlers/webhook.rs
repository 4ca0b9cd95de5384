//! Inbound payment-gateway webhook.
//!
//! The raw body is verified against the webhook secret before anything is
//! parsed; an attacker who cannot produce the HMAC cannot reach the state
//! machine. Transitions go through [`crate::lifecycle`], the same code
//! path as client-submitted proofs.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;

use agrirent_core::error::CoreError;
use agrirent_db::repositories::BookingRepo;

use crate::error::{AppError, AppResult};
use crate::lifecycle;
use crate::state::AppState;

/// Header carrying the gateway's body signature.
const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// The slice of the webhook payload this service acts on.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    payload: WebhookPayload,
}

#[derive(Debug, Deserialize, Default)]
struct WebhookPayload {
    order_id: Option<String>,
    payment_id: Option<String>,
}

/// POST /api/v1/webhooks/payment-gateway
pub async fn payment_gateway(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest(format!("missing {SIGNATURE_HEADER} header")))?;

    if !state.gateway.verify_webhook_signature(&body, signature) {
        tracing::warn!("Rejected webhook with bad signature");
        return Err(CoreError::InvalidSignature.into());
    }

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("malformed webhook payload: {e}")))?;

    match event.event.as_str() {
        "payment.captured" => {
            let (order_id, payment_id) = require_ids(&event)?;
            let booking = find_booking(&state, &order_id).await?;
            lifecycle::apply_captured_payment(&state.pool, booking, &payment_id).await?;
            Ok(StatusCode::OK)
        }
        "payment.failed" => {
            let order_id = event.payload.order_id.clone().ok_or_else(|| {
                AppError::BadRequest("webhook payload missing order_id".into())
            })?;
            let booking = find_booking(&state, &order_id).await?;
            lifecycle::fail_payment(&state.pool, &booking).await?;
            Ok(StatusCode::OK)
        }
        other => {
            // Acknowledge events we don't handle so the gateway stops
            // retrying them.
            tracing::debug!(event = other, "Ignoring unhandled webhook event");
            Ok(StatusCode::OK)
        }
    }
}

fn require_ids(event: &WebhookEvent) -> AppResult<(String, String)> {
    let order_id = event
        .payload
        .order_id
        .clone()
        .ok_or_else(|| AppError::BadRequest("webhook payload missing order_id".into()))?;
    let payment_id = event
        .payload
        .payment_id
        .clone()
        .ok_or_else(|| AppError::BadRequest("webhook payload missing payment_id".into()))?;
    Ok((order_id, payment_id))
}

async fn find_booking(
    state: &AppState,
    order_id: &str,
) -> AppResult<agrirent_db::models::booking::Booking> {
    BookingRepo::find_by_order_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(order_id, "Webhook references unknown order");
            AppError::BadRequest(format!("no booking for order {order_id}"))
        })
}

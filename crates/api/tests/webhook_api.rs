//! Integration tests for the payment-gateway webhook: signature gating,
//! capture and failure events, and duplicate delivery.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use agrirent_gateway::mock::MockGateway;

const WEBHOOK_URI: &str = "/api/v1/webhooks/payment-gateway";

/// Create a booking and return `(booking_id, order_id)`.
async fn booked(app: &axum::Router, equipment: i64, renter: i64, day: u64) -> (i64, String) {
    let start = common::future_date(day);
    let (status, body) = common::send(
        app,
        "POST",
        "/api/v1/bookings",
        Some(json!({
            "equipment_id": equipment,
            "renter_id": renter,
            "start_date": start,
            "end_date": start
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "booking failed: {body}");
    (
        body["data"]["booking"]["id"].as_i64().unwrap(),
        body["data"]["payment"]["order_id"].as_str().unwrap().to_string(),
    )
}

fn signed_event(event: &str, order_id: &str, payment_id: Option<&str>) -> (Vec<u8>, String) {
    let mut payload = json!({ "order_id": order_id });
    if let Some(pid) = payment_id {
        payload["payment_id"] = json!(pid);
    }
    let body = json!({ "event": event, "payload": payload }).to_string().into_bytes();
    let signature = MockGateway::sign_webhook(&body);
    (body, signature)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn captured_event_confirms_the_booking(pool: PgPool) {
    let (app, _gateway) = common::build_test_app(pool);
    let owner = common::seed_user(&app, "owner@example.com").await;
    let renter = common::seed_user(&app, "renter@example.com").await;
    let equipment = common::seed_equipment(&app, owner, 100_000).await;
    let (booking_id, order_id) = booked(&app, equipment, renter, 10).await;

    let (body, signature) = signed_event("payment.captured", &order_id, Some("pay_wh_1"));
    let (status, _) = common::post_raw(
        &app,
        WEBHOOK_URI,
        &[("x-razorpay-signature", signature.as_str())],
        body.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, booking) =
        common::send(&app, "GET", &format!("/api/v1/bookings/{booking_id}"), None).await;
    assert_eq!(booking["data"]["status"], "paid");
    assert_eq!(booking["data"]["gateway_payment_id"], "pay_wh_1");

    let (status, receipt) = common::send(
        &app,
        "GET",
        &format!("/api/v1/bookings/{booking_id}/receipt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["data"]["amount_paise"], 100_000);

    // Gateways redeliver; the duplicate is acknowledged without a second
    // receipt.
    let (status, _) = common::post_raw(
        &app,
        WEBHOOK_URI,
        &[("x-razorpay-signature", signature.as_str())],
        body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_event_releases_the_equipment(pool: PgPool) {
    let (app, _gateway) = common::build_test_app(pool);
    let owner = common::seed_user(&app, "owner@example.com").await;
    let renter = common::seed_user(&app, "renter@example.com").await;
    let equipment = common::seed_equipment(&app, owner, 100_000).await;
    let (booking_id, order_id) = booked(&app, equipment, renter, 10).await;

    let (body, signature) = signed_event("payment.failed", &order_id, None);
    let (status, _) = common::post_raw(
        &app,
        WEBHOOK_URI,
        &[("x-razorpay-signature", signature.as_str())],
        body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, booking) =
        common::send(&app, "GET", &format!("/api/v1/bookings/{booking_id}"), None).await;
    assert_eq!(booking["data"]["status"], "payment_failed");

    let (_, listing) =
        common::send(&app, "GET", &format!("/api/v1/equipment/{equipment}"), None).await;
    assert_eq!(listing["data"]["available"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejects_unsigned_and_forged_deliveries(pool: PgPool) {
    let (app, _gateway) = common::build_test_app(pool);
    let owner = common::seed_user(&app, "owner@example.com").await;
    let renter = common::seed_user(&app, "renter@example.com").await;
    let equipment = common::seed_equipment(&app, owner, 100_000).await;
    let (booking_id, order_id) = booked(&app, equipment, renter, 10).await;

    let (body, _) = signed_event("payment.captured", &order_id, Some("pay_wh_1"));

    // Missing header.
    let (status, _) = common::post_raw(&app, WEBHOOK_URI, &[], body.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Wrong signature.
    let (status, err) = common::post_raw(
        &app,
        WEBHOOK_URI,
        &[("x-razorpay-signature", "deadbeef")],
        body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "INVALID_SIGNATURE");

    // The booking never moved.
    let (_, booking) =
        common::send(&app, "GET", &format!("/api/v1/bookings/{booking_id}"), None).await;
    assert_eq!(booking["data"]["status"], "awaiting_payment");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unhandled_events_are_acknowledged(pool: PgPool) {
    let (app, _gateway) = common::build_test_app(pool);

    let body = json!({ "event": "refund.processed", "payload": {} })
        .to_string()
        .into_bytes();
    let signature = MockGateway::sign_webhook(&body);

    let (status, _) = common::post_raw(
        &app,
        WEBHOOK_URI,
        &[("x-razorpay-signature", signature.as_str())],
        body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_order_is_a_bad_request(pool: PgPool) {
    let (app, _gateway) = common::build_test_app(pool);

    let (body, signature) = signed_event("payment.captured", "order_missing", Some("pay_wh_1"));
    let (status, err) = common::post_raw(
        &app,
        WEBHOOK_URI,
        &[("x-razorpay-signature", signature.as_str())],
        body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "BAD_REQUEST");
}

//! Integration tests for the receipt repository, chiefly the idempotent
//! insert backed by the unique constraint on `booking_id`.

use chrono::NaiveDate;
use sqlx::PgPool;

use agrirent_core::money::Paise;
use agrirent_core::types::DbId;
use agrirent_db::models::booking::CreateBooking;
use agrirent_db::models::equipment::CreateEquipment;
use agrirent_db::models::receipt::CreateReceipt;
use agrirent_db::models::user::CreateUser;
use agrirent_db::repositories::{BookingRepo, EquipmentRepo, ReceiptRepo, UserRepo};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Seed a user, listing, and paid booking; returns `(renter_id, booking_id)`.
async fn seed_paid_booking(pool: &PgPool) -> (DbId, DbId) {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();
    let renter = UserRepo::create(
        pool,
        &CreateUser {
            name: "Renter".to_string(),
            email: "renter@example.com".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();
    let equipment = EquipmentRepo::create(
        pool,
        &CreateEquipment {
            owner_id: owner.id,
            name: "Seed Drill".to_string(),
            category: "seeding".to_string(),
            description: None,
            daily_rate_paise: Paise::new(50_000).unwrap(),
            location: "Nashik".to_string(),
            latitude: None,
            longitude: None,
        },
    )
    .await
    .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let booking = BookingRepo::create(
        &mut tx,
        &CreateBooking {
            equipment_id: equipment.id,
            renter_id: renter.id,
            start_date: d("2030-05-01"),
            end_date: d("2030-05-03"),
            total_paise: Paise::new(150_000).unwrap(),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    BookingRepo::mark_awaiting_payment(pool, booking.id, "order_1")
        .await
        .unwrap();
    BookingRepo::mark_paid(pool, booking.id, "pay_1").await.unwrap();

    (renter.id, booking.id)
}

fn receipt_dto(booking_id: DbId, renter_id: DbId) -> CreateReceipt {
    CreateReceipt {
        booking_id,
        renter_id,
        amount_paise: Paise::new(150_000).unwrap(),
        status: "paid".to_string(),
        equipment_name: "Seed Drill".to_string(),
        start_date: d("2030-05-01"),
        end_date: d("2030-05-03"),
        payment_method: "online".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_is_idempotent_per_booking(pool: PgPool) {
    let (renter, booking) = seed_paid_booking(&pool).await;

    let first = ReceiptRepo::create(&pool, &receipt_dto(booking, renter))
        .await
        .unwrap();
    let second = ReceiptRepo::create(&pool, &receipt_dto(booking, renter))
        .await
        .unwrap();

    // The duplicate insert hits the conflict clause and returns the
    // original row.
    assert_eq!(first.id, second.id);
    assert_eq!(second.amount_paise.value(), 150_000);

    let receipts = ReceiptRepo::list_by_renter(&pool, renter).await.unwrap();
    assert_eq!(receipts.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_booking_distinguishes_missing_receipts(pool: PgPool) {
    let (renter, booking) = seed_paid_booking(&pool).await;

    assert!(ReceiptRepo::find_by_booking(&pool, booking)
        .await
        .unwrap()
        .is_none());

    ReceiptRepo::create(&pool, &receipt_dto(booking, renter))
        .await
        .unwrap();

    let found = ReceiptRepo::find_by_booking(&pool, booking)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.booking_id, booking);
    assert_eq!(found.payment_method, "online");
}

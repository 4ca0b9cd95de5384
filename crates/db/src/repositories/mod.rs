mod booking_repo;
mod equipment_repo;
mod receipt_repo;
mod user_repo;

pub use booking_repo::BookingRepo;
pub use equipment_repo::EquipmentRepo;
pub use receipt_repo::ReceiptRepo;
pub use user_repo::UserRepo;

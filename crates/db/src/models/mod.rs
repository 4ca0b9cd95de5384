pub mod booking;
pub mod equipment;
pub mod receipt;
pub mod user;

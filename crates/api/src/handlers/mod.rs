pub mod booking;
pub mod equipment;
pub mod user;
pub mod webhook;

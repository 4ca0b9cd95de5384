//! Domain logic for the AgriRent booking service.
//!
//! This crate has no I/O and no internal dependencies so the same types and
//! rules can be used by the repository layer, the API server, and any
//! future worker or CLI tooling.

pub mod booking;
pub mod dates;
pub mod error;
pub mod money;
pub mod signing;
pub mod types;

//! Booking, cancellation, insurance, and catalog rules for an equipment rental marketplace.

pub mod config;
pub mod error;
pub mod policy;
pub mod telemetry;

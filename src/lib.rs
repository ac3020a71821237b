//! AdBlocker Ultimate popup core: blocked-request statistics, user rank and
//! toolbar popup view state.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod message_handler;
pub mod platform;
pub mod services;
pub mod types;

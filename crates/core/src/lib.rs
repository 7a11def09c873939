//! Domain logic for the White Rabbit network manager.
//!
//! Everything in this crate is pure: no database or network access. The
//! `wr-db` and `wr-api` crates feed it rows and requests.

pub mod calibration;
pub mod custom_fields;
pub mod error;
pub mod inventory;
pub mod network_clone;
pub mod topology;
pub mod types;
pub mod wr_config;

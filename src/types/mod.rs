//! Common types used across the Coinone client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;

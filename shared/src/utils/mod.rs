//! Utility functions shared across crates

pub mod bytes;

pub use bytes::{format_bytes, format_signed_bytes};

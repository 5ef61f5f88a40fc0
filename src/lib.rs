#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Typed `payto://` payment targets.
//!
//! This crate builds and parses payment target URIs as described by
//! RFC 8905 (`payto:` URI scheme). A payment target carries a target type
//! (the URI authority), a path identifier, an amount, a receiver name and
//! optional sender name, message and instruction, and renders to a URI with
//! its options sorted by key:
//!
//! ```
//! use payto_rs::{new_bic, sender};
//!
//! let bic = new_bic("SOGEDEFFXXX", "the-receiver", "123.39", [sender("the-sender")]).unwrap();
//! assert_eq!(
//!     bic.to_string(),
//!     "payto://bic/SOGEDEFFXXX?amount=123.39&receiver-name=the-receiver&sender-name=the-sender"
//! );
//! ```
//!
//! # Modules
//!
//! - [`amount`] - Arbitrary-precision decimal amounts
//! - [`authority`](mod@authority) - Payment target types and well-known authority names
//! - [`target`] - The generic payment target, its options, builder and URI form
//! - [`bic`] - Business Identifier Code targets (`payto://bic/...`)
//! - [`upi`] - Unified Payment Interface targets (`payto://upi/...`)
//! - [`config`] - Targets declared in JSON files, with environment variable resolution
//! - [`error`] - Error types
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod amount;
pub mod authority;
pub mod bic;
pub mod config;
pub mod error;
pub mod target;
pub mod upi;

pub use amount::Amount;
pub use authority::{Authority, Bic, Upi};
pub use bic::{BicTarget, new_bic};
pub use error::{ConfigError, PaytoError};
pub use target::{
    PaymentTarget, PaymentTargetBuilder, Payto, TargetOption, instruction, message, sender,
};
pub use upi::{UpiTarget, new_upi};

/// Result type for payment target construction and parsing.
pub type Result<T> = std::result::Result<T, PaytoError>;

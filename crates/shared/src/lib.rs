//! # outcome-shared
//!
//! Payload types shared by the outcome containers.
//!
//! - [`ErrorCode`] - the default structured, inspectable error payload
//! - [`ExceptionPtr`] - the default opaque, re-raisable exception payload
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Value semantics** - Payloads are cheap to clone and compare
//! 3. **Unwinding interop** - Panics can be captured and raised again

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod exception;

pub use errors::ErrorCode;
pub use exception::{ExceptionPtr, Rethrow};

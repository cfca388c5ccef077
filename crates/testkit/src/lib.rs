//! # outcome-testkit
//!
//! Test helpers for outcome containers.
//! This crate depends on `core` and `shared`.

pub mod errors;
pub mod flaky;
pub mod logging;
pub mod recording;

pub use flaky::{Flaky, Fuse};
pub use logging::init_test_tracing;
pub use recording::{Recording, take_recorded};

//! # outcome-core
//!
//! A container for the result of an operation that can succeed with a value,
//! fail with a structured error, fail with an opaque exception, or fail with
//! both an error and an exception.
//!
//! ## Features
//!
//! - [`BasicOutcome`] / [`Outcome`] - the tri-state container
//! - [`BasicResult`] - the two-state companion (value or error)
//! - [`success`] / [`failure`] - wrappers naming the destination slot
//! - [`policy`] - what checked access does when a slot is absent
//! - [`swap`] - exchange for payloads whose own swap can fail
//!
//! ```
//! use outcome_core::{ErrorCode, ExceptionPtr, Outcome, OutcomeState};
//!
//! let ok: Outcome<u32> = Outcome::new(42_u32);
//! assert_eq!(ok.value(), Ok(&42));
//!
//! let failed: Outcome<u32> =
//!     Outcome::new_failure(ErrorCode::not_found(), ExceptionPtr::new("index corrupt"));
//! assert_eq!(failed.state(), OutcomeState::ErrorAndException);
//! assert!(failed.value().is_err());
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod compare;
pub mod eligibility;
pub mod flags;
pub mod hooks;
pub mod outcome;
pub mod policy;
pub mod result;
pub mod storage;
pub mod swap;
pub mod tagging;

pub use flags::{OutcomeState, StatusFlags};
pub use hooks::Construction;
pub use outcome::{BasicOutcome, Outcome};
pub use outcome_shared::{ErrorCode, ExceptionPtr, Rethrow};
pub use policy::{
    AccessError, AccessPolicy, ReportAbsence, RethrowOnAccess, SlotAbsent, TerminateOnAccess,
    Traced, WideAccess,
};
pub use result::BasicResult;
pub use storage::{Slot, Storage};
pub use swap::{SwapDamage, SwapError, TrySwap, strong_swap};
pub use tagging::{Failure, Success, failure, failure_with_exception, success};

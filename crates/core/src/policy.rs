//! Access policies.
//!
//! A policy decides what happens when a caller reads a slot. Narrow checks
//! back the `assume_*` accessors: the caller has already verified presence,
//! so they only assert in debug builds. Wide checks back the checked
//! accessors and turn an absent slot into a failure value. A slot counts as
//! present only when both its bit and its payload are there.
//!
//! | Policy                | Failure                | Absent slot          |
//! |-----------------------|------------------------|----------------------|
//! | [`RethrowOnAccess`]   | [`AccessError`]        | carries the failure  |
//! | [`TerminateOnAccess`] | [`Infallible`]         | logs, then aborts    |
//! | [`ReportAbsence`]     | [`SlotAbsent`]         | names the slot       |
//! | [`Traced<P>`]         | `P::Failure`           | same as `P`          |

use std::any::Any;
use std::convert::Infallible;
use std::marker::PhantomData;
use std::panic;

use outcome_shared::Rethrow;
use thiserror::Error;

use crate::flags::StatusFlags;
use crate::hooks::Construction;
use crate::storage::{Slot, Storage};

/// Narrow checks and the construction hook.
///
/// Implemented by every policy for every payload triple, so constructing and
/// narrowly reading a container never requires more of the payload types
/// than the container itself does.
pub trait AccessPolicy<V, E, X> {
    /// Called before narrow value access.
    fn narrow_value_check(status: StatusFlags) {
        debug_assert!(status.has_value(), "narrow value access without a value");
    }

    /// Called before narrow error access.
    fn narrow_error_check(status: StatusFlags) {
        debug_assert!(status.has_error(), "narrow error access without an error");
    }

    /// Called before narrow exception access.
    fn narrow_exception_check(status: StatusFlags) {
        debug_assert!(
            status.has_exception(),
            "narrow exception access without an exception"
        );
    }

    /// Called once a constructor or conversion has finished building.
    fn on_construction(_storage: &Storage<V, E, X>, _how: Construction) {}
}

/// Wide (checked) access.
pub trait WideAccess<V, E, X>: AccessPolicy<V, E, X> {
    /// What a failed check produces.
    type Failure;

    /// Succeeds when the value slot is populated.
    fn wide_value_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure>;

    /// Succeeds when the error slot is populated.
    fn wide_error_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure>;

    /// Succeeds when the exception slot is populated.
    fn wide_exception_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure>;
}

/// Failure reported by [`RethrowOnAccess`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError<E, X> {
    /// The value was requested but the container holds an exception.
    #[error("outcome holds an exception: {0}")]
    Exception(X),
    /// The value was requested but the container holds an error.
    #[error("outcome holds an error: {0}")]
    Error(E),
    /// Nothing to report the absent value with.
    #[error("no value")]
    NoValue,
    /// The error was requested but is absent.
    #[error("no error")]
    NoError,
    /// The exception was requested but is absent.
    #[error("no exception")]
    NoException,
}

impl<E, X> AccessError<E, X>
where
    E: Any + Send,
    X: Rethrow,
{
    /// Raise the failure through unwinding.
    ///
    /// An exception resumes unwinding with its own payload, so
    /// [`ExceptionPtr::catch`](outcome_shared::ExceptionPtr::catch) recovers
    /// the identical handle. An error becomes the panic payload itself.
    pub fn raise(self) -> ! {
        match self {
            Self::Exception(exception) => exception.rethrow(),
            Self::Error(error) => panic::panic_any(error),
            Self::NoValue => panic::panic_any("no value"),
            Self::NoError => panic::panic_any("no error"),
            Self::NoException => panic::panic_any("no exception"),
        }
    }
}

/// Default policy: a missing value reports the exception first, then the
/// error, then plain absence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RethrowOnAccess;

impl<V, E, X> AccessPolicy<V, E, X> for RethrowOnAccess {}

impl<V, E, X> WideAccess<V, E, X> for RethrowOnAccess
where
    E: Clone,
    X: Clone,
{
    type Failure = AccessError<E, X>;

    fn wide_value_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        if storage.value().is_some() {
            return Ok(());
        }
        if let Some(exception) = storage.exception() {
            return Err(AccessError::Exception(exception.clone()));
        }
        if let Some(error) = storage.error() {
            return Err(AccessError::Error(error.clone()));
        }
        Err(AccessError::NoValue)
    }

    fn wide_error_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        if storage.error().is_some() {
            Ok(())
        } else {
            Err(AccessError::NoError)
        }
    }

    fn wide_exception_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        if storage.exception().is_some() {
            Ok(())
        } else {
            Err(AccessError::NoException)
        }
    }
}

/// Treats any wide access to an absent slot as a fatal contract violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminateOnAccess;

fn terminate(slot: Slot, status: StatusFlags) -> ! {
    tracing::error!(%slot, ?status, "wide access to an absent slot, aborting");
    std::process::abort()
}

impl<V, E, X> AccessPolicy<V, E, X> for TerminateOnAccess {}

impl<V, E, X> WideAccess<V, E, X> for TerminateOnAccess {
    type Failure = Infallible;

    fn wide_value_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        if storage.value().is_none() {
            terminate(Slot::Value, storage.status());
        }
        Ok(())
    }

    fn wide_error_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        if storage.error().is_none() {
            terminate(Slot::Error, storage.status());
        }
        Ok(())
    }

    fn wide_exception_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        if storage.exception().is_none() {
            terminate(Slot::Exception, storage.status());
        }
        Ok(())
    }
}

/// Failure reported by [`ReportAbsence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no {slot}")]
pub struct SlotAbsent {
    /// The slot that was requested.
    pub slot: Slot,
}

/// Reports which slot was missing without touching any payload.
///
/// Usable with payload types that cannot be cloned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportAbsence;

impl ReportAbsence {
    const fn check(present: bool, slot: Slot) -> Result<(), SlotAbsent> {
        if present {
            Ok(())
        } else {
            Err(SlotAbsent { slot })
        }
    }
}

impl<V, E, X> AccessPolicy<V, E, X> for ReportAbsence {}

impl<V, E, X> WideAccess<V, E, X> for ReportAbsence {
    type Failure = SlotAbsent;

    fn wide_value_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        Self::check(storage.value().is_some(), Slot::Value)
    }

    fn wide_error_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        Self::check(storage.error().is_some(), Slot::Error)
    }

    fn wide_exception_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        Self::check(storage.exception().is_some(), Slot::Exception)
    }
}

/// Wraps a policy and emits a trace event for every construction.
pub struct Traced<P>(PhantomData<fn() -> P>);

impl<V, E, X, P> AccessPolicy<V, E, X> for Traced<P>
where
    P: AccessPolicy<V, E, X>,
{
    fn narrow_value_check(status: StatusFlags) {
        P::narrow_value_check(status);
    }

    fn narrow_error_check(status: StatusFlags) {
        P::narrow_error_check(status);
    }

    fn narrow_exception_check(status: StatusFlags) {
        P::narrow_exception_check(status);
    }

    fn on_construction(storage: &Storage<V, E, X>, how: Construction) {
        tracing::trace!(
            construction = how.label(),
            status = ?storage.status(),
            "outcome constructed"
        );
        P::on_construction(storage, how);
    }
}

impl<V, E, X, P> WideAccess<V, E, X> for Traced<P>
where
    P: WideAccess<V, E, X>,
{
    type Failure = P::Failure;

    fn wide_value_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        P::wide_value_check(storage)
    }

    fn wide_error_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        P::wide_error_check(storage)
    }

    fn wide_exception_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        P::wide_exception_check(storage)
    }
}

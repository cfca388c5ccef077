//! The tri-state outcome container.

use std::fmt;
use std::marker::PhantomData;

use outcome_shared::{ErrorCode, ExceptionPtr};

use crate::eligibility::{DisjointPayloads, IntoSlot, NotInto};
use crate::flags::{OutcomeState, StatusFlags};
use crate::hooks::Construction;
use crate::policy::{AccessPolicy, RethrowOnAccess, WideAccess};
use crate::result::BasicResult;
use crate::storage::{Slot, Storage, present};
use crate::tagging::{Failure, Success};

/// Holds a value, an error, an exception, or an error and an exception.
///
/// A value never coexists with a failure. `P` decides what a checked accessor
/// does when the requested slot is absent; see [`crate::policy`].
pub struct BasicOutcome<V, E = ErrorCode, X = ExceptionPtr, P = RethrowOnAccess> {
    storage: Storage<V, E, X>,
    policy: PhantomData<fn() -> P>,
}

/// [`BasicOutcome`] with the default rethrowing policy.
pub type Outcome<V, E = ErrorCode, X = ExceptionPtr> = BasicOutcome<V, E, X, RethrowOnAccess>;

// ============================================================================
// Construction
// ============================================================================

impl<V, E, X, P> BasicOutcome<V, E, X, P>
where
    P: AccessPolicy<V, E, X>,
{
    fn build(storage: Storage<V, E, X>, how: Construction) -> Self {
        let outcome = Self {
            storage,
            policy: PhantomData,
        };
        P::on_construction(&outcome.storage, how);
        outcome
    }

    /// Build from an input that converts into exactly one slot.
    ///
    /// Argument tuples work the same way when exactly one slot type
    /// implements `From` for the tuple. See [`crate::eligibility`] for the
    /// inputs this rejects at compile time.
    pub fn new<T, Target, Proof>(input: T) -> Self
    where
        T: IntoSlot<V, E, X, Target>,
        (V, E, X): DisjointPayloads<Proof>,
    {
        Self::build(input.into_storage(), Construction::Converting(T::SLOT))
    }

    /// Build a compound failure from an error-ish and an exception-ish input.
    ///
    /// The error input must not also convert into the exception type, and the
    /// exception input must convert into neither the value nor the error
    /// type.
    pub fn new_failure<A, B, ErrorProof, ValueProof, CrossProof, Proof>(
        error: A,
        exception: B,
    ) -> Self
    where
        E: From<A>,
        X: From<B>,
        A: NotInto<X, ErrorProof>,
        B: NotInto<V, ValueProof> + NotInto<E, CrossProof>,
        (V, E, X): DisjointPayloads<Proof>,
    {
        Self::build(
            Storage::from_error_and_exception(E::from(error), X::from(exception)),
            Construction::ConvertingFailure,
        )
    }

    /// Construct the value slot from `args`.
    pub fn in_place_value<A>(args: A) -> Self
    where
        V: From<A>,
    {
        Self::build(
            Storage::from_value(V::from(args)),
            Construction::InPlace(Slot::Value),
        )
    }

    /// Construct the error slot from `args`.
    pub fn in_place_error<A>(args: A) -> Self
    where
        E: From<A>,
    {
        Self::build(
            Storage::from_error(E::from(args)),
            Construction::InPlace(Slot::Error),
        )
    }

    /// Construct the exception slot from `args`.
    pub fn in_place_exception<A>(args: A) -> Self
    where
        X: From<A>,
    {
        Self::build(
            Storage::from_exception(X::from(args)),
            Construction::InPlace(Slot::Exception),
        )
    }

    /// Construct both failure slots.
    pub fn in_place_failure<A, B>(error: A, exception: B) -> Self
    where
        E: From<A>,
        X: From<B>,
    {
        Self::build(
            Storage::from_error_and_exception(E::from(error), X::from(exception)),
            Construction::InPlaceFailure,
        )
    }

    /// Convert from an outcome with compatible payload types.
    ///
    /// Status bits carry over unchanged, `LOST_CONSISTENCY` included.
    pub fn from_compatible<T, U, W, Q>(other: BasicOutcome<T, U, W, Q>) -> Self
    where
        V: From<T>,
        E: From<U>,
        X: From<W>,
    {
        Self::build(other.storage.convert(), Construction::Move)
    }

    /// Convert from a borrowed outcome with compatible payload types.
    pub fn from_compatible_ref<T, U, W, Q>(other: &BasicOutcome<T, U, W, Q>) -> Self
    where
        T: Clone,
        U: Clone,
        W: Clone,
        V: From<T>,
        E: From<U>,
        X: From<W>,
    {
        Self::build(other.storage.convert_ref(), Construction::Copy)
    }
}

impl<V, E, X, P, T> From<Success<T>> for BasicOutcome<V, E, X, P>
where
    V: From<T>,
    P: AccessPolicy<V, E, X>,
{
    fn from(success: Success<T>) -> Self {
        Self::build(
            Storage::from_value(V::from(success.into_value())),
            Construction::Success,
        )
    }
}

impl<V, E, X, P, U> From<Failure<U, X>> for BasicOutcome<V, E, X, P>
where
    E: From<U>,
    P: AccessPolicy<V, E, X>,
{
    fn from(failure: Failure<U, X>) -> Self {
        let (error, exception) = failure.into_parts();
        Self::build(
            Storage::from_failure_parts(error.map(E::from), exception),
            Construction::Failure,
        )
    }
}

impl<V, E, X, P, T, U, Q> From<BasicResult<T, U, Q>> for BasicOutcome<V, E, X, P>
where
    V: From<T>,
    E: From<U>,
    P: AccessPolicy<V, E, X>,
{
    fn from(result: BasicResult<T, U, Q>) -> Self {
        Self::build(
            result.into_storage().widen::<X>().convert(),
            Construction::FromResult,
        )
    }
}

impl<V, E, X, P, T, U> From<Result<T, U>> for BasicOutcome<V, E, X, P>
where
    V: From<T>,
    E: From<U>,
    P: AccessPolicy<V, E, X>,
{
    fn from(result: Result<T, U>) -> Self {
        let storage = match result {
            Ok(value) => Storage::from_value(V::from(value)),
            Err(error) => Storage::from_error(E::from(error)),
        };
        Self::build(storage, Construction::FromResult)
    }
}

impl<V, E, X, P> Default for BasicOutcome<V, E, X, P>
where
    V: Default,
    P: AccessPolicy<V, E, X>,
{
    fn default() -> Self {
        Self::build(Storage::from_value(V::default()), Construction::Default)
    }
}

impl<V: Clone, E: Clone, X: Clone, P> Clone for BasicOutcome<V, E, X, P> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            policy: PhantomData,
        }
    }
}

// ============================================================================
// Observers and mutation
// ============================================================================

impl<V, E, X, P> BasicOutcome<V, E, X, P> {
    /// Status bits.
    pub const fn status(&self) -> StatusFlags {
        self.storage.status()
    }

    /// Classification of the populated slots.
    pub const fn state(&self) -> OutcomeState {
        self.storage.status().state()
    }

    /// Returns true if a value is held.
    pub const fn has_value(&self) -> bool {
        self.storage.status().has_value()
    }

    /// Returns true if an error is held, with or without an exception.
    pub const fn has_error(&self) -> bool {
        self.storage.status().has_error()
    }

    /// Returns true if an exception is held, with or without an error.
    pub const fn has_exception(&self) -> bool {
        self.storage.status().has_exception()
    }

    /// Returns true if an error or an exception is held.
    pub const fn has_failure(&self) -> bool {
        self.storage.status().has_failure()
    }

    /// Returns true if a swap left this container unable to guarantee its
    /// contents.
    pub const fn has_lost_consistency(&self) -> bool {
        self.storage.status().has_lost_consistency()
    }

    /// Borrow the slot storage.
    pub const fn storage(&self) -> &Storage<V, E, X> {
        &self.storage
    }

    pub(crate) const fn storage_mut(&mut self) -> &mut Storage<V, E, X> {
        &mut self.storage
    }

    /// The value, if present.
    pub fn get_value(&self) -> Option<&V> {
        self.storage.value()
    }

    /// The error, if present.
    pub fn get_error(&self) -> Option<&E> {
        self.storage.error()
    }

    /// The exception, if present.
    pub fn get_exception(&self) -> Option<&X> {
        self.storage.exception()
    }

    /// Replace the exception payload and mark it present.
    ///
    /// Any error is kept. A held value is discarded, since a value never
    /// coexists with a failure.
    pub fn override_exception(&mut self, exception: X) {
        self.storage.set_exception(exception);
    }

    /// Replace the contents with a value.
    ///
    /// Assignment starts from a clean state, clearing `LOST_CONSISTENCY`.
    pub fn assign_value(&mut self, value: V) {
        self.storage = Storage::from_value(value);
    }

    /// Replace the contents with an error.
    pub fn assign_error(&mut self, error: E) {
        self.storage = Storage::from_error(error);
    }

    /// Replace the contents with an exception.
    pub fn assign_exception(&mut self, exception: X) {
        self.storage = Storage::from_exception(exception);
    }

    /// Replace the contents with an error and an exception.
    pub fn assign_failure(&mut self, error: E, exception: X) {
        self.storage = Storage::from_error_and_exception(error, exception);
    }

    /// Exchange contents with `other`.
    ///
    /// Moving payloads cannot fail, so this never flags either side. Use
    /// [`try_swap`](Self::try_swap) for payloads with a fallible exchange.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.storage, &mut other.storage);
    }

    /// The failure parts, cloned. `None` when a value is held.
    pub fn as_failure(&self) -> Option<Failure<E, X>>
    where
        E: Clone,
        X: Clone,
    {
        if self.has_value() {
            return None;
        }
        let error = self.storage.error().cloned();
        let exception = self.storage.exception().cloned();
        (error.is_some() || exception.is_some()).then(|| Failure::from_parts(error, exception))
    }

    /// Consume into the failure parts. `None` when a value is held.
    pub fn into_failure(self) -> Option<Failure<E, X>> {
        match self.storage.into_parts() {
            (Some(_), _, _) | (None, None, None) => None,
            (None, error, exception) => Some(Failure::from_parts(error, exception)),
        }
    }
}

// ============================================================================
// Narrow access
// ============================================================================

impl<V, E, X, P> BasicOutcome<V, E, X, P>
where
    P: AccessPolicy<V, E, X>,
{
    /// The value, which the caller has verified is present.
    ///
    /// # Panics
    ///
    /// Panics if no value is held.
    pub fn assume_value(&self) -> &V {
        P::narrow_value_check(self.status());
        present(self.storage.value(), Slot::Value)
    }

    /// Mutable form of [`assume_value`](Self::assume_value).
    pub fn assume_value_mut(&mut self) -> &mut V {
        P::narrow_value_check(self.status());
        present(self.storage.value_mut(), Slot::Value)
    }

    /// The error, which the caller has verified is present.
    ///
    /// # Panics
    ///
    /// Panics if no error is held.
    pub fn assume_error(&self) -> &E {
        P::narrow_error_check(self.status());
        present(self.storage.error(), Slot::Error)
    }

    /// Mutable form of [`assume_error`](Self::assume_error).
    pub fn assume_error_mut(&mut self) -> &mut E {
        P::narrow_error_check(self.status());
        present(self.storage.error_mut(), Slot::Error)
    }

    /// The exception, which the caller has verified is present.
    ///
    /// # Panics
    ///
    /// Panics if no exception is held.
    pub fn assume_exception(&self) -> &X {
        P::narrow_exception_check(self.status());
        present(self.storage.exception(), Slot::Exception)
    }

    /// Mutable form of [`assume_exception`](Self::assume_exception).
    pub fn assume_exception_mut(&mut self) -> &mut X {
        P::narrow_exception_check(self.status());
        present(self.storage.exception_mut(), Slot::Exception)
    }
}

// ============================================================================
// Wide access
// ============================================================================

impl<V, E, X, P> BasicOutcome<V, E, X, P>
where
    P: WideAccess<V, E, X>,
{
    /// The value, or the policy's failure.
    pub fn value(&self) -> Result<&V, P::Failure> {
        P::wide_value_check(&self.storage)?;
        Ok(present(self.storage.value(), Slot::Value))
    }

    /// Mutable form of [`value`](Self::value).
    pub fn value_mut(&mut self) -> Result<&mut V, P::Failure> {
        P::wide_value_check(&self.storage)?;
        Ok(present(self.storage.value_mut(), Slot::Value))
    }

    /// Consume into the value, or the policy's failure.
    pub fn into_value(self) -> Result<V, P::Failure> {
        P::wide_value_check(&self.storage)?;
        let (value, _, _) = self.storage.into_parts();
        Ok(present(value, Slot::Value))
    }

    /// The error, or the policy's failure.
    pub fn error(&self) -> Result<&E, P::Failure> {
        P::wide_error_check(&self.storage)?;
        Ok(present(self.storage.error(), Slot::Error))
    }

    /// Mutable form of [`error`](Self::error).
    pub fn error_mut(&mut self) -> Result<&mut E, P::Failure> {
        P::wide_error_check(&self.storage)?;
        Ok(present(self.storage.error_mut(), Slot::Error))
    }

    /// Consume into the error, or the policy's failure.
    pub fn into_error(self) -> Result<E, P::Failure> {
        P::wide_error_check(&self.storage)?;
        let (_, error, _) = self.storage.into_parts();
        Ok(present(error, Slot::Error))
    }

    /// The exception, or the policy's failure.
    pub fn exception(&self) -> Result<&X, P::Failure> {
        P::wide_exception_check(&self.storage)?;
        Ok(present(self.storage.exception(), Slot::Exception))
    }

    /// Mutable form of [`exception`](Self::exception).
    pub fn exception_mut(&mut self) -> Result<&mut X, P::Failure> {
        P::wide_exception_check(&self.storage)?;
        Ok(present(self.storage.exception_mut(), Slot::Exception))
    }

    /// Consume into the exception, or the policy's failure.
    pub fn into_exception(self) -> Result<X, P::Failure> {
        P::wide_exception_check(&self.storage)?;
        let (_, _, exception) = self.storage.into_parts();
        Ok(present(exception, Slot::Exception))
    }
}

impl<V, E, P> BasicOutcome<V, E, ExceptionPtr, P>
where
    E: std::error::Error + Clone + Send + Sync + 'static,
{
    /// The failure as one re-raisable payload.
    ///
    /// Returns the exception when there is one, otherwise the error wrapped
    /// as an exception. `None` when a value is held.
    pub fn failure_exception(&self) -> Option<ExceptionPtr> {
        if let Some(exception) = self.storage.exception() {
            return Some(exception.clone());
        }
        self.storage
            .error()
            .map(|error| ExceptionPtr::from_error(error.clone()))
    }
}

impl<V, E, X, P> fmt::Debug for BasicOutcome<V, E, X, P>
where
    V: fmt::Debug,
    E: fmt::Debug,
    X: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = &self.storage;
        if !storage.status().has_lost_consistency() {
            match (storage.value(), storage.error(), storage.exception()) {
                (Some(value), None, None) => {
                    return formatter.debug_tuple("Value").field(value).finish();
                },
                (None, Some(error), None) => {
                    return formatter.debug_tuple("Error").field(error).finish();
                },
                (None, None, Some(exception)) => {
                    return formatter.debug_tuple("Exception").field(exception).finish();
                },
                (None, Some(error), Some(exception)) => {
                    return formatter
                        .debug_struct("Failure")
                        .field("error", error)
                        .field("exception", exception)
                        .finish();
                },
                _ => {},
            }
        }
        formatter
            .debug_struct("Inconsistent")
            .field("status", &storage.status())
            .finish_non_exhaustive()
    }
}

//! Two-state companion container: a value or an error, never an exception.
//!
//! Outcomes accept a [`BasicResult`] through `From`, and the two compare
//! against each other in either direction.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use outcome_shared::ErrorCode;

use crate::flags::StatusFlags;
use crate::hooks::Construction;
use crate::policy::{AccessPolicy, RethrowOnAccess, WideAccess};
use crate::storage::{Slot, Storage, present};
use crate::tagging::Success;

/// Holds a value or an error.
pub struct BasicResult<V, E = ErrorCode, P = RethrowOnAccess> {
    storage: Storage<V, E, Infallible>,
    policy: PhantomData<fn() -> P>,
}

impl<V, E, P> BasicResult<V, E, P>
where
    P: AccessPolicy<V, E, Infallible>,
{
    fn build(storage: Storage<V, E, Infallible>, how: Construction) -> Self {
        let result = Self {
            storage,
            policy: PhantomData,
        };
        P::on_construction(&result.storage, how);
        result
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

    /// The value, which the caller has verified is present.
    pub fn assume_value(&self) -> &V {
        P::narrow_value_check(self.status());
        present(self.storage.value(), Slot::Value)
    }

    /// The error, which the caller has verified is present.
    pub fn assume_error(&self) -> &E {
        P::narrow_error_check(self.status());
        present(self.storage.error(), Slot::Error)
    }
}

impl<V, E, P> BasicResult<V, E, P> {
    /// Status bits.
    pub const fn status(&self) -> StatusFlags {
        self.storage.status()
    }

    /// Returns true if a value is held.
    pub const fn has_value(&self) -> bool {
        self.storage.status().has_value()
    }

    /// Returns true if an error is held.
    pub const fn has_error(&self) -> bool {
        self.storage.status().has_error()
    }

    /// The value, if present.
    pub fn get_value(&self) -> Option<&V> {
        self.storage.value()
    }

    /// The error, if present.
    pub fn get_error(&self) -> Option<&E> {
        self.storage.error()
    }

    /// Exchange contents with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.storage, &mut other.storage);
    }

    /// Convert into a standard library result.
    pub fn into_std(self) -> Option<Result<V, E>> {
        match self.storage.into_parts() {
            (Some(value), _, _) => Some(Ok(value)),
            (None, Some(error), _) => Some(Err(error)),
            (None, None, _) => None,
        }
    }

    pub(crate) fn into_storage(self) -> Storage<V, E, Infallible> {
        self.storage
    }
}

impl<V, E, P> BasicResult<V, E, P>
where
    P: WideAccess<V, E, Infallible>,
{
    /// The value, or the policy's failure.
    pub fn value(&self) -> Result<&V, P::Failure> {
        P::wide_value_check(&self.storage)?;
        Ok(present(self.storage.value(), Slot::Value))
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
}

impl<V, E, P, T, U> From<Result<T, U>> for BasicResult<V, E, P>
where
    V: From<T>,
    E: From<U>,
    P: AccessPolicy<V, E, Infallible>,
{
    fn from(result: Result<T, U>) -> Self {
        let storage = match result {
            Ok(value) => Storage::from_value(V::from(value)),
            Err(error) => Storage::from_error(E::from(error)),
        };
        Self::build(storage, Construction::FromResult)
    }
}

impl<V, E, P, T> From<Success<T>> for BasicResult<V, E, P>
where
    V: From<T>,
    P: AccessPolicy<V, E, Infallible>,
{
    fn from(success: Success<T>) -> Self {
        Self::build(
            Storage::from_value(V::from(success.into_value())),
            Construction::Success,
        )
    }
}

impl<V: Clone, E: Clone, P> Clone for BasicResult<V, E, P> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            policy: PhantomData,
        }
    }
}

impl<V, E, P, T, U, Q> PartialEq<BasicResult<T, U, Q>> for BasicResult<V, E, P>
where
    V: PartialEq<T>,
    E: PartialEq<U>,
{
    fn eq(&self, other: &BasicResult<T, U, Q>) -> bool {
        match (self.storage.value(), other.storage.value()) {
            (Some(left), Some(right)) => left == right,
            (None, None) => match (self.storage.error(), other.storage.error()) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            },
            _ => false,
        }
    }

    #[allow(clippy::partialeq_ne_impl, reason = "payload `!=` may differ from `!(==)`")]
    fn ne(&self, other: &BasicResult<T, U, Q>) -> bool {
        match (self.storage.value(), other.storage.value()) {
            (Some(left), Some(right)) => left != right,
            (None, None) => match (self.storage.error(), other.storage.error()) {
                (Some(left), Some(right)) => left != right,
                _ => true,
            },
            _ => true,
        }
    }
}

impl<V: Eq, E: Eq, P> Eq for BasicResult<V, E, P> {}

impl<V: fmt::Debug, E: fmt::Debug, P> fmt::Debug for BasicResult<V, E, P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.storage.value(), self.storage.error()) {
            (Some(value), _) => formatter.debug_tuple("Ok").field(value).finish(),
            (None, Some(error)) => formatter.debug_tuple("Err").field(error).finish(),
            (None, None) => formatter
                .debug_struct("Inconsistent")
                .field("status", &self.status())
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::AccessError;
    use crate::tagging::success;

    type Checked<V> = BasicResult<V>;

    #[test]
    fn std_result_round_trip() {
        let ok: Checked<u32> = Ok::<u32, ErrorCode>(3).into();
        assert_eq!(ok.value(), Ok(&3));
        assert_eq!(ok.into_std(), Some(Ok(3)));

        let failed: Checked<u32> = Err::<u32, ErrorCode>(ErrorCode::io()).into();
        assert_eq!(failed.error(), Ok(&ErrorCode::io()));
        assert_eq!(
            failed.value(),
            Err(AccessError::Error(ErrorCode::io()))
        );
    }

    #[test]
    fn equality_by_state() {
        let one: Checked<u32> = success(1_u32).into();
        let failed: Checked<u32> = Checked::in_place_error(ErrorCode::io());

        assert_eq!(one, Checked::<u32>::in_place_value(1_u32));
        assert_ne!(one, failed);

        let owned: Checked<String> = success("a").into();
        let borrowed: Checked<&str> = success("a").into();
        assert!(owned == borrowed);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut left: Checked<u32> = Checked::in_place_value(1_u32);
        let mut right: Checked<u32> = Checked::in_place_error(ErrorCode::timeout());

        left.swap(&mut right);

        assert_eq!(left.assume_error(), &ErrorCode::timeout());
        assert_eq!(right.assume_value(), &1);
    }
}

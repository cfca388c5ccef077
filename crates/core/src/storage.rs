//! Slot storage shared by [`BasicOutcome`](crate::BasicOutcome) and
//! [`BasicResult`](crate::BasicResult).
//!
//! The status bits and the slots move together through every operation here.
//! Under `LOST_CONSISTENCY` the bits may stop describing the slots; the read
//! accessors trust the bits, so a masked payload is never observed.

use std::convert::Infallible;
use std::fmt;

use crate::flags::StatusFlags;

/// One of the three payload slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Successful payload.
    Value,
    /// Structured error payload.
    Error,
    /// Opaque exception payload.
    Exception,
}

impl Slot {
    /// Lowercase slot name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Error => "error",
            Self::Exception => "exception",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Payload slots plus the status bits that describe them.
#[derive(Debug, Clone)]
pub struct Storage<V, E, X> {
    pub(crate) value: Option<V>,
    pub(crate) error: Option<E>,
    pub(crate) exception: Option<X>,
    pub(crate) status: StatusFlags,
}

impl<V, E, X> Storage<V, E, X> {
    pub(crate) const fn from_value(value: V) -> Self {
        Self {
            value: Some(value),
            error: None,
            exception: None,
            status: StatusFlags::HAS_VALUE,
        }
    }

    pub(crate) const fn from_error(error: E) -> Self {
        Self {
            value: None,
            error: Some(error),
            exception: None,
            status: StatusFlags::HAS_ERROR,
        }
    }

    pub(crate) const fn from_exception(exception: X) -> Self {
        Self {
            value: None,
            error: None,
            exception: Some(exception),
            status: StatusFlags::HAS_EXCEPTION,
        }
    }

    pub(crate) const fn from_error_and_exception(error: E, exception: X) -> Self {
        Self {
            value: None,
            error: Some(error),
            exception: Some(exception),
            status: StatusFlags::HAS_ERROR.union(StatusFlags::HAS_EXCEPTION),
        }
    }

    /// Build from failure slots, deriving the bits from what is present.
    pub(crate) fn from_failure_parts(error: Option<E>, exception: Option<X>) -> Self {
        let mut status = StatusFlags::EMPTY;
        status.set(StatusFlags::HAS_ERROR, error.is_some());
        status.set(StatusFlags::HAS_EXCEPTION, exception.is_some());
        Self {
            value: None,
            error,
            exception,
            status,
        }
    }

    /// Status bits.
    #[must_use]
    pub const fn status(&self) -> StatusFlags {
        self.status
    }

    /// The value, when the value bit is set.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.status.has_value().then_some(self.value.as_ref()).flatten()
    }

    /// The error, when the error bit is set.
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        self.status.has_error().then_some(self.error.as_ref()).flatten()
    }

    /// The exception, when the exception bit is set.
    #[must_use]
    pub fn exception(&self) -> Option<&X> {
        self.status
            .has_exception()
            .then_some(self.exception.as_ref())
            .flatten()
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        self.status.has_value().then_some(self.value.as_mut()).flatten()
    }

    pub(crate) fn error_mut(&mut self) -> Option<&mut E> {
        self.status.has_error().then_some(self.error.as_mut()).flatten()
    }

    pub(crate) fn exception_mut(&mut self) -> Option<&mut X> {
        self.status
            .has_exception()
            .then_some(self.exception.as_mut())
            .flatten()
    }

    /// Consume into the slots the bits vouch for.
    pub(crate) fn into_parts(self) -> (Option<V>, Option<E>, Option<X>) {
        let status = self.status;
        (
            self.value.filter(|_| status.has_value()),
            self.error.filter(|_| status.has_error()),
            self.exception.filter(|_| status.has_exception()),
        )
    }

    /// Convert every payload, carrying the bits over unchanged.
    pub(crate) fn convert<T, U, W>(self) -> Storage<T, U, W>
    where
        T: From<V>,
        U: From<E>,
        W: From<X>,
    {
        Storage {
            value: self.value.map(T::from),
            error: self.error.map(U::from),
            exception: self.exception.map(W::from),
            status: self.status,
        }
    }

    /// Clone-convert every payload, carrying the bits over unchanged.
    pub(crate) fn convert_ref<T, U, W>(&self) -> Storage<T, U, W>
    where
        V: Clone,
        E: Clone,
        X: Clone,
        T: From<V>,
        U: From<E>,
        W: From<X>,
    {
        Storage {
            value: self.value.clone().map(T::from),
            error: self.error.clone().map(U::from),
            exception: self.exception.clone().map(W::from),
            status: self.status,
        }
    }

    /// Replace the exception slot and set its bit.
    ///
    /// A held value is dropped so the container never reports a value next
    /// to a failure.
    pub(crate) fn set_exception(&mut self, exception: X) {
        self.exception = Some(exception);
        self.status.insert(StatusFlags::HAS_EXCEPTION);
        if self.status.has_value() {
            self.value = None;
            self.status.remove(StatusFlags::HAS_VALUE);
        }
    }
}

impl<V, E> Storage<V, E, Infallible> {
    /// Re-type a storage that can never hold an exception.
    pub(crate) fn widen<W>(self) -> Storage<V, E, W> {
        Storage {
            value: self.value,
            error: self.error,
            exception: None,
            status: self.status,
        }
    }
}

/// Unwrap a slot whose presence the caller already checked.
pub(crate) fn present<T>(slot: Option<T>, which: Slot) -> T {
    match slot {
        Some(payload) => payload,
        None => unreachable!("access to an absent {which} slot"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Cell = Storage<u32, String, char>;

    #[test]
    fn constructors_set_matching_bits() {
        assert_eq!(Cell::from_value(1).status(), StatusFlags::HAS_VALUE);
        assert_eq!(Cell::from_error("e".into()).status(), StatusFlags::HAS_ERROR);
        assert_eq!(Cell::from_exception('x').status(), StatusFlags::HAS_EXCEPTION);
        assert_eq!(
            Cell::from_error_and_exception("e".into(), 'x').status(),
            StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION
        );
    }

    #[test]
    fn failure_parts_derive_bits_from_presence() {
        let exception_only = Cell::from_failure_parts(None, Some('x'));

        assert_eq!(exception_only.status(), StatusFlags::HAS_EXCEPTION);
        assert_eq!(exception_only.exception(), Some(&'x'));
        assert_eq!(exception_only.error(), None);
    }

    #[test]
    fn accessors_trust_bits_over_slots() {
        let mut cell = Cell::from_value(9);
        cell.error = Some("stale".into());

        assert_eq!(cell.error(), None);
        assert_eq!(cell.value(), Some(&9));

        cell.status.remove(StatusFlags::HAS_VALUE);
        assert_eq!(cell.value(), None);
        assert_eq!(cell.into_parts(), (None, None, None));
    }

    #[test]
    fn set_exception_drops_value() {
        let mut cell = Cell::from_value(3);
        cell.set_exception('x');

        assert_eq!(cell.status(), StatusFlags::HAS_EXCEPTION);
        assert_eq!(cell.value, None);

        let mut failed = Cell::from_error("e".into());
        failed.set_exception('y');
        assert_eq!(
            failed.status(),
            StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION
        );
    }

    #[test]
    fn convert_keeps_bits() {
        let mut cell = Storage::<u8, &str, char>::from_error("bad");
        cell.status.insert(StatusFlags::LOST_CONSISTENCY);

        let widened: Storage<u64, String, char> = cell.convert();
        assert_eq!(
            widened.status(),
            StatusFlags::HAS_ERROR | StatusFlags::LOST_CONSISTENCY
        );
        assert_eq!(widened.error().map(String::as_str), Some("bad"));
    }

    #[test]
    fn slot_names() {
        assert_eq!(Slot::Value.to_string(), "value");
        assert_eq!(Slot::Exception.as_str(), "exception");
    }
}

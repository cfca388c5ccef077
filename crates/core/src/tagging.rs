//! Success and failure wrappers.
//!
//! Wrapping a payload names its destination explicitly, which sidesteps the
//! implicit-construction rules entirely.

/// A value destined for the value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Success<T>(pub T);

impl<T> Success<T> {
    /// Borrow the wrapped value.
    pub const fn value(&self) -> &T {
        &self.0
    }

    /// Unwrap the value.
    pub fn into_value(self) -> T {
        self.0
    }
}

/// Wrap a value for the value slot.
pub const fn success<T>(value: T) -> Success<T> {
    Success(value)
}

/// An error, an exception, or both, destined for the failure slots.
///
/// At least one part is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Failure<E, X> {
    error: Option<E>,
    exception: Option<X>,
}

impl<E, X> Failure<E, X> {
    /// Error-only failure.
    pub const fn from_error(error: E) -> Self {
        Self {
            error: Some(error),
            exception: None,
        }
    }

    /// Exception-only failure.
    pub const fn from_exception(exception: X) -> Self {
        Self {
            error: None,
            exception: Some(exception),
        }
    }

    /// Error and exception together.
    pub const fn new(error: E, exception: X) -> Self {
        Self {
            error: Some(error),
            exception: Some(exception),
        }
    }

    /// The error part, if any.
    pub const fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// The exception part, if any.
    pub const fn exception(&self) -> Option<&X> {
        self.exception.as_ref()
    }

    /// Returns true if an error is present.
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if an exception is present.
    pub const fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// Split into the two optional parts.
    pub fn into_parts(self) -> (Option<E>, Option<X>) {
        (self.error, self.exception)
    }

    pub(crate) const fn from_parts(error: Option<E>, exception: Option<X>) -> Self {
        Self { error, exception }
    }
}

/// Wrap an error for the failure slots.
pub const fn failure<E, X>(error: E) -> Failure<E, X> {
    Failure::from_error(error)
}

/// Wrap an error and an exception for the failure slots.
pub const fn failure_with_exception<E, X>(error: E, exception: X) -> Failure<E, X> {
    Failure::new(error, exception)
}

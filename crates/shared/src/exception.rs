//! Opaque, re-raisable failure payloads.
//!
//! An [`ExceptionPtr`] captures an abnormal condition (usually a panic
//! payload) so it can travel through ordinary return values and be raised
//! again later with [`Rethrow::rethrow`].

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

struct Payload {
    message: Option<Box<str>>,
    inner: Mutex<Box<dyn Any + Send>>,
}

/// Shared handle to a captured abnormal condition.
///
/// Clones share the same payload. Two handles are equal only when they refer
/// to the same captured payload (or are both null), mirroring pointer
/// identity rather than payload contents.
#[derive(Clone, Default)]
pub struct ExceptionPtr(Option<Arc<Payload>>);

impl ExceptionPtr {
    /// A handle that refers to no payload.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// Wrap an arbitrary payload object.
    pub fn new<T: Any + Send>(payload: T) -> Self {
        Self::from_panic(Box::new(payload))
    }

    /// Wrap a structured error as an opaque payload, keeping its message.
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = error.to_string().into_boxed_str();
        Self(Some(Arc::new(Payload {
            message: Some(message),
            inner: Mutex::new(Box::new(error)),
        })))
    }

    /// Adopt a payload produced by unwinding.
    ///
    /// A payload raised by [`Rethrow::rethrow`] is unwrapped back into the
    /// original handle, so identity survives a raise/capture round trip.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<Self>() {
            Ok(original) => *original,
            Err(payload) => {
                let message = panic_message(&*payload);
                Self(Some(Arc::new(Payload {
                    message,
                    inner: Mutex::new(payload),
                })))
            },
        }
    }

    /// Run `op`, converting a panic into a captured payload.
    pub fn catch<R>(op: impl FnOnce() -> R) -> Result<R, Self> {
        panic::catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
            let captured = Self::from_panic(payload);
            tracing::debug!(
                payload = captured.message().unwrap_or("<opaque>"),
                "captured panic as exception payload"
            );
            captured
        })
    }

    /// Returns true if the handle refers to no payload.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Human-readable message, when the payload carried one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0
            .as_ref()
            .and_then(|payload| payload.message.as_deref())
    }

    /// Returns true if the payload is of type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.with_payload(|_: &T| ()).is_some()
    }

    /// Inspect the payload as `T`, if it has that type.
    pub fn with_payload<T: Any, R>(&self, inspect: impl FnOnce(&T) -> R) -> Option<R> {
        let payload = self.0.as_ref()?;
        let guard = payload
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let any: &(dyn Any + Send) = &**guard;
        any.downcast_ref::<T>().map(inspect)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<Box<str>> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return Some((*message).into());
    }
    payload
        .downcast_ref::<String>()
        .map(|message| message.as_str().into())
}

impl PartialEq for ExceptionPtr {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for ExceptionPtr {}

impl fmt::Debug for ExceptionPtr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.0, self.message()) {
            (None, _) => formatter.write_str("ExceptionPtr(null)"),
            (Some(_), Some(message)) => write!(formatter, "ExceptionPtr({message:?})"),
            (Some(_), None) => formatter.write_str("ExceptionPtr(<opaque>)"),
        }
    }
}

impl fmt::Display for ExceptionPtr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.0, self.message()) {
            (None, _) => formatter.write_str("null exception"),
            (Some(_), Some(message)) => formatter.write_str(message),
            (Some(_), None) => formatter.write_str("opaque exception"),
        }
    }
}

/// Payloads that can be raised again through unwinding.
pub trait Rethrow {
    /// Resume unwinding with this payload.
    fn rethrow(&self) -> !;
}

impl Rethrow for ExceptionPtr {
    fn rethrow(&self) -> ! {
        panic::resume_unwind(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[derive(Debug, PartialEq)]
    struct DiskFull(u64);

    #[test]
    fn catch_captures_panic_message() {
        let captured = ExceptionPtr::catch(|| -> u32 { panic!("disk on fire") });
        let Err(exception) = captured else {
            unreachable!("closure always panics");
        };

        assert!(!exception.is_null());
        assert_eq!(exception.message(), Some("disk on fire"));
    }

    #[test]
    fn catch_passes_through_normal_return() {
        assert_eq!(ExceptionPtr::catch(|| 7), Ok(7));
    }

    #[test]
    fn rethrow_preserves_identity() {
        let original = ExceptionPtr::new(DiskFull(512));
        let recaptured = ExceptionPtr::catch(|| -> u8 { original.rethrow() });

        assert_eq!(recaptured, Err(original.clone()));
        assert_eq!(original.with_payload(|full: &DiskFull| full.0), Some(512));
    }

    #[test]
    fn equality_is_identity_not_contents() {
        let first = ExceptionPtr::new(DiskFull(1));
        let second = ExceptionPtr::new(DiskFull(1));

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_eq!(ExceptionPtr::null(), ExceptionPtr::default());
        assert_ne!(first, ExceptionPtr::null());
    }

    #[test]
    fn from_error_keeps_message_and_payload() {
        let exception = ExceptionPtr::from_error(ErrorCode::not_found());

        assert_eq!(exception.message(), Some("core:not_found"));
        assert!(exception.is::<ErrorCode>());
        assert_eq!(exception.to_string(), "core:not_found");
    }

    #[test]
    fn debug_formats_null_and_message() {
        assert_eq!(format!("{:?}", ExceptionPtr::null()), "ExceptionPtr(null)");
        assert_eq!(
            format!("{:?}", ExceptionPtr::new("boom")),
            "ExceptionPtr(\"boom\")"
        );
    }
}

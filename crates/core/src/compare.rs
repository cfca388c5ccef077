//! Equality across outcomes, failure wrappers, and results.
//!
//! Two containers compare equal only when they are in the same state and the
//! populated payloads compare equal. A value never equals a failure, and an
//! error-only failure never equals a compound one. `!=` is decided per state
//! as well, so payloads with an independent inequality are honored.

use crate::outcome::BasicOutcome;
use crate::result::BasicResult;
use crate::storage::Storage;
use crate::tagging::Failure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Value,
    Error,
    Exception,
    Compound,
    Empty,
}

const fn shape(value: bool, error: bool, exception: bool) -> Shape {
    match (value, error, exception) {
        (true, _, _) => Shape::Value,
        (false, true, true) => Shape::Compound,
        (false, true, false) => Shape::Error,
        (false, false, true) => Shape::Exception,
        (false, false, false) => Shape::Empty,
    }
}

fn storage_shape<V, E, X>(storage: &Storage<V, E, X>) -> Shape {
    let status = storage.status();
    shape(status.has_value(), status.has_error(), status.has_exception())
}

fn slot_eq<A: PartialEq<B>, B>(left: Option<&A>, right: Option<&B>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left == right,
        (None, None) => true,
        _ => false,
    }
}

fn slot_ne<A: PartialEq<B>, B>(left: Option<&A>, right: Option<&B>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => left != right,
        (None, None) => false,
        _ => true,
    }
}

impl<V, E, X, P, T, U, W, Q> PartialEq<BasicOutcome<T, U, W, Q>> for BasicOutcome<V, E, X, P>
where
    V: PartialEq<T>,
    E: PartialEq<U>,
    X: PartialEq<W>,
{
    fn eq(&self, other: &BasicOutcome<T, U, W, Q>) -> bool {
        let (left, right) = (self.storage(), other.storage());
        let kind = storage_shape(left);
        if kind != storage_shape(right) {
            return false;
        }
        match kind {
            Shape::Value => slot_eq(left.value(), right.value()),
            Shape::Error => slot_eq(left.error(), right.error()),
            Shape::Exception => slot_eq(left.exception(), right.exception()),
            Shape::Compound => {
                slot_eq(left.error(), right.error())
                    && slot_eq(left.exception(), right.exception())
            },
            Shape::Empty => false,
        }
    }

    #[allow(clippy::partialeq_ne_impl, reason = "payload `!=` may differ from `!(==)`")]
    fn ne(&self, other: &BasicOutcome<T, U, W, Q>) -> bool {
        let (left, right) = (self.storage(), other.storage());
        let kind = storage_shape(left);
        if kind != storage_shape(right) {
            return true;
        }
        match kind {
            Shape::Value => slot_ne(left.value(), right.value()),
            Shape::Error => slot_ne(left.error(), right.error()),
            Shape::Exception => slot_ne(left.exception(), right.exception()),
            Shape::Compound => {
                slot_ne(left.error(), right.error())
                    || slot_ne(left.exception(), right.exception())
            },
            Shape::Empty => true,
        }
    }
}

impl<V: Eq, E: Eq, X: Eq, P> Eq for BasicOutcome<V, E, X, P> {}

fn failure_shape<U, W>(failure: &Failure<U, W>) -> Shape {
    shape(false, failure.has_error(), failure.has_exception())
}

impl<V, E, X, P, U, W> PartialEq<Failure<U, W>> for BasicOutcome<V, E, X, P>
where
    E: PartialEq<U>,
    X: PartialEq<W>,
{
    fn eq(&self, other: &Failure<U, W>) -> bool {
        let storage = self.storage();
        let kind = storage_shape(storage);
        if kind != failure_shape(other) {
            return false;
        }
        match kind {
            Shape::Error => slot_eq(storage.error(), other.error()),
            Shape::Exception => slot_eq(storage.exception(), other.exception()),
            Shape::Compound => {
                slot_eq(storage.error(), other.error())
                    && slot_eq(storage.exception(), other.exception())
            },
            Shape::Value | Shape::Empty => false,
        }
    }

    #[allow(clippy::partialeq_ne_impl, reason = "payload `!=` may differ from `!(==)`")]
    fn ne(&self, other: &Failure<U, W>) -> bool {
        let storage = self.storage();
        let kind = storage_shape(storage);
        if kind != failure_shape(other) {
            return true;
        }
        match kind {
            Shape::Error => slot_ne(storage.error(), other.error()),
            Shape::Exception => slot_ne(storage.exception(), other.exception()),
            Shape::Compound => {
                slot_ne(storage.error(), other.error())
                    || slot_ne(storage.exception(), other.exception())
            },
            Shape::Value | Shape::Empty => true,
        }
    }
}

fn result_shape<T, U, Q>(result: &BasicResult<T, U, Q>) -> Shape {
    shape(result.has_value(), result.has_error(), false)
}

impl<V, E, X, P, T, U, Q> PartialEq<BasicResult<T, U, Q>> for BasicOutcome<V, E, X, P>
where
    V: PartialEq<T>,
    E: PartialEq<U>,
{
    fn eq(&self, other: &BasicResult<T, U, Q>) -> bool {
        let storage = self.storage();
        let kind = storage_shape(storage);
        if kind != result_shape(other) {
            return false;
        }
        match kind {
            Shape::Value => slot_eq(storage.value(), other.get_value()),
            Shape::Error => slot_eq(storage.error(), other.get_error()),
            Shape::Exception | Shape::Compound | Shape::Empty => false,
        }
    }

    #[allow(clippy::partialeq_ne_impl, reason = "payload `!=` may differ from `!(==)`")]
    fn ne(&self, other: &BasicResult<T, U, Q>) -> bool {
        let storage = self.storage();
        let kind = storage_shape(storage);
        if kind != result_shape(other) {
            return true;
        }
        match kind {
            Shape::Value => slot_ne(storage.value(), other.get_value()),
            Shape::Error => slot_ne(storage.error(), other.get_error()),
            Shape::Exception | Shape::Compound | Shape::Empty => true,
        }
    }
}

impl<T, U, Q, V, E, X, P> PartialEq<BasicOutcome<V, E, X, P>> for BasicResult<T, U, Q>
where
    V: PartialEq<T>,
    E: PartialEq<U>,
{
    fn eq(&self, other: &BasicOutcome<V, E, X, P>) -> bool {
        other == self
    }

    #[allow(clippy::partialeq_ne_impl, reason = "payload `!=` may differ from `!(==)`")]
    fn ne(&self, other: &BasicOutcome<V, E, X, P>) -> bool {
        other != self
    }
}

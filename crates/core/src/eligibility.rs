//! Which inputs may build an outcome without naming a slot.
//!
//! [`BasicOutcome::new`](crate::BasicOutcome::new) accepts any input that
//! converts into exactly one of the three slots. When an input converts into
//! two slots the trait solver finds two candidate [`IntoSlot`] impls and
//! rejects the call as ambiguous. The whole implicit surface also disappears
//! when any payload type converts into another, since
//! [`DisjointPayloads`] cannot be proven for such a triple.
//!
//! ```
//! use outcome_core::{ErrorCode, Outcome};
//!
//! let ok: Outcome<u32> = Outcome::new(42_u32);
//! assert!(ok.has_value());
//!
//! let failed: Outcome<u32> = Outcome::new(ErrorCode::not_found());
//! assert!(failed.has_error());
//! ```
//!
//! Identical value and error types leave no implicit constructor:
//!
//! ```compile_fail
//! use outcome_core::Outcome;
//!
//! let ambiguous: Outcome<u32, u32> = Outcome::new(1_u32);
//! ```
//!
//! `ErrorCode` converts into `Box<dyn Error>`, so this triple rejects even an
//! input that only fits the value slot:
//!
//! ```compile_fail
//! use std::error::Error;
//! use outcome_core::{ErrorCode, Outcome};
//!
//! let boxed: Box<dyn Error> = "opaque".into();
//! let rejected: Outcome<Box<dyn Error>, ErrorCode> = Outcome::new(boxed);
//! ```
//!
//! The targeted constructors stay available for every triple:
//!
//! ```
//! use outcome_core::{BasicOutcome, ExceptionPtr};
//!
//! let value = BasicOutcome::<u32, u32, ExceptionPtr>::in_place_value(7_u32);
//! let error = BasicOutcome::<u32, u32, ExceptionPtr>::in_place_error(7_u32);
//!
//! assert!(value.has_value());
//! assert!(error.has_error());
//! assert_ne!(value, error);
//! ```
//!
//! Argument tuples follow the same rule. Two slots accepting the same
//! arguments make the untargeted form ambiguous:
//!
//! ```compile_fail
//! use outcome_core::{BasicOutcome, ExceptionPtr};
//!
//! struct Point(u8, u8);
//! struct Span(u8, u8);
//!
//! impl From<(u8, u8)> for Point {
//!     fn from((x, y): (u8, u8)) -> Self {
//!         Self(x, y)
//!     }
//! }
//!
//! impl From<(u8, u8)> for Span {
//!     fn from((start, end): (u8, u8)) -> Self {
//!         Self(start, end)
//!     }
//! }
//!
//! let _ = BasicOutcome::<Point, Span, ExceptionPtr>::new((1_u8, 2_u8));
//! ```

use crate::storage::{Slot, Storage};

mod sealed {
    /// Proof that an input lands in the value slot.
    pub enum ToValue {}
    /// Proof that an input lands in the error slot.
    pub enum ToError {}
    /// Proof that an input lands in the exception slot.
    pub enum ToException {}
    /// Proof that no conversion was required.
    pub enum Unrelated {}
    /// Proof that a conversion exists.
    pub enum Converts {}
}

/// Conversion of an input into exactly one slot.
///
/// `Target` is inferred; callers never name it. An input accepted by more
/// than one slot leaves `Target` ambiguous and the call does not compile.
pub trait IntoSlot<V, E, X, Target> {
    /// The slot this input lands in.
    const SLOT: Slot;

    /// Build storage holding the converted input.
    fn into_storage(self) -> Storage<V, E, X>;
}

impl<V, E, X, T> IntoSlot<V, E, X, sealed::ToValue> for T
where
    V: From<T>,
{
    const SLOT: Slot = Slot::Value;

    fn into_storage(self) -> Storage<V, E, X> {
        Storage::from_value(V::from(self))
    }
}

impl<V, E, X, T> IntoSlot<V, E, X, sealed::ToError> for T
where
    E: From<T>,
{
    const SLOT: Slot = Slot::Error;

    fn into_storage(self) -> Storage<V, E, X> {
        Storage::from_error(E::from(self))
    }
}

impl<V, E, X, T> IntoSlot<V, E, X, sealed::ToException> for T
where
    X: From<T>,
{
    const SLOT: Slot = Slot::Exception;

    fn into_storage(self) -> Storage<V, E, X> {
        Storage::from_exception(X::from(self))
    }
}

/// Holds only when `Self` does not convert into `T`.
///
/// Every type satisfies the `Unrelated` impl; types that also convert satisfy
/// the `Converts` impl, which leaves `Proof` ambiguous.
pub trait NotInto<T, Proof> {}

impl<S, T> NotInto<T, sealed::Unrelated> for S {}

impl<S, T> NotInto<T, sealed::Converts> for S where S: Into<T> {}

/// Holds for a `(V, E, X)` triple in which no type converts into another.
pub trait DisjointPayloads<Proof> {}

impl<V, E, X, A, B, C, D, F, G> DisjointPayloads<(A, B, C, D, F, G)> for (V, E, X)
where
    V: NotInto<E, A> + NotInto<X, B>,
    E: NotInto<V, C> + NotInto<X, D>,
    X: NotInto<V, F> + NotInto<E, G>,
{
}

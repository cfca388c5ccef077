//! Fallible payload exchange.
//!
//! Moving a payload never fails, so [`BasicOutcome::swap`] is always safe.
//! Some payloads exchange through their own logic instead (a handle that
//! must renegotiate ownership, a buffer that re-registers itself) and can
//! fail partway. [`TrySwap`] models that exchange, and
//! [`BasicOutcome::try_swap`] exchanges two containers with the strongest
//! guarantee the payload types allow:
//!
//! 1. When every payload type exchanges infallibly, the containers are
//!    exchanged directly.
//! 2. Otherwise the exception slots go first, as a strong exchange. If that
//!    fails the containers are untouched, unless the payload reported its
//!    operands clobbered.
//! 3. The value and error slots follow. If that step fails, the exception
//!    slots are swapped back and each side is repaired so no container ever
//!    reports a value next to a failure, or nothing at all.
//!
//! Any side that could not be fully restored carries `LOST_CONSISTENCY`.

use std::fmt;
use std::mem;

use outcome_shared::{ErrorCode, ExceptionPtr};
use thiserror::Error;

use crate::flags::StatusFlags;
use crate::outcome::BasicOutcome;
use crate::storage::Storage;

/// What a failed exchange left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDamage {
    /// Both operands hold exactly what they held before the attempt.
    Restored,
    /// The operands may hold anything.
    Clobbered,
}

impl fmt::Display for SwapDamage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Restored => "operands restored",
            Self::Clobbered => "operands clobbered",
        })
    }
}

/// A payload exchange that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("payload swap failed ({damage}): {reason}")]
pub struct SwapError {
    reason: Box<str>,
    damage: SwapDamage,
}

impl SwapError {
    /// Failure that left both operands as they were.
    pub fn restored(reason: impl Into<Box<str>>) -> Self {
        Self {
            reason: reason.into(),
            damage: SwapDamage::Restored,
        }
    }

    /// Failure that left the operands in an unknown state.
    pub fn clobbered(reason: impl Into<Box<str>>) -> Self {
        Self {
            reason: reason.into(),
            damage: SwapDamage::Clobbered,
        }
    }

    /// Why the exchange failed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// What the failure left behind.
    #[must_use]
    pub const fn damage(&self) -> SwapDamage {
        self.damage
    }

    /// Returns true if the operands were left untouched.
    #[must_use]
    pub const fn is_restored(&self) -> bool {
        matches!(self.damage, SwapDamage::Restored)
    }
}

/// Payloads with their own, possibly failing, exchange.
pub trait TrySwap {
    /// Set when [`try_swap`](Self::try_swap) can never fail.
    const INFALLIBLE: bool = false;

    /// Exchange contents with `other`.
    ///
    /// On failure the returned error says whether the operands were
    /// restored.
    fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError>;
}

macro_rules! infallible_swap {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TrySwap for $ty {
                const INFALLIBLE: bool = true;

                fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
                    mem::swap(self, other);
                    Ok(())
                }
            }
        )*
    };
}

infallible_swap!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    ErrorCode,
    ExceptionPtr,
    std::io::ErrorKind,
);

impl<T> TrySwap for Vec<T> {
    const INFALLIBLE: bool = true;

    fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
        mem::swap(self, other);
        Ok(())
    }
}

impl<T: ?Sized> TrySwap for Box<T> {
    const INFALLIBLE: bool = true;

    fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
        mem::swap(self, other);
        Ok(())
    }
}

/// Exchange `left` and `right` so that failure leaves them as they were,
/// unless the payload itself reports [`SwapDamage::Clobbered`].
pub fn strong_swap<T: TrySwap>(left: &mut T, right: &mut T) -> Result<(), SwapError> {
    if T::INFALLIBLE {
        mem::swap(left, right);
        return Ok(());
    }
    left.try_swap(right)
}

/// Exchange two optional slots. Only two present payloads go through the
/// payload's own exchange; anything else is a plain move.
fn swap_slot<T>(
    left: &mut Option<T>,
    right: &mut Option<T>,
    exchange: impl FnOnce(&mut T, &mut T) -> Result<(), SwapError>,
) -> Result<(), SwapError> {
    if let (Some(left), Some(right)) = (left.as_mut(), right.as_mut()) {
        return exchange(left, right);
    }
    mem::swap(left, right);
    Ok(())
}

fn swap_bit(left: &mut StatusFlags, right: &mut StatusFlags, bit: StatusFlags) {
    let (had_left, had_right) = (left.contains(bit), right.contains(bit));
    left.set(bit, had_right);
    right.set(bit, had_left);
}

fn swap_exceptions<V, E, X: TrySwap>(
    left: &mut Storage<V, E, X>,
    right: &mut Storage<V, E, X>,
) -> Result<(), SwapError> {
    swap_slot(&mut left.exception, &mut right.exception, strong_swap)?;
    swap_bit(
        &mut left.status,
        &mut right.status,
        StatusFlags::HAS_EXCEPTION,
    );
    Ok(())
}

fn swap_values_and_errors<V: TrySwap, E: TrySwap, X>(
    left: &mut Storage<V, E, X>,
    right: &mut Storage<V, E, X>,
) -> Result<(), SwapError> {
    swap_slot(&mut left.value, &mut right.value, V::try_swap)?;
    swap_bit(&mut left.status, &mut right.status, StatusFlags::HAS_VALUE);
    swap_slot(&mut left.error, &mut right.error, E::try_swap)?;
    swap_bit(&mut left.status, &mut right.status, StatusFlags::HAS_ERROR);
    Ok(())
}

fn mark_lost<V, E, X>(left: &mut Storage<V, E, X>, right: &mut Storage<V, E, X>) {
    left.status.insert(StatusFlags::LOST_CONSISTENCY);
    right.status.insert(StatusFlags::LOST_CONSISTENCY);
}

/// Restore the rule that a value never sits next to a failure, and that
/// something is always present. Returns true if anything had to change.
pub(crate) fn repair<V, E, X>(storage: &mut Storage<V, E, X>) -> bool {
    let status = storage.status;
    if status.has_value() && status.has_failure() {
        storage
            .status
            .remove(StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION);
        storage.status.insert(StatusFlags::LOST_CONSISTENCY);
        return true;
    }
    if !status.has_value() && !status.has_failure() {
        // No slot survived; report an error so the container is not empty.
        storage
            .status
            .insert(StatusFlags::HAS_ERROR | StatusFlags::LOST_CONSISTENCY);
        return true;
    }
    false
}

pub(crate) fn exchange<V, E, X>(
    left: &mut Storage<V, E, X>,
    right: &mut Storage<V, E, X>,
) -> Result<(), SwapError>
where
    V: TrySwap,
    E: TrySwap,
    X: TrySwap,
{
    if V::INFALLIBLE && E::INFALLIBLE && X::INFALLIBLE {
        mem::swap(left, right);
        return Ok(());
    }

    if let Err(error) = swap_exceptions(left, right) {
        if !error.is_restored() {
            tracing::warn!(%error, "exception exchange clobbered both outcomes");
            mark_lost(left, right);
        }
        return Err(error);
    }

    let Err(error) = swap_values_and_errors(left, right) else {
        return Ok(());
    };

    if let Err(rollback) = swap_exceptions(left, right) {
        tracing::warn!(%error, %rollback, "exception rollback failed after value/error exchange failure");
        mark_lost(left, right);
    }

    let repaired_left = repair(left);
    let repaired_right = repair(right);
    if repaired_left || repaired_right || !error.is_restored() {
        tracing::warn!(%error, "outcome swap lost consistency");
        mark_lost(left, right);
    }
    Err(error)
}

impl<V, E, X, P> BasicOutcome<V, E, X, P>
where
    V: TrySwap,
    E: TrySwap,
    X: TrySwap,
{
    /// Exchange contents through the payloads' own [`TrySwap`].
    ///
    /// On error both containers are either restored or flagged with
    /// `LOST_CONSISTENCY`; see the [module docs](self).
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
        exchange(self.storage_mut(), other.storage_mut())
    }
}

impl<V, E, X, P> TrySwap for BasicOutcome<V, E, X, P>
where
    V: TrySwap,
    E: TrySwap,
    X: TrySwap,
{
    const INFALLIBLE: bool = V::INFALLIBLE && E::INFALLIBLE && X::INFALLIBLE;

    fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
        exchange(self.storage_mut(), other.storage_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::OutcomeState;
    use tracing_test::traced_test;

    /// Payload whose exchange always fails with the configured damage.
    #[derive(Debug, Clone, PartialEq)]
    struct Stubborn {
        id: u8,
        damage: Option<SwapDamage>,
    }

    impl Stubborn {
        const fn ok(id: u8) -> Self {
            Self { id, damage: None }
        }

        const fn failing(id: u8, damage: SwapDamage) -> Self {
            Self {
                id,
                damage: Some(damage),
            }
        }
    }

    impl TrySwap for Stubborn {
        fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
            match self.damage.or(other.damage) {
                None => {
                    mem::swap(self, other);
                    Ok(())
                },
                Some(SwapDamage::Restored) => Err(SwapError::restored("refused")),
                Some(SwapDamage::Clobbered) => {
                    self.id = other.id;
                    Err(SwapError::clobbered("half done"))
                },
            }
        }
    }

    type Cell = Storage<Stubborn, ErrorCode, Stubborn>;

    #[test]
    fn swap_error_display() {
        assert_eq!(
            SwapError::restored("busy").to_string(),
            "payload swap failed (operands restored): busy"
        );
        assert!(!SwapError::clobbered("x").is_restored());
    }

    #[test]
    fn infallible_payloads_swap_directly() {
        let mut left = Storage::<u32, ErrorCode, ExceptionPtr>::from_value(1);
        let mut right = Storage::<u32, ErrorCode, ExceptionPtr>::from_error(ErrorCode::io());

        assert_eq!(exchange(&mut left, &mut right), Ok(()));
        assert_eq!(left.error(), Some(&ErrorCode::io()));
        assert_eq!(right.value(), Some(&1));
    }

    #[test]
    fn fallible_payloads_swap_slot_by_slot() {
        let mut left = Cell::from_value(Stubborn::ok(1));
        let mut right = Cell::from_error_and_exception(ErrorCode::io(), Stubborn::ok(2));

        assert_eq!(exchange(&mut left, &mut right), Ok(()));
        assert_eq!(left.status().state(), OutcomeState::ErrorAndException);
        assert_eq!(left.exception(), Some(&Stubborn::ok(2)));
        assert_eq!(right.value(), Some(&Stubborn::ok(1)));
    }

    #[test]
    fn restored_value_failure_leaves_both_untouched() {
        let mut left = Cell::from_value(Stubborn::failing(1, SwapDamage::Restored));
        let mut right = Cell::from_value(Stubborn::ok(2));

        let error = exchange(&mut left, &mut right);

        assert!(error.is_err_and(|error| error.is_restored()));
        assert_eq!(left.status(), StatusFlags::HAS_VALUE);
        assert_eq!(right.status(), StatusFlags::HAS_VALUE);
        assert_eq!(left.value().map(|v| v.id), Some(1));
        assert_eq!(right.value().map(|v| v.id), Some(2));
    }

    #[test]
    #[traced_test]
    fn clobbered_value_failure_marks_both() {
        let mut left = Cell::from_value(Stubborn::failing(1, SwapDamage::Clobbered));
        let mut right = Cell::from_value(Stubborn::ok(2));

        let error = exchange(&mut left, &mut right);

        assert!(error.is_err_and(|error| !error.is_restored()));
        assert!(left.status().has_lost_consistency());
        assert!(right.status().has_lost_consistency());
        assert!(logs_contain("outcome swap lost consistency"));
    }

    #[test]
    #[traced_test]
    fn clobbered_exception_failure_marks_both() {
        let mut left = Cell::from_exception(Stubborn::failing(1, SwapDamage::Clobbered));
        let mut right = Cell::from_exception(Stubborn::ok(2));

        let error = exchange(&mut left, &mut right);

        assert!(error.is_err());
        assert!(left.status().has_lost_consistency());
        assert!(right.status().has_lost_consistency());
        assert!(logs_contain("exception exchange clobbered both outcomes"));
    }

    #[test]
    fn restored_exception_failure_returns_early() {
        let mut left = Cell::from_exception(Stubborn::failing(1, SwapDamage::Restored));
        let mut right = Cell::from_error_and_exception(ErrorCode::io(), Stubborn::ok(2));

        assert!(exchange(&mut left, &mut right).is_err());
        assert_eq!(left.status(), StatusFlags::HAS_EXCEPTION);
        assert_eq!(
            right.status(),
            StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION
        );
    }

    #[test]
    fn repair_clears_failure_bits_next_to_a_value() {
        let mut cell = Cell::from_value(Stubborn::ok(1));
        cell.status.insert(StatusFlags::HAS_ERROR);

        assert!(repair(&mut cell));
        assert_eq!(
            cell.status(),
            StatusFlags::HAS_VALUE | StatusFlags::LOST_CONSISTENCY
        );
    }

    #[test]
    fn repair_flags_an_empty_container_as_error() {
        let mut cell = Cell::from_value(Stubborn::ok(1));
        cell.status = StatusFlags::EMPTY;

        assert!(repair(&mut cell));
        assert_eq!(
            cell.status(),
            StatusFlags::HAS_ERROR | StatusFlags::LOST_CONSISTENCY
        );
        assert_eq!(cell.error(), None);
    }

    #[test]
    fn repair_leaves_legal_states_alone() {
        let mut cell = Cell::from_error_and_exception(ErrorCode::io(), Stubborn::ok(1));
        assert!(!repair(&mut cell));
        assert_eq!(
            cell.status(),
            StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION
        );
    }

    #[test]
    fn strong_swap_on_infallible_type() {
        let (mut a, mut b) = (String::from("a"), String::from("b"));
        assert_eq!(strong_swap(&mut a, &mut b), Ok(()));
        assert_eq!((a.as_str(), b.as_str()), ("b", "a"));
    }
}

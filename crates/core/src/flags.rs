//! Status bits describing which payload slots are populated.

use std::fmt;
use std::ops::BitOr;

/// Independent status bits of an outcome container.
///
/// Only storage and swap manipulate these bits; callers observe them through
/// pure flag tests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusFlags(u8);

impl StatusFlags {
    /// No bit set.
    pub const EMPTY: Self = Self(0);
    /// The value slot is populated.
    pub const HAS_VALUE: Self = Self(1);
    /// The error slot is populated.
    pub const HAS_ERROR: Self = Self(1 << 1);
    /// The exception slot is populated.
    pub const HAS_EXCEPTION: Self = Self(1 << 2);
    /// The last mutating operation could not complete atomically.
    pub const LOST_CONSISTENCY: Self = Self(1 << 3);

    const NAMED: [(Self, &'static str); 4] = [
        (Self::HAS_VALUE, "HAS_VALUE"),
        (Self::HAS_ERROR, "HAS_ERROR"),
        (Self::HAS_EXCEPTION, "HAS_EXCEPTION"),
        (Self::LOST_CONSISTENCY, "LOST_CONSISTENCY"),
    ];

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Bits set in either operand.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Bits of `self` not set in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub(crate) const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub(crate) const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub(crate) const fn set(&mut self, other: Self, enabled: bool) {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// The value slot is populated.
    #[must_use]
    pub const fn has_value(self) -> bool {
        self.contains(Self::HAS_VALUE)
    }

    /// The error slot is populated.
    #[must_use]
    pub const fn has_error(self) -> bool {
        self.contains(Self::HAS_ERROR)
    }

    /// The exception slot is populated.
    #[must_use]
    pub const fn has_exception(self) -> bool {
        self.contains(Self::HAS_EXCEPTION)
    }

    /// Either failure slot is populated.
    #[must_use]
    pub const fn has_failure(self) -> bool {
        self.intersects(Self::HAS_ERROR.union(Self::HAS_EXCEPTION))
    }

    /// The container was flagged by a swap that could not complete atomically.
    #[must_use]
    pub const fn has_lost_consistency(self) -> bool {
        self.contains(Self::LOST_CONSISTENCY)
    }

    /// Classify the populated slots.
    #[must_use]
    pub const fn state(self) -> OutcomeState {
        if self.has_lost_consistency() {
            return OutcomeState::Inconsistent;
        }
        match (self.has_value(), self.has_error(), self.has_exception()) {
            (true, false, false) => OutcomeState::Value,
            (false, true, false) => OutcomeState::Error,
            (false, false, true) => OutcomeState::Exception,
            (false, true, true) => OutcomeState::ErrorAndException,
            _ => OutcomeState::Inconsistent,
        }
    }
}

impl BitOr for StatusFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Debug for StatusFlags {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return formatter.write_str("StatusFlags(EMPTY)");
        }
        formatter.write_str("StatusFlags(")?;
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    formatter.write_str(" | ")?;
                }
                formatter.write_str(name)?;
                first = false;
            }
        }
        formatter.write_str(")")
    }
}

/// Logical classification of an outcome's populated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeState {
    /// Only the value slot.
    Value,
    /// Only the error slot.
    Error,
    /// Only the exception slot.
    Exception,
    /// Error and exception together (compound failure).
    ErrorAndException,
    /// `LOST_CONSISTENCY` is set, or the bits form no legal combination.
    Inconsistent,
}

impl OutcomeState {
    /// Returns true for every state except [`OutcomeState::Value`].
    #[must_use]
    pub const fn is_failure(self) -> bool {
        !matches!(self, Self::Value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_tests_are_independent() {
        let flags = StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION;

        assert!(!flags.has_value());
        assert!(flags.has_error());
        assert!(flags.has_exception());
        assert!(flags.has_failure());
        assert!(!flags.has_lost_consistency());
    }

    #[test]
    fn state_classification() {
        assert_eq!(StatusFlags::HAS_VALUE.state(), OutcomeState::Value);
        assert_eq!(StatusFlags::HAS_ERROR.state(), OutcomeState::Error);
        assert_eq!(StatusFlags::HAS_EXCEPTION.state(), OutcomeState::Exception);
        assert_eq!(
            (StatusFlags::HAS_ERROR | StatusFlags::HAS_EXCEPTION).state(),
            OutcomeState::ErrorAndException
        );
        assert_eq!(
            (StatusFlags::HAS_VALUE | StatusFlags::HAS_ERROR).state(),
            OutcomeState::Inconsistent
        );
        assert_eq!(
            (StatusFlags::HAS_VALUE | StatusFlags::LOST_CONSISTENCY).state(),
            OutcomeState::Inconsistent
        );
        assert_eq!(StatusFlags::EMPTY.state(), OutcomeState::Inconsistent);
    }

    #[test]
    fn set_and_remove() {
        let mut flags = StatusFlags::EMPTY;
        flags.set(StatusFlags::HAS_VALUE, true);
        flags.insert(StatusFlags::LOST_CONSISTENCY);
        assert!(flags.has_value());

        flags.set(StatusFlags::HAS_VALUE, false);
        assert_eq!(flags, StatusFlags::LOST_CONSISTENCY);

        flags.remove(StatusFlags::LOST_CONSISTENCY);
        assert_eq!(flags, StatusFlags::EMPTY);
    }

    #[test]
    fn debug_lists_set_bits() {
        assert_eq!(format!("{:?}", StatusFlags::EMPTY), "StatusFlags(EMPTY)");
        assert_eq!(
            format!("{:?}", StatusFlags::HAS_ERROR | StatusFlags::LOST_CONSISTENCY),
            "StatusFlags(HAS_ERROR | LOST_CONSISTENCY)"
        );
    }
}

//! Construction hook identifiers.
//!
//! Every constructor and conversion reports which path built the container
//! through [`AccessPolicy::on_construction`](crate::policy::AccessPolicy::on_construction).
//! The hook runs after the container is fully built and cannot alter it.

use crate::storage::Slot;

/// The path that produced a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construction {
    /// Implicit conversion of a single input into the named slot.
    Converting(Slot),
    /// Implicit construction from an error plus an exception.
    ConvertingFailure,
    /// Targeted in-place construction of the named slot.
    InPlace(Slot),
    /// Targeted in-place construction of error and exception together.
    InPlaceFailure,
    /// Copying conversion from a compatible outcome.
    Copy,
    /// Moving conversion from a compatible outcome.
    Move,
    /// Conversion from a two-state result.
    FromResult,
    /// Conversion from a success wrapper.
    Success,
    /// Conversion from a failure wrapper.
    Failure,
    /// Default construction of the value slot.
    Default,
}

impl Construction {
    /// Short label for log output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Converting(_) => "converting",
            Self::ConvertingFailure => "converting_failure",
            Self::InPlace(_) => "in_place",
            Self::InPlaceFailure => "in_place_failure",
            Self::Copy => "copy",
            Self::Move => "move",
            Self::FromResult => "from_result",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Default => "default",
        }
    }
}

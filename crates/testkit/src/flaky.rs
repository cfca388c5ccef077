//! Payloads whose exchange fails on demand.
//!
//! A [`Fuse`] allows a fixed number of successful exchanges and then fails
//! every later one with the configured damage. Clones share the count, so one
//! fuse can arm several payloads across both containers of a swap.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use outcome_core::{SwapDamage, SwapError, TrySwap};

/// Shared countdown of allowed exchanges.
#[derive(Debug, Clone)]
pub struct Fuse {
    remaining: Arc<AtomicU32>,
    damage: SwapDamage,
}

impl Fuse {
    /// Allow `successes` exchanges, then fail with `damage`.
    pub fn new(successes: u32, damage: SwapDamage) -> Self {
        Self {
            remaining: Arc::new(AtomicU32::new(successes)),
            damage,
        }
    }

    /// Fail the very next exchange.
    pub fn blown(damage: SwapDamage) -> Self {
        Self::new(0, damage)
    }

    /// Exchanges still allowed.
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::SeqCst)
    }

    fn consume(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

/// Wraps a payload and routes its exchange through an optional [`Fuse`].
///
/// Equality looks at the wrapped payload only.
#[derive(Debug, Clone)]
pub struct Flaky<T> {
    inner: T,
    fuse: Option<Fuse>,
}

impl<T> Flaky<T> {
    /// Payload that always exchanges.
    pub const fn new(inner: T) -> Self {
        Self { inner, fuse: None }
    }

    /// Payload armed with `fuse`.
    pub const fn armed(inner: T, fuse: Fuse) -> Self {
        Self {
            inner,
            fuse: Some(fuse),
        }
    }

    /// Borrow the wrapped payload.
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwrap the payload.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> From<T> for Flaky<T> {
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

impl<T: PartialEq> PartialEq for Flaky<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> TrySwap for Flaky<T> {
    fn try_swap(&mut self, other: &mut Self) -> Result<(), SwapError> {
        let fuse = self.fuse.clone().or_else(|| other.fuse.clone());
        match fuse {
            Some(fuse) if !fuse.consume() => match fuse.damage {
                SwapDamage::Restored => Err(SwapError::restored("fuse blown")),
                SwapDamage::Clobbered => {
                    mem::swap(&mut self.inner, &mut other.inner);
                    Err(SwapError::clobbered("fuse blown mid-exchange"))
                },
            },
            _ => {
                mem::swap(self, other);
                Ok(())
            },
        }
    }
}

//! A policy adapter that records every construction on the current thread.

use std::cell::RefCell;
use std::marker::PhantomData;

use outcome_core::{
    AccessPolicy, Construction, RethrowOnAccess, StatusFlags, Storage, WideAccess,
};

thread_local! {
    static RECORDED: RefCell<Vec<(Construction, StatusFlags)>> = const { RefCell::new(Vec::new()) };
}

/// Delegates to `P` and remembers each construction hook call.
pub struct Recording<P = RethrowOnAccess>(PhantomData<fn() -> P>);

/// Drain the constructions recorded on this thread, oldest first.
pub fn take_recorded() -> Vec<(Construction, StatusFlags)> {
    RECORDED.with_borrow_mut(std::mem::take)
}

impl<V, E, X, P> AccessPolicy<V, E, X> for Recording<P>
where
    P: AccessPolicy<V, E, X>,
{
    fn narrow_value_check(status: StatusFlags) {
        P::narrow_value_check(status);
    }

    fn narrow_error_check(status: StatusFlags) {
        P::narrow_error_check(status);
    }

    fn narrow_exception_check(status: StatusFlags) {
        P::narrow_exception_check(status);
    }

    fn on_construction(storage: &Storage<V, E, X>, how: Construction) {
        RECORDED.with_borrow_mut(|recorded| recorded.push((how, storage.status())));
        P::on_construction(storage, how);
    }
}

impl<V, E, X, P> WideAccess<V, E, X> for Recording<P>
where
    P: WideAccess<V, E, X>,
{
    type Failure = P::Failure;

    fn wide_value_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        P::wide_value_check(storage)
    }

    fn wide_error_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        P::wide_error_check(storage)
    }

    fn wide_exception_check(storage: &Storage<V, E, X>) -> Result<(), Self::Failure> {
        P::wide_exception_check(storage)
    }
}

//! Test fixtures for error and exception payloads.

use outcome_shared::{ErrorCode, ExceptionPtr};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::cancelled(),
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::timeout(),
        ErrorCode::io(),
        ErrorCode::internal(),
    ]
}

/// A fresh exception carrying `message`.
///
/// Every call yields a distinct payload, so two fixtures never compare equal.
pub fn exception(message: &str) -> ExceptionPtr {
    ExceptionPtr::new(message.to_owned())
}

/// An exception captured from a real panic.
pub fn panicked(message: &'static str) -> ExceptionPtr {
    match ExceptionPtr::catch(|| -> u8 { panic!("{message}") }) {
        Ok(_) => unreachable!("closure always panics"),
        Err(exception) => exception,
    }
}

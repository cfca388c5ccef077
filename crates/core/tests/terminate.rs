//! The terminate policy ends the process on an absent slot.
//!
//! The aborting access runs in a re-spawned copy of this test binary, gated by
//! an environment variable so the parent run skips it.

use std::error::Error;
use std::process::{Command, Stdio};

use outcome_core::{BasicOutcome, ErrorCode, ExceptionPtr, TerminateOnAccess};

type Strict = BasicOutcome<u32, ErrorCode, ExceptionPtr, TerminateOnAccess>;

const CHILD_ENV: &str = "OUTCOME_TERMINATE_CHILD";

#[test]
fn absent_value_access_in_child() {
    if std::env::var_os(CHILD_ENV).is_none() {
        return;
    }
    let failed = Strict::in_place_error(ErrorCode::io());
    let _ = failed.value();
}

#[test]
fn absent_slot_access_aborts_the_process() -> Result<(), Box<dyn Error>> {
    let status = Command::new(std::env::current_exe()?)
        .args(["absent_value_access_in_child", "--exact", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    assert!(!status.success());
    Ok(())
}

#[test]
fn populated_slots_never_abort() {
    let ok = Strict::in_place_value(9_u32);

    assert_eq!(ok.into_value(), Ok(9));
}

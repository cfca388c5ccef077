//! Fallible exchange with injected payload failures.

use outcome_core::{BasicOutcome, ErrorCode, ExceptionPtr, OutcomeState, SwapDamage};
use outcome_testkit::{Flaky, Fuse, errors, init_test_tracing};

type Fragile = BasicOutcome<Flaky<u32>, Flaky<ErrorCode>, Flaky<ExceptionPtr>>;

fn both_flagged_or_neither(left: &Fragile, right: &Fragile) -> bool {
    left.has_lost_consistency() == right.has_lost_consistency()
}

#[test]
fn unarmed_payloads_swap_cleanly() {
    let mut left = Fragile::new(1_u32);
    let mut right = Fragile::new(ErrorCode::not_found());

    assert!(left.try_swap(&mut right).is_ok());
    assert_eq!(left.get_error().map(Flaky::inner), Some(&ErrorCode::not_found()));
    assert_eq!(right.get_value().map(Flaky::inner), Some(&1));
}

#[test]
fn restored_value_failure_commits_nothing() {
    let fuse = Fuse::blown(SwapDamage::Restored);
    let mut left = Fragile::in_place_value(Flaky::armed(1, fuse));
    let mut right = Fragile::new(2_u32);

    let outcome = left.try_swap(&mut right);

    assert!(matches!(outcome, Err(ref error) if error.is_restored()));
    assert_eq!(left.state(), OutcomeState::Value);
    assert_eq!(right.state(), OutcomeState::Value);
    assert_eq!(left.get_value().map(Flaky::inner), Some(&1));
    assert_eq!(right.get_value().map(Flaky::inner), Some(&2));
}

#[test]
fn restored_error_failure_rolls_back_exceptions() {
    let exception = errors::exception("left");
    let fuse = Fuse::blown(SwapDamage::Restored);
    let mut left = Fragile::in_place_failure(Flaky::armed(ErrorCode::io(), fuse), exception.clone());
    let mut right = Fragile::new(ErrorCode::timeout());

    let outcome = left.try_swap(&mut right);

    assert!(matches!(outcome, Err(ref error) if error.is_restored()));
    assert_eq!(left.state(), OutcomeState::ErrorAndException);
    assert_eq!(left.get_exception().map(Flaky::inner), Some(&exception));
    assert_eq!(right.state(), OutcomeState::Error);
    assert!(!left.has_lost_consistency());
    assert!(!right.has_lost_consistency());
}

#[test]
fn clobbered_error_failure_flags_both_sides() {
    init_test_tracing();

    let fuse = Fuse::blown(SwapDamage::Clobbered);
    let mut left = Fragile::in_place_error(Flaky::armed(ErrorCode::io(), fuse));
    let mut right = Fragile::new(ErrorCode::timeout());

    let outcome = left.try_swap(&mut right);

    assert!(matches!(outcome, Err(ref error) if !error.is_restored()));
    assert!(left.has_lost_consistency());
    assert!(right.has_lost_consistency());
    assert_eq!(left.state(), OutcomeState::Inconsistent);
}

#[test]
fn failed_rollback_flags_both_sides() {
    init_test_tracing();

    // One exchange allowed: the exception swap succeeds, the error swap and
    // the exception rollback both fail.
    let fuse = Fuse::new(1, SwapDamage::Restored);
    let mut left = Fragile::in_place_failure(
        Flaky::armed(ErrorCode::io(), fuse.clone()),
        Flaky::armed(errors::exception("left"), fuse.clone()),
    );
    let mut right = Fragile::in_place_failure(
        Flaky::armed(ErrorCode::timeout(), fuse.clone()),
        Flaky::armed(errors::exception("right"), fuse.clone()),
    );

    let outcome = left.try_swap(&mut right);

    assert!(matches!(outcome, Err(ref error) if error.is_restored()));
    assert_eq!(fuse.remaining(), 0);
    assert!(left.has_lost_consistency());
    assert!(right.has_lost_consistency());
}

#[test]
fn fuse_outlasting_the_swap_commits_everything() {
    let fuse = Fuse::new(10, SwapDamage::Clobbered);
    let mut left = Fragile::in_place_failure(
        Flaky::armed(ErrorCode::io(), fuse.clone()),
        Flaky::armed(errors::exception("left"), fuse.clone()),
    );
    let mut right = Fragile::in_place_failure(
        Flaky::armed(ErrorCode::timeout(), fuse.clone()),
        Flaky::armed(errors::exception("right"), fuse.clone()),
    );

    assert!(left.try_swap(&mut right).is_ok());
    assert_eq!(fuse.remaining(), 8);
    assert_eq!(left.get_error().map(Flaky::inner), Some(&ErrorCode::timeout()));
    assert_eq!(right.get_error().map(Flaky::inner), Some(&ErrorCode::io()));
}

#[test]
fn no_failure_ever_flags_exactly_one_side() {
    for successes in 0..4 {
        for damage in [SwapDamage::Restored, SwapDamage::Clobbered] {
            let fuse = Fuse::new(successes, damage);
            let mut left = Fragile::in_place_failure(
                Flaky::armed(ErrorCode::io(), fuse.clone()),
                Flaky::armed(errors::exception("left"), fuse.clone()),
            );
            let mut right = Fragile::in_place_failure(
                Flaky::armed(ErrorCode::timeout(), fuse.clone()),
                Flaky::armed(errors::exception("right"), fuse.clone()),
            );

            let outcome = left.try_swap(&mut right);

            assert!(
                both_flagged_or_neither(&left, &right),
                "successes={successes} damage={damage} result={outcome:?}"
            );
            if outcome.is_ok() {
                assert_eq!(left.get_error().map(Flaky::inner), Some(&ErrorCode::timeout()));
                assert_eq!(right.get_error().map(Flaky::inner), Some(&ErrorCode::io()));
            }
        }
    }
}

#[test]
fn one_sided_slots_never_consult_the_payload() {
    let fuse = Fuse::blown(SwapDamage::Clobbered);
    let mut left = Fragile::in_place_failure(
        Flaky::armed(ErrorCode::io(), fuse.clone()),
        Flaky::armed(errors::exception("left"), fuse.clone()),
    );
    let mut right = Fragile::in_place_value(Flaky::armed(5, fuse));

    assert!(left.try_swap(&mut right).is_ok());
    assert_eq!(left.state(), OutcomeState::Value);
    assert_eq!(right.state(), OutcomeState::ErrorAndException);
}

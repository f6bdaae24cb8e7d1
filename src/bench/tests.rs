use std::time::Duration;

use super::*;
use crate::time::fake::FakeClock;

const STEP: Duration = Duration::from_micros(1);

fn fake_context(budget: Duration) -> Context<FakeClock> {
    Context::with_clock(FakeClock::new(STEP), budget)
}

#[test]
fn initial_state_is_idle() {
    let context = fake_context(Duration::from_secs(1));

    assert_eq!(context.state, State::Idle);
    assert_eq!(context.iterations(), 0);
    assert_eq!(context.elapsed, Duration::ZERO);
}

#[test]
fn first_poll_runs_unconditionally() {
    // Even a zero budget gets one iteration.
    let mut context = fake_context(Duration::ZERO);

    assert!(context.running());
    assert_eq!(context.state, State::Running);
    assert_eq!(context.iterations(), 1);

    assert!(!context.running());
    assert_eq!(context.iterations(), 1);
}

#[test]
fn fixed_step_clock_divides_exactly() {
    // The clock advances by STEP per sample, so the loop sees one STEP of
    // elapsed time per iteration and the average must come out to STEP with
    // no first-iteration off-by-one.
    let mut context = fake_context(5 * STEP);

    while context.running() {}

    assert_eq!(context.iterations(), 5);
    assert_eq!(context.elapsed, 5 * STEP);
    assert_eq!(context.nanos_per_iteration(0), STEP.as_nanos() as i64);
}

#[test]
fn budget_boundary_is_inclusive() {
    // elapsed == budget stops the loop on both measurement paths.
    let mut unscoped = fake_context(STEP);
    assert!(unscoped.running());
    assert!(!unscoped.running());
    assert_eq!(unscoped.elapsed, STEP);

    let mut scoped = fake_context(STEP);
    assert!(scoped.running());
    drop(scoped.area());
    assert_eq!(scoped.elapsed, STEP);
    assert!(!scoped.running());
}

#[test]
fn overhead_is_subtracted_from_unscoped_runs() {
    let mut context = fake_context(4 * STEP);

    while context.running() {}

    let step = STEP.as_nanos() as i64;
    assert_eq!(context.nanos_per_iteration(200), step - 200);

    // Calibration overhead above the raw cost goes negative here; the
    // reporting boundary clamps, not this method.
    assert_eq!(context.nanos_per_iteration(step + 300), -300);
}

#[test]
fn zero_iterations_reports_zero_cost() {
    // A body that never polls must not divide by zero, and the overhead
    // argument must not drive the result negative.
    let context = fake_context(Duration::from_secs(1));

    assert_eq!(context.iterations(), 0);
    assert_eq!(context.nanos_per_iteration(0), 0);
    assert_eq!(context.nanos_per_iteration(1_000), 0);
}

#[test]
fn first_area_resets_unscoped_measurement() {
    let mut context = fake_context(100 * STEP);

    // Accumulate some unscoped polling first.
    for _ in 0..4 {
        assert!(context.running());
    }
    assert_eq!(context.iterations(), 4);
    assert!(context.elapsed > Duration::ZERO);

    {
        let _area = context.area();
    }

    assert_eq!(context.state, State::AreaActive);
    assert_eq!(context.iterations(), 1);
    // Only the single area interval remains.
    assert_eq!(context.elapsed, STEP);
}

#[test]
fn sequential_areas_accumulate() {
    let mut context = fake_context(100 * STEP);

    assert!(context.running());
    drop(context.area());
    drop(context.area());

    assert_eq!(context.elapsed, 2 * STEP);
    // The second area must not reset the iteration count again.
    assert_eq!(context.iterations(), 1);
}

#[test]
fn area_state_polls_without_sampling_the_clock() {
    let mut context = fake_context(10 * STEP);

    assert!(context.running());
    drop(context.area());
    let elapsed = context.elapsed;

    // Work outside any area is invisible to the budget check: polling in
    // area state neither samples the clock nor advances elapsed time.
    for expected in 2..=5 {
        assert!(context.running());
        assert_eq!(context.iterations(), expected);
        assert_eq!(context.elapsed, elapsed);
    }
}

#[test]
fn area_state_ignores_overhead_argument() {
    let mut context = fake_context(10 * STEP);

    assert!(context.running());
    drop(context.area());

    let uncorrected = context.nanos_per_iteration(0);
    assert_eq!(context.nanos_per_iteration(1_000_000), uncorrected);
}

#[test]
fn area_loop_terminates_on_accumulated_time() {
    // One area per iteration, each contributing one STEP: a 3-STEP budget
    // yields exactly 3 iterations and an exact per-iteration average.
    let mut context = fake_context(3 * STEP);

    while context.running() {
        let _area = context.area();
    }

    assert_eq!(context.iterations(), 3);
    assert_eq!(context.elapsed, 3 * STEP);
    assert_eq!(context.nanos_per_iteration(0), STEP.as_nanos() as i64);
}

#[test]
fn area_state_is_terminal() {
    let mut context = fake_context(100 * STEP);

    assert!(context.running());
    drop(context.area());

    for _ in 0..3 {
        assert!(context.running());
        assert_eq!(context.state, State::AreaActive);
    }
}

#[test]
fn closures_are_benchmarks() {
    let mut polls: u64 = 0;
    let mut context = Context::new(Duration::from_micros(50));

    {
        let mut unit = |context: &mut Context| {
            while context.running() {
                polls += 1;
            }
        };
        Benchmark::run(&mut unit, &mut context);
    }

    assert!(polls >= 1);
    assert_eq!(polls, context.iterations());
}

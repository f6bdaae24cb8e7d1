use std::time::Duration;

use crate::time::{Clock, OsClock};

#[cfg(test)]
mod tests;

/// A named, independently measurable piece of work.
///
/// The runner invokes the hooks in a fixed order: [`set_up`](Self::set_up)
/// once, [`run`](Self::run) once (the body loops internally via
/// [`Context::running`]), then [`tear_down`](Self::tear_down) once. Set-up and
/// tear-down are outside the timed interval. A panicking hook aborts the whole
/// run; the harness does not catch it.
///
/// Closures of type `FnMut(&mut Context)` implement this trait with no-op
/// set-up and tear-down, so a fixture is just a unit with non-trivial hooks.
///
/// # Examples
///
/// ```
/// use benchtop::{Benchmark, Context};
///
/// #[derive(Default)]
/// struct Sort {
///     input: Vec<u32>,
/// }
///
/// impl Benchmark for Sort {
///     fn set_up(&mut self) {
///         self.input = (0..1000).rev().collect();
///     }
///
///     fn run(&mut self, context: &mut Context) {
///         while context.running() {
///             let mut data = self.input.clone();
///             let area = context.area();
///             data.sort();
///             drop(area);
///             benchtop::black_box(&data);
///         }
///     }
///
///     fn tear_down(&mut self) {
///         self.input.clear();
///     }
/// }
/// ```
pub trait Benchmark {
    /// Prepares state for the run. Not part of the measured interval.
    fn set_up(&mut self) {}

    /// Drives the measurement loop via [`Context::running`].
    fn run(&mut self, context: &mut Context);

    /// Releases state after the run. Not part of the measured interval.
    fn tear_down(&mut self) {}
}

impl<F: FnMut(&mut Context)> Benchmark for F {
    fn run(&mut self, context: &mut Context) {
        self(context)
    }
}

/// Measurement mode the context is in.
///
/// `AreaActive` is terminal: once a [`TimedArea`] has been created there is no
/// path back to unscoped polling for this context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    AreaActive,
}

/// Measurement loop state for one benchmark execution.
///
/// Created immediately before a benchmark runs and discarded right after;
/// never shared across benchmarks or threads. The body drives it in a polling
/// loop:
///
/// ```
/// use std::time::Duration;
/// use benchtop::Context;
///
/// let mut context = Context::new(Duration::from_millis(1));
/// while context.running() {
///     benchtop::black_box(3u64.pow(7));
/// }
/// assert!(context.iterations() >= 1);
/// ```
pub struct Context<C: Clock = OsClock> {
    clock: C,
    state: State,
    /// Wall-clock budget for the whole loop; immutable for the context's
    /// lifetime.
    budget: Duration,
    iterations: u64,
    /// Accumulated runtime: wall time since the loop started in unscoped
    /// mode, or the sum of area intervals once a [`TimedArea`] exists.
    elapsed: Duration,
    interval_start: Duration,
}

impl Context {
    /// Creates a context that measures against the OS monotonic clock.
    pub fn new(budget: Duration) -> Self {
        Self::with_clock(OsClock::default(), budget)
    }
}

impl<C: Clock> Context<C> {
    /// Creates a context driven by the given clock.
    pub fn with_clock(clock: C, budget: Duration) -> Self {
        Self {
            clock,
            state: State::Idle,
            budget,
            iterations: 0,
            elapsed: Duration::ZERO,
            interval_start: Duration::ZERO,
        }
    }

    /// Polls the measurement loop.
    ///
    /// Returns `true` while the budget is not exhausted and the caller should
    /// execute one more iteration. The first poll always returns `true`, so
    /// every benchmark completes at least one iteration regardless of budget.
    ///
    /// Once a [`TimedArea`] has been created, the budget check compares the
    /// accumulated in-area time instead of wall time, and this method no
    /// longer samples the clock itself; work done outside any area does not
    /// count toward the budget.
    #[inline]
    pub fn running(&mut self) -> bool {
        match self.state {
            State::AreaActive => {
                if self.elapsed >= self.budget {
                    return false;
                }
                self.iterations += 1;
                true
            }
            State::Idle => {
                self.state = State::Running;
                self.iterations = 1;
                self.interval_start = self.clock.now();
                true
            }
            State::Running => {
                self.elapsed = self.clock.now().saturating_sub(self.interval_start);
                if self.elapsed >= self.budget {
                    return false;
                }
                self.iterations += 1;
                true
            }
        }
    }

    /// Opens a timed area: only time spent between this call and the guard's
    /// drop counts toward the measurement.
    ///
    /// The first area created for a context discards any unscoped measurement
    /// taken so far: areas and unscoped polling are mutually exclusive
    /// strategies for one run. Sequential areas accumulate additively.
    #[inline]
    pub fn area(&mut self) -> TimedArea<'_, C> {
        if self.state != State::AreaActive {
            self.iterations = 1;
            self.elapsed = Duration::ZERO;
            self.state = State::AreaActive;
        }
        self.interval_start = self.clock.now();
        TimedArea { context: self }
    }

    #[inline]
    fn end_area(&mut self) {
        let now = self.clock.now();
        self.elapsed += now.saturating_sub(self.interval_start);
    }

    /// Number of iterations the measurement loop completed.
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Average cost of one iteration in integer nanoseconds.
    ///
    /// `overhead` is the per-iteration cost of the polling call itself, as
    /// measured by a calibration run. It is subtracted unless this context
    /// used timed areas: an area already excludes unmeasured work by
    /// construction, so subtracting polling overhead there would correct
    /// twice. The result may be negative when the overhead exceeds the raw
    /// cost; clamping is the reporting boundary's job.
    ///
    /// A body that never polled reports zero cost rather than dividing by
    /// zero.
    pub fn nanos_per_iteration(&self, overhead: i64) -> i64 {
        let raw = match self.elapsed.as_nanos().checked_div(self.iterations as u128) {
            Some(raw) => raw as i64,
            None => return 0,
        };

        if self.state == State::AreaActive {
            raw
        } else {
            raw - overhead
        }
    }
}

/// Guard for a scoped measurement window within a benchmark iteration.
///
/// Created by [`Context::area`]; the elapsed interval is added to the
/// context's accumulated runtime when the guard drops, even on unwind.
#[must_use = "only time spent while the area guard is alive is measured"]
pub struct TimedArea<'a, C: Clock = OsClock> {
    context: &'a mut Context<C>,
}

impl<C: Clock> Drop for TimedArea<'_, C> {
    #[inline]
    fn drop(&mut self) {
        self.context.end_area();
    }
}

use std::fmt;
use std::time::Duration;

use crate::bench::{Benchmark, Context};
use crate::cli::CliArgs;
use crate::config::{Action, ColorChoice, Filter};
use crate::entry::{self, Entry, UnitKind};
use crate::painter::{ReportRow, TablePainter};
use crate::time::Clock;

/// The benchmark runner.
///
/// Runs every registered, filter-matching benchmark sequentially for a fixed
/// wall-clock budget each and reports a corrected per-iteration cost. Units
/// registered with [`#[benchtop::bench]`](macro@crate::bench) and
/// [`register_benchmark!`](crate::register_benchmark) are picked up
/// automatically; hosts that own their benchmark set can add units with
/// [`with_unit`](Self::with_unit) instead.
pub struct Benchtop {
    action: Action,
    color: ColorChoice,
    filter: Option<Filter>,
    budget: Duration,
    units: Vec<OwnedUnit>,
}

/// Benchmark added at runtime, as opposed to a link-time [`Entry`].
struct OwnedUnit {
    name: String,
    unit: Box<dyn Benchmark>,
}

impl Default for Benchtop {
    fn default() -> Self {
        Self {
            action: Action::default(),
            color: ColorChoice::Auto,
            filter: None,
            budget: Duration::from_secs(1),
            units: Vec::new(),
        }
    }
}

impl fmt::Debug for Benchtop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchtop").finish_non_exhaustive()
    }
}

/// Configuration options.
impl Benchtop {
    /// Sets options by parsing CLI arguments.
    ///
    /// This may override any previously-set options. A malformed filter
    /// pattern exits the process with an error before any benchmark runs.
    #[must_use]
    pub fn config_with_args(mut self) -> Self {
        let args = CliArgs::parse();

        self.filter = args.filter.or(self.filter);
        self.action = args.action;
        self.color = args.color;
        self
    }

    /// Sets the wall-clock time budget each benchmark runs for.
    ///
    /// Defaults to one second. Calibration uses the same budget.
    #[must_use]
    pub fn budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Only runs benchmarks whose names match `pattern`, where `*` matches
    /// any sequence of characters.
    ///
    /// This option is equivalent to the `--filter pattern` CLI argument.
    ///
    /// # Panics
    ///
    /// Panics if the pattern does not compile; use the CLI argument for
    /// user-supplied patterns.
    #[must_use]
    #[track_caller]
    pub fn filter_glob(mut self, pattern: &str) -> Self {
        self.filter = match Filter::glob(pattern) {
            Ok(filter) => Some(filter),
            Err(error) => panic!("invalid filter pattern {pattern:?}: {error}"),
        };
        self
    }

    /// Only runs benchmarks whose names equal `name` exactly.
    ///
    /// This option is equivalent to the `--filter name --exact` CLI
    /// arguments.
    #[must_use]
    pub fn filter_exact(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(Filter::Exact(name.into()));
        self
    }

    /// Sets whether output should be colored.
    ///
    /// This option is equivalent to the `--color` CLI argument, where
    /// [`None`] here means "auto".
    #[must_use]
    pub fn color(mut self, yes: impl Into<Option<bool>>) -> Self {
        self.color = match yes.into() {
            None => ColorChoice::Auto,
            Some(true) => ColorChoice::Always,
            Some(false) => ColorChoice::Never,
        };
        self
    }

    /// Adds a benchmark owned by this runner invocation.
    ///
    /// Runtime units execute after link-time registered benchmarks, in
    /// insertion order. Closures taking `&mut Context` work directly:
    ///
    /// ```
    /// use std::time::Duration;
    /// use benchtop::{Benchtop, Context};
    ///
    /// let rows = Benchtop::default()
    ///     .budget(Duration::from_millis(1))
    ///     .with_unit("push", |context: &mut Context| {
    ///         let mut buf = Vec::new();
    ///         while context.running() {
    ///             buf.push(0u8);
    ///         }
    ///     })
    ///     .run();
    /// # assert_eq!(rows.last().unwrap().name, "push");
    /// ```
    #[must_use]
    pub fn with_unit(mut self, name: impl Into<String>, unit: impl Benchmark + 'static) -> Self {
        self.units.push(OwnedUnit { name: name.into(), unit: Box::new(unit) });
        self
    }
}

/// Execution.
impl Benchtop {
    /// Runs matching benchmarks and paints the report table to stdout.
    ///
    /// Rows stream out as units finish, so everything printed before an
    /// aborting unit remains valid.
    pub fn bench(mut self) {
        let overhead = self.measure_overhead();
        let budget = self.budget;
        let color = self.color;
        let mut targets = self.targets();

        let mut painter = TablePainter::new(targets.iter().map(Target::name), color);

        painter.header();
        for target in &mut targets {
            painter.row(&target.execute(budget, overhead));
        }
    }

    /// Runs matching benchmarks and returns their report rows without
    /// painting.
    ///
    /// This is the surface for host processes that render results themselves.
    pub fn run(mut self) -> Vec<ReportRow> {
        let overhead = self.measure_overhead();
        let budget = self.budget;

        self.targets().iter_mut().map(|target| target.execute(budget, overhead)).collect()
    }

    /// Lists matching benchmark names, one per line.
    pub fn list(mut self) {
        for target in self.targets() {
            println!("{}", target.name());
        }
    }

    pub(crate) fn run_action(self) {
        match self.action {
            Action::Bench => self.bench(),
            Action::List => self.list(),
        }
    }

    /// Measures the per-iteration cost of the polling call itself by driving
    /// an empty benchmark through a full unscoped loop.
    fn measure_overhead(&self) -> i64 {
        let mut context = Context::new(self.budget);
        while context.running() {}
        context.nanos_per_iteration(0)
    }

    /// Snapshots the filter-matching benchmarks in execution order:
    /// link-time entries in declaration order, then runtime units in
    /// insertion order. Skipped units are never constructed or set up.
    fn targets(&mut self) -> Vec<Target<'_>> {
        let matches = |name: &str| match &self.filter {
            Some(filter) => filter.is_match(name),
            None => true,
        };

        let mut targets: Vec<Target> = entry::registered()
            .iter()
            .copied()
            .filter(|entry| matches(entry.name))
            .map(Target::Registered)
            .collect();

        targets.extend(
            self.units
                .iter_mut()
                .filter(|owned| matches(&owned.name))
                .map(Target::Runtime),
        );

        targets
    }
}

/// A benchmark selected for execution.
enum Target<'a> {
    Registered(&'static Entry),
    Runtime(&'a mut OwnedUnit),
}

impl Target<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Registered(entry) => entry.name,
            Self::Runtime(owned) => &owned.name,
        }
    }

    /// Runs the unit's lifecycle with a fresh context and derives its report
    /// row.
    fn execute(&mut self, budget: Duration, overhead: i64) -> ReportRow {
        let context = match self {
            Self::Registered(entry) => match entry.unit {
                UnitKind::Function(function) => {
                    let mut context = Context::new(budget);
                    function(&mut context);
                    context
                }
                UnitKind::Fixture(construct) => {
                    let mut unit = construct();
                    run_lifecycle(&mut *unit, budget)
                }
            },
            Self::Runtime(owned) => run_lifecycle(&mut *owned.unit, budget),
        };

        report_row(self.name(), &context, overhead)
    }
}

fn run_lifecycle(unit: &mut dyn Benchmark, budget: Duration) -> Context {
    unit.set_up();
    let mut context = Context::new(budget);
    unit.run(&mut context);
    unit.tear_down();
    context
}

/// Derives a report row, clamping the corrected cost to zero in case the
/// calibration overhead exceeds a cheap unit's raw cost.
fn report_row<C: Clock>(name: &str, context: &Context<C>, overhead: i64) -> ReportRow {
    ReportRow {
        name: name.to_owned(),
        nanos: context.nanos_per_iteration(overhead).max(0) as u64,
        iterations: context.iterations(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fake::FakeClock;

    /// Overhead larger than the raw cost clamps to zero instead of going
    /// negative.
    #[test]
    fn corrected_cost_clamps_to_zero() {
        let step = Duration::from_nanos(100);
        let mut context = Context::with_clock(FakeClock::new(step), 4 * step);
        while context.running() {}

        assert_eq!(context.nanos_per_iteration(0), 100);

        let row = report_row("cheap", &context, 1_000);
        assert_eq!(row.nanos, 0);
        assert_eq!(row.iterations, 4);

        let row = report_row("cheap", &context, 40);
        assert_eq!(row.nanos, 60);
    }
}

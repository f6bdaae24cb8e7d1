#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[doc(inline)]
pub use benchtop_macros::*;

// Used by generated code. Not public API and thus not subject to SemVer.
#[doc(hidden)]
#[path = "private.rs"]
pub mod __private;

mod bench;
mod benchtop;
mod cli;
mod config;
mod entry;
mod painter;
mod time;

pub use crate::{
    bench::{Benchmark, Context, TimedArea},
    benchtop::Benchtop,
    entry::{Entry, UnitKind},
    painter::ReportRow,
    time::{Clock, OsClock},
};

/// Prevents the compiler from optimizing a benchmarked value away.
pub use std::hint::black_box;

/// Runs all registered benchmarks and prints the report table.
///
/// # Examples
///
/// ```no_run
/// use benchtop::Context;
///
/// #[benchtop::bench]
/// fn parse(context: &mut Context) {
///     while context.running() {
///         benchtop::black_box("1234".parse::<u64>());
///     }
/// }
///
/// fn main() {
///     // Run `parse` and any other registered benchmark:
///     benchtop::main();
/// }
/// ```
///
/// See [`Benchtop`] for configuring the run in code instead of through CLI
/// arguments.
pub fn main() {
    Benchtop::default().config_with_args().run_action()
}

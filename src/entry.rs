use std::sync::OnceLock;

use linkme::distributed_slice;

use crate::bench::{Benchmark, Context};

/// Compile-time registered benchmark.
pub struct Entry {
    /// The benchmark's display name.
    pub name: &'static str,

    /// Where the benchmark was defined.
    pub file: &'static str,

    /// Line at which the benchmark was defined.
    pub line: u32,

    /// How to obtain and drive the benchmark.
    pub unit: UnitKind,
}

/// The shape of a registered benchmark.
pub enum UnitKind {
    /// Plain function registered with `#[benchtop::bench]`; no set-up or
    /// tear-down.
    Function(fn(&mut Context)),

    /// Fixture type registered with
    /// [`register_benchmark!`](crate::register_benchmark); constructed fresh
    /// for each run so state never leaks between invocations.
    Fixture(fn() -> Box<dyn Benchmark>),
}

/// Process-lifetime table of registered benchmarks, populated at link time.
#[distributed_slice]
pub static ENTRIES: [Entry] = [..];

/// Registered entries in declaration order.
///
/// The distributed slice's order is link-dependent, so the snapshot sorts by
/// location once and is reused for the rest of the process.
pub(crate) fn registered() -> &'static [&'static Entry] {
    static SNAPSHOT: OnceLock<Vec<&'static Entry>> = OnceLock::new();

    SNAPSHOT.get_or_init(|| {
        let mut entries: Vec<&Entry> = ENTRIES.iter().collect();
        entries.sort_unstable_by_key(|entry| (entry.file, entry.line));
        entries
    })
}

/// Registers a [`Benchmark`](crate::Benchmark) fixture type.
///
/// The type is constructed through [`Default`] for each run. The display name
/// defaults to the type's name and can be overridden with a second argument.
///
/// # Examples
///
/// ```
/// use benchtop::{Benchmark, Context};
///
/// #[derive(Default)]
/// struct Fibonacci;
///
/// impl Benchmark for Fibonacci {
///     fn run(&mut self, context: &mut Context) {
///         while context.running() {
///             benchtop::black_box((0..32u64).fold((0, 1), |(a, b), _| (b, a + b)));
///         }
///     }
/// }
///
/// benchtop::register_benchmark!(Fibonacci, "fib::iterative");
/// ```
#[macro_export]
macro_rules! register_benchmark {
    ($unit:ty) => {
        $crate::register_benchmark!($unit, ::core::stringify!($unit));
    };
    ($unit:ty, $name:expr) => {
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::__private::ENTRIES)]
            #[linkme(crate = $crate::__private::linkme)]
            static __BENCHTOP_BENCH_ENTRY: $crate::__private::Entry = $crate::__private::Entry {
                name: $name,
                file: $crate::__private::std::file!(),
                line: $crate::__private::std::line!(),
                unit: $crate::__private::UnitKind::Fixture(|| {
                    $crate::__private::std::boxed::Box::new(
                        <$unit as $crate::__private::std::default::Default>::default(),
                    )
                }),
            };
        };
    };
}

//! Link-time registration through `#[benchtop::bench]` and
//! `register_benchmark!`.

use std::time::Duration;

use benchtop::{Benchmark, Benchtop, Context};

const BUDGET: Duration = Duration::from_millis(1);

#[benchtop::bench]
fn spin(context: &mut Context) {
    while context.running() {
        benchtop::black_box(0u64);
    }
}

#[benchtop::bench(name = "named::alias")]
fn aliased(context: &mut Context) {
    while context.running() {}
}

#[derive(Default)]
struct Fixture {
    ready: bool,
}

impl Benchmark for Fixture {
    fn set_up(&mut self) {
        self.ready = true;
    }

    fn run(&mut self, context: &mut Context) {
        // A fixture must always be set up before it runs.
        assert!(self.ready);
        while context.running() {}
    }

    fn tear_down(&mut self) {
        self.ready = false;
    }
}

benchtop::register_benchmark!(Fixture);

#[test]
fn registered_entries_run_in_declaration_order() {
    let rows = Benchtop::default().budget(BUDGET).run();

    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["spin", "named::alias", "Fixture"]);
    assert!(rows.iter().all(|row| row.iterations >= 1));
}

#[test]
fn glob_filter_applies_to_registered_entries() {
    let rows = Benchtop::default().budget(BUDGET).filter_glob("named*").run();

    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, ["named::alias"]);
}

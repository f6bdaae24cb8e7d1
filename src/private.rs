// Used by macro-generated code. Not public API and thus not subject to
// SemVer.

pub use std::{self, default::Default, option::Option::*};

pub use linkme;

pub use crate::{
    bench::Benchmark,
    entry::{Entry, UnitKind, ENTRIES},
};

use std::fmt::{self, Write};
use std::io::IsTerminal;

use crate::config::ColorChoice;

/// One line of the final report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    /// Display name of the benchmark.
    pub name: String,

    /// Corrected cost of one iteration in nanoseconds, clamped to zero.
    pub nanos: u64,

    /// Number of iterations the measurement loop completed.
    pub iterations: u64,
}

const NAME_HEADER: &str = "name";
const NANOS_HEADER: &str = "nanoseconds";
const ITERS_HEADER: &str = "iterations";

/// Column gap, in spaces.
const GAP: usize = 2;

/// ANSI SGR codes matching the report palette.
const GREEN: u8 = 32;
const YELLOW: u8 = 33;
const CYAN: u8 = 36;

/// Paints the report table to stdout.
pub(crate) struct TablePainter {
    /// Width of the name column: the longest surviving name, but never
    /// narrower than its heading.
    name_width: usize,

    colored: bool,

    /// Buffer reused across rows.
    write_buf: String,
}

impl TablePainter {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>, color: ColorChoice) -> Self {
        let name_width = names
            .into_iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(NAME_HEADER.len());

        let colored = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal(),
        };

        Self { name_width, colored, write_buf: String::new() }
    }

    /// Prints the heading line and the dash rule under it.
    pub fn header(&mut self) {
        let name_width = self.name_width;
        println!("{NAME_HEADER:<name_width$}  {NANOS_HEADER}  {ITERS_HEADER}");

        let rule_width = name_width + GAP + NANOS_HEADER.len() + GAP + ITERS_HEADER.len();
        println!("{:-<rule_width$}", "");
    }

    /// Prints one benchmark's row: name left-aligned, numbers right-aligned
    /// under their headings.
    pub fn row(&mut self, row: &ReportRow) {
        let name_width = self.name_width;
        let colored = self.colored;

        let buf = &mut self.write_buf;
        buf.clear();

        paint(buf, colored, GREEN, format_args!("{:<name_width$}", row.name));
        buf.push_str("  ");
        paint(buf, colored, YELLOW, format_args!("{:>width$}", row.nanos, width = NANOS_HEADER.len()));
        buf.push_str("  ");
        paint(buf, colored, CYAN, format_args!("{:>width$}", row.iterations, width = ITERS_HEADER.len()));

        println!("{buf}");
    }
}

/// Appends `args` to `buf`, wrapped in an SGR color when enabled.
fn paint(buf: &mut String, colored: bool, code: u8, args: fmt::Arguments) {
    if colored {
        _ = write!(buf, "\x1b[{code}m");
    }
    _ = buf.write_fmt(args);
    if colored {
        buf.push_str("\x1b[0m");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_column_fits_longest_name() {
        let painter = TablePainter::new(["a", "long_benchmark_name", "bc"], ColorChoice::Never);
        assert_eq!(painter.name_width, "long_benchmark_name".len());
    }

    #[test]
    fn name_column_never_narrower_than_heading() {
        let painter = TablePainter::new(["ab"], ColorChoice::Never);
        assert_eq!(painter.name_width, NAME_HEADER.len());

        let painter = TablePainter::new(std::iter::empty::<&str>(), ColorChoice::Never);
        assert_eq!(painter.name_width, NAME_HEADER.len());
    }

    #[test]
    fn uncolored_cells_are_plain() {
        let mut buf = String::new();
        paint(&mut buf, false, GREEN, format_args!("{:<6}", "abc"));
        assert_eq!(buf, "abc   ");

        buf.clear();
        paint(&mut buf, true, GREEN, format_args!("abc"));
        assert_eq!(buf, "\x1b[32mabc\x1b[0m");
    }
}

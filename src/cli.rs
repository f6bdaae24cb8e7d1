use clap::{value_parser, Arg, ArgAction, ColorChoice, Command};

use crate::config::{Action, Filter};

pub(crate) struct CliArgs {
    pub filter: Option<Filter>,
    pub action: Action,
    pub color: ColorChoice,
}

fn command() -> Command {
    fn ignored_flag(name: &'static str) -> Arg {
        Arg::new(name).long(name).num_args(0).hide(true)
    }

    Command::new("benchtop")
        .arg(
            Arg::new("filter")
                .long("filter")
                .value_name("PATTERN")
                .help("If specified, only run benches whose names match this glob pattern"),
        )
        .arg(
            Arg::new("exact")
                .long("exact")
                .help("Exactly match PATTERN rather than treating it as a glob")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Lists benchmarks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("color")
                .long("color")
                .value_name("WHEN")
                .help("Controls when to use colors")
                .value_parser(value_parser!(ColorChoice))
                .default_value("auto"),
        )
        // Tolerated so `cargo bench` harness arguments don't error:
        .args([ignored_flag("bench"), ignored_flag("nocapture")])
}

impl CliArgs {
    /// Parses the process argument list.
    ///
    /// A malformed filter pattern is a fatal configuration error: it is
    /// reported through clap and exits non-zero before any benchmark runs.
    pub fn parse() -> Self {
        let mut command = command();
        let matches = command.get_matches_mut();

        CliArgs {
            filter: matches.get_one::<String>("filter").map(|pattern| {
                if matches.get_flag("exact") {
                    Filter::Exact(pattern.clone())
                } else {
                    match Filter::glob(pattern) {
                        Ok(filter) => filter,
                        Err(error) => {
                            let kind = clap::error::ErrorKind::ValueValidation;
                            command.error(kind, error).exit();
                        }
                    }
                }
            }),
            action: if matches.get_flag("list") {
                Action::List
            } else {
                Action::Bench
            },
            color: matches.get_one("color").copied().unwrap_or_default(),
        }
    }
}

pub use clap::ColorChoice;
use regex::Regex;

/// The primary action to perform.
#[derive(Clone, Copy, Default)]
pub(crate) enum Action {
    /// Run benchmark loops and report.
    #[default]
    Bench,

    /// List matching benchmarks without running them.
    List,
}

/// Filters which benchmarks to run based on name.
pub(crate) enum Filter {
    Regex(Regex),
    Exact(String),
}

impl Filter {
    /// Compiles a glob-like pattern where `*` matches any sequence of
    /// characters.
    ///
    /// The translated pattern must match the whole name: `"foo"` matches only
    /// the literal name `foo`, while `"*foo*"` matches any name containing
    /// `foo`. Everything other than `*` passes through to the regex engine,
    /// so an unparsable remainder surfaces as an error rather than an empty
    /// match set. An empty pattern matches every name.
    pub fn glob(pattern: &str) -> Result<Self, regex::Error> {
        let translated = if pattern.is_empty() {
            ".*".to_owned()
        } else {
            pattern.replace('*', ".*")
        };

        Regex::new(&format!("^(?:{translated})$")).map(Self::Regex)
    }

    /// Returns `true` if a benchmark name matches this filter.
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(name),
            Self::Exact(exact) => exact == name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An absent or empty pattern must run everything.
    #[test]
    fn empty_pattern_matches_all() {
        let filter = Filter::glob("").unwrap();

        assert!(filter.is_match("abc"));
        assert!(filter.is_match(""));
        assert!(filter.is_match("a::b"));
    }

    #[test]
    fn literal_pattern_matches_whole_name() {
        let filter = Filter::glob("foo").unwrap();

        assert!(filter.is_match("foo"));
        assert!(!filter.is_match("foobar"));
        assert!(!filter.is_match("xfoo"));
    }

    #[test]
    fn star_matches_any_sequence() {
        let contains = Filter::glob("*foo*").unwrap();
        assert!(contains.is_match("foo"));
        assert!(contains.is_match("xfooy"));
        assert!(!contains.is_match("fo"));

        let prefix = Filter::glob("A*").unwrap();
        assert!(prefix.is_match("A"));
        assert!(prefix.is_match("AB"));
        assert!(!prefix.is_match("BA"));
    }

    #[test]
    fn unparsable_pattern_is_an_error() {
        assert!(Filter::glob("fo[o").is_err());
        assert!(Filter::glob("(foo").is_err());
    }

    #[test]
    fn exact_filter_compares_literally() {
        let filter = Filter::Exact("a*b".to_owned());

        assert!(filter.is_match("a*b"));
        assert!(!filter.is_match("axb"));
    }
}

/// Boring-input filter.
///
/// Generated programs that are empty, whitespace/semicolon-only, or contain
/// a legacy `with` construct are overwhelmingly likely to carry no test
/// signal, so they are discarded before ever reaching the formatter. The
/// predicate is an empirically tuned heuristic, not load-bearing logic —
/// hence it is a plain configurable regex.
use regex::Regex;

pub const DEFAULT_BORING_PATTERN: &str = r"^[\s;]*$|with";

pub struct BoringFilter {
    pattern: Regex,
}

impl BoringFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(BoringFilter {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_boring(&self, source: &str) -> bool {
        self.pattern.is_match(source)
    }
}

impl Default for BoringFilter {
    fn default() -> Self {
        // The default pattern is a valid regex.
        BoringFilter::new(DEFAULT_BORING_PATTERN).unwrap()
    }
}

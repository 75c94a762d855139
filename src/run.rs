/// The generate→filter→format→compare loop.
///
/// One [`Runner::iteration`] is a full pass: pull a program, filter it,
/// format it twice under the same sampled options, classify. The loop is
/// unbounded by design — fuzzing runs until something interesting turns up
/// or the operator interrupts — so every pass returns an explicit
/// [`LoopOutcome`] rather than recursing.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::diff::render_char_diff;
use crate::filter::BoringFilter;
use crate::generate::Generate;
use crate::options::FormatOptions;
use crate::oracle::{FormatOutcome, Oracle};

/// How one reportable iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Both passes succeeded and the outputs are byte-identical.
    Success,
    /// Either pass failed.
    Error,
    /// Both passes succeeded but the outputs differ: an idempotence break.
    Diff,
}

/// Everything the report and the corpus need about one finished iteration.
#[derive(Debug)]
pub struct RunResult {
    pub tries: u64,
    pub program: String,
    pub options: FormatOptions,
    pub first: FormatOutcome,
    /// Absent when the first pass failed — there is nothing to re-format.
    pub second: Option<FormatOutcome>,
    pub classification: Classification,
    /// Rendered character diff, present only on `Diff`.
    pub diff: Option<String>,
}

/// Explicit per-pass outcome of the loop body.
enum LoopOutcome {
    Continue,
    Report(RunResult),
}

/// Normal fuzzing, or deterministic replay of a persisted finding.
pub enum Mode {
    Fuzz,
    Reproduce {
        program: String,
        options: FormatOptions,
    },
}

impl Mode {
    fn is_reproduce(&self) -> bool {
        matches!(self, Mode::Reproduce { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub max_depth: u32,
    pub show_successes: bool,
    pub show_initial_parse_errors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            max_depth: 7,
            show_successes: false,
            show_initial_parse_errors: false,
        }
    }
}

pub struct Runner<O, G> {
    oracle: O,
    generator: G,
    filter: BoringFilter,
    config: RunConfig,
    mode: Mode,
    rng: StdRng,
    tries: u64,
}

impl<O: Oracle, G: Generate> Runner<O, G> {
    pub fn new(oracle: O, generator: G, filter: BoringFilter, config: RunConfig, mode: Mode) -> Self {
        let seed = rand::rng().random();
        Runner::with_seed(oracle, generator, filter, config, mode, seed)
    }

    /// Like [`Runner::new`] but with a pinned option-sampler seed.
    pub fn with_seed(
        oracle: O,
        generator: G,
        filter: BoringFilter,
        config: RunConfig,
        mode: Mode,
        seed: u64,
    ) -> Self {
        Runner {
            oracle,
            generator,
            filter,
            config,
            mode,
            rng: StdRng::seed_from_u64(seed),
            tries: 0,
        }
    }

    /// Run until a reportable iteration. Unbounded: the caller (or the
    /// operator's ^C) is the only stop besides a report.
    pub fn run(&mut self) -> RunResult {
        loop {
            match self.iteration() {
                LoopOutcome::Continue => {}
                LoopOutcome::Report(result) => return result,
            }
        }
    }

    /// Run at most `max_tries` iterations; `None` when every one of them was
    /// discarded. Exists so the discard paths are testable without hanging.
    pub fn run_capped(&mut self, max_tries: u64) -> Option<RunResult> {
        for _ in 0..max_tries {
            if let LoopOutcome::Report(result) = self.iteration() {
                return Some(result);
            }
        }
        None
    }

    fn iteration(&mut self) -> LoopOutcome {
        self.tries += 1;
        let reproduce = self.mode.is_reproduce();

        let (program, options) = match &self.mode {
            Mode::Reproduce { program, options } => (program.clone(), options.clone()),
            Mode::Fuzz => {
                let program = self.generator.generate(self.config.max_depth);
                // A replayed input is by definition interesting; the filter
                // only guards freshly generated programs.
                if self.filter.is_boring(&program) {
                    debug!(tries = self.tries, "discarded boring program");
                    return LoopOutcome::Continue;
                }
                (program, FormatOptions::sample(&mut self.rng))
            }
        };

        let first = self.oracle.format(&program, &options);

        if let Err(err) = &first {
            // A syntax rejection of a generated program is the generator's
            // fault, not the formatter's; discard unless the operator asked
            // to see these or is replaying.
            if err.is_syntax() && !reproduce && !self.config.show_initial_parse_errors {
                debug!(tries = self.tries, "discarded generated program the formatter rejected");
                return LoopOutcome::Continue;
            }
        }

        // The second input is the formatter's own prior output, so any
        // failure here is a formatter defect regardless of kind.
        let second = first
            .as_ref()
            .ok()
            .map(|formatted| self.oracle.format(formatted, &options));

        let classification = classify(&first, second.as_ref());

        let reportable = classification != Classification::Success
            || self.config.show_successes
            || reproduce;
        if !reportable {
            return LoopOutcome::Continue;
        }

        let diff = match (&classification, &first, &second) {
            (Classification::Diff, Ok(out1), Some(Ok(out2))) => {
                Some(render_char_diff(out1, out2))
            }
            _ => None,
        };

        LoopOutcome::Report(RunResult {
            tries: self.tries,
            program,
            options,
            first,
            second,
            classification,
            diff,
        })
    }
}

/// Exactly one classification per iteration: `Error` if either pass failed,
/// `Diff` if both succeeded with different bytes, `Success` otherwise.
fn classify(first: &FormatOutcome, second: Option<&FormatOutcome>) -> Classification {
    match (first, second) {
        (Err(_), _) | (_, Some(Err(_))) => Classification::Error,
        (Ok(out1), Some(Ok(out2))) if out1 != out2 => Classification::Diff,
        _ => Classification::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleError;

    #[test]
    fn classify_is_total_and_exclusive() {
        let ok = |s: &str| -> FormatOutcome { Ok(s.to_string()) };
        let err = || -> FormatOutcome { Err(OracleError::Internal("boom".into())) };

        assert_eq!(classify(&ok("a"), Some(&ok("a"))), Classification::Success);
        assert_eq!(classify(&ok("a"), Some(&ok("b"))), Classification::Diff);
        assert_eq!(classify(&ok("a"), Some(&err())), Classification::Error);
        assert_eq!(classify(&err(), None), Classification::Error);
    }
}

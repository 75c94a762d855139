/// The formatter oracle boundary.
///
/// The formatter under test is a black box: `format(source, options)` either
/// yields formatted text or fails. Whatever heterogeneous failure the
/// embodiment produces is normalized here into a closed two-kind enum, so
/// the run controller only ever reasons about "the input was rejected as
/// invalid syntax" vs "the formatter itself broke".
use std::io::Write;
use std::process::{Command, Stdio};

use regex::Regex;
use thiserror::Error;

use crate::options::FormatOptions;

/// A formatter failure, normalized at the boundary.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// The formatter rejected the input as syntactically invalid. On a
    /// first pass this is usually the generator's fault and is discardable;
    /// on a second pass it is always a formatter defect.
    #[error("input rejected as invalid syntax:\n{0}")]
    InputSyntax(String),
    /// Any other failure: crash, non-syntax error, unspawnable process.
    #[error("formatter failed:\n{0}")]
    Internal(String),
}

impl OracleError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, OracleError::InputSyntax(_))
    }

    /// The captured detail (stderr, spawn error) without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            OracleError::InputSyntax(d) | OracleError::Internal(d) => d,
        }
    }
}

/// Result of one format pass.
pub type FormatOutcome = Result<String, OracleError>;

/// The formatter under test.
pub trait Oracle {
    fn format(&self, source: &str, options: &FormatOptions) -> FormatOutcome;
}

pub const DEFAULT_SYNTAX_ERROR_PATTERN: &str = "SyntaxError";

/// Production oracle: drives an external formatter process. The source goes
/// in on stdin, the options as kebab-case flags, the formatted text comes
/// back on stdout. A non-zero exit is a failure; stderr matching the
/// (tunable) syntax-error pattern classifies it as an input rejection.
pub struct CommandOracle {
    program: String,
    base_args: Vec<String>,
    syntax_error: Regex,
}

impl CommandOracle {
    pub fn new(
        program: impl Into<String>,
        base_args: Vec<String>,
        syntax_error_pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(CommandOracle {
            program: program.into(),
            base_args,
            syntax_error: Regex::new(syntax_error_pattern)?,
        })
    }
}

impl Oracle for CommandOracle {
    fn format(&self, source: &str, options: &FormatOptions) -> FormatOutcome {
        let spawned = Command::new(&self.program)
            .args(&self.base_args)
            .args(options.cli_flags())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .and_then(|mut child| {
                // The child may exit before consuming all of stdin (e.g. on
                // a parse error); a broken pipe here is not itself a fault.
                if let Some(mut stdin) = child.stdin.take() {
                    let _ = stdin.write_all(source.as_bytes());
                }
                child.wait_with_output()
            });

        let output = match spawned {
            Ok(output) => output,
            Err(e) => {
                return Err(OracleError::Internal(format!(
                    "failed to run `{}`: {e}",
                    self.program
                )));
            }
        };

        if output.status.success() {
            match String::from_utf8(output.stdout) {
                Ok(text) => Ok(text),
                Err(_) => Err(OracleError::Internal(format!(
                    "`{}` produced non-UTF-8 output",
                    self.program
                ))),
            }
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            let detail = format!("`{}` exited with {}\n{stderr}", self.program, output.status);
            if self.syntax_error.is_match(&stderr) {
                Err(OracleError::InputSyntax(detail))
            } else {
                Err(OracleError::Internal(detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Dialect;

    fn opts() -> FormatOptions {
        FormatOptions {
            print_width: 80,
            tab_width: 4,
            single_quote: false,
            trailing_comma: true,
            bracket_spacing: true,
            parser: Dialect::Babylon,
        }
    }

    #[test]
    fn identity_command_round_trips_stdin() {
        // `sh -c cat` ignores the option flags (they land in $@).
        let oracle =
            CommandOracle::new("sh", vec!["-c".into(), "cat".into()], DEFAULT_SYNTAX_ERROR_PATTERN)
                .unwrap();
        let out = oracle.format("var a = 1;\n", &opts()).unwrap();
        assert_eq!(out, "var a = 1;\n");
    }

    #[test]
    fn stderr_pattern_classifies_syntax_rejection() {
        let oracle = CommandOracle::new(
            "sh",
            vec!["-c".into(), "echo 'SyntaxError: nope' >&2; exit 2".into()],
            DEFAULT_SYNTAX_ERROR_PATTERN,
        )
        .unwrap();
        let err = oracle.format("x;", &opts()).unwrap_err();
        assert!(err.is_syntax());
        assert!(err.detail().contains("SyntaxError: nope"));
    }

    #[test]
    fn other_failures_are_internal() {
        let oracle = CommandOracle::new(
            "sh",
            vec!["-c".into(), "echo 'segfault' >&2; exit 1".into()],
            DEFAULT_SYNTAX_ERROR_PATTERN,
        )
        .unwrap();
        let err = oracle.format("x;", &opts()).unwrap_err();
        assert!(!err.is_syntax());
    }

    #[test]
    fn unspawnable_program_is_internal() {
        let oracle = CommandOracle::new(
            "definitely-not-a-real-formatter-binary",
            vec![],
            DEFAULT_SYNTAX_ERROR_PATTERN,
        )
        .unwrap();
        let err = oracle.format("x;", &opts()).unwrap_err();
        assert!(!err.is_syntax());
    }
}

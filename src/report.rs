/// Report assembly.
///
/// Everything the operator sees after a reportable iteration is built here
/// as one string: the input in a line-numbered frame, the diff or the
/// formatted output, per-pass error detail, the options, a colored status
/// line with the try count, and a reproduction hint. Ambient process state
/// (terminal width, corpus location, formatter identity) arrives through
/// [`ReportConfig`] so the assembler stays testable in isolation.
use colored::Colorize;

use crate::run::{Classification, RunResult};

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Separator width; the CLI resolves this from `$COLUMNS`.
    pub columns: usize,
    /// Path of the persisted program, shown in the reproduction command.
    pub program_path: String,
    /// The formatter the reproduction command should invoke.
    pub formatter: String,
    pub reproduce: bool,
}

pub fn render(result: &RunResult, config: &ReportConfig) -> String {
    let separator = "─".repeat(config.columns);

    let mut parts: Vec<String> = Vec::new();
    parts.push(frame(&result.program));
    parts.push(separator.clone());

    match (&result.diff, &result.first) {
        (Some(diff), _) => parts.push(diff.clone()),
        (None, Ok(out1)) if result.classification == Classification::Success => {
            parts.push(frame(out1));
        }
        _ => {}
    }

    if let Err(err) = &result.first {
        parts.push(error_block(1, err.detail()));
    }
    if let Some(Err(err)) = &result.second {
        parts.push(error_block(2, err.detail()));
    }

    parts.push(separator.clone());
    parts.push(result.options.to_json_pretty());
    parts.push(separator);
    parts.push(message(result, config));
    parts.push(reproduction_command(result, config));

    parts.join("\n")
}

/// Plain line-numbered frame. Syntax highlighting proper is an external
/// concern; line numbers are enough to anchor error detail to the input.
fn frame(text: &str) -> String {
    let trimmed = text.strip_suffix('\n').unwrap_or(text);
    let width = trimmed.lines().count().to_string().len().max(1);
    trimmed
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>width$} | {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn error_block(pass: u32, detail: &str) -> String {
    format!("format pass {pass} error:\n{detail}")
}

fn message(result: &RunResult, config: &ReportConfig) -> String {
    let status = match result.classification {
        Classification::Diff => "Diff".red(),
        Classification::Error => "Error".red(),
        Classification::Success => "Success".green(),
    };
    let tries = result.tries;
    let noun = if tries == 1 { "try" } else { "tries" };
    let hint = if config.reproduce {
        "Reproduced with `--reproduce`. You can also play with:"
    } else {
        "Add `--reproduce` to reproduce, or play with:"
    };
    format!("{status} after {tries} {noun}. {hint}")
}

fn reproduction_command(result: &RunResult, config: &ReportConfig) -> String {
    let flags = result.options.cli_flags().join(" ");
    format!("{} {} {flags}", config.formatter, config.program_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Dialect, FormatOptions};
    use crate::oracle::OracleError;

    fn options() -> FormatOptions {
        FormatOptions {
            print_width: 42,
            tab_width: 2,
            single_quote: false,
            trailing_comma: true,
            bracket_spacing: true,
            parser: Dialect::Babylon,
        }
    }

    fn config() -> ReportConfig {
        ReportConfig {
            columns: 10,
            program_path: "corpus/random.js".to_string(),
            formatter: "prettier".to_string(),
            reproduce: false,
        }
    }

    fn success_result() -> RunResult {
        RunResult {
            tries: 3,
            program: "var a = 1;\n".to_string(),
            options: options(),
            first: Ok("var a = 1;\n".to_string()),
            second: Some(Ok("var a = 1;\n".to_string())),
            classification: Classification::Success,
            diff: None,
        }
    }

    #[test]
    fn success_report_shows_output_and_try_count() {
        colored::control::set_override(false);
        let report = render(&success_result(), &config());
        colored::control::unset_override();

        assert!(report.contains("1 | var a = 1;"));
        assert!(report.contains("Success after 3 tries."));
        assert!(report.contains("prettier corpus/random.js --print-width=42"));
        assert!(report.contains("\"printWidth\": 42"));
        assert!(report.contains(&"─".repeat(10)));
    }

    #[test]
    fn error_report_includes_pass_detail() {
        colored::control::set_override(false);
        let mut result = success_result();
        result.first = Err(OracleError::Internal("stack trace here".into()));
        result.second = None;
        result.classification = Classification::Error;
        result.tries = 1;
        let report = render(&result, &config());
        colored::control::unset_override();

        assert!(report.contains("format pass 1 error:\nstack trace here"));
        assert!(report.contains("Error after 1 try."));
    }

    #[test]
    fn diff_report_embeds_rendered_diff() {
        let mut result = success_result();
        result.second = Some(Ok("var a = 1; // x\n".to_string()));
        result.classification = Classification::Diff;
        result.diff = Some("THE-DIFF".to_string());

        colored::control::set_override(false);
        let report = render(&result, &config());
        colored::control::unset_override();

        assert!(report.contains("THE-DIFF"));
    }

    #[test]
    fn reproduce_mode_changes_the_hint() {
        let mut cfg = config();
        cfg.reproduce = true;
        colored::control::set_override(false);
        let report = render(&success_result(), &cfg);
        colored::control::unset_override();
        assert!(report.contains("Reproduced with `--reproduce`."));
    }
}

/// Corpus persistence and replay loading.
///
/// Only the most recent reportable run survives: the five files below live
/// at fixed paths and are unconditionally overwritten. Each file is written
/// atomically (temp file in the same directory, then rename) so an
/// interrupt never leaves a half-written artifact, and writes happen in a
/// fixed order — input, outputs, options — so a reader polling the
/// directory never sees options without a matching input.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::options::FormatOptions;
use crate::oracle::FormatOutcome;
use crate::run::RunResult;

/// Sentinel persisted in place of a pass's output when that pass failed.
pub const ERROR_SENTINEL: &str = "<error>";

pub struct Corpus {
    dir: PathBuf,
}

impl Corpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Corpus { dir: dir.into() }
    }

    /// The persisted (or replayed) program.
    pub fn program_path(&self) -> PathBuf {
        self.dir.join("random.js")
    }

    /// Duplicate of the program, so manual triage that clobbers `random.js`
    /// can still recover the original.
    pub fn backup_path(&self) -> PathBuf {
        self.dir.join("random.backup.js")
    }

    pub fn first_output_path(&self) -> PathBuf {
        self.dir.join("formatted.1.js")
    }

    pub fn second_output_path(&self) -> PathBuf {
        self.dir.join("formatted.2.js")
    }

    pub fn options_path(&self) -> PathBuf {
        self.dir.join("options.json")
    }

    /// Persist a reportable run. Write order is part of the contract.
    pub fn store(&self, result: &RunResult) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create corpus dir {}", self.dir.display()))?;

        self.write_atomic(&self.program_path(), &result.program)?;
        self.write_atomic(&self.backup_path(), &result.program)?;
        self.write_atomic(&self.first_output_path(), outcome_text(Some(&result.first)))?;
        self.write_atomic(&self.second_output_path(), outcome_text(result.second.as_ref()))?;
        self.write_atomic(&self.options_path(), &result.options.to_json_pretty())?;
        Ok(())
    }

    /// Load the program/options pair for reproduction mode.
    pub fn load(&self) -> Result<(String, FormatOptions)> {
        let program_path = self.program_path();
        let program = fs::read_to_string(&program_path)
            .with_context(|| format!("failed to read {}", program_path.display()))?;

        let options_path = self.options_path();
        let raw = fs::read_to_string(&options_path)
            .with_context(|| format!("failed to read {}", options_path.display()))?;
        let options: FormatOptions = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", options_path.display()))?;

        Ok((program, options))
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(contents.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        // "If a file exists at the target path, persist will atomically replace it."
        tmp.persist(path)
            .map_err(|error| error.error)
            .with_context(|| format!("failed to persist {}", path.display()))?;
        Ok(())
    }
}

fn outcome_text(outcome: Option<&FormatOutcome>) -> &str {
    match outcome {
        Some(Ok(text)) => text,
        _ => ERROR_SENTINEL,
    }
}

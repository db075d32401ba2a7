//! Batch size selection
//!
//! The exporter takes the batch size as a plain argument; this module turns
//! the command line (`--batch-size`, `--preset`) or an interactive menu into
//! that number.

use crate::config::MAX_BATCH_SIZE;
use crate::core::export::BatchSizePreset;
use crate::domain::{QuarryError, Result};
use std::io::{BufRead, Write};

/// Where the batch size comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSizeChoice {
    /// `--batch-size N`
    Explicit(u64),
    /// `--preset small|medium|large`
    Preset(BatchSizePreset),
    /// Ask on the terminal
    Interactive,
    /// Configured default
    Default,
}

impl BatchSizeChoice {
    /// Pick the source of the batch size from the command-line flags
    pub fn from_args(explicit: Option<u64>, preset: Option<BatchSizePreset>, interactive: bool) -> Self {
        match (explicit, preset) {
            (Some(size), _) => BatchSizeChoice::Explicit(size),
            (None, Some(preset)) => BatchSizeChoice::Preset(preset),
            (None, None) if interactive => BatchSizeChoice::Interactive,
            (None, None) => BatchSizeChoice::Default,
        }
    }
}

/// Resolve the batch size, prompting through `input`/`output` if needed
///
/// # Errors
///
/// Returns [`QuarryError::Validation`] for an explicit size outside
/// `1..=MAX_BATCH_SIZE`, or an I/O error from the prompt.
pub fn resolve_batch_size<R: BufRead, W: Write>(
    choice: BatchSizeChoice,
    default: u64,
    input: R,
    output: W,
) -> Result<u64> {
    match choice {
        BatchSizeChoice::Explicit(size) => {
            if !(1..=MAX_BATCH_SIZE).contains(&size) {
                return Err(QuarryError::Validation(format!(
                    "--batch-size must be between 1 and {MAX_BATCH_SIZE}, got {size}"
                )));
            }
            Ok(size)
        }
        BatchSizeChoice::Preset(preset) => Ok(preset.rows()),
        BatchSizeChoice::Interactive => prompt_batch_size(input, output, default),
        BatchSizeChoice::Default => Ok(default),
    }
}

/// Show the preset menu and read one choice
pub fn prompt_batch_size<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    default: u64,
) -> Result<u64> {
    writeln!(output, "Choose a batch size:")?;
    for (i, preset) in BatchSizePreset::ALL.iter().enumerate() {
        writeln!(
            output,
            "  {}) {:<6} {:>7} rows ({})",
            i + 1,
            preset.to_string(),
            preset.rows(),
            preset.description()
        )?;
    }
    write!(output, "Choice [default {default} rows]: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_menu_choice(&line, default))
}

/// Map a menu answer to a batch size; anything unrecognised means `default`
pub fn parse_menu_choice(answer: &str, default: u64) -> u64 {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        if let Some(preset) = index.checked_sub(1).and_then(|i| BatchSizePreset::ALL.get(i)) {
            return preset.rows();
        }
    }
    match answer.parse::<BatchSizePreset>() {
        Ok(preset) => preset.rows(),
        Err(_) => {
            if !answer.is_empty() {
                tracing::warn!(answer = %answer, default = default, "Invalid choice, using default batch size");
            }
            default
        }
    }
}

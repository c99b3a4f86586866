//! Batch extraction over a glob of input files
//!
//! Each file is an independent task: decode, extract, encode. Tasks run on a
//! rayon pool and every one ends in a [`FileOutcome`]; a file that fails to
//! decode or encode never aborts the rest of the batch.

use crate::config::{BatchConfig, ExtractConfig};
use crate::error::ExtractError;
use crate::io::{decode_audio, decoder::is_wav, encode_wav};
use crate::{extract_loudest_section, Extraction};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of processing one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Loudest section written to `output`
    Saved {
        /// Input file
        input: PathBuf,
        /// Written file
        output: PathBuf,
        /// Start frame of the section
        offset: usize,
        /// Section length in frames
        window_length: usize,
        /// Start of the section in seconds
        start_seconds: f64,
        /// Energy of the section
        peak: f64,
    },
    /// Loudest window below the threshold; no file written
    Skipped {
        /// Input file
        input: PathBuf,
        /// Energy of the loudest window
        peak: f64,
        /// Energy threshold
        threshold: f64,
    },
    /// Decoding, extraction or encoding failed
    Failed {
        /// Input file
        input: PathBuf,
        /// Error description
        error: String,
    },
}

impl FileOutcome {
    /// Input file this outcome belongs to
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Saved { input, .. }
            | FileOutcome::Skipped { input, .. }
            | FileOutcome::Failed { input, .. } => input,
        }
    }
}

/// Aggregated outcome of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Per-file outcomes, in input order
    pub outcomes: Vec<FileOutcome>,
    /// Files written
    pub saved: usize,
    /// Files skipped as too quiet
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
    /// Wall-clock time of the whole batch
    pub wall_time_ms: f64,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<FileOutcome>, wall_time_ms: f64) -> Self {
        let count = |pred: fn(&FileOutcome) -> bool| outcomes.iter().filter(|o| pred(o)).count();
        let saved = count(|o| matches!(o, FileOutcome::Saved { .. }));
        let skipped = count(|o| matches!(o, FileOutcome::Skipped { .. }));
        let failed = count(|o| matches!(o, FileOutcome::Failed { .. }));

        Self {
            outcomes,
            saved,
            skipped,
            failed,
            wall_time_ms,
        }
    }
}

/// Expand a glob pattern into a sorted list of files
///
/// Directories matched by the pattern are ignored; unreadable entries are
/// logged and ignored.
///
/// # Errors
///
/// Returns `ExtractError::InvalidInput` if the pattern is malformed
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>, ExtractError> {
    let entries = glob::glob(pattern).map_err(|e| {
        ExtractError::InvalidInput(format!("Invalid glob pattern '{}': {}", pattern, e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Cannot read '{}': {}", e.path().display(), e.error()),
        }
    }
    files.sort();

    Ok(files)
}

/// Output path for an input file: `output_dir/<file name>`
///
/// Output is always WAV, so inputs in other containers get a `.wav` extension.
///
/// # Errors
///
/// Returns `ExtractError::InvalidInput` if the input has no file name
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf, ExtractError> {
    let name = input.file_name().ok_or_else(|| {
        ExtractError::InvalidInput(format!("No file name in '{}'", input.display()))
    })?;

    let output = output_dir.join(name);
    if is_wav(input) {
        Ok(output)
    } else {
        Ok(output.with_extension("wav"))
    }
}

/// Decode, extract and encode a single file
///
/// # Errors
///
/// Propagates decoding, extraction and encoding errors
pub fn extract_file(
    input: &Path,
    output: &Path,
    config: &ExtractConfig,
) -> Result<FileOutcome, ExtractError> {
    let buffer = decode_audio(input)?;

    match extract_loudest_section(&buffer, config)? {
        Extraction::Selected(section) => {
            encode_wav(output, &section.segment)?;
            log::info!("Saved to '{}'", output.display());
            Ok(FileOutcome::Saved {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                offset: section.offset,
                window_length: section.window_length,
                start_seconds: section.start_seconds(),
                peak: section.peak,
            })
        }
        Extraction::Skipped { peak, threshold } => {
            log::info!(
                "Skipped '{}' as too quiet ({:.3} < {:.3})",
                input.display(),
                peak,
                threshold
            );
            Ok(FileOutcome::Skipped {
                input: input.to_path_buf(),
                peak,
                threshold,
            })
        }
    }
}

/// Process every file matching `pattern` into `output_dir`
///
/// # Errors
///
/// Returns an error only for batch-level problems (invalid configuration,
/// malformed pattern, output directory creation, thread pool); per-file
/// problems are reported as `FileOutcome::Failed`
pub fn run_batch(
    pattern: &str,
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<BatchReport, ExtractError> {
    let inputs = expand_inputs(pattern)?;
    log::debug!("Pattern '{}' matched {} files", pattern, inputs.len());
    run_batch_on(&inputs, output_dir, config)
}

/// Process an explicit list of input files into `output_dir`
///
/// Two inputs that map to the same output file are not both written: the
/// first (in list order) wins and the others fail.
pub fn run_batch_on(
    inputs: &[PathBuf],
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<BatchReport, ExtractError> {
    config.validate()?;
    let t0 = Instant::now();

    let mut claimed = HashSet::new();
    let tasks: Vec<(PathBuf, Result<PathBuf, ExtractError>)> = inputs
        .iter()
        .map(|input| {
            let output = output_path_for(input, output_dir).and_then(|output| {
                if claimed.insert(output.clone()) {
                    Ok(output)
                } else {
                    Err(ExtractError::InvalidInput(format!(
                        "Output '{}' already produced by another input",
                        output.display()
                    )))
                }
            });
            (input.clone(), output)
        })
        .collect();

    let output_dirs: BTreeSet<&Path> = tasks
        .iter()
        .filter_map(|(_, output)| output.as_ref().ok())
        .filter_map(|output| output.parent())
        .collect();
    for dir in output_dirs {
        std::fs::create_dir_all(dir).map_err(|e| {
            ExtractError::Io(format!("Failed to create '{}': {}", dir.display(), e))
        })?;
    }

    log::debug!("Batch: {} files, jobs={}", tasks.len(), config.jobs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| ExtractError::InvalidInput(format!("Failed to build thread pool: {}", e)))?;

    let outcomes: Vec<FileOutcome> = pool.install(|| {
        tasks
            .par_iter()
            .map(|(input, output)| {
                let result = output
                    .clone()
                    .and_then(|output| extract_file(input, &output, &config.extract));
                result.unwrap_or_else(|e| {
                    log::warn!("Failed '{}': {}", input.display(), e);
                    FileOutcome::Failed {
                        input: input.clone(),
                        error: e.to_string(),
                    }
                })
            })
            .collect()
    });

    let report = BatchReport::from_outcomes(outcomes, t0.elapsed().as_secs_f64() * 1000.0);
    log::debug!(
        "Batch done: saved={} skipped={} failed={} wall={:.0}ms",
        report.saved,
        report.skipped,
        report.failed,
        report.wall_time_ms
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_file_name() {
        let out = output_path_for(Path::new("in/speech/yes_01.wav"), Path::new("out")).unwrap();
        assert_eq!(out, PathBuf::from("out/yes_01.wav"));
    }

    #[test]
    fn test_output_path_for_non_wav_input() {
        let out = output_path_for(Path::new("clips/no.mp3"), Path::new("trimmed")).unwrap();
        assert_eq!(out, PathBuf::from("trimmed/no.wav"));
    }

    #[test]
    fn test_output_path_without_file_name() {
        assert!(output_path_for(Path::new(".."), Path::new("out")).is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            expand_inputs("[unclosed"),
            Err(ExtractError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_expand_inputs_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.wav"), b"").unwrap();
        std::fs::write(dir.path().join("a.wav"), b"").unwrap();
        std::fs::create_dir(dir.path().join("c.wav")).unwrap();
        std::fs::write(dir.path().join("d.txt"), b"").unwrap();

        let pattern = format!("{}/*.wav", dir.path().display());
        let files = expand_inputs(&pattern).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.wav"), dir.path().join("b.wav")]
        );
    }

    #[test]
    fn test_report_counts() {
        let outcomes = vec![
            FileOutcome::Skipped {
                input: "a.wav".into(),
                peak: 1.0,
                threshold: 2.0,
            },
            FileOutcome::Failed {
                input: "b.wav".into(),
                error: "bad".into(),
            },
            FileOutcome::Failed {
                input: "c.wav".into(),
                error: "bad".into(),
            },
        ];
        let report = BatchReport::from_outcomes(outcomes, 1.0);
        assert_eq!((report.saved, report.skipped, report.failed), (0, 1, 2));
        assert_eq!(report.outcomes[1].input(), Path::new("b.wav"));
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = FileOutcome::Failed {
            input: "x.wav".into(),
            error: "Decoding error: nope".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["input"], "x.wav");
    }
}

//! Extract the loudest section of every file matching a glob
//!
//! Usage:
//!   extract_loudest_section [options] <input-glob> <output-dir>
//!
//! Notes:
//! - Parallelism is across files. Each file is processed single-threaded.
//! - Skipped and failed files are reported but do not change the exit code.

use loudest_section::batch::run_batch;
use loudest_section::{BatchConfig, ChannelPolicy, FileOutcome, ShortInputPolicy, Threshold};
use std::env;
use std::path::Path;

const USAGE: &str = "Usage: extract_loudest_section [options] <input-glob> <output-dir>\n\
     \n\
     --length-ms N      Length of the extracted section (default: 1000)\n\
     --min-rms R        Minimum RMS of the loudest window, 0.0-1.0 of full scale (default: 0.004)\n\
     --min-volume E     Minimum energy (sum of squares, native sample units)\n\
     --channels P       Channel policy: sum, mean or ref:N (default: sum)\n\
     --reject-short     Fail files shorter than the section instead of keeping them whole\n\
     --jobs N           Parallel workers (default: CPU-1)\n\
     --json             Emit one JSON object per file (JSONL)\n";

fn next_value<'a>(args: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str, String> {
    args.next()
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Parsed command line; `None` when help was requested
fn parse_args(args: &[String]) -> Result<Option<(BatchConfig, String, String, bool)>, String> {
    let mut config = BatchConfig::default();
    let mut json = false;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(a) = iter.next() {
        match a.as_str() {
            "--json" => json = true,
            "--reject-short" => config.extract.short_input = ShortInputPolicy::Reject,
            "--length-ms" => {
                let v = next_value(&mut iter, a)?;
                config.extract.desired_length_ms =
                    v.parse().map_err(|e| format!("--length-ms '{}': {}", v, e))?;
            }
            "--min-rms" => {
                let v = next_value(&mut iter, a)?;
                config.extract.threshold =
                    Threshold::Rms(v.parse().map_err(|e| format!("--min-rms '{}': {}", v, e))?);
            }
            "--min-volume" => {
                let v = next_value(&mut iter, a)?;
                config.extract.threshold =
                    Threshold::Energy(v.parse().map_err(|e| format!("--min-volume '{}': {}", v, e))?);
            }
            "--channels" => {
                let v = next_value(&mut iter, a)?;
                config.extract.channel_policy =
                    v.parse::<ChannelPolicy>().map_err(|e| e.to_string())?;
            }
            "--jobs" => {
                let v = next_value(&mut iter, a)?;
                let jobs: usize = v.parse().map_err(|e| format!("--jobs '{}': {}", v, e))?;
                config.jobs = std::cmp::max(1, jobs);
            }
            "--help" | "-h" => return Ok(None),
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            _ => positional.push(a.clone()),
        }
    }

    if positional.len() != 2 {
        return Err("You must supply an input glob and an output directory as arguments".to_string());
    }

    config.validate().map_err(|e| e.to_string())?;

    let output_dir = positional.pop().unwrap_or_default();
    let pattern = positional.pop().unwrap_or_default();
    Ok(Some((config, pattern, output_dir, json)))
}

fn print_outcome(outcome: &FileOutcome, json: bool) {
    if json {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize outcome: {}", e),
        }
        return;
    }

    match outcome {
        FileOutcome::Saved { output, .. } => println!("Saved to '{}'", output.display()),
        FileOutcome::Skipped { input, peak, threshold } => println!(
            "Skipped '{}' as too quiet ({:.3} < {:.3})",
            input.display(),
            peak,
            threshold
        ),
        FileOutcome::Failed { input, error } => {
            println!("Failed '{}': {}", input.display(), error)
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (config, pattern, output_dir, json) = match parse_args(&args) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            eprintln!("{}", USAGE);
            return;
        }
        Err(msg) => {
            eprintln!("ERROR: {}\n\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    log::info!(
        "Extracting {} ms sections from '{}' into '{}' (jobs={})",
        config.extract.desired_length_ms,
        pattern,
        output_dir,
        config.jobs
    );

    let report = match run_batch(&pattern, Path::new(&output_dir), &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    for outcome in &report.outcomes {
        print_outcome(outcome, json);
    }

    eprintln!(
        "Done: saved={} skipped={} failed={} of {} wall={:.0}ms",
        report.saved,
        report.skipped,
        report.failed,
        report.outcomes.len(),
        report.wall_time_ms
    );
}

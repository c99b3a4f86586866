//! Example: Extract the loudest section of a single audio file
//!
//! Usage:
//!   cargo run --example extract_file -- <input> <output.wav> [length-ms]

use loudest_section::io::{decode_audio, encode_wav};
use loudest_section::{extract_loudest_section, ExtractConfig, Extraction};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: extract_file <input> <output.wav> [length-ms]");
        std::process::exit(2);
    }

    let mut config = ExtractConfig::default();
    if let Some(ms) = args.get(2) {
        config.desired_length_ms = ms.parse()?;
    }

    let buffer = decode_audio(Path::new(&args[0]))?;
    println!(
        "Input: {} ch, {} Hz, {}-bit, {:.2}s",
        buffer.channels,
        buffer.sample_rate,
        buffer.bits_per_sample,
        buffer.duration_seconds()
    );

    match extract_loudest_section(&buffer, &config)? {
        Extraction::Selected(section) => {
            encode_wav(Path::new(&args[1]), &section.segment)?;
            println!("Loudest section:");
            println!("  Start: {:.3}s (frame {})", section.start_seconds(), section.offset);
            println!("  Length: {} frames", section.window_length);
            println!("  Energy: {:.1} (threshold {:.1})", section.peak, section.threshold);
            println!("Saved to '{}'", args[1]);
        }
        Extraction::Skipped { peak, threshold } => {
            println!("Skipped '{}' as too quiet ({:.1} < {:.1})", args[0], peak, threshold);
        }
    }

    Ok(())
}

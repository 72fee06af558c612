//! Check a strategy document before release.
//!
//! Usage: `validate_strategies [path]`
//!
//! Validates the given document, or the embedded one when no path is given,
//! and prints every violation and warning per platform. Exits with status 1
//! if any violation is found.

use std::env;
use std::fs;
use std::io;
use std::process;

use rs_chat_export::registry::{validate, RawDocument, EMBEDDED_STRATEGIES};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let path = env::args().nth(1);
    let (source, json) = match &path {
        Some(path) => match fs::read_to_string(path) {
            Ok(json) => (path.as_str(), json),
            Err(err) => {
                eprintln!("Failed to read {path}: {err}");
                process::exit(1);
            }
        },
        None => ("<embedded>", EMBEDDED_STRATEGIES.to_string()),
    };

    let document = match RawDocument::parse(&json) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("{source}: {err}");
            process::exit(1);
        }
    };

    let report = validate(&document);

    println!(
        "{source}: version {} (updated {})",
        document.version.as_deref().unwrap_or("?"),
        document.last_updated.as_deref().unwrap_or("?")
    );
    for finding in &report.violations {
        println!("  ERROR   [{}] {}", finding.platform, finding.message);
    }
    for finding in &report.warnings {
        println!("  WARNING [{}] {}", finding.platform, finding.message);
    }

    if report.is_valid() {
        println!(
            "OK: {} platforms, {} warnings",
            report.entries.len(),
            report.warnings.len()
        );
    } else {
        println!("FAILED: {} violations", report.violations.len());
        process::exit(1);
    }
}

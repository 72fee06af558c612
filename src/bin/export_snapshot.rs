//! Export a saved chat page to JSONL.
//!
//! Usage: `export_snapshot <snapshot.html|-> <url> [--out-dir DIR]`
//!
//! The snapshot is read from a file, or from stdin when given as `-`. The url
//! is the address the page was saved from and selects the platform. Records go
//! to stdout, or to `<platform>_<title>.jsonl` under `--out-dir`.

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use chrono::Utc;
use rs_chat_export::{export_bytes, export_filename, ExportOptions, SettlePolicy};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: export_snapshot <snapshot.html|-> <url> [--out-dir DIR]";

struct Args {
    snapshot: String,
    url: String,
    out_dir: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut out_dir = None;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-dir" => {
                let dir = args.next().ok_or("--out-dir needs a directory")?;
                out_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => positional.push(arg),
        }
    }

    let [snapshot, url]: [String; 2] = positional.try_into().map_err(|_| USAGE.to_string())?;
    Ok(Args { snapshot, url, out_dir })
}

fn read_snapshot(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        fs::read(path)
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let bytes = read_snapshot(&args.snapshot)?;

    // saved pages never render anything after a click
    let options = ExportOptions {
        settle: SettlePolicy::none(),
        ..ExportOptions::default()
    };
    let export = export_bytes(&bytes, &args.url, &options)?;

    match &args.out_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let name = export_filename(
                export.metadata.platform.key(),
                export.metadata.title.as_deref(),
                Utc::now(),
            );
            let path = dir.join(name);
            fs::write(&path, &export.jsonl)?;
            eprintln!(
                "Exported {} messages{} to {}",
                export.message_count,
                if export.has_artifact { " and an artifact" } else { "" },
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", export.jsonl)?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            process::exit(2);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        process::exit(1);
    }
}

//! `binary-to-json` — decode a CRDT binary document into JSON text.
//!
//! Reads the binary document from a file or stdin and writes
//! pretty-printed JSON to a file or stdout. Any failure prints to stderr
//! and exits non-zero.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use json_doc::doc_codec::ConversionOptions;
use json_doc::doc_store;
use json_doc::json_cli::{self, CliError};

#[derive(Parser, Debug)]
#[command(name = "binary-to-json", version, about = "Decode a CRDT binary document into JSON")]
struct Args {
    /// Input document file; stdin when omitted.
    input: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Actor id (hex) to associate with the loaded document.
    #[arg(long)]
    actor: Option<String>,

    /// Validate the decoded value's shape during the --check re-encode.
    #[arg(long)]
    validate: bool,

    /// Re-encode the decoded value and verify it round-trips unchanged.
    #[arg(long)]
    check: bool,

    /// Treat the input as base64 text rather than raw bytes.
    #[arg(long)]
    base64: bool,
}

fn main() {
    json_cli::init_logging();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let raw = match &args.input {
        Some(path) => doc_store::read_bytes(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let bytes = if args.base64 {
        json_cli::from_base64(&String::from_utf8_lossy(&raw))?
    } else {
        raw
    };

    let options = ConversionOptions {
        actor: args.actor.clone(),
        validate_json: args.validate,
    };
    let json = json_cli::binary_to_json(&bytes, &options, args.check)?;

    match &args.output {
        Some(path) => fs::write(path, json + "\n")?,
        None => println!("{json}"),
    }
    Ok(())
}

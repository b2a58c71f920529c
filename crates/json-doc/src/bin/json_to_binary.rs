//! `json-to-binary` — encode JSON text into a CRDT binary document.
//!
//! Reads JSON from a file or stdin and writes the binary document to a
//! file or stdout. Any failure prints to stderr and exits non-zero.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use json_doc::doc_codec::ConversionOptions;
use json_doc::doc_store;
use json_doc::json_cli::{self, CliError};

#[derive(Parser, Debug)]
#[command(name = "json-to-binary", version, about = "Encode JSON into a CRDT binary document")]
struct Args {
    /// Input JSON file; stdin when omitted.
    input: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Actor id (hex) to attribute the document's initial state to.
    #[arg(long)]
    actor: Option<String>,

    /// Validate that the input is plain JSON before encoding.
    #[arg(long)]
    validate: bool,

    /// Decode the produced document again and verify it matches the input.
    #[arg(long)]
    check: bool,

    /// Emit base64 text instead of raw bytes.
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
    let json = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let options = ConversionOptions {
        actor: args.actor.clone(),
        validate_json: args.validate,
    };
    let bytes = json_cli::json_to_binary(&json, &options, args.check)?;

    if args.base64 {
        let text = json_cli::to_base64(&bytes);
        match &args.output {
            Some(path) => fs::write(path, text)?,
            None => println!("{text}"),
        }
    } else {
        match &args.output {
            Some(path) => doc_store::write_bytes(path, &bytes)?,
            None => io::stdout().write_all(&bytes)?,
        }
    }
    Ok(())
}

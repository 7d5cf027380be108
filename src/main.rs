use std::fs;

use clap::Parser;
use mumble::Context;

/// mumble is an interpreter for a small MUMPS/M-derived language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells mumble to read a file instead of an inline script.
    #[arg(short, long)]
    file: bool,

    /// Seeds $RANDOM so a run can be reproduced exactly.
    #[arg(short, long)]
    seed: Option<u64>,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut context = args.seed.map_or_else(Context::new, Context::with_seed);
    let result = context.evaluate(&script);

    print!("{}", result.output);
    for error in &result.errors {
        eprintln!("{error}");
    }
    if !result.errors.is_empty() {
        std::process::exit(1);
    }
}

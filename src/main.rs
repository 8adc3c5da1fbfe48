use std::fs;

use abacus::{interpreter::config::Config, run_script};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// abacus is an embeddable calculator language with units, vectors,
/// closures and symbolic derivatives.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells abacus to read a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode prints only the last value of the script instead of the
    /// value of every line.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Maximum number of iterations a single `while` loop may run.
    #[arg(long)]
    max_loop_iterations: Option<usize>,

    contents: String,
}

fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                                 .with_writer(std::io::stderr)
                                 .init();
    }

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

    let mut config = Config::default();
    if let Some(limit) = args.max_loop_iterations {
        config.max_loop_iterations = limit;
    }

    if let Err(e) = run_script(&script, config, args.pipe_mode) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

//! Jack analyzer CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use jack_analyzer::error::render;
use jack_analyzer::{JackError, analyze_directory, analyze_file, write_analysis};

#[derive(Parser, Debug)]
#[command(name = "jack-analyzer")]
#[command(version)]
#[command(about = "Tokenize and parse Jack source, emitting XML parse trees")]
struct Args {
    /// A .jack file or a directory of .jack files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn report(path: &Path, error: &JackError) {
    let filename = path.display().to_string();
    match fs::read_to_string(path) {
        Ok(source) => eprint!("{}", render(error, &source, &filename)),
        Err(_) => eprintln!("error: {error}"),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.input.is_file() {
        let output_dir = args
            .output
            .unwrap_or_else(|| args.input.parent().unwrap_or(&args.input).to_path_buf());

        let outcome = analyze_file(&args.input)
            .and_then(|analysis| write_analysis(&args.input, &output_dir, &analysis));
        return match outcome {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report(&args.input, &e);
                ExitCode::FAILURE
            }
        };
    }

    if !args.input.is_dir() {
        eprintln!("error: no such file or directory: {}", args.input.display());
        return ExitCode::from(2);
    }

    let results = match analyze_directory(&args.input) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if results.is_empty() {
        eprintln!("error: no .jack files in {}", args.input.display());
        return ExitCode::from(2);
    }

    let output_dir = args.output.unwrap_or_else(|| args.input.clone());
    let mut failed = false;

    for (path, result) in &results {
        match result {
            Ok(analysis) => {
                if let Err(e) = write_analysis(path, &output_dir, analysis) {
                    eprintln!("error: {e}");
                    failed = true;
                }
            }
            Err(e) => {
                report(path, e);
                failed = true;
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

//! VM translator CLI.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use vm_translator::{VmError, output_path, translate_directory, translate_file};

#[derive(Parser, Debug)]
#[command(name = "vm-translator")]
#[command(version)]
#[command(about = "Translate VM bytecode to Hack assembly")]
struct Args {
    /// A .vm file, or a directory of .vm files (directory mode adds bootstrap)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Show timing and line counts
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<PathBuf, VmError> {
    let asm = if args.input.is_dir() {
        translate_directory(&args.input)?
    } else if args.input.extension().is_some_and(|ext| ext == "vm") {
        translate_file(&args.input)?
    } else {
        return Err(VmError::BadPath {
            path: args.input.display().to_string(),
        });
    };

    let out = output_path(&args.input);
    fs::write(&out, &asm).map_err(|e| VmError::Write {
        path: out.display().to_string(),
        source: e,
    })?;

    if args.verbose {
        eprintln!("{} lines of assembly", asm.lines().count());
    }

    Ok(out)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let start = Instant::now();

    match run(&args) {
        Ok(out) => {
            if args.verbose {
                println!(
                    "{} ({:.2}ms)",
                    out.display(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
            } else {
                println!("{}", out.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

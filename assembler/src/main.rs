//! Hack assembler CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use hack_assembler::assemble;

#[derive(Parser, Debug)]
#[command(name = "hack-assembler")]
#[command(version)]
#[command(about = "Assemble Hack .asm files to binary .hack files")]
struct Args {
    /// Input .asm files
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Show per-file timing and output paths
    #[arg(short, long)]
    verbose: bool,
}

fn assemble_one(path: &Path, verbose: bool) -> Result<(), String> {
    let start = Instant::now();

    let source =
        fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;

    let binary = assemble(&source).map_err(|e| format!("{}: {}", path.display(), e))?;

    let out_path = path.with_extension("hack");
    fs::write(&out_path, binary).map_err(|e| format!("{}: {}", out_path.display(), e))?;

    if verbose {
        eprintln!(
            "{} -> {} ({:.2}ms)",
            path.display(),
            out_path.display(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    } else {
        println!("{}", out_path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut failed = false;

    for path in &args.files {
        if let Err(msg) = assemble_one(path, args.verbose) {
            eprintln!("error: {}", msg);
            failed = true;
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

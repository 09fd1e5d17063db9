//! VM translator: stack-machine bytecode (`.vm`) to Hack assembly (`.asm`).
//!
//! Two entry points mirror the two invocation modes:
//!
//! - [`translate_file`] translates a single `.vm` file with no bootstrap.
//! - [`translate_directory`] combines every `.vm` file in a directory into
//!   one output, prefixed by bootstrap code that sets `SP = 256` and calls
//!   `Sys.init`. One [`emit::Emitter`] spans all files, so generated labels
//!   stay unique across the whole program.

pub mod command;
pub mod emit;
pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use crate::command::parse_command;
use crate::emit::Emitter;
pub use crate::error::{Result, VmError};

/// Translate one file's source text with the given emitter.
fn translate_into(source: &str, stem: &str, emitter: &mut Emitter, out: &mut String) -> Result<()> {
    emitter.set_file(stem);
    out.reserve(source.lines().count() * 50);

    for (index, line) in source.lines().enumerate() {
        if let Some(command) = parse_command(line, index + 1, stem)? {
            emitter.emit(&command, out);
        }
    }
    Ok(())
}

/// Translate VM source text held in memory. No bootstrap is emitted.
pub fn translate_source(source: &str, stem: &str) -> Result<String> {
    let mut emitter = Emitter::new();
    let mut out = String::new();
    translate_into(source, stem, &mut emitter, &mut out)?;
    Ok(out)
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("Unknown")
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| VmError::Read {
        path: path.display().to_string(),
        source: e,
    })
}

/// Translate a single `.vm` file. No bootstrap is emitted.
pub fn translate_file(path: &Path) -> Result<String> {
    translate_source(&read(path)?, file_stem(path))
}

/// Translate every `.vm` file in a directory into one assembly program.
///
/// Files contribute in name order. Bootstrap code is always emitted first;
/// supplying a `Sys.init` is the program's responsibility.
pub fn translate_directory(dir: &Path) -> Result<String> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| VmError::Read {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    if inputs.is_empty() {
        return Err(VmError::NoInputs {
            path: dir.display().to_string(),
        });
    }
    inputs.sort();

    let mut emitter = Emitter::new();
    let mut out = String::with_capacity(1024);
    emitter.emit_bootstrap(&mut out);

    for path in &inputs {
        translate_into(&read(path)?, file_stem(path), &mut emitter, &mut out)?;
    }

    Ok(out)
}

/// Where the assembly for a given input lands:
/// `Foo.vm` -> `Foo.asm`; `dir/` -> `dir/dir.asm`.
pub fn output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input.file_name().and_then(|s| s.to_str()).unwrap_or("out");
        input.join(format!("{name}.asm"))
    } else {
        input.with_extension("asm")
    }
}

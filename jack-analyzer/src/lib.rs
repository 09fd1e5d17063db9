//! Jack syntax analyzer: tokenizer plus recursive-descent parser, emitting
//! the two XML artifacts of the course toolchain per source file:
//!
//! - `<Base>T.xml` — the flat token list;
//! - `<Base>.xml`  — the parse tree, a pre-order walk of the grammar.
//!
//! Analysis of a file is fail-fast. Directory mode fans out over files with
//! rayon; each file is still analyzed as an independent unit.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod xml;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

pub use crate::error::JackError;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Both XML artifacts for one successfully analyzed source.
#[derive(Debug)]
pub struct Analysis {
    pub token_xml: String,
    pub tree_xml: String,
}

/// Analyze Jack source held in memory.
pub fn analyze_source(source: &str) -> Result<Analysis, JackError> {
    let tokens = Lexer::new(source).tokenize()?;
    let token_xml = xml::tokens_to_xml(&tokens);
    let class = Parser::new(&tokens).parse()?;
    let tree_xml = xml::tree_to_xml(&class);

    Ok(Analysis {
        token_xml,
        tree_xml,
    })
}

/// Analyze one `.jack` file.
pub fn analyze_file(path: &Path) -> Result<Analysis, JackError> {
    let source = fs::read_to_string(path).map_err(|e| JackError::io(path, e))?;
    analyze_source(&source)
}

/// Analyze every `.jack` file in a directory, in parallel. Each file's
/// outcome is reported independently; one bad file does not stop the rest.
pub fn analyze_directory(dir: &Path) -> Result<Vec<(PathBuf, Result<Analysis, JackError>)>, JackError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| JackError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jack"))
        .collect();
    files.sort();

    Ok(files
        .into_par_iter()
        .map(|path| {
            let result = analyze_file(&path);
            (path, result)
        })
        .collect())
}

/// Write `<Base>T.xml` and `<Base>.xml` for an analyzed input file.
pub fn write_analysis(input: &Path, output_dir: &Path, analysis: &Analysis) -> Result<(), JackError> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("out");

    let token_path = output_dir.join(format!("{stem}T.xml"));
    fs::write(&token_path, &analysis.token_xml).map_err(|e| JackError::io(&token_path, e))?;

    let tree_path = output_dir.join(format!("{stem}.xml"));
    fs::write(&tree_path, &analysis.tree_xml).map_err(|e| JackError::io(&tree_path, e))?;

    Ok(())
}

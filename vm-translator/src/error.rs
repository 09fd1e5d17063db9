//! Error types for VM translation. Every parse error carries the source
//! file name and 1-based line so messages are directly actionable.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmError {
    #[error("{file}:{line}: unknown command: {command}")]
    UnknownCommand {
        file: String,
        line: usize,
        command: String,
    },

    #[error("{file}:{line}: unknown segment: {segment}")]
    UnknownSegment {
        file: String,
        line: usize,
        segment: String,
    },

    #[error("{file}:{line}: {command}: missing argument {position}")]
    MissingArgument {
        file: String,
        line: usize,
        command: String,
        position: usize,
    },

    #[error("{file}:{line}: invalid index: {value}")]
    InvalidIndex {
        file: String,
        line: usize,
        value: String,
    },

    #[error("{file}:{line}: cannot pop to the constant segment")]
    PopConstant { file: String, line: usize },

    #[error("{file}:{line}: pointer index must be 0 or 1, got {index}")]
    PointerIndex {
        file: String,
        line: usize,
        index: u16,
    },

    #[error("{file}:{line}: temp index must be 0-7, got {index}")]
    TempIndex {
        file: String,
        line: usize,
        index: u16,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no .vm files found in {path}")]
    NoInputs { path: String },

    #[error("not a .vm file or directory: {path}")]
    BadPath { path: String },
}

pub type Result<T> = std::result::Result<T, VmError>;

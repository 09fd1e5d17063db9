//! Error types and diagnostic formatting for the Jack analyzer.
//!
//! Analysis is fail-fast: the first lexical or syntactic problem aborts the
//! file, and any partial output is discarded.

use std::path::PathBuf;

use thiserror::Error;

use crate::token::Span;

#[derive(Debug, Error)]
pub enum JackError {
    #[error("lexical error at {span}: {message}")]
    Lexical { span: Span, message: String },

    #[error("syntax error at {span}: {message}")]
    Syntax { span: Span, message: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JackError {
    pub fn lexical(span: Span, message: impl Into<String>) -> Self {
        JackError::Lexical {
            span,
            message: message.into(),
        }
    }

    pub fn syntax(span: Span, message: impl Into<String>) -> Self {
        JackError::Syntax {
            span,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JackError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            JackError::Lexical { span, .. } | JackError::Syntax { span, .. } => Some(*span),
            JackError::Io { .. } => None,
        }
    }
}

/// Render an error with the offending source line and a caret.
pub fn render(error: &JackError, source: &str, filename: &str) -> String {
    let mut out = format!("error: {error}\n");

    if let Some(span) = error.span() {
        out.push_str(&format!("  --> {}:{}:{}\n", filename, span.line, span.column));
        if let Some(line) = source.lines().nth(span.line - 1) {
            out.push_str(&format!("   |\n{:3} | {}\n", span.line, line));
            out.push_str(&format!("   | {:>width$}^\n", "", width = span.column - 1));
        }
    } else {
        out.push_str(&format!("  --> {filename}\n"));
    }

    out
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsmError {
    #[error("line {line}: malformed instruction: {text}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: A-instruction address out of range (max 32767): {value}")]
    AddressOutOfRange { line: usize, value: String },

    #[error("line {line}: label redefined: {label}")]
    RedefinedLabel { line: usize, label: String },

    #[error("line {line}: label shadows predefined symbol: {label}")]
    PredefinedCollision { line: usize, label: String },

    #[error("line {line}: unknown dest mnemonic: {mnemonic}")]
    UnknownDest { line: usize, mnemonic: String },

    #[error("line {line}: unknown comp mnemonic: {mnemonic}")]
    UnknownComp { line: usize, mnemonic: String },

    #[error("line {line}: unknown jump mnemonic: {mnemonic}")]
    UnknownJump { line: usize, mnemonic: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AsmError>;

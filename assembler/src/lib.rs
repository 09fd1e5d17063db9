//! Hack assembler: symbolic `.asm` source to 16-bit binary `.hack` words.
//!
//! Translation is two passes over an in-memory statement list. Pass 1 walks
//! the cleaned statements binding each `(LABEL)` to the ROM address of the
//! instruction that follows it. Pass 2 resolves `@symbol` operands against
//! the table, allocating RAM slots from 16 upward for first-seen variables,
//! and emits one 16-character binary line per instruction.

pub mod encode;
pub mod error;
pub mod parser;
pub mod symbols;
pub mod tables;

use encode::{a_word, c_word, push_word};
use error::{AsmError, Result};
use parser::{Statement, parse_statement};
use symbols::{BindError, SymbolTable};

/// Assemble Hack assembly source to its binary text form.
pub fn assemble(source: &str) -> Result<String> {
    // Pass 1: parse every line, binding labels to ROM addresses.
    let mut symbols = SymbolTable::new();
    let mut statements = Vec::new();
    let mut rom_address = 0u16;

    for (index, line) in source.lines().enumerate() {
        let line_num = index + 1;
        let Some(stmt) = parse_statement(line, line_num)? else {
            continue;
        };

        if let Statement::Label(label) = &stmt {
            symbols.bind_label(label, rom_address).map_err(|e| match e {
                BindError::AlreadyBound => AsmError::RedefinedLabel {
                    line: line_num,
                    label: label.clone(),
                },
                BindError::Predefined => AsmError::PredefinedCollision {
                    line: line_num,
                    label: label.clone(),
                },
            })?;
        } else {
            rom_address += 1;
        }

        statements.push(stmt);
    }

    // Pass 2: resolve symbols and emit, one word plus newline per instruction.
    let mut output = String::with_capacity(statements.len() * 17);

    for stmt in &statements {
        let word = match stmt {
            Statement::Address(value) => a_word(*value),
            Statement::AddressSymbol(name) => a_word(symbols.resolve(name)),
            Statement::Compute { dest, comp, jump } => c_word(*dest, *comp, *jump),
            Statement::Label(_) => continue,
        };
        push_word(word, &mut output);
    }

    Ok(output)
}

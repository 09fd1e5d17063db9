//! Line-level parsing of Hack assembly source.

use crate::error::{AsmError, Result};
use crate::tables::{COMP, DEST, JUMP};

/// One source statement, with comments and whitespace already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `@value` with a numeric operand, value < 2^15.
    Address(u16),
    /// `@name` referring to a predefined symbol, label, or variable.
    AddressSymbol(String),
    /// `dest=comp;jump`, fields already translated to their bit codes.
    Compute { dest: u8, comp: u8, jump: u8 },
    /// `(NAME)` pseudo-instruction. Emits no code.
    Label(String),
}

/// Strip a trailing `//` comment and surrounding whitespace.
fn strip(line: &str) -> &str {
    line.split("//").next().unwrap_or("").trim()
}

fn parse_address(operand: &str, line_num: usize) -> Result<Statement> {
    if operand.is_empty() {
        return Err(AsmError::Malformed {
            line: line_num,
            text: "@".to_string(),
        });
    }

    // A digit-leading operand is always a numeric address. `@12ab` and
    // `@99999` are rejected here rather than silently becoming symbols.
    if operand.starts_with(|c: char| c.is_ascii_digit()) {
        let value = operand
            .parse::<u16>()
            .ok()
            .filter(|v| *v < (1 << 15))
            .ok_or_else(|| AsmError::AddressOutOfRange {
                line: line_num,
                value: operand.to_string(),
            })?;
        return Ok(Statement::Address(value));
    }

    Ok(Statement::AddressSymbol(operand.to_string()))
}

fn parse_compute(text: &str, line_num: usize) -> Result<Statement> {
    let (dest_str, rest) = match text.split_once('=') {
        Some((d, r)) => (d, r),
        None => ("", text),
    };
    let (comp_str, jump_str) = match rest.split_once(';') {
        Some((c, j)) => (c, j),
        None => (rest, ""),
    };

    let dest = *DEST.get(dest_str).ok_or_else(|| AsmError::UnknownDest {
        line: line_num,
        mnemonic: dest_str.to_string(),
    })?;
    let comp = *COMP.get(comp_str).ok_or_else(|| AsmError::UnknownComp {
        line: line_num,
        mnemonic: comp_str.to_string(),
    })?;
    let jump = *JUMP.get(jump_str).ok_or_else(|| AsmError::UnknownJump {
        line: line_num,
        mnemonic: jump_str.to_string(),
    })?;

    Ok(Statement::Compute { dest, comp, jump })
}

/// Parse one source line. Returns `None` for blank and comment-only lines.
pub fn parse_statement(line: &str, line_num: usize) -> Result<Option<Statement>> {
    let text = strip(line);
    if text.is_empty() {
        return Ok(None);
    }

    if let Some(operand) = text.strip_prefix('@') {
        return parse_address(operand, line_num).map(Some);
    }

    if let Some(inner) = text.strip_prefix('(') {
        let label = inner.strip_suffix(')').ok_or_else(|| AsmError::Malformed {
            line: line_num,
            text: text.to_string(),
        })?;
        if label.is_empty() {
            return Err(AsmError::Malformed {
                line: line_num,
                text: text.to_string(),
            });
        }
        return Ok(Some(Statement::Label(label.to_string())));
    }

    parse_compute(text, line_num).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_and_whitespace() {
        assert_eq!(strip("  @42  // answer"), "@42");
        assert_eq!(strip("// nothing here"), "");
        assert_eq!(strip("\tD=M"), "D=M");
    }

    #[test]
    fn blank_lines_parse_to_none() {
        assert_eq!(parse_statement("", 1).unwrap(), None);
        assert_eq!(parse_statement("   // comment", 1).unwrap(), None);
    }

    #[test]
    fn numeric_address() {
        assert_eq!(
            parse_statement("@17", 1).unwrap(),
            Some(Statement::Address(17))
        );
        assert_eq!(
            parse_statement("@32767", 1).unwrap(),
            Some(Statement::Address(32767))
        );
    }

    #[test]
    fn address_out_of_range() {
        assert!(matches!(
            parse_statement("@32768", 1),
            Err(AsmError::AddressOutOfRange { .. })
        ));
        assert!(matches!(
            parse_statement("@99999", 1),
            Err(AsmError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn digit_leading_symbol_is_rejected() {
        assert!(matches!(
            parse_statement("@12ab", 1),
            Err(AsmError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn symbolic_address() {
        assert_eq!(
            parse_statement("@LOOP", 1).unwrap(),
            Some(Statement::AddressSymbol("LOOP".to_string()))
        );
    }

    #[test]
    fn label_statement() {
        assert_eq!(
            parse_statement("(END)", 1).unwrap(),
            Some(Statement::Label("END".to_string()))
        );
        assert!(parse_statement("(END", 1).is_err());
        assert!(parse_statement("()", 1).is_err());
    }

    #[test]
    fn compute_full_form() {
        assert_eq!(
            parse_statement("MD=D+1;JGE", 1).unwrap(),
            Some(Statement::Compute {
                dest: 0b011,
                comp: 0b0011111,
                jump: 0b011
            })
        );
    }

    #[test]
    fn compute_dest_only() {
        assert_eq!(
            parse_statement("D=M", 1).unwrap(),
            Some(Statement::Compute {
                dest: 0b010,
                comp: 0b1110000,
                jump: 0b000
            })
        );
    }

    #[test]
    fn compute_jump_only() {
        assert_eq!(
            parse_statement("0;JMP", 1).unwrap(),
            Some(Statement::Compute {
                dest: 0b000,
                comp: 0b0101010,
                jump: 0b111
            })
        );
    }

    #[test]
    fn unknown_mnemonics() {
        assert!(matches!(
            parse_statement("X=D", 1),
            Err(AsmError::UnknownDest { .. })
        ));
        assert!(matches!(
            parse_statement("D=Q", 1),
            Err(AsmError::UnknownComp { .. })
        ));
        assert!(matches!(
            parse_statement("D;JXX", 1),
            Err(AsmError::UnknownJump { .. })
        ));
        assert!(matches!(
            parse_statement("D==M", 1),
            Err(AsmError::UnknownComp { .. })
        ));
    }
}

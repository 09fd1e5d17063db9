//! Fixed Hack encodings: predefined symbols and C-instruction field codes.
//!
//! All four tables are compile-time perfect hash maps, so lookups cannot
//! allocate and the encodings live in read-only data.

use phf::phf_map;

/// The 23 predefined symbols of the Hack architecture.
pub static PREDEFINED: phf::Map<&'static str, u16> = phf_map! {
    "SP" => 0, "LCL" => 1, "ARG" => 2, "THIS" => 3, "THAT" => 4,
    "R0" => 0, "R1" => 1, "R2" => 2, "R3" => 3,
    "R4" => 4, "R5" => 5, "R6" => 6, "R7" => 7,
    "R8" => 8, "R9" => 9, "R10" => 10, "R11" => 11,
    "R12" => 12, "R13" => 13, "R14" => 14, "R15" => 15,
    "SCREEN" => 16384, "KBD" => 24576,
};

/// Dest field (d1 d2 d3). Any ordering of the register letters is accepted.
pub static DEST: phf::Map<&'static str, u8> = phf_map! {
    "" => 0b000,
    "M" => 0b001,
    "D" => 0b010,
    "MD" => 0b011, "DM" => 0b011,
    "A" => 0b100,
    "AM" => 0b101, "MA" => 0b101,
    "AD" => 0b110, "DA" => 0b110,
    "AMD" => 0b111, "ADM" => 0b111, "MAD" => 0b111,
    "MDA" => 0b111, "DAM" => 0b111, "DMA" => 0b111,
};

/// Comp field (a c1..c6). Commutative operands accept both spellings.
pub static COMP: phf::Map<&'static str, u8> = phf_map! {
    "0" => 0b0101010,
    "1" => 0b0111111,
    "-1" => 0b0111010,

    "D" => 0b0001100,
    "!D" => 0b0001101,
    "-D" => 0b0001111,
    "D+1" => 0b0011111, "1+D" => 0b0011111,
    "D-1" => 0b0001110,

    "A" => 0b0110000,
    "!A" => 0b0110001,
    "-A" => 0b0110011,
    "A+1" => 0b0110111, "1+A" => 0b0110111,
    "A-1" => 0b0110010,

    "D+A" => 0b0000010, "A+D" => 0b0000010,
    "D-A" => 0b0010011,
    "A-D" => 0b0000111,
    "D&A" => 0b0000000, "A&D" => 0b0000000,
    "D|A" => 0b0010101, "A|D" => 0b0010101,

    "M" => 0b1110000,
    "!M" => 0b1110001,
    "-M" => 0b1110011,
    "M+1" => 0b1110111, "1+M" => 0b1110111,
    "M-1" => 0b1110010,

    "D+M" => 0b1000010, "M+D" => 0b1000010,
    "D-M" => 0b1010011,
    "M-D" => 0b1000111,
    "D&M" => 0b1000000, "M&D" => 0b1000000,
    "D|M" => 0b1010101, "M|D" => 0b1010101,
};

/// Jump field (j1 j2 j3).
pub static JUMP: phf::Map<&'static str, u8> = phf_map! {
    "" => 0b000,
    "JGT" => 0b001,
    "JEQ" => 0b010,
    "JGE" => 0b011,
    "JLT" => 0b100,
    "JNE" => 0b101,
    "JLE" => 0b110,
    "JMP" => 0b111,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_covers_registers_and_io() {
        assert_eq!(PREDEFINED.get("R0"), Some(&0));
        assert_eq!(PREDEFINED.get("R15"), Some(&15));
        assert_eq!(PREDEFINED.get("SP"), Some(&0));
        assert_eq!(PREDEFINED.get("SCREEN"), Some(&16384));
        assert_eq!(PREDEFINED.get("KBD"), Some(&24576));
        assert_eq!(PREDEFINED.len(), 23);
    }

    #[test]
    fn dest_accepts_permutations() {
        assert_eq!(DEST.get("MD"), DEST.get("DM"));
        assert_eq!(DEST.get("AMD"), DEST.get("DMA"));
        assert_eq!(DEST.get(""), Some(&0b000));
    }

    #[test]
    fn comp_distinguishes_a_and_m() {
        assert_eq!(COMP.get("D+A"), Some(&0b0000010));
        assert_eq!(COMP.get("D+M"), Some(&0b1000010));
        assert_eq!(COMP.get("A+D"), COMP.get("D+A"));
    }

    #[test]
    fn jump_table_is_complete() {
        for (i, m) in ["", "JGT", "JEQ", "JGE", "JLT", "JNE", "JLE", "JMP"]
            .into_iter()
            .enumerate()
        {
            assert_eq!(JUMP.get(m), Some(&(i as u8)));
        }
    }
}

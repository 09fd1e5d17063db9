//! Lowering of VM commands to Hack assembly.
//!
//! One `Emitter` produces one output file. Its comparison and call-site
//! counters only ever increase, so every generated label is unique across
//! all the source files that feed a combined translation.

use crate::command::{Command, Op, Segment};

/// Push the D register onto the stack.
const PUSH_D: &str = "@SP\nA=M\nM=D\n@SP\nM=M+1\n";
/// Pop the top of the stack into D.
const POP_D: &str = "@SP\nAM=M-1\nD=M\n";

/// Base address of the temp segment (RAM[5..13]).
const TEMP_BASE: u16 = 5;

pub struct Emitter {
    comparison_count: usize,
    call_count: usize,
    file_stem: String,
    function: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            comparison_count: 0,
            call_count: 0,
            file_stem: String::new(),
            function: String::new(),
        }
    }

    /// Start translating a new source file; `static i` references become
    /// `<stem>.<i>` from here on.
    pub fn set_file(&mut self, stem: &str) {
        self.file_stem = stem.to_string();
    }

    pub fn emit(&mut self, command: &Command, out: &mut String) {
        match command {
            Command::Arithmetic(op) => self.emit_arithmetic(*op, out),
            Command::Push { segment, index } => self.emit_push(*segment, *index, out),
            Command::Pop { segment, index } => self.emit_pop(*segment, *index, out),
            Command::Label(name) => {
                out.push('(');
                out.push_str(&self.scoped(name));
                out.push_str(")\n");
            }
            Command::Goto(name) => {
                out.push('@');
                out.push_str(&self.scoped(name));
                out.push_str("\n0;JMP\n");
            }
            Command::IfGoto(name) => {
                out.push_str(POP_D);
                out.push('@');
                out.push_str(&self.scoped(name));
                out.push_str("\nD;JNE\n");
            }
            Command::Function { name, locals } => self.emit_function(name, *locals, out),
            Command::Call { name, args } => self.emit_call(name, *args, out),
            Command::Return => out.push_str(RETURN_ASM),
        }
    }

    /// Emit the boot sequence: SP = 256, then a standard call to Sys.init.
    /// The call goes through the ordinary call counter so its return label
    /// cannot collide with any later call site.
    pub fn emit_bootstrap(&mut self, out: &mut String) {
        out.push_str("@256\nD=A\n@SP\nM=D\n");
        self.emit_call("Sys.init", 0, out);
    }

    /// Flow labels are scoped to the enclosing function; before any
    /// `function` command the file stem scopes them instead.
    fn scoped(&self, label: &str) -> String {
        if self.function.is_empty() {
            format!("{}${}", self.file_stem, label)
        } else {
            format!("{}${}", self.function, label)
        }
    }

    fn emit_arithmetic(&mut self, op: Op, out: &mut String) {
        match op {
            Op::Add => binary("D+M", out),
            Op::Sub => binary("M-D", out),
            Op::And => binary("D&M", out),
            Op::Or => binary("D|M", out),
            Op::Neg => unary("-M", out),
            Op::Not => unary("!M", out),
            Op::Eq => self.comparison("JEQ", out),
            Op::Gt => self.comparison("JGT", out),
            Op::Lt => self.comparison("JLT", out),
        }
    }

    /// Comparisons branch because Hack has no conditional move. The result
    /// convention is -1 for true, 0 for false.
    fn comparison(&mut self, jump: &str, out: &mut String) {
        let k = self.comparison_count;
        self.comparison_count += 1;

        // D = lhs - rhs, then jump decides which constant lands on top.
        out.push_str("@SP\nAM=M-1\nD=M\nA=A-1\nD=M-D\n");
        out.push_str(&format!("@BOOLEAN_{k}\nD;{jump}\n"));
        out.push_str("@SP\nA=M-1\nM=0\n");
        out.push_str(&format!("@FINAL_{k}\n0;JMP\n"));
        out.push_str(&format!("(BOOLEAN_{k})\n@SP\nA=M-1\nM=-1\n"));
        out.push_str(&format!("(FINAL_{k})\n"));
    }

    fn emit_push(&self, segment: Segment, index: u16, out: &mut String) {
        match segment {
            Segment::Constant => {
                out.push_str(&format!("@{index}\nD=A\n"));
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let base = base_pointer(segment);
                out.push_str(&format!("@{index}\nD=A\n@{base}\nA=D+M\nD=M\n"));
            }
            Segment::Temp => {
                out.push_str(&format!("@{}\nD=M\n", TEMP_BASE + index));
            }
            Segment::Pointer => {
                out.push_str(&format!("@{}\nD=M\n", pointer_register(index)));
            }
            Segment::Static => {
                out.push_str(&format!("@{}.{index}\nD=M\n", self.file_stem));
            }
        }
        out.push_str(PUSH_D);
    }

    fn emit_pop(&self, segment: Segment, index: u16, out: &mut String) {
        match segment {
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                // Target address lands in R13 before the pop clobbers D.
                let base = base_pointer(segment);
                out.push_str(&format!("@{index}\nD=A\n@{base}\nD=D+M\n@R13\nM=D\n"));
                out.push_str(POP_D);
                out.push_str("@R13\nA=M\nM=D\n");
            }
            Segment::Temp => {
                out.push_str(POP_D);
                out.push_str(&format!("@{}\nM=D\n", TEMP_BASE + index));
            }
            Segment::Pointer => {
                out.push_str(POP_D);
                out.push_str(&format!("@{}\nM=D\n", pointer_register(index)));
            }
            Segment::Static => {
                out.push_str(POP_D);
                out.push_str(&format!("@{}.{index}\nM=D\n", self.file_stem));
            }
            // The parser rejects pop constant before it reaches here.
            Segment::Constant => debug_assert!(false, "pop constant passed the parser"),
        }
    }

    fn emit_function(&mut self, name: &str, locals: u16, out: &mut String) {
        self.function = name.to_string();

        out.push('(');
        out.push_str(name);
        out.push_str(")\n");

        for _ in 0..locals {
            out.push_str("@SP\nA=M\nM=0\n@SP\nM=M+1\n");
        }
    }

    fn emit_call(&mut self, name: &str, args: u16, out: &mut String) {
        let ret = format!("return_address_{}", self.call_count);
        self.call_count += 1;

        // Return address, then the caller's four segment pointers.
        out.push_str(&format!("@{ret}\nD=A\n"));
        out.push_str(PUSH_D);
        for pointer in ["LCL", "ARG", "THIS", "THAT"] {
            out.push_str(&format!("@{pointer}\nD=M\n"));
            out.push_str(PUSH_D);
        }

        // ARG = SP - args - 5
        out.push_str(&format!("@SP\nD=M\n@{}\nD=D-A\n@ARG\nM=D\n", args + 5));
        // LCL = SP
        out.push_str("@SP\nD=M\n@LCL\nM=D\n");
        // Transfer control, then declare the landing point.
        out.push_str(&format!("@{name}\n0;JMP\n({ret})\n"));
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

fn binary(expr: &str, out: &mut String) {
    out.push_str("@SP\nAM=M-1\nD=M\nA=A-1\nM=");
    out.push_str(expr);
    out.push('\n');
}

fn unary(expr: &str, out: &mut String) {
    out.push_str("@SP\nA=M-1\nM=");
    out.push_str(expr);
    out.push('\n');
}

fn base_pointer(segment: Segment) -> &'static str {
    match segment {
        Segment::Local => "LCL",
        Segment::Argument => "ARG",
        Segment::This => "THIS",
        Segment::That => "THAT",
        _ => unreachable!("segment has no base pointer"),
    }
}

fn pointer_register(index: u16) -> &'static str {
    if index == 0 { "THIS" } else { "THAT" }
}

/// The return sequence. R13 holds the frame pointer, R14 the saved return
/// address; the frame is walked downward to restore the caller's pointers.
const RETURN_ASM: &str = concat!(
    // frame = LCL
    "@LCL\nD=M\n@R13\nM=D\n",
    // ret = *(frame - 5)
    "@5\nA=D-A\nD=M\n@R14\nM=D\n",
    // *ARG = pop()
    "@SP\nAM=M-1\nD=M\n@ARG\nA=M\nM=D\n",
    // SP = ARG + 1
    "@ARG\nD=M+1\n@SP\nM=D\n",
    // THAT, THIS, ARG, LCL = *(frame - 1..4)
    "@R13\nAM=M-1\nD=M\n@THAT\nM=D\n",
    "@R13\nAM=M-1\nD=M\n@THIS\nM=D\n",
    "@R13\nAM=M-1\nD=M\n@ARG\nM=D\n",
    "@R13\nAM=M-1\nD=M\n@LCL\nM=D\n",
    // goto ret
    "@R14\nA=M\n0;JMP\n",
);

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_one(emitter: &mut Emitter, command: Command) -> String {
        let mut out = String::new();
        emitter.emit(&command, &mut out);
        out
    }

    #[test]
    fn add_pops_two_pushes_one() {
        let mut e = Emitter::new();
        let asm = emit_one(&mut e, Command::Arithmetic(Op::Add));
        assert_eq!(asm, "@SP\nAM=M-1\nD=M\nA=A-1\nM=D+M\n");
    }

    #[test]
    fn and_or_have_no_redundant_store() {
        let mut e = Emitter::new();
        let and = emit_one(&mut e, Command::Arithmetic(Op::And));
        let or = emit_one(&mut e, Command::Arithmetic(Op::Or));
        assert!(and.ends_with("M=D&M\n"));
        assert!(or.ends_with("M=D|M\n"));
        assert!(!and.contains("M=D\n"));
        assert!(!or.contains("M=D\n"));
    }

    #[test]
    fn comparison_labels_count_up() {
        let mut e = Emitter::new();
        let first = emit_one(&mut e, Command::Arithmetic(Op::Lt));
        let second = emit_one(&mut e, Command::Arithmetic(Op::Eq));

        assert!(first.contains("@BOOLEAN_0\nD;JLT"));
        assert!(first.contains("(FINAL_0)"));
        assert!(second.contains("@BOOLEAN_1\nD;JEQ"));
        assert!(second.contains("(FINAL_1)"));
    }

    #[test]
    fn comparison_result_convention() {
        let mut e = Emitter::new();
        let asm = emit_one(&mut e, Command::Arithmetic(Op::Gt));
        // false path writes 0, true path writes -1
        assert!(asm.contains("M=0"));
        assert!(asm.contains("M=-1"));
    }

    #[test]
    fn push_constant() {
        let mut e = Emitter::new();
        let asm = emit_one(
            &mut e,
            Command::Push {
                segment: Segment::Constant,
                index: 7,
            },
        );
        assert_eq!(asm, format!("@7\nD=A\n{}", PUSH_D));
    }

    #[test]
    fn push_local_goes_through_base_pointer() {
        let mut e = Emitter::new();
        let asm = emit_one(
            &mut e,
            Command::Push {
                segment: Segment::Local,
                index: 3,
            },
        );
        assert!(asm.starts_with("@3\nD=A\n@LCL\nA=D+M\nD=M\n"));
    }

    #[test]
    fn pop_indirect_uses_r13() {
        let mut e = Emitter::new();
        let asm = emit_one(
            &mut e,
            Command::Pop {
                segment: Segment::That,
                index: 5,
            },
        );
        assert!(asm.starts_with("@5\nD=A\n@THAT\nD=D+M\n@R13\nM=D\n"));
        assert!(asm.ends_with("@R13\nA=M\nM=D\n"));
    }

    #[test]
    fn temp_is_direct() {
        let mut e = Emitter::new();
        let push = emit_one(
            &mut e,
            Command::Push {
                segment: Segment::Temp,
                index: 4,
            },
        );
        assert!(push.starts_with("@9\nD=M\n"));
    }

    #[test]
    fn pointer_selects_this_or_that() {
        let mut e = Emitter::new();
        let zero = emit_one(
            &mut e,
            Command::Pop {
                segment: Segment::Pointer,
                index: 0,
            },
        );
        let one = emit_one(
            &mut e,
            Command::Pop {
                segment: Segment::Pointer,
                index: 1,
            },
        );
        assert!(zero.ends_with("@THIS\nM=D\n"));
        assert!(one.ends_with("@THAT\nM=D\n"));
    }

    #[test]
    fn static_uses_file_stem() {
        let mut e = Emitter::new();
        e.set_file("Widget");
        let asm = emit_one(
            &mut e,
            Command::Push {
                segment: Segment::Static,
                index: 2,
            },
        );
        assert!(asm.starts_with("@Widget.2\nD=M\n"));
    }

    #[test]
    fn labels_scope_to_function() {
        let mut e = Emitter::new();
        e.set_file("Main");
        emit_one(
            &mut e,
            Command::Function {
                name: "Main.run".to_string(),
                locals: 0,
            },
        );
        let label = emit_one(&mut e, Command::Label("LOOP".to_string()));
        let goto = emit_one(&mut e, Command::Goto("LOOP".to_string()));
        let ifgoto = emit_one(&mut e, Command::IfGoto("LOOP".to_string()));

        assert_eq!(label, "(Main.run$LOOP)\n");
        assert!(goto.contains("@Main.run$LOOP\n0;JMP"));
        assert!(ifgoto.contains("@Main.run$LOOP\nD;JNE"));
    }

    #[test]
    fn labels_scope_to_file_outside_functions() {
        let mut e = Emitter::new();
        e.set_file("Main");
        let label = emit_one(&mut e, Command::Label("START".to_string()));
        assert_eq!(label, "(Main$START)\n");
    }

    #[test]
    fn function_declares_and_zeroes_locals() {
        let mut e = Emitter::new();
        let asm = emit_one(
            &mut e,
            Command::Function {
                name: "Sys.init".to_string(),
                locals: 2,
            },
        );
        assert!(asm.starts_with("(Sys.init)\n"));
        assert_eq!(asm.matches("M=0").count(), 2);
    }

    #[test]
    fn call_builds_frame() {
        let mut e = Emitter::new();
        let asm = emit_one(
            &mut e,
            Command::Call {
                name: "Math.max".to_string(),
                args: 2,
            },
        );

        assert!(asm.starts_with("@return_address_0\nD=A\n"));
        for pointer in ["@LCL\nD=M", "@ARG\nD=M", "@THIS\nD=M", "@THAT\nD=M"] {
            assert!(asm.contains(pointer));
        }
        // ARG = SP - 2 - 5
        assert!(asm.contains("@7\nD=D-A\n@ARG\nM=D"));
        assert!(asm.contains("@Math.max\n0;JMP\n(return_address_0)\n"));
    }

    #[test]
    fn call_counter_is_monotonic() {
        let mut e = Emitter::new();
        let first = emit_one(
            &mut e,
            Command::Call {
                name: "F.g".to_string(),
                args: 0,
            },
        );
        let second = emit_one(
            &mut e,
            Command::Call {
                name: "F.g".to_string(),
                args: 0,
            },
        );
        assert!(first.contains("(return_address_0)"));
        assert!(second.contains("(return_address_1)"));
    }

    #[test]
    fn return_restores_frame() {
        let mut e = Emitter::new();
        let asm = emit_one(&mut e, Command::Return);
        assert!(asm.starts_with("@LCL\nD=M\n@R13\nM=D\n"));
        assert!(asm.contains("@5\nA=D-A\nD=M\n@R14\nM=D"));
        assert!(asm.contains("@ARG\nD=M+1\n@SP\nM=D"));
        assert!(asm.ends_with("@R14\nA=M\n0;JMP\n"));
    }

    #[test]
    fn bootstrap_sets_sp_then_calls_sys_init() {
        let mut e = Emitter::new();
        let mut out = String::new();
        e.emit_bootstrap(&mut out);

        assert!(out.starts_with("@256\nD=A\n@SP\nM=D\n"));
        assert!(out.contains("@Sys.init\n0;JMP"));
        // The bootstrap call consumed counter 0...
        assert!(out.contains("(return_address_0)"));
        // ...so the next call site gets 1.
        let next = emit_one(
            &mut e,
            Command::Call {
                name: "Main.main".to_string(),
                args: 0,
            },
        );
        assert!(next.contains("(return_address_1)"));
    }
}

//! APEX instruction set: the closed opcode table and the decoded
//! instruction record that flows, unmutated, through every pipeline latch.

use std::fmt;

/// Number of architectural integer registers.
pub const REG_FILE_SIZE: usize = 32;

/// Registers below this index are "real" architectural registers for the
/// purposes of forwarding-tap publication and validity tracking; `R16` and
/// above are addressable (e.g. as a decode source) but never drive a
/// forwarding publish or a validity clear/set.
pub const REAL_ARCH_REGISTER_COUNT: usize = 16;

/// A validated architectural register index in `0..REG_FILE_SIZE`.
///
/// Replaces the source's `-1`-for-"no register" sentinel: a missing operand
/// is `Option<RegIndex>::None`, not an out-of-range integer that every call
/// site has to remember to bounds-check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegIndex(usize);

impl RegIndex {
    /// Builds a register index, rejecting anything outside the file.
    pub fn new(idx: usize) -> Option<Self> {
        if idx < REG_FILE_SIZE {
            Some(RegIndex(idx))
        } else {
            None
        }
    }

    /// The raw register number, for indexing a register file or printing.
    pub fn index(self) -> usize {
        self.0
    }

    /// Whether this index is a "real" architectural register (`0 <= idx <
    /// 16`) — the gate on forwarding-tap publication and validity
    /// clear/set, distinct from `RegIndex::new`'s wider decode-time bound.
    pub fn is_real_arch_register(self) -> bool {
        self.0 < REAL_ARCH_REGISTER_COUNT
    }
}

impl fmt::Display for RegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// The closed set of APEX opcodes, each carrying only the operand fields it
/// actually uses.
///
/// This replaces the source's single flat struct with an integer opcode tag
/// and unused-per-opcode fields: a `DIV` has no `rs3`, a `MOVC` has no
/// sources at all, and the compiler now enforces that every arm handles
/// exactly the fields that opcode is defined over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Add { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Sub { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Mul { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Div { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    And { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Or { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Xor { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Addl { rd: RegIndex, rs1: RegIndex, imm: i32 },
    Subl { rd: RegIndex, rs1: RegIndex, imm: i32 },
    Cmp { rs1: RegIndex, rs2: RegIndex },
    Movc { rd: RegIndex, imm: i32 },
    Load { rd: RegIndex, rs1: RegIndex, imm: i32 },
    Ldr { rd: RegIndex, rs1: RegIndex, rs2: RegIndex },
    Store { rs1: RegIndex, rs2: RegIndex, imm: i32 },
    Str { rs1: RegIndex, rs2: RegIndex, rs3: RegIndex },
    Bz { imm: i32 },
    Bnz { imm: i32 },
    Halt,
    Nop,
}

impl Opcode {
    /// Mnemonic used in trace output, matching the source vocabulary.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Add { .. } => "ADD",
            Opcode::Sub { .. } => "SUB",
            Opcode::Mul { .. } => "MUL",
            Opcode::Div { .. } => "DIV",
            Opcode::And { .. } => "AND",
            Opcode::Or { .. } => "OR",
            Opcode::Xor { .. } => "XOR",
            Opcode::Addl { .. } => "ADDL",
            Opcode::Subl { .. } => "SUBL",
            Opcode::Cmp { .. } => "CMP",
            Opcode::Movc { .. } => "MOVC",
            Opcode::Load { .. } => "LOAD",
            Opcode::Ldr { .. } => "LDR",
            Opcode::Store { .. } => "STORE",
            Opcode::Str { .. } => "STR",
            Opcode::Bz { .. } => "BZ",
            Opcode::Bnz { .. } => "BNZ",
            Opcode::Halt => "HALT",
            Opcode::Nop => "NOP",
        }
    }

    /// Destination register, if this opcode writes one.
    pub fn rd(&self) -> Option<RegIndex> {
        match *self {
            Opcode::Add { rd, .. }
            | Opcode::Sub { rd, .. }
            | Opcode::Mul { rd, .. }
            | Opcode::Div { rd, .. }
            | Opcode::And { rd, .. }
            | Opcode::Or { rd, .. }
            | Opcode::Xor { rd, .. }
            | Opcode::Addl { rd, .. }
            | Opcode::Subl { rd, .. }
            | Opcode::Movc { rd, .. }
            | Opcode::Load { rd, .. }
            | Opcode::Ldr { rd, .. } => Some(rd),
            _ => None,
        }
    }

    /// Whether Writeback commits `result_buffer` into `rd` for this opcode.
    ///
    /// `STORE`/`STR`/`CMP`/`BZ`/`BNZ`/`NOP`/`HALT` never write a register.
    pub fn writes_register(&self) -> bool {
        matches!(
            self,
            Opcode::Add { .. }
                | Opcode::Sub { .. }
                | Opcode::Mul { .. }
                | Opcode::Div { .. }
                | Opcode::Addl { .. }
                | Opcode::Subl { .. }
                | Opcode::And { .. }
                | Opcode::Or { .. }
                | Opcode::Xor { .. }
                | Opcode::Movc { .. }
                | Opcode::Load { .. }
                | Opcode::Ldr { .. }
        )
    }

    /// Whether this opcode is a memory load (the EX-tap forwarding guard:
    /// a load's result is not available until after the Memory stage).
    pub fn is_load(&self) -> bool {
        matches!(self, Opcode::Load { .. } | Opcode::Ldr { .. })
    }
}

/// A fully decoded, immutable instruction. Built once at load time and never
/// mutated afterwards; every stage latch carries a copy of the fields it
/// needs, never a reference back into code memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
}

impl Instruction {
    pub fn new(opcode: Opcode) -> Self {
        Instruction { opcode }
    }

    pub fn mnemonic(&self) -> &'static str {
        self.opcode.mnemonic()
    }

    /// Operand text for trace lines, in the source order the opcode reads
    /// or writes them (destination first, then sources, then immediate).
    pub fn operand_text(&self) -> String {
        match self.opcode {
            Opcode::Add { rd, rs1, rs2 }
            | Opcode::Sub { rd, rs1, rs2 }
            | Opcode::Mul { rd, rs1, rs2 }
            | Opcode::Div { rd, rs1, rs2 }
            | Opcode::And { rd, rs1, rs2 }
            | Opcode::Or { rd, rs1, rs2 }
            | Opcode::Xor { rd, rs1, rs2 }
            | Opcode::Ldr { rd, rs1, rs2 } => format!("{},{},{}", rd, rs1, rs2),
            Opcode::Addl { rd, rs1, imm } | Opcode::Subl { rd, rs1, imm } => {
                format!("{},{},#{}", rd, rs1, imm)
            }
            Opcode::Cmp { rs1, rs2 } => format!("{},{}", rs1, rs2),
            Opcode::Movc { rd, imm } => format!("{},#{}", rd, imm),
            Opcode::Load { rd, rs1, imm } => format!("{},{},#{}", rd, rs1, imm),
            Opcode::Store { rs1, rs2, imm } => format!("{},{},#{}", rs1, rs2, imm),
            Opcode::Str { rs1, rs2, rs3 } => format!("{},{},{}", rs1, rs2, rs3),
            Opcode::Bz { imm } | Opcode::Bnz { imm } => format!("#{}", imm),
            Opcode::Halt | Opcode::Nop => String::new(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operand_text();
        if operands.is_empty() {
            write!(f, "{}", self.mnemonic())
        } else {
            write!(f, "{},{}", self.mnemonic(), operands)
        }
    }
}

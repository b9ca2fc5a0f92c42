//! Object loader: the external collaborator that turns a textual program
//! into the decoded [`Instruction`] array the pipeline core consumes.
//!
//! This module is deliberately thin and isolated — the pipeline core never
//! parses text — and is not a grounding focus of this crate's pipeline
//! semantics, only the glue needed to get a program into it.

use std::fs;
use std::path::Path;

use crate::common::error::SimError;
use crate::isa::{Instruction, Opcode, RegIndex};

/// Reads `path` and parses one instruction per non-blank, non-comment line.
///
/// Format: `MNEMONIC[,operand,...]`, comma- or whitespace-delimited,
/// register operands written `R<n>`, immediates written `#<n>` (a leading
/// `#` is optional for `BZ`/`BNZ` offsets but conventional throughout).
/// Lines starting with `;` are comments; blank lines are ignored.
pub fn load(path: &Path) -> Result<Vec<Instruction>, SimError> {
    let contents = fs::read_to_string(path)?;
    let mut instructions = Vec::new();
    for (lineno, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let opcode = parse_line(line)
            .map_err(|e| SimError::Configuration(format!("line {}: {}", lineno + 1, e)))?;
        instructions.push(Instruction::new(opcode));
    }
    Ok(instructions)
}

fn parse_line(line: &str) -> Result<Opcode, String> {
    let tokens: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    let (mnemonic, operands) = tokens
        .split_first()
        .ok_or_else(|| "empty instruction line".to_string())?;

    let reg = |s: &str| -> Result<RegIndex, String> {
        let digits = s
            .strip_prefix('R')
            .or_else(|| s.strip_prefix('r'))
            .ok_or_else(|| format!("expected register operand, found '{s}'"))?;
        let n: usize = digits
            .parse()
            .map_err(|_| format!("invalid register operand '{s}'"))?;
        RegIndex::new(n).ok_or_else(|| format!("register index {n} out of range"))
    };
    let imm = |s: &str| -> Result<i32, String> {
        s.trim_start_matches('#')
            .parse()
            .map_err(|_| format!("invalid immediate operand '{s}'"))
    };
    let need = |idx: usize| -> Result<&str, String> {
        operands
            .get(idx)
            .copied()
            .ok_or_else(|| format!("{} expects more operands", mnemonic.to_uppercase()))
    };

    match mnemonic.to_uppercase().as_str() {
        "ADD" => Ok(Opcode::Add { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "SUB" => Ok(Opcode::Sub { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "MUL" => Ok(Opcode::Mul { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "DIV" => Ok(Opcode::Div { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "AND" => Ok(Opcode::And { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "OR" => Ok(Opcode::Or { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "XOR" => Ok(Opcode::Xor { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "LDR" => Ok(Opcode::Ldr { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, rs2: reg(need(2)?)? }),
        "ADDL" => Ok(Opcode::Addl { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, imm: imm(need(2)?)? }),
        "SUBL" => Ok(Opcode::Subl { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, imm: imm(need(2)?)? }),
        "LOAD" => Ok(Opcode::Load { rd: reg(need(0)?)?, rs1: reg(need(1)?)?, imm: imm(need(2)?)? }),
        "CMP" => Ok(Opcode::Cmp { rs1: reg(need(0)?)?, rs2: reg(need(1)?)? }),
        "MOVC" => Ok(Opcode::Movc { rd: reg(need(0)?)?, imm: imm(need(1)?)? }),
        "STORE" => Ok(Opcode::Store { rs1: reg(need(0)?)?, rs2: reg(need(1)?)?, imm: imm(need(2)?)? }),
        "STR" => Ok(Opcode::Str { rs1: reg(need(0)?)?, rs2: reg(need(1)?)?, rs3: reg(need(2)?)? }),
        "BZ" => Ok(Opcode::Bz { imm: imm(need(0)?)? }),
        "BNZ" => Ok(Opcode::Bnz { imm: imm(need(0)?)? }),
        "HALT" => Ok(Opcode::Halt),
        "NOP" => Ok(Opcode::Nop),
        other => Err(format!("unrecognized mnemonic '{other}'")),
    }
}

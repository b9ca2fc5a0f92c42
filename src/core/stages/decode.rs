//! Decode/RegRead: operand resolution, hazard detection, stall raising.

use crate::core::cpu::Cpu;
use crate::isa::{Opcode, RegIndex};

/// Resolves one source operand against the three providers, in priority
/// order: register file (if valid), EX tap (refusing a load producer),
/// then MEM tap. `None` means every provider failed — Decode must stall.
fn resolve(cpu: &Cpu, reg: RegIndex) -> Option<i32> {
    if cpu.regs.is_valid(reg) {
        return Some(cpu.regs.read(reg));
    }
    if let Some(value) = cpu.taps.resolve_ex(reg) {
        return Some(value);
    }
    cpu.taps.resolve_mem(reg)
}

/// Runs one cycle of Decode/RegRead.
///
/// `stalled` is reset before any hazard check is made — a stage that
/// stalled last cycle gets a clean attempt this cycle, and only a failed
/// resolution this cycle re-raises it. After the attempt (whether it
/// stalls or not) both forwarding taps are cleared: they are valid for
/// exactly one cycle.
pub fn decode_stage(cpu: &mut Cpu) {
    cpu.decode.stalled = false;

    if !cpu.decode.has_insn {
        cpu.taps.clear();
        return;
    }

    let instruction = cpu
        .decode
        .instruction
        .expect("has_insn implies instruction is populated");

    let stalled = match instruction.opcode {
        Opcode::Add { rs1, rs2, .. }
        | Opcode::Sub { rs1, rs2, .. }
        | Opcode::Mul { rs1, rs2, .. }
        | Opcode::Div { rs1, rs2, .. }
        | Opcode::And { rs1, rs2, .. }
        | Opcode::Or { rs1, rs2, .. }
        | Opcode::Xor { rs1, rs2, .. }
        | Opcode::Ldr { rs1, rs2, .. }
        | Opcode::Cmp { rs1, rs2 } => match (resolve(cpu, rs1), resolve(cpu, rs2)) {
            (Some(a), Some(b)) => {
                cpu.decode.rs1_value = a;
                cpu.decode.rs2_value = b;
                false
            }
            _ => true,
        },
        Opcode::Addl { rs1, .. } | Opcode::Subl { rs1, .. } | Opcode::Load { rs1, .. } => {
            match resolve(cpu, rs1) {
                Some(a) => {
                    cpu.decode.rs1_value = a;
                    false
                }
                None => true,
            }
        }
        Opcode::Store { rs1, rs2, .. } => match (resolve(cpu, rs1), resolve(cpu, rs2)) {
            (Some(data), Some(base)) => {
                cpu.decode.rs1_value = data;
                cpu.decode.rs2_value = base;
                false
            }
            _ => true,
        },
        Opcode::Str { rs1, rs2, rs3 } => {
            match (resolve(cpu, rs1), resolve(cpu, rs2), resolve(cpu, rs3)) {
                (Some(data), Some(base), Some(offset)) => {
                    cpu.decode.rs1_value = data;
                    cpu.decode.rs2_value = base;
                    cpu.decode.rs3_value = offset;
                    false
                }
                _ => true,
            }
        }
        Opcode::Movc { .. } | Opcode::Halt | Opcode::Nop | Opcode::Bz { .. } | Opcode::Bnz { .. } => {
            false
        }
    };

    cpu.taps.clear();

    if stalled {
        cpu.decode.stalled = true;
        return;
    }

    cpu.execute = cpu.decode;
    cpu.decode.has_insn = false;
    cpu.fetch.stalled = false;
}

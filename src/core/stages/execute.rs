//! Execute: ALU, address computation, branch redirect, zero-flag.

use crate::common::error::SimError;
use crate::core::cpu::Cpu;
use crate::isa::Opcode;

/// Runs one cycle of Execute.
///
/// Each opcode is an isolated arm — no `DIV`-falls-into-`AND`,
/// `AND`-falls-into-`LOAD`, or `MOVC`-falls-into-`NOP`/`HALT` fall-through.
///
/// The destination register's validity bit is cleared here, at Execute
/// entry — the single point in this pipeline where a register becomes
/// "producer in flight"; it is set again only in Writeback.
pub fn execute_stage(cpu: &mut Cpu) -> Result<(), SimError> {
    if !cpu.execute.has_insn {
        cpu.memory = Default::default();
        return Ok(());
    }

    let instruction = cpu
        .execute
        .instruction
        .expect("has_insn implies instruction is populated");

    if let Some(rd) = instruction.opcode.rd() {
        if rd.is_real_arch_register() {
            cpu.regs.mark_in_flight(rd);
        }
    }

    {
        let latch = &mut cpu.execute;
        match instruction.opcode {
            Opcode::Add { .. } => {
                latch.result_buffer = latch.rs1_value.wrapping_add(latch.rs2_value);
            }
            Opcode::Sub { .. } => {
                latch.result_buffer = latch.rs1_value.wrapping_sub(latch.rs2_value);
            }
            Opcode::Mul { .. } => {
                latch.result_buffer = latch.rs1_value.wrapping_mul(latch.rs2_value);
            }
            Opcode::Div { .. } => {
                if latch.rs2_value == 0 {
                    return Err(SimError::Program(format!(
                        "division by zero at pc {}",
                        latch.pc
                    )));
                }
                latch.result_buffer = latch.rs1_value.wrapping_div(latch.rs2_value);
            }
            Opcode::And { .. } => {
                latch.result_buffer = latch.rs1_value & latch.rs2_value;
            }
            Opcode::Or { .. } => {
                latch.result_buffer = latch.rs1_value | latch.rs2_value;
            }
            Opcode::Xor { .. } => {
                latch.result_buffer = latch.rs1_value ^ latch.rs2_value;
            }
            Opcode::Addl { imm, .. } => {
                latch.result_buffer = latch.rs1_value.wrapping_add(imm);
            }
            Opcode::Subl { imm, .. } => {
                latch.result_buffer = latch.rs1_value.wrapping_sub(imm);
            }
            Opcode::Cmp { .. } => {
                latch.result_buffer = latch.rs1_value.wrapping_sub(latch.rs2_value);
            }
            Opcode::Movc { imm, .. } => {
                latch.result_buffer = imm;
            }
            Opcode::Load { imm, .. } => {
                latch.memory_address = latch.rs1_value.wrapping_add(imm);
            }
            Opcode::Ldr { .. } => {
                latch.memory_address = latch.rs1_value.wrapping_add(latch.rs2_value);
            }
            Opcode::Store { imm, .. } => {
                latch.memory_address = latch.rs2_value.wrapping_add(imm);
            }
            Opcode::Str { .. } => {
                latch.memory_address = latch.rs2_value.wrapping_add(latch.rs3_value);
            }
            Opcode::Bz { .. } | Opcode::Bnz { .. } | Opcode::Halt | Opcode::Nop => {}
        }

        // Arithmetic, logical and compare opcodes set the zero flag;
        // address computation and control transfer do not touch it.
        match instruction.opcode {
            Opcode::Add { .. }
            | Opcode::Sub { .. }
            | Opcode::Mul { .. }
            | Opcode::Div { .. }
            | Opcode::And { .. }
            | Opcode::Or { .. }
            | Opcode::Xor { .. }
            | Opcode::Addl { .. }
            | Opcode::Subl { .. }
            | Opcode::Cmp { .. } => cpu.zero_flag = latch.result_buffer == 0,
            _ => {}
        }
    }

    match instruction.opcode {
        Opcode::Bz { imm } if cpu.zero_flag => redirect(cpu, imm)?,
        Opcode::Bnz { imm } if !cpu.zero_flag => redirect(cpu, imm)?,
        _ => {}
    }

    // Publish the EX tap before advancing: `rd` and `result_buffer` belong
    // to the instruction just computed, not whatever this latch becomes
    // once copied to Memory. Only a real architectural register (< 16)
    // drives a publish.
    if let Some(rd) = instruction.opcode.rd() {
        if rd.is_real_arch_register() {
            cpu.taps
                .publish_ex(rd, cpu.execute.result_buffer, instruction.opcode.is_load());
        }
    }

    cpu.memory = cpu.execute;
    cpu.execute.has_insn = false;

    // HALT additionally clears Decode and Fetch so nothing younger retires.
    // The retiring opcode is read from `instruction`, captured before any
    // latch was cleared for the next cycle — not from `cpu.execute.opcode`
    // after the copy-and-clear above.
    if matches!(instruction.opcode, Opcode::Halt) {
        cpu.decode.has_insn = false;
        cpu.fetch.has_insn = false;
    }

    Ok(())
}

fn redirect(cpu: &mut Cpu, imm: i32) -> Result<(), SimError> {
    if imm % 4 != 0 {
        return Err(SimError::Program(format!(
            "branch target offset {imm} is not a multiple of 4"
        )));
    }
    let new_pc = cpu.execute.pc.wrapping_add(imm);
    if cpu.code_memory_index(new_pc).is_none() {
        return Err(SimError::Program(format!(
            "branch target pc {new_pc} is out of code-memory range"
        )));
    }
    cpu.fetch_from_next_cycle = true;
    cpu.decode.has_insn = false;
    cpu.fetch.has_insn = true;
    cpu.pc = new_pc;
    cpu.stats.flushes_control += 1;
    Ok(())
}

//! Memory: data-memory load/store.

use crate::common::error::SimError;
use crate::core::cpu::Cpu;
use crate::isa::Opcode;

/// Runs one cycle of Memory.
///
/// `LOAD`/`LDR` read `data_memory[memory_address]` into `result_buffer`;
/// `STORE`/`STR` write `rs1_value` (the data operand) into
/// `data_memory[memory_address]`. Every other opcode passes through
/// untouched. After processing, a real destination register is published
/// at the MEM tap.
///
/// An out-of-range `memory_address` (negative, or past the end of
/// `data_memory`) is a program error, trapped the same way a misaligned
/// branch target or a division by zero is, rather than panicking on an
/// out-of-bounds index.
pub fn memory_stage(cpu: &mut Cpu) -> Result<(), SimError> {
    if !cpu.memory.has_insn {
        cpu.writeback = Default::default();
        return Ok(());
    }

    let instruction = cpu
        .memory
        .instruction
        .expect("has_insn implies instruction is populated");

    match instruction.opcode {
        Opcode::Load { .. } | Opcode::Ldr { .. } => {
            let addr = bounds_check(cpu.memory.memory_address, cpu.data_memory.len())?;
            cpu.memory.result_buffer = cpu.data_memory[addr];
        }
        Opcode::Store { .. } | Opcode::Str { .. } => {
            let addr = bounds_check(cpu.memory.memory_address, cpu.data_memory.len())?;
            cpu.data_memory[addr] = cpu.memory.rs1_value;
        }
        _ => {}
    }

    if let Some(rd) = instruction.opcode.rd() {
        if rd.is_real_arch_register() {
            cpu.taps.publish_mem(rd, cpu.memory.result_buffer);
        }
    }

    cpu.writeback = cpu.memory;
    cpu.memory.has_insn = false;
    Ok(())
}

/// Validates a computed data-memory address against `len`, raising a
/// program error for a negative or past-the-end index instead of letting
/// the caller index `data_memory` unchecked.
fn bounds_check(memory_address: i32, len: usize) -> Result<usize, SimError> {
    usize::try_from(memory_address)
        .ok()
        .filter(|&a| a < len)
        .ok_or_else(|| SimError::Program(format!("data memory address {memory_address} out of range")))
}

//! Fetch: PC management and stall propagation from Decode.

use crate::core::cpu::Cpu;

/// Runs one cycle of Fetch.
///
/// If the previous cycle's Execute redirected control flow,
/// `fetch_from_next_cycle` is set; this cycle is a bubble (the in-flight
/// Fetch latch content is discarded) and the flag is cleared without
/// touching `cpu.pc`, which Execute already retargeted. Otherwise, if
/// `cpu.pc` still addresses a code-memory slot, Fetch reads it into its own
/// latch and — provided Decode is not stalled — advances that latch into
/// Decode and increments `cpu.pc`. If Decode is stalled, Fetch keeps the
/// fetched instruction and marks itself stalled instead, retrying next
/// cycle without moving `cpu.pc`.
pub fn fetch_stage(cpu: &mut Cpu) {
    if cpu.fetch_from_next_cycle {
        cpu.fetch_from_next_cycle = false;
        return;
    }

    if !cpu.fetch.has_insn {
        return;
    }

    let instruction = match cpu
        .code_memory_index(cpu.pc)
        .and_then(|i| cpu.code_memory.get(i))
    {
        Some(insn) => *insn,
        None => {
            // Out of range: Fetch becomes unoccupied rather than reading
            // past the end of the program.
            cpu.fetch.has_insn = false;
            return;
        }
    };

    cpu.fetch.pc = cpu.pc;
    cpu.fetch.instruction = Some(instruction);

    if cpu.decode.stalled {
        cpu.fetch.stalled = true;
        return;
    }

    cpu.fetch.stalled = false;
    cpu.decode = cpu.fetch;
    cpu.decode.has_insn = true;
    cpu.pc += 4;
}

//! Per-cycle trace lines and final register/data-memory dumps.
//!
//! Not a grounding focus of the pipeline core itself — every format string
//! here exists purely to satisfy the external trace/dump contract, modeled
//! on the plain `println!`/`eprintln!` diagnostics the pipeline engine this
//! crate adapts already uses for the same purpose.

use crate::core::cpu::Cpu;
use crate::core::latch::StageLatch;

fn stage_line(name: &str, latch: &StageLatch) {
    if latch.has_insn {
        let insn = latch
            .instruction
            .expect("has_insn implies instruction is populated");
        println!(
            "Instruction at {}: pc({}) {}",
            name,
            latch.pc,
            format_instruction(&insn)
        );
    } else {
        println!("Instruction at {}: empty", name);
    }
}

fn format_instruction(insn: &crate::isa::Instruction) -> String {
    let operands = insn.operand_text();
    if operands.is_empty() {
        insn.mnemonic().to_string()
    } else {
        format!("{},{}", insn.mnemonic(), operands)
    }
}

/// Prints the five stage trace lines for one cycle, in Fetch, Decode,
/// Execute, Memory, Writeback order, independent of the reverse order the
/// stages were actually invoked in.
pub fn print_cycle(
    fetch: &StageLatch,
    decode: &StageLatch,
    execute: &StageLatch,
    memory: &StageLatch,
    writeback: &StageLatch,
) {
    stage_line("Fetch", fetch);
    stage_line("Decode", decode);
    stage_line("Execute", execute);
    stage_line("Memory", memory);
    stage_line("Writeback", writeback);
}

/// Final register-file dump: one line per register, index/value/validity.
pub fn print_register_dump(cpu: &Cpu) {
    print!("{}", cpu.regs.dump());
}

/// Final data-memory dump: the first 100 words.
pub fn print_data_memory_dump(cpu: &Cpu) {
    for (i, word) in cpu.data_memory.iter().take(100).enumerate() {
        println!("MEM[{}] = {}", i, word);
    }
}

//! Owned pipeline state and the per-cycle driver loop.

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::forwarding::ForwardingTaps;
use crate::core::latch::StageLatch;
use crate::core::regfile::RegisterFile;
use crate::core::stages::{decode, execute, fetch, memory, writeback};
use crate::isa::Instruction;
use crate::stats::SimStats;

/// Why the driver loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// Writeback retired a `HALT` on this cycle.
    Halted,
    /// The cycle budget passed on the CLI was reached first.
    CyclesExhausted,
}

/// The whole simulated machine: one owned value threaded through every
/// stage function, replacing the ambient-global-state machine this
/// pipeline's architecture was adapted from.
pub struct Cpu {
    /// Fetch's cursor into `code_memory`, in byte units starting at
    /// `code_memory_base`.
    pub pc: i32,
    pub clock: u64,
    pub regs: RegisterFile,
    pub zero_flag: bool,
    pub data_memory: Vec<i32>,
    pub code_memory: Vec<Instruction>,
    pub code_memory_base: i32,

    pub fetch: StageLatch,
    pub decode: StageLatch,
    pub execute: StageLatch,
    pub memory: StageLatch,
    pub writeback: StageLatch,

    pub taps: ForwardingTaps,
    /// Set by a taken branch in Execute; makes Fetch skip exactly one cycle
    /// so the redirected `pc` takes effect cleanly.
    pub fetch_from_next_cycle: bool,

    pub trace: bool,
    pub stats: SimStats,
}

impl Cpu {
    pub fn new(code_memory: Vec<Instruction>, config: &Config, trace: bool) -> Self {
        let mut fetch = StageLatch::empty();
        fetch.has_insn = true;

        Cpu {
            pc: config.code_memory_base,
            clock: 0,
            regs: RegisterFile::new(),
            zero_flag: false,
            data_memory: vec![0; config.data_memory_size],
            code_memory,
            code_memory_base: config.code_memory_base,
            fetch,
            decode: StageLatch::empty(),
            execute: StageLatch::empty(),
            memory: StageLatch::empty(),
            writeback: StageLatch::empty(),
            taps: ForwardingTaps::new(),
            fetch_from_next_cycle: false,
            trace,
            stats: SimStats::new(),
        }
    }

    /// Maps a program counter to a `code_memory` index, or `None` if it is
    /// misaligned or out of range.
    pub fn code_memory_index(&self, pc: i32) -> Option<usize> {
        if pc < self.code_memory_base || (pc - self.code_memory_base) % 4 != 0 {
            return None;
        }
        let index = ((pc - self.code_memory_base) / 4) as usize;
        if index < self.code_memory.len() {
            Some(index)
        } else {
            None
        }
    }

    /// Runs the pipeline for up to `cycle_budget` cycles, invoking
    /// Writeback, Memory, Execute, Decode, Fetch in that literal order
    /// every cycle regardless of stalls — a stall is Decode declining to
    /// advance its own latch, not the driver skipping a stage call.
    pub fn run(&mut self, cycle_budget: u64) -> Result<TerminationReason, SimError> {
        loop {
            if self.trace {
                println!("Clock Cycle #: {}", self.clock);
            }

            // Each stage's trace line reflects the latch content that stage
            // itself consumes this cycle, snapshotted at the point that
            // stage runs (not after, since Decode/Execute/Memory clear
            // `has_insn` on their own latch once they advance it downstream).
            let wb_snapshot = self.writeback;
            let halted = writeback::writeback_stage(self);

            let mem_snapshot = self.memory;
            memory::memory_stage(self)?;

            let exec_snapshot = self.execute;
            execute::execute_stage(self)?;

            let dec_snapshot = self.decode;
            decode::decode_stage(self);
            if self.decode.stalled {
                self.stats.stalls_data += 1;
            }

            fetch::fetch_stage(self);
            let fetch_snapshot = self.fetch;

            if self.trace {
                crate::sim::trace::print_cycle(
                    &fetch_snapshot,
                    &dec_snapshot,
                    &exec_snapshot,
                    &mem_snapshot,
                    &wb_snapshot,
                );
            }

            if halted {
                return Ok(TerminationReason::Halted);
            }

            self.clock += 1;
            self.stats.cycles += 1;

            if self.clock >= cycle_budget {
                return Ok(TerminationReason::CyclesExhausted);
            }
        }
    }
}

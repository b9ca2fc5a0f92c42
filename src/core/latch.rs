//! The uniform carrier between adjacent pipeline stages.

use crate::isa::Instruction;

/// State held by one pipeline stage for the single in-flight instruction it
/// currently owns.
///
/// All fields are owned values, copied (never referenced) when one stage
/// advances its latch into the next — there is no aliasing between stage
/// latches, matching the immutable, load-time-only `Instruction` record it
/// carries a copy of.
#[derive(Clone, Copy, Debug, Default)]
pub struct StageLatch {
    /// Program counter of the carried instruction.
    pub pc: i32,
    /// The decoded instruction, if this latch is occupied.
    pub instruction: Option<Instruction>,
    pub rs1_value: i32,
    pub rs2_value: i32,
    pub rs3_value: i32,
    /// ALU result, address-computation result, or MOVC immediate.
    pub result_buffer: i32,
    /// Data-memory index computed by an address-computation opcode.
    pub memory_address: i32,
    /// Whether this latch currently carries an instruction.
    pub has_insn: bool,
    /// Set when this stage could not advance its latch this cycle.
    pub stalled: bool,
}

impl StageLatch {
    /// An unoccupied latch — the state a flushed or never-filled stage is in.
    pub fn empty() -> Self {
        StageLatch::default()
    }
}

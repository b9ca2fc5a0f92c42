//! Architectural register file and validity bitmap.

use crate::isa::{RegIndex, REG_FILE_SIZE};

/// 32 signed 32-bit integer registers, each tagged with a validity bit: `1`
/// (`true`) means no producer is currently in flight for that register, `0`
/// (`false`) means a latch between Decode-exit and Writeback-entry will
/// eventually write it.
///
/// Written only in Writeback, read only in Decode — see the resource-model
/// ownership rules this mirrors.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    regs: [i32; REG_FILE_SIZE],
    valid: [bool; REG_FILE_SIZE],
}

impl Default for RegisterFile {
    fn default() -> Self {
        RegisterFile {
            regs: [0; REG_FILE_SIZE],
            valid: [true; REG_FILE_SIZE],
        }
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, idx: RegIndex) -> i32 {
        self.regs[idx.index()]
    }

    pub fn write(&mut self, idx: RegIndex, value: i32) {
        self.regs[idx.index()] = value;
    }

    pub fn is_valid(&self, idx: RegIndex) -> bool {
        self.valid[idx.index()]
    }

    /// Clears the validity bit: a producer for `idx` has just entered
    /// Execute and no value is available yet.
    pub fn mark_in_flight(&mut self, idx: RegIndex) {
        self.valid[idx.index()] = false;
    }

    /// Sets the validity bit: Writeback has just committed `idx`.
    pub fn mark_valid(&mut self, idx: RegIndex) {
        self.valid[idx.index()] = true;
    }

    /// Register-file dump in the index/value/validity trace format.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for i in 0..REG_FILE_SIZE {
            let status = if self.valid[i] { "VALID" } else { "INVALID" };
            out.push_str(&format!("REG[{}] = {} ({})\n", i, self.regs[i], status));
        }
        out
    }
}

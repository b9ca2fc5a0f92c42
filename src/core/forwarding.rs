//! Two-tap forwarding network between Execute/Memory and Decode.

use crate::isa::RegIndex;

/// An EX-tap entry additionally remembers whether its producer was a load:
/// `LOAD`/`LDR` compute an address in Execute, not a value, so the tap must
/// be refused for them even though the register index matches.
#[derive(Clone, Copy, Debug)]
struct ExTapEntry {
    reg: RegIndex,
    value: i32,
    producer_is_load: bool,
}

/// The two bypass paths that let Decode read a value before it reaches the
/// register file: one published by Execute, one by Memory. Each entry is
/// valid for exactly one cycle — the cycle after the producing stage ran —
/// and is cleared unconditionally at the end of every Decode attempt,
/// whether or not that attempt stalled.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardingTaps {
    ex: Option<ExTapEntry>,
    mem: Option<(RegIndex, i32)>,
}

impl ForwardingTaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish_ex(&mut self, reg: RegIndex, value: i32, producer_is_load: bool) {
        self.ex = Some(ExTapEntry { reg, value, producer_is_load });
    }

    pub fn publish_mem(&mut self, reg: RegIndex, value: i32) {
        self.mem = Some((reg, value));
    }

    /// Both taps are cleared together, at the one defined point (the end of
    /// Decode's resolution attempt) each cycle.
    pub fn clear(&mut self) {
        self.ex = None;
        self.mem = None;
    }

    /// Looks up `reg` at the EX tap, refusing a load producer (the
    /// load-use guard).
    pub fn resolve_ex(&self, reg: RegIndex) -> Option<i32> {
        match self.ex {
            Some(entry) if entry.reg == reg && !entry.producer_is_load => Some(entry.value),
            _ => None,
        }
    }

    pub fn resolve_mem(&self, reg: RegIndex) -> Option<i32> {
        match self.mem {
            Some((tapped, value)) if tapped == reg => Some(value),
            _ => None,
        }
    }
}

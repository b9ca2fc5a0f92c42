//! Simulation statistics collection and reporting.
//!
//! Tracks the handful of counters this pipeline actually produces: cycles
//! elapsed, instructions retired, and the two kinds of stall cycle a
//! five-stage in-order pipeline can incur (data hazard, control flush).

use std::time::Instant;

/// Simulation statistics structure.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,
    /// Cycles Decode spent re-raising `stalled` for a RAW or load-use hazard.
    pub stalls_data: u64,
    /// Taken branches, each costing Fetch and Decode one bubble cycle.
    pub flushes_control: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        SimStats {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            stalls_data: 0,
            flushes_control: 0,
        }
    }
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prints a formatted summary of the run, in the section-header style
    /// this crate's statistics reporting follows throughout.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed();
        println!();
        println!("=== Simulation Statistics ===");
        println!("Cycles elapsed:        {}", self.cycles);
        println!("Instructions retired:  {}", self.instructions_retired);
        println!("Data-hazard stalls:    {}", self.stalls_data);
        println!("Control-flush cycles:  {}", self.flushes_control);
        if self.cycles > 0 {
            let ipc = self.instructions_retired as f64 / self.cycles as f64;
            println!("Instructions per cycle: {:.3}", ipc);
        }
        println!("Wall time:             {:.3?}", elapsed);
    }
}

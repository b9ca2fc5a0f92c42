//! APEX Pipeline Simulator CLI.
//!
//! The main executable: parses arguments, loads a program, and drives the
//! pipeline to completion.
//!
//! # Usage
//!
//! `apex-sim <input_file> <display|simulate> <cycles> [--config <path>]`
//!
//! `display` traces every cycle's stage contents as it runs; `simulate`
//! runs silently. Either terminates early on `HALT` retirement.

use std::path::PathBuf;
use std::{fs, process};

use clap::{Parser, ValueEnum};

extern crate apex_sim;

use apex_sim::common::SimError;
use apex_sim::config::Config;
use apex_sim::core::Cpu;
use apex_sim::sim::{loader, trace};

/// How the simulator reports its progress while it runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RunMode {
    /// Trace every cycle's stage contents.
    Display,
    /// Run silently; only the final summary and dumps are printed.
    Simulate,
}

/// Command-line arguments for the APEX pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "APEX Cycle-Accurate Pipeline Simulator")]
struct Args {
    /// Path to the program to load into code memory.
    input_file: PathBuf,

    /// Whether to trace every cycle or run silently.
    mode: RunMode,

    /// Number of cycles to run before stopping, absent an earlier HALT.
    cycles: u64,

    /// Optional TOML configuration file overriding memory sizes / start PC.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), SimError> {
    let config = match args.config {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            toml::from_str(&text)
                .map_err(|e| SimError::Configuration(format!("invalid config file: {e}")))?
        }
        None => Config::default(),
    };

    let code_memory = loader::load(&args.input_file)?;
    let trace_enabled = args.mode == RunMode::Display;
    let mut cpu = Cpu::new(code_memory, &config, trace_enabled);

    let reason = cpu.run(args.cycles)?;

    match reason {
        apex_sim::core::TerminationReason::Halted => {
            println!("APEX_CPU: Simulation Complete, cycles = {}", cpu.clock + 1);
        }
        apex_sim::core::TerminationReason::CyclesExhausted => {
            println!("APEX_CPU: Cycle budget reached, cycles = {}", cpu.clock);
        }
    }

    cpu.stats.print();
    trace::print_register_dump(&cpu);
    trace::print_data_memory_dump(&cpu);

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("apex-sim: {e}");
        process::exit(1);
    }
}

//! End-to-end tests driving the full five-stage pipeline to completion,
//! encoding the concrete scenarios and quantified invariants this crate's
//! pipeline semantics are built against.

use apex_sim::config::Config;
use apex_sim::core::{Cpu, TerminationReason};
use apex_sim::isa::{Instruction, Opcode, RegIndex};

fn r(n: usize) -> RegIndex {
    RegIndex::new(n).expect("test register index in range")
}

fn movc(rd: usize, imm: i32) -> Instruction {
    Instruction::new(Opcode::Movc { rd: r(rd), imm })
}

fn add(rd: usize, rs1: usize, rs2: usize) -> Instruction {
    Instruction::new(Opcode::Add { rd: r(rd), rs1: r(rs1), rs2: r(rs2) })
}

fn sub(rd: usize, rs1: usize, rs2: usize) -> Instruction {
    Instruction::new(Opcode::Sub { rd: r(rd), rs1: r(rs1), rs2: r(rs2) })
}

fn addl(rd: usize, rs1: usize, imm: i32) -> Instruction {
    Instruction::new(Opcode::Addl { rd: r(rd), rs1: r(rs1), imm })
}

fn cmp(rs1: usize, rs2: usize) -> Instruction {
    Instruction::new(Opcode::Cmp { rs1: r(rs1), rs2: r(rs2) })
}

fn bz(imm: i32) -> Instruction {
    Instruction::new(Opcode::Bz { imm })
}

fn store(rs1: usize, rs2: usize, imm: i32) -> Instruction {
    Instruction::new(Opcode::Store { rs1: r(rs1), rs2: r(rs2), imm })
}

fn load(rd: usize, rs1: usize, imm: i32) -> Instruction {
    Instruction::new(Opcode::Load { rd: r(rd), rs1: r(rs1), imm })
}

fn halt() -> Instruction {
    Instruction::new(Opcode::Halt)
}

/// Runs `program` to completion (HALT retiring, asserted — a test program
/// that instead exhausts its cycle budget indicates a stuck pipeline) and
/// hands back the finished `Cpu` for inspection.
fn run_to_halt(program: Vec<Instruction>) -> Cpu {
    let mut cpu = Cpu::new(program, &Config::default(), false);
    let reason = cpu.run(10_000).expect("program should not raise a program error");
    assert_eq!(reason, TerminationReason::Halted, "program should retire HALT, not exhaust its budget");
    cpu
}

/// Scenario 1: two independent MOVCs feed an ADD that reads both via the
/// EX tap with no stall, immediately followed by HALT.
#[test]
fn scenario_movc_add_halt() {
    let cpu = run_to_halt(vec![movc(1, 5), movc(2, 7), add(3, 1, 2), halt()]);

    assert_eq!(cpu.regs.read(r(1)), 5);
    assert_eq!(cpu.regs.read(r(2)), 7);
    assert_eq!(cpu.regs.read(r(3)), 12);
    assert!(!cpu.zero_flag);
    assert_eq!(cpu.stats.instructions_retired, 4);
}

/// Scenario 2: a taken branch must flush the speculatively-fetched
/// instruction between it and its target, while everything already past
/// Decode when the branch executes continues to retire. `R1 == R2`, so
/// `CMP` zeroes the flag and `BZ` redirects past the `MOVC R3,#99` that
/// would otherwise clobber R3.
#[test]
fn scenario_branch_flushes_skipped_instruction() {
    // pc:  4000        4004        4008      4012   4016          4020
    let program = vec![
        movc(1, 3),  // 4000
        movc(2, 3),  // 4004
        cmp(1, 2),   // 4008
        bz(8),       // 4012, target = 4012 + 8 = 4020 (the HALT)
        movc(3, 99), // 4016 -- flushed, must never retire
        halt(),      // 4020
    ];
    let cpu = run_to_halt(program);

    assert_eq!(cpu.regs.read(r(3)), 0, "the flushed MOVC R3,#99 must not have executed");
    assert!(cpu.zero_flag);
    // Every instruction before the flushed MOVC retires, plus the HALT at
    // the branch target: MOVC R1, MOVC R2, CMP, BZ, HALT = 5. The MOVC R3
    // instruction between BZ and its target is the only one that doesn't.
    assert_eq!(cpu.stats.instructions_retired, 5);
    assert_eq!(cpu.stats.flushes_control, 1);
}

/// Scenario 3: `SUB R2,R1,R1` always zeroes both the result and the flag,
/// exercising EX-tap forwarding of the same register to both ALU sources.
#[test]
fn scenario_sub_self_is_zero() {
    let cpu = run_to_halt(vec![movc(1, 10), sub(2, 1, 1), halt()]);

    assert_eq!(cpu.regs.read(r(2)), 0);
    assert!(cpu.zero_flag);
    assert_eq!(cpu.stats.instructions_retired, 3);
}

/// Scenario 4: a stored word read back through `LOAD` from the same
/// address computed by `STORE`.
#[test]
fn scenario_store_then_load_round_trips() {
    let cpu = run_to_halt(vec![movc(1, 4000), store(1, 1, 0), load(2, 1, 0), halt()]);

    assert_eq!(cpu.data_memory[4000], 4000);
    assert_eq!(cpu.regs.read(r(2)), 4000);
    assert_eq!(cpu.stats.instructions_retired, 4);
}

/// Scenario 5: three `ADDL`s chained back-to-back on the same register,
/// each one depending on the immediately preceding instruction's EX tap.
#[test]
fn scenario_chained_addl_forwarding() {
    let cpu = run_to_halt(vec![movc(1, 1), addl(1, 1, 1), addl(1, 1, 1), halt()]);

    assert_eq!(cpu.regs.read(r(1)), 3);
    assert_eq!(cpu.stats.instructions_retired, 4);
}

/// Scenario 6 / the load-use round-trip property: a load-dependent
/// instruction costs exactly one more cycle than the same program with the
/// load replaced by an immediate move, because the EX tap refuses to
/// forward a load's result.
#[test]
fn load_use_hazard_costs_exactly_one_extra_cycle() {
    let with_load = run_to_halt(vec![movc(2, 0), load(1, 2, 0), add(3, 1, 1), halt()]);
    let without_load = run_to_halt(vec![movc(2, 0), movc(1, 0), add(3, 1, 1), halt()]);

    assert_eq!(with_load.stats.instructions_retired, without_load.stats.instructions_retired);
    assert_eq!(
        with_load.clock,
        without_load.clock + 1,
        "load-use hazard should cost exactly one stall cycle"
    );
    assert_eq!(with_load.stats.stalls_data, without_load.stats.stalls_data + 1);
}

/// An ADD immediately consuming the prior instruction's result must not
/// stall at all — the EX tap makes the register file's staleness moot.
#[test]
fn ex_tap_forwarding_avoids_any_stall() {
    let cpu = run_to_halt(vec![movc(1, 1), movc(2, 2), add(3, 1, 2), halt()]);
    assert_eq!(cpu.stats.stalls_data, 0);
}

/// A `LOAD` immediately followed by a consumer stalls for exactly one
/// cycle (Decode re-raises `stalled` once, then resolves via the MEM tap).
#[test]
fn load_use_hazard_stalls_exactly_one_cycle() {
    let cpu = run_to_halt(vec![movc(2, 0), load(1, 2, 0), add(3, 1, 1), halt()]);
    assert_eq!(cpu.stats.stalls_data, 1);
}

/// Division by zero is a program error, trapped deterministically rather
/// than left to produce whatever the host integer division instruction
/// does with a zero divisor.
#[test]
fn division_by_zero_is_a_program_error() {
    let program = vec![
        movc(1, 10),
        movc(2, 0),
        Instruction::new(Opcode::Div { rd: r(3), rs1: r(1), rs2: r(2) }),
        halt(),
    ];
    let mut cpu = Cpu::new(program, &Config::default(), false);
    assert!(cpu.run(1_000).is_err());
}

/// A misaligned branch target is a program error, not silently rounded or
/// wrapped.
#[test]
fn misaligned_branch_target_is_a_program_error() {
    let program = vec![movc(1, 0), cmp(1, 1), bz(3), halt()];
    let mut cpu = Cpu::new(program, &Config::default(), false);
    assert!(cpu.run(1_000).is_err());
}

/// Retired count is monotone non-decreasing and never exceeds the number
/// of instructions that were ever actually issued (no double-retirement).
#[test]
fn retired_count_never_exceeds_issued_instructions() {
    let cpu = run_to_halt(vec![
        movc(1, 1),
        movc(2, 2),
        movc(3, 3),
        add(4, 1, 2),
        sub(5, 3, 4),
        halt(),
    ]);
    assert_eq!(cpu.stats.instructions_retired, 6);
}

/// `code_memory_index` rejects both out-of-range and misaligned addresses,
/// the predicate Fetch relies on every cycle to keep the PC in range.
#[test]
fn code_memory_index_rejects_misalignment_and_out_of_range() {
    let cpu = Cpu::new(vec![halt()], &Config::default(), false);
    assert_eq!(cpu.code_memory_index(4000), Some(0));
    assert_eq!(cpu.code_memory_index(4001), None, "misaligned pc");
    assert_eq!(cpu.code_memory_index(3996), None, "before code memory base");
    assert_eq!(cpu.code_memory_index(4004), None, "past the end of code memory");
}

/// A cycle budget reached before HALT retires terminates the run without
/// error, reporting `CyclesExhausted` rather than `Halted`.
#[test]
fn cycle_budget_terminates_without_halt() {
    let mut cpu = Cpu::new(vec![movc(1, 1), movc(2, 2), add(3, 1, 2), halt()], &Config::default(), false);
    let reason = cpu.run(2).expect("a short budget is not a program error");
    assert_eq!(reason, TerminationReason::CyclesExhausted);
    assert_ne!(cpu.stats.instructions_retired, 4, "HALT should not have retired yet");
}

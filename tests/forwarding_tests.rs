//! Unit tests for the two-tap forwarding network in isolation, independent
//! of the Decode stage that drives it.

use apex_sim::core::forwarding::ForwardingTaps;
use apex_sim::isa::RegIndex;

fn r(n: usize) -> RegIndex {
    RegIndex::new(n).expect("test register index in range")
}

#[test]
fn fresh_taps_resolve_nothing() {
    let taps = ForwardingTaps::new();
    assert_eq!(taps.resolve_ex(r(1)), None);
    assert_eq!(taps.resolve_mem(r(1)), None);
}

#[test]
fn ex_tap_resolves_non_load_producer() {
    let mut taps = ForwardingTaps::new();
    taps.publish_ex(r(3), 42, false);
    assert_eq!(taps.resolve_ex(r(3)), Some(42));
}

#[test]
fn ex_tap_refuses_load_producer() {
    // A load computes an address in Execute, not a value; the EX tap must
    // never hand that address out as if it were the loaded word.
    let mut taps = ForwardingTaps::new();
    taps.publish_ex(r(3), 0xDEAD, true);
    assert_eq!(taps.resolve_ex(r(3)), None);
}

#[test]
fn ex_tap_ignores_mismatched_register() {
    let mut taps = ForwardingTaps::new();
    taps.publish_ex(r(3), 42, false);
    assert_eq!(taps.resolve_ex(r(4)), None);
}

#[test]
fn mem_tap_resolves_regardless_of_producer_kind() {
    // Unlike the EX tap, the MEM tap has no load-use guard: by the time a
    // value reaches the Memory stage, loads and ALU ops are both ready.
    let mut taps = ForwardingTaps::new();
    taps.publish_mem(r(7), 99);
    assert_eq!(taps.resolve_mem(r(7)), Some(99));
}

#[test]
fn clear_wipes_both_taps() {
    let mut taps = ForwardingTaps::new();
    taps.publish_ex(r(1), 1, false);
    taps.publish_mem(r(2), 2);
    taps.clear();
    assert_eq!(taps.resolve_ex(r(1)), None);
    assert_eq!(taps.resolve_mem(r(2)), None);
}

#[test]
fn publishing_again_overwrites_the_previous_entry() {
    let mut taps = ForwardingTaps::new();
    taps.publish_ex(r(1), 1, false);
    taps.publish_ex(r(2), 2, false);
    assert_eq!(taps.resolve_ex(r(1)), None, "only the most recent EX publish survives");
    assert_eq!(taps.resolve_ex(r(2)), Some(2));
}

#[test]
fn ex_and_mem_taps_are_independent() {
    let mut taps = ForwardingTaps::new();
    taps.publish_ex(r(5), 10, false);
    taps.publish_mem(r(5), 20);
    assert_eq!(taps.resolve_ex(r(5)), Some(10));
    assert_eq!(taps.resolve_mem(r(5)), Some(20));
}

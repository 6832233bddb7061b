//! Tests for the implemented instruction subset.
//!
//! Every byte moved here travels over the pin-level buses: programs are
//! placed in the bench memory and the model fetches, reads, and writes
//! them through MREQ/RD/WR like any other bus agent.

use zilog_z80::harness::TestBench;
use zilog_z80::{ByteRegister, WordRegister};

#[test]
fn nop_completes_in_one_fetch() {
    let mut bench = TestBench::new();
    bench.load(0x0000, &[0x00]);

    let ticks = bench.run_instruction();

    assert_eq!(ticks, 8);
    assert_eq!(bench.cpu.registers().pc(), 0x0001);
}

#[test]
fn ld_hl_nn_round_trip() {
    let mut bench = TestBench::new();
    bench.load(0x0000, &[0x21, 0x34, 0x12]); // LD HL, 0x1234

    let ticks = bench.run_instruction();

    // Fetch (8) plus two operand reads (6 each).
    assert_eq!(ticks, 20);
    assert_eq!(bench.cpu.registers().word(WordRegister::Hl), 0x1234);
    assert_eq!(bench.cpu.registers().byte(ByteRegister::L), 0x34);
    assert_eq!(bench.cpu.registers().byte(ByteRegister::H), 0x12);
    assert_eq!(bench.cpu.registers().pc(), 0x0003);
}

#[test]
fn ld_a_n_loads_immediate() {
    let mut bench = TestBench::new();
    bench.load(0x0000, &[0x3E, 0x42]); // LD A, 0x42

    let ticks = bench.run_instruction();

    assert_eq!(ticks, 14);
    assert_eq!(bench.cpu.registers().byte(ByteRegister::A), 0x42);
    assert_eq!(bench.cpu.registers().pc(), 0x0002);
}

#[test]
fn inc_l_increments_without_carry_into_h() {
    let mut bench = TestBench::new();
    bench.load(0x0000, &[0x21, 0xFF, 0x00, 0x2C]); // LD HL, 0x00FF; INC L

    bench.run_instructions(2);

    // L wraps; the pair view shows no carry into H.
    assert_eq!(bench.cpu.registers().word(WordRegister::Hl), 0x0000);
}

#[test]
fn inc_a_accumulates() {
    let mut bench = TestBench::new();
    bench.load(0x0000, &[0x3C, 0x3C, 0x3C]); // INC A x3

    bench.run_instructions(3);

    assert_eq!(bench.cpu.registers().byte(ByteRegister::A), 3);
}

#[test]
fn ld_hl_ind_a_writes_memory() {
    let mut bench = TestBench::new();
    bench.load(
        0x0000,
        &[
            0x21, 0x00, 0x40, // LD HL, 0x4000
            0x3E, 0x55, // LD A, 0x55
            0x77, // LD (HL), A
        ],
    );

    bench.run_instructions(2);
    let ticks = bench.run_instruction();

    // Fetch (8) plus one write cycle (6).
    assert_eq!(ticks, 14);
    assert_eq!(bench.memory[0x4000], 0x55);
    assert_eq!(bench.cpu.registers().pc(), 0x0006);
}

#[test]
fn jp_nn_replaces_pc() {
    let mut bench = TestBench::new();
    bench.cpu.set_pc(0x0010);
    bench.load(0x0010, &[0xC3, 0x00, 0x02]); // JP 0x0200
    bench.load(0x0200, &[0x3E, 0x77]); // LD A, 0x77

    let ticks = bench.run_instruction();

    assert_eq!(ticks, 20);
    // The old PC is discarded outright, not offset.
    assert_eq!(bench.cpu.registers().pc(), 0x0200);
    assert_eq!(bench.cpu.registers().word(WordRegister::Wz), 0x0200);

    bench.run_instruction();
    assert_eq!(bench.cpu.registers().byte(ByteRegister::A), 0x77);
}

#[test]
fn undefined_opcodes_complete_as_nop() {
    for opcode in [0x01, 0x47, 0x80, 0xC9, 0xFF] {
        let mut bench = TestBench::new();
        bench.load(0x0000, &[opcode]);

        let ticks = bench.run_instruction();

        assert_eq!(ticks, 8, "opcode {opcode:#04X} should fetch and finish");
        assert!(bench.at_instruction_boundary());

        // Only PC and the refresh counter move; every other register is
        // untouched.
        let regs = bench.cpu.registers();
        assert_eq!(regs.pc(), 0x0001);
        assert_eq!(regs.word(WordRegister::Ir), 0x0001);
        for pair in [
            WordRegister::Wz,
            WordRegister::Sp,
            WordRegister::Iy,
            WordRegister::Ix,
            WordRegister::Hl,
            WordRegister::HlAlt,
            WordRegister::De,
            WordRegister::DeAlt,
            WordRegister::Bc,
            WordRegister::BcAlt,
            WordRegister::Af,
            WordRegister::AfAlt,
            WordRegister::Iff,
        ] {
            assert_eq!(
                regs.word(pair),
                0,
                "opcode {opcode:#04X} changed {pair:?}"
            );
        }
    }
}

#[test]
fn straight_line_program() {
    let mut bench = TestBench::new();
    bench.load(
        0x0000,
        &[
            0x21, 0x34, 0x12, // LD HL, 0x1234
            0x2C, // INC L -> HL = 0x1235
            0x3E, 0x10, // LD A, 0x10
            0x3C, // INC A -> 0x11
            0x77, // LD (HL), A
        ],
    );

    bench.run_instructions(5);

    assert_eq!(bench.cpu.registers().word(WordRegister::Hl), 0x1235);
    assert_eq!(bench.cpu.registers().byte(ByteRegister::A), 0x11);
    assert_eq!(bench.memory[0x1235], 0x11);
    assert_eq!(bench.cpu.registers().pc(), 0x0008);
}

//! Pin-level Zilog Z80 bus model.
//!
//! Unlike instruction-stepped CPU cores, this model reproduces the Z80's
//! external bus behaviour: the host circuit notifies it of clock
//! transitions, and each rising edge advances one T-state of the current
//! machine cycle, driving and sampling the address, data, and control
//! lines exactly as the silicon does.
//!
//! # Machine cycles
//!
//! | Cycle        | T-states         | Activity                            |
//! |--------------|------------------|-------------------------------------|
//! | Fetch (M1)   | T1..T4 (8 edges) | opcode read at PC, then I:R refresh |
//! | Memory read  | T1..T3 (6 edges) | byte read at the transfer address   |
//! | Memory write | T1..T3 (6 edges) | byte written at the transfer address|
//!
//! Each T-state is split into a rising and a falling half, mirroring the
//! two halves of the hardware clock period; control-line changes happen on
//! the half documented in the Zilog bus timing diagrams.
//!
//! # Instruction subset
//!
//! The execution engine implements NOP, LD HL,nn, INC L, INC A, LD A,n,
//! LD (HL),A, and JP nn. Every other opcode is fetched with correct M1
//! timing and then completes as a NOP (a documented gap, not an error).
//! INT, NMI, WAIT, and BUSRQ are connected but not yet honoured.

mod cpu;
mod cycle;
mod pins;
mod registers;

pub use cpu::{DATA_FLOAT_DELAY, REFRESH_ADDRESS_DELAY, RFSH_ASSERT_DELAY, Z80};
pub use cycle::{BusCycle, TState};
pub use pins::Z80Pins;
pub use registers::{ByteRegister, RegisterFile, WordRegister};

#[cfg(feature = "test-utils")]
pub mod harness;

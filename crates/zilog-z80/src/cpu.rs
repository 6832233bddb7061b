//! Z80 bus-cycle state machine with per-T-state pin effects.

use dsim_core::{Level, Observable, Pin, SimTime, Value};

use crate::cycle::{BusCycle, TState};
use crate::pins::Z80Pins;
use crate::registers::{ByteRegister, RegisterFile, WordRegister};

/// Delay, in nanoseconds, from the RD release to the refresh address
/// appearing on the address bus.
pub const REFRESH_ADDRESS_DELAY: u64 = 20;

/// Delay, in nanoseconds, from the RD release to RFSH asserting. Two
/// nanoseconds after the refresh address is valid.
pub const RFSH_ASSERT_DELAY: u64 = 22;

/// Delay, in nanoseconds, from the WR release to the data bus floating.
pub const DATA_FLOAT_DELAY: u64 = 20;

/// Pin-level Z80 model.
///
/// The model does not own its pins. The host passes the bundle to
/// [`clock_edge`](Z80::clock_edge) on every sampled CLK transition; the
/// model checks the edge direction itself and advances one T-state per
/// rising edge. All pin effects for that T-state are applied before the
/// call returns.
pub struct Z80 {
    // === Registers ===
    regs: RegisterFile,

    // === Bus-cycle state ===
    /// Machine cycle being run.
    cycle: BusCycle,
    /// Position within the machine cycle.
    t_state: TState,

    // === Execution state ===
    /// Instruction step counter. 0 = no instruction in progress.
    step: u8,
    /// Latched opcode from the last fetch.
    opcode: u8,
    /// Transfer address for the next memory read or write cycle.
    addr: u16,
    /// Transfer data: written during a write cycle, latched by a read.
    data: u8,

    // === Status flags ===
    // Declared for the pins that would drive them; none is consulted by
    // the bus-cycle logic yet.
    halted: bool,
    waiting: bool,
    bus_request: bool,
    int_pending: bool,
    nmi_pending: bool,
}

impl Z80 {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: RegisterFile::new(),
            cycle: BusCycle::Fetch,
            t_state: TState::T1Rising,
            step: 0,
            opcode: 0,
            addr: 0,
            data: 0,
            halted: false,
            waiting: false,
            bus_request: false,
            int_pending: false,
            nmi_pending: false,
        }
    }

    /// Snapshot of the register file.
    #[must_use]
    pub const fn registers(&self) -> RegisterFile {
        self.regs
    }

    /// Machine cycle currently on the bus.
    #[must_use]
    pub const fn cycle(&self) -> BusCycle {
        self.cycle
    }

    /// Position within the current machine cycle.
    #[must_use]
    pub const fn t_state(&self) -> TState {
        self.t_state
    }

    /// Instruction step counter; 0 between instructions.
    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    /// Latched opcode from the last fetch.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Set the program counter.
    ///
    /// Only available in test builds.
    #[cfg(feature = "test-utils")]
    pub const fn set_pc(&mut self, value: u16) {
        self.regs.set_pc(value);
    }

    /// Set the refresh counter.
    ///
    /// Only available in test builds.
    #[cfg(feature = "test-utils")]
    pub const fn set_r(&mut self, value: u8) {
        self.regs.set_byte(ByteRegister::R, value);
    }

    /// Hard reset to the documented power-on state.
    ///
    /// Bus state returns to the start of a fetch, the step counter goes
    /// idle, every register byte is zeroed, all control outputs are driven
    /// high, and both buses are released. Idempotent; callable at any
    /// point, including mid-cycle.
    pub fn reset<P: Pin>(&mut self, time: SimTime, pins: &mut Z80Pins<P>) {
        self.cycle = BusCycle::Fetch;
        self.t_state = TState::T1Rising;
        self.step = 0;
        self.opcode = 0;
        self.addr = 0;
        self.data = 0;
        self.halted = false;
        self.waiting = false;
        self.bus_request = false;
        self.int_pending = false;
        self.nmi_pending = false;

        self.regs.clear();

        pins.m1.set_level(time, Level::High);
        pins.mreq.set_level(time, Level::High);
        pins.iorq.set_level(time, Level::High);
        pins.rd.set_level(time, Level::High);
        pins.wr.set_level(time, Level::High);
        pins.rfsh.set_level(time, Level::High);
        pins.halt.set_level(time, Level::High);
        pins.busak.set_level(time, Level::High);

        pins.float_address(time);
        pins.float_data(time);
    }

    /// Clock notification entry point.
    ///
    /// The host calls this on every sampled CLK transition. Anything other
    /// than a rising edge is ignored; a rising edge runs the pin effects
    /// of the current T-state and then advances, wrapping past the
    /// terminal T-state of the current cycle kind.
    pub fn clock_edge<P: Pin>(&mut self, time: SimTime, pins: &mut Z80Pins<P>) {
        if !pins.clk.is_rising_edge() {
            return;
        }

        let cycle = self.cycle;
        match cycle {
            BusCycle::Fetch => self.fetch_t_state(time, pins),
            BusCycle::MemoryRead => self.memory_read_t_state(time, pins),
            BusCycle::MemoryWrite => self.memory_write_t_state(time, pins),
            // Reserved for the IN/OUT group; nothing requests these yet.
            BusCycle::IoRead | BusCycle::IoWrite => {}
        }

        // The execution engine may have changed the cycle kind above; the
        // wrap check still uses the kind this edge ran under.
        self.t_state = if self.t_state == cycle.terminal_t_state() {
            TState::T1Rising
        } else {
            self.t_state.next()
        };
    }

    /// One T-state of an opcode fetch (M1) cycle.
    fn fetch_t_state<P: Pin>(&mut self, time: SimTime, pins: &mut Z80Pins<P>) {
        match self.t_state {
            TState::T1Rising => {
                pins.m1.set_level(time, Level::Low);
                pins.drive_address(time, self.regs.pc());
            }
            TState::T1Falling => {
                pins.mreq.set_level(time, Level::Low);
                pins.rd.set_level(time, Level::Low);
            }
            TState::T2Rising => {
                // Post-increment: the bus still carries the old PC.
                self.regs.set_pc(self.regs.pc().wrapping_add(1));
            }
            TState::T2Falling | TState::T4Rising => {}
            TState::T3Rising => {
                self.opcode = pins.sample_data();
                pins.m1.set_level(time, Level::High);
                pins.mreq.set_level(time, Level::High);
                pins.rd.set_level(time, Level::High);

                // Refresh: bump R before its address goes out, then put
                // I:R on the bus once the opcode hold time has passed.
                self.regs.increment_r();
                pins.drive_address(
                    time + REFRESH_ADDRESS_DELAY,
                    self.regs.word(WordRegister::Ir),
                );
                pins.rfsh.set_level(time + RFSH_ASSERT_DELAY, Level::Low);
            }
            TState::T3Falling => {
                // Refresh memory request.
                pins.mreq.set_level(time, Level::Low);
            }
            TState::T4Falling => {
                pins.mreq.set_level(time, Level::High);
                self.step = 1;
                self.execute();
                pins.rfsh.set_level(time, Level::High);
            }
        }
    }

    /// One T-state of a memory read cycle.
    fn memory_read_t_state<P: Pin>(&mut self, time: SimTime, pins: &mut Z80Pins<P>) {
        match self.t_state {
            TState::T1Rising => {
                pins.drive_address(time, self.addr);
            }
            TState::T1Falling => {
                pins.mreq.set_level(time, Level::Low);
                pins.rd.set_level(time, Level::Low);
            }
            TState::T3Falling => {
                self.data = pins.sample_data();
                pins.mreq.set_level(time, Level::High);
                pins.rd.set_level(time, Level::High);
                self.execute();
            }
            _ => {}
        }
    }

    /// One T-state of a memory write cycle.
    fn memory_write_t_state<P: Pin>(&mut self, time: SimTime, pins: &mut Z80Pins<P>) {
        match self.t_state {
            TState::T1Rising => {
                pins.drive_address(time, self.addr);
            }
            TState::T1Falling => {
                pins.mreq.set_level(time, Level::Low);
                pins.drive_data(time, self.data);
            }
            TState::T2Falling => {
                pins.wr.set_level(time, Level::Low);
            }
            TState::T3Falling => {
                pins.mreq.set_level(time, Level::High);
                pins.wr.set_level(time, Level::High);
                pins.float_data(time + DATA_FLOAT_DELAY);
                self.execute();
            }
            _ => {}
        }
    }
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

// Instruction execution split into a separate file for readability.
mod execute;

/// All query paths supported by the Z80.
const Z80_QUERY_PATHS: &[&str] = &[
    // Register pairs
    "pc", "ir", "wz", "sp", "iy", "ix", "hl", "hl'", "de", "de'", "bc", "bc'", "af", "af'",
    // Byte halves
    "a", "f", "h", "l", "i", "r", "w", "z",
    // Interrupt flip-flops
    "iff1", "iff2",
    // Machine state
    "cycle", "t_state", "step", "opcode",
    // Status flags
    "halted", "waiting", "bus_request", "int_pending", "nmi_pending",
];

impl Observable for Z80 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            // Register pairs
            "pc" => Some(self.regs.word(WordRegister::Pc).into()),
            "ir" => Some(self.regs.word(WordRegister::Ir).into()),
            "wz" => Some(self.regs.word(WordRegister::Wz).into()),
            "sp" => Some(self.regs.word(WordRegister::Sp).into()),
            "iy" => Some(self.regs.word(WordRegister::Iy).into()),
            "ix" => Some(self.regs.word(WordRegister::Ix).into()),
            "hl" => Some(self.regs.word(WordRegister::Hl).into()),
            "hl'" => Some(self.regs.word(WordRegister::HlAlt).into()),
            "de" => Some(self.regs.word(WordRegister::De).into()),
            "de'" => Some(self.regs.word(WordRegister::DeAlt).into()),
            "bc" => Some(self.regs.word(WordRegister::Bc).into()),
            "bc'" => Some(self.regs.word(WordRegister::BcAlt).into()),
            "af" => Some(self.regs.word(WordRegister::Af).into()),
            "af'" => Some(self.regs.word(WordRegister::AfAlt).into()),

            // Byte halves
            "a" => Some(self.regs.byte(ByteRegister::A).into()),
            "f" => Some(self.regs.byte(ByteRegister::F).into()),
            "h" => Some(self.regs.byte(ByteRegister::H).into()),
            "l" => Some(self.regs.byte(ByteRegister::L).into()),
            "i" => Some(self.regs.byte(ByteRegister::I).into()),
            "r" => Some(self.regs.byte(ByteRegister::R).into()),
            "w" => Some(self.regs.byte(ByteRegister::W).into()),
            "z" => Some(self.regs.byte(ByteRegister::Z).into()),

            // Interrupt flip-flops
            "iff1" => Some((self.regs.byte(ByteRegister::Iff1) != 0).into()),
            "iff2" => Some((self.regs.byte(ByteRegister::Iff2) != 0).into()),

            // Machine state
            "cycle" => Some(self.cycle.name().into()),
            "t_state" => Some(self.t_state.name().into()),
            "step" => Some(self.step.into()),
            "opcode" => Some(self.opcode.into()),

            // Status flags
            "halted" => Some(self.halted.into()),
            "waiting" => Some(self.waiting.into()),
            "bus_request" => Some(self.bus_request.into()),
            "int_pending" => Some(self.int_pending.into()),
            "nmi_pending" => Some(self.nmi_pending.into()),

            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        Z80_QUERY_PATHS
    }
}

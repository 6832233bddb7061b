//! A minimal host circuit for exercising the model in tests.
//!
//! Wires the model's pin bundle to a flat 64KB memory that reacts to
//! MREQ/RD/WR like a static RAM, and drives CLK as a square wave. This is
//! deliberately a circuit, not a shortcut: every byte the model moves
//! still travels over the pin-level buses.

use dsim_core::{Level, Pin, SimplePin, SimTime};

use crate::cycle::{BusCycle, TState};
use crate::pins::Z80Pins;
use crate::Z80;

/// Half of the 4 MHz clock period, in nanoseconds. Long enough that the
/// model's delayed pin transitions land well inside one half-period.
const HALF_PERIOD: u64 = 125;

/// Upper bound on clock periods per instruction, to catch runaway loops.
const MAX_TICKS_PER_INSTRUCTION: u32 = 100;

/// Model plus supporting circuit.
pub struct TestBench {
    pub cpu: Z80,
    pub pins: Z80Pins<SimplePin>,
    pub memory: [u8; 65536],
    time: SimTime,
    clk_high: bool,
    /// True while the memory is driving the data bus for a read.
    mem_driving: bool,
}

impl TestBench {
    /// Build a bench with zeroed memory and a freshly reset CPU.
    #[must_use]
    pub fn new() -> Self {
        let mut bench = Self {
            cpu: Z80::new(),
            pins: Z80Pins::default(),
            memory: [0; 65536],
            time: SimTime::ZERO,
            clk_high: false,
            mem_driving: false,
        };
        bench.pins.clk.set_level(SimTime::ZERO, Level::Low);
        bench.cpu.reset(SimTime::ZERO, &mut bench.pins);
        bench
    }

    /// Copy bytes into memory starting at `addr`.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.memory[addr as usize + offset] = byte;
        }
    }

    /// Current simulation time.
    #[must_use]
    pub const fn time(&self) -> SimTime {
        self.time
    }

    /// Advance simulation time without toggling the clock, applying any
    /// pin transitions that come due.
    pub fn advance(&mut self, delta: u64) {
        self.time += delta;
        self.settle();
    }

    /// Deliver one CLK transition to the model.
    pub fn half_tick(&mut self) {
        self.time += HALF_PERIOD;
        self.settle();

        self.clk_high = !self.clk_high;
        let level = if self.clk_high { Level::High } else { Level::Low };
        self.pins.clk.set_level(self.time, level);

        self.cpu.clock_edge(self.time, &mut self.pins);
        self.service_memory();
    }

    /// One full clock period: the rising edge (which advances the model by
    /// one T-state) followed by the falling edge.
    pub fn tick(&mut self) {
        self.half_tick();
        self.half_tick();
    }

    /// Run full periods until the model sits at an instruction boundary
    /// again. Returns the number of periods consumed, or the safety cap if
    /// the instruction never completes.
    pub fn run_instruction(&mut self) -> u32 {
        let mut ticks = 0;
        while ticks < MAX_TICKS_PER_INSTRUCTION {
            self.tick();
            ticks += 1;
            if self.at_instruction_boundary() {
                break;
            }
        }
        ticks
    }

    /// Run several instructions to completion.
    pub fn run_instructions(&mut self, count: u32) {
        for _ in 0..count {
            self.run_instruction();
        }
    }

    /// True when the model is back at the start of a fetch with no
    /// instruction in progress.
    #[must_use]
    pub fn at_instruction_boundary(&self) -> bool {
        self.cpu.step() == 0
            && self.cpu.cycle() == BusCycle::Fetch
            && self.cpu.t_state() == TState::T1Rising
    }

    /// Apply every pin transition due at the current time.
    fn settle(&mut self) {
        let t = self.time;
        self.pins.m1.settle(t);
        self.pins.mreq.settle(t);
        self.pins.iorq.settle(t);
        self.pins.rd.settle(t);
        self.pins.wr.settle(t);
        self.pins.rfsh.settle(t);
        self.pins.halt.settle(t);
        self.pins.wait.settle(t);
        self.pins.int.settle(t);
        self.pins.nmi.settle(t);
        self.pins.reset.settle(t);
        self.pins.busrq.settle(t);
        self.pins.busak.settle(t);
        self.pins.clk.settle(t);
        for pin in &mut self.pins.address {
            pin.settle(t);
        }
        for pin in &mut self.pins.data {
            pin.settle(t);
        }
    }

    /// Static-RAM behaviour: drive the data bus while MREQ and RD are both
    /// low, release it otherwise, and latch on MREQ with WR.
    fn service_memory(&mut self) {
        let t = self.time;
        let mreq = self.pins.mreq.level() == Level::Low;
        let rd = self.pins.rd.level() == Level::Low;
        let wr = self.pins.wr.level() == Level::Low;

        if mreq && rd {
            let addr = self.pins.sample_address();
            self.pins.drive_data(t, self.memory[addr as usize]);
            self.mem_driving = true;
        } else {
            if self.mem_driving {
                self.pins.float_data(t);
                self.mem_driving = false;
            }
            if mreq && wr {
                let addr = self.pins.sample_address();
                self.memory[addr as usize] = self.pins.sample_data();
            }
        }
    }
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}

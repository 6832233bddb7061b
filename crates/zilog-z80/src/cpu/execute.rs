//! Per-opcode micro-step procedures.
//!
//! An instruction runs as a sequence of 1-based steps, one step per
//! invocation. A step either requests the next memory cycle and yields
//! back to the bus state machine, or finishes with pure register work.

use crate::cycle::BusCycle;
use crate::registers::{ByteRegister, WordRegister};

use super::Z80;

impl Z80 {
    /// Run one micro-step of the instruction in progress.
    ///
    /// Invoked by the state machine when a fetch or a requested transfer
    /// cycle completes. Does nothing while the step counter is idle.
    /// Opcodes outside the implemented subset complete silently, like NOP.
    pub(super) fn execute(&mut self) {
        if self.step == 0 {
            return;
        }

        let done = match self.opcode {
            // NOP
            0x00 => true,
            // LD HL, nn
            0x21 => self.ld_hl_nn(),
            // INC L
            0x2C => self.inc_byte(ByteRegister::L),
            // INC A
            0x3C => self.inc_byte(ByteRegister::A),
            // LD A, n
            0x3E => self.ld_a_n(),
            // LD (HL), A
            0x77 => self.ld_hl_ind_a(),
            // JP nn
            0xC3 => self.jp_nn(),
            // Everything else is a silent NOP until implemented.
            _ => true,
        };

        if done {
            self.cycle = BusCycle::Fetch;
            self.step = 0;
        }
    }

    /// Request a memory read cycle at `addr`; the byte lands in `data`.
    fn request_read(&mut self, addr: u16) {
        self.cycle = BusCycle::MemoryRead;
        self.addr = addr;
    }

    /// Request a memory write cycle of `value` at `addr`.
    fn request_write(&mut self, addr: u16, value: u8) {
        self.cycle = BusCycle::MemoryWrite;
        self.addr = addr;
        self.data = value;
    }

    /// Current step, advancing the counter for the next invocation.
    fn take_step(&mut self) -> u8 {
        let step = self.step;
        self.step = self.step.wrapping_add(1);
        step
    }

    /// Read a byte at PC and advance PC.
    fn request_read_pc(&mut self) {
        let pc = self.regs.pc();
        self.request_read(pc);
        self.regs.set_pc(pc.wrapping_add(1));
    }

    /// INC r without flag effects; none of the subset touches F.
    fn inc_byte(&mut self, reg: ByteRegister) -> bool {
        let value = self.regs.byte(reg);
        self.regs.set_byte(reg, value.wrapping_add(1));
        true
    }

    // LD HL, nn: low operand byte into L, high into H.
    fn ld_hl_nn(&mut self) -> bool {
        match self.take_step() {
            1 => {
                self.request_read_pc();
                false
            }
            2 => {
                self.regs.set_byte(ByteRegister::L, self.data);
                self.request_read_pc();
                false
            }
            _ => {
                self.regs.set_byte(ByteRegister::H, self.data);
                true
            }
        }
    }

    // LD A, n. PC advances when the operand is consumed, not when the
    // read is issued.
    fn ld_a_n(&mut self) -> bool {
        match self.take_step() {
            1 => {
                self.request_read(self.regs.pc());
                false
            }
            _ => {
                self.regs.set_byte(ByteRegister::A, self.data);
                self.regs.set_pc(self.regs.pc().wrapping_add(1));
                true
            }
        }
    }

    // LD (HL), A.
    fn ld_hl_ind_a(&mut self) -> bool {
        match self.take_step() {
            1 => {
                let addr = self.regs.word(WordRegister::Hl);
                let value = self.regs.byte(ByteRegister::A);
                self.request_write(addr, value);
                false
            }
            _ => true,
        }
    }

    // JP nn: the operand flows through WZ, then replaces PC outright.
    fn jp_nn(&mut self) -> bool {
        match self.take_step() {
            1 => {
                self.request_read_pc();
                false
            }
            2 => {
                self.regs.set_byte(ByteRegister::Z, self.data);
                self.request_read_pc();
                false
            }
            _ => {
                self.regs.set_byte(ByteRegister::W, self.data);
                self.regs.set_pc(self.regs.word(WordRegister::Wz));
                true
            }
        }
    }
}

//! The Z80's pins: naming, circuit binding, and bus-wide helpers.

use dsim_core::{BindError, Level, Pin, SimTime};

/// Every pin of the Z80, grouped by function.
///
/// The bundle is passed to the model on each clock notification rather
/// than owned by it, so the host circuit keeps ownership of the electrical
/// state and can route the same lines to other components.
pub struct Z80Pins<P: Pin> {
    /// Machine cycle one, low during the opcode fetch.
    pub m1: P,
    /// Memory request.
    pub mreq: P,
    /// I/O request. Driven high; no opcode in the current subset uses it.
    pub iorq: P,
    /// Memory read strobe.
    pub rd: P,
    /// Memory write strobe.
    pub wr: P,
    /// Refresh, low while the I:R address is valid for DRAM refresh.
    pub rfsh: P,
    /// Halt acknowledge output. Driven high; not yet wired to execution.
    pub halt: P,
    /// Wait input. Connected but not yet sampled.
    pub wait: P,
    /// Maskable interrupt input. Connected but not yet sampled.
    pub int: P,
    /// Non-maskable interrupt input. Connected but not yet sampled.
    pub nmi: P,
    /// Reset input. Connected; the host calls [`Z80::reset`] directly.
    ///
    /// [`Z80::reset`]: crate::Z80::reset
    pub reset: P,
    /// Bus request input. Connected but not yet sampled.
    pub busrq: P,
    /// Bus acknowledge output. Driven high; not yet wired.
    pub busak: P,
    /// Clock input; the model acts on its rising edges.
    pub clk: P,
    /// Address bus, A0 (bit 0) through A15 (bit 15).
    pub address: [P; 16],
    /// Data bus, D0 (bit 0) through D7 (bit 7).
    pub data: [P; 8],
}

impl<P: Pin> Z80Pins<P> {
    /// Resolve every pin by name from a host circuit.
    ///
    /// Control pins use their Zilog names (`M1`, `MREQ`, `IORQ`, `RD`,
    /// `WR`, `RFSH`, `HALT`, `WAIT`, `INT`, `NMI`, `RESET`, `BUSRQ`,
    /// `BUSAK`, `CLK`); the buses are `A0`..`A15` and `D0`..`D7`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingPin`] for the first name the circuit
    /// cannot supply.
    pub fn bind<F>(mut lookup: F) -> Result<Self, BindError>
    where
        F: FnMut(&str) -> Option<P>,
    {
        let mut pin = |name: &str| {
            lookup(name).ok_or_else(|| BindError::MissingPin {
                name: name.to_owned(),
            })
        };

        let m1 = pin("M1")?;
        let mreq = pin("MREQ")?;
        let iorq = pin("IORQ")?;
        let rd = pin("RD")?;
        let wr = pin("WR")?;
        let rfsh = pin("RFSH")?;
        let halt = pin("HALT")?;
        let wait = pin("WAIT")?;
        let int = pin("INT")?;
        let nmi = pin("NMI")?;
        let reset = pin("RESET")?;
        let busrq = pin("BUSRQ")?;
        let busak = pin("BUSAK")?;
        let clk = pin("CLK")?;

        let mut address = Vec::with_capacity(16);
        for n in 0..16 {
            address.push(pin(&format!("A{n}"))?);
        }
        let Ok(address) = <[P; 16]>::try_from(address) else {
            unreachable!()
        };

        let mut data = Vec::with_capacity(8);
        for n in 0..8 {
            data.push(pin(&format!("D{n}"))?);
        }
        let Ok(data) = <[P; 8]>::try_from(data) else {
            unreachable!()
        };

        Ok(Self {
            m1,
            mreq,
            iorq,
            rd,
            wr,
            rfsh,
            halt,
            wait,
            int,
            nmi,
            reset,
            busrq,
            busak,
            clk,
            address,
            data,
        })
    }

    /// Put a 16-bit value on the address bus, effective at `time`.
    pub fn drive_address(&mut self, time: SimTime, value: u16) {
        for (bit, pin) in self.address.iter_mut().enumerate() {
            let level = if (value >> bit) & 1 == 1 {
                Level::High
            } else {
                Level::Low
            };
            pin.set_level(time, level);
        }
    }

    /// Put an 8-bit value on the data bus, effective at `time`.
    pub fn drive_data(&mut self, time: SimTime, value: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let level = if (value >> bit) & 1 == 1 {
                Level::High
            } else {
                Level::Low
            };
            pin.set_level(time, level);
        }
    }

    /// Release the address bus to high impedance, effective at `time`.
    pub fn float_address(&mut self, time: SimTime) {
        for pin in &mut self.address {
            pin.set_level(time, Level::Floating);
        }
    }

    /// Release the data bus to high impedance, effective at `time`.
    pub fn float_data(&mut self, time: SimTime) {
        for pin in &mut self.data {
            pin.set_level(time, Level::Floating);
        }
    }

    /// Sample the data bus. Lines not driven high read as 0.
    #[must_use]
    pub fn sample_data(&self) -> u8 {
        let mut value = 0;
        for (bit, pin) in self.data.iter().enumerate() {
            if pin.level().is_high() {
                value |= 1 << bit;
            }
        }
        value
    }

    /// Sample the address bus. Lines not driven high read as 0.
    #[must_use]
    pub fn sample_address(&self) -> u16 {
        let mut value = 0;
        for (bit, pin) in self.address.iter().enumerate() {
            if pin.level().is_high() {
                value |= 1 << bit;
            }
        }
        value
    }
}

impl<P: Pin + Default> Default for Z80Pins<P> {
    fn default() -> Self {
        Self {
            m1: P::default(),
            mreq: P::default(),
            iorq: P::default(),
            rd: P::default(),
            wr: P::default(),
            rfsh: P::default(),
            halt: P::default(),
            wait: P::default(),
            int: P::default(),
            nmi: P::default(),
            reset: P::default(),
            busrq: P::default(),
            busak: P::default(),
            clk: P::default(),
            address: std::array::from_fn(|_| P::default()),
            data: std::array::from_fn(|_| P::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsim_core::SimplePin;

    #[test]
    fn bind_resolves_all_pins() {
        let mut names = Vec::new();
        let pins = Z80Pins::<SimplePin>::bind(|name| {
            names.push(name.to_owned());
            Some(SimplePin::new())
        });
        assert!(pins.is_ok());
        assert_eq!(names.len(), 14 + 16 + 8);
        assert!(names.contains(&"CLK".to_owned()));
        assert!(names.contains(&"A15".to_owned()));
        assert!(names.contains(&"D7".to_owned()));
    }

    #[test]
    fn bind_reports_first_missing_pin() {
        let result = Z80Pins::<SimplePin>::bind(|name| {
            if name == "RFSH" {
                None
            } else {
                Some(SimplePin::new())
            }
        });
        assert_eq!(
            result.err(),
            Some(BindError::MissingPin {
                name: "RFSH".to_owned()
            })
        );
    }

    #[test]
    fn drive_and_sample_round_trip() {
        let mut pins = Z80Pins::<SimplePin>::default();
        pins.drive_address(SimTime::ZERO, 0xA5C3);
        pins.drive_data(SimTime::ZERO, 0x5A);
        assert_eq!(pins.sample_address(), 0xA5C3);
        assert_eq!(pins.sample_data(), 0x5A);
    }

    #[test]
    fn floating_lines_sample_as_zero() {
        let mut pins = Z80Pins::<SimplePin>::default();
        pins.drive_data(SimTime::ZERO, 0xFF);
        pins.float_data(SimTime::ZERO);
        assert_eq!(pins.sample_data(), 0x00);
    }
}

//! Machine-cycle kinds and T-state sequencing.

/// The kind of machine cycle the bus is running.
///
/// The cycle kind never changes on its own: the execution engine selects
/// the next cycle, and the T-state counter wraps within the current kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCycle {
    /// Opcode fetch (M1) with trailing refresh.
    Fetch,
    /// Memory read at the transfer address.
    MemoryRead,
    /// Memory write at the transfer address.
    MemoryWrite,
    /// I/O read. Reserved; no opcode in the current subset requests it.
    IoRead,
    /// I/O write. Reserved; no opcode in the current subset requests it.
    IoWrite,
}

impl BusCycle {
    /// Last T-state of this cycle kind before wrapping to T1 rising.
    #[must_use]
    pub const fn terminal_t_state(self) -> TState {
        match self {
            Self::Fetch => TState::T4Falling,
            Self::MemoryRead | Self::MemoryWrite | Self::IoRead | Self::IoWrite => {
                TState::T3Falling
            }
        }
    }

    /// Lower-case name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::MemoryRead => "memory_read",
            Self::MemoryWrite => "memory_write",
            Self::IoRead => "io_read",
            Self::IoWrite => "io_write",
        }
    }
}

/// Position within a machine cycle.
///
/// Each T-state has a rising and a falling half; the model is stepped once
/// per rising clock edge and each step lands on the next half, so control
/// lines change on the half where the hardware timing diagrams place them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TState {
    T1Rising,
    T1Falling,
    T2Rising,
    T2Falling,
    T3Rising,
    T3Falling,
    T4Rising,
    T4Falling,
}

impl TState {
    /// The following T-state, wrapping from T4 falling back to T1 rising.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::T1Rising => Self::T1Falling,
            Self::T1Falling => Self::T2Rising,
            Self::T2Rising => Self::T2Falling,
            Self::T2Falling => Self::T3Rising,
            Self::T3Rising => Self::T3Falling,
            Self::T3Falling => Self::T4Rising,
            Self::T4Rising => Self::T4Falling,
            Self::T4Falling => Self::T1Rising,
        }
    }

    /// Lower-case name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::T1Rising => "t1_rising",
            Self::T1Falling => "t1_falling",
            Self::T2Rising => "t2_rising",
            Self::T2Falling => "t2_falling",
            Self::T3Rising => "t3_rising",
            Self::T3Falling => "t3_falling",
            Self::T4Rising => "t4_rising",
            Self::T4Falling => "t4_falling",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_occupies_eight_t_states() {
        let mut t = TState::T1Rising;
        let mut count = 1;
        while t != BusCycle::Fetch.terminal_t_state() {
            t = t.next();
            count += 1;
        }
        assert_eq!(count, 8);
    }

    #[test]
    fn transfer_cycles_occupy_six_t_states() {
        let mut t = TState::T1Rising;
        let mut count = 1;
        while t != BusCycle::MemoryRead.terminal_t_state() {
            t = t.next();
            count += 1;
        }
        assert_eq!(count, 6);
    }

    #[test]
    fn t_states_wrap_after_t4_falling() {
        assert_eq!(TState::T4Falling.next(), TState::T1Rising);
    }
}

//! Digital pin capability and a reference implementation.

use crate::{Level, SimTime};

/// A digital pin on a component.
///
/// One instance per bus or control line. The pin owns the electrical state
/// of its line; components request level changes at a timestamp and the pin
/// implementation serializes them with its own signal propagation. A
/// transition may be placed in the future (e.g. a line released a fixed
/// delay after another).
pub trait Pin {
    /// Set the line level, effective at `time`.
    fn set_level(&mut self, time: SimTime, level: Level);

    /// Current level of the line.
    fn level(&self) -> Level;

    /// True if the most recent transition on this line was low to high.
    ///
    /// Only meaningful on clock-like inputs, queried from inside the event
    /// notification for that transition.
    fn is_rising_edge(&self) -> bool;
}

/// Reference [`Pin`] for test benches and simple hosts.
///
/// Transitions at or before the pin's current time apply immediately;
/// future transitions are queued and applied in timestamp order when the
/// host advances the pin with [`settle`](SimplePin::settle).
#[derive(Debug, Clone)]
pub struct SimplePin {
    level: Level,
    /// Level the line transitioned from, for edge detection.
    last_from: Level,
    now: SimTime,
    /// Queued future transitions, ascending by timestamp.
    pending: Vec<(SimTime, Level)>,
}

impl Default for SimplePin {
    fn default() -> Self {
        Self::new()
    }
}

impl SimplePin {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: Level::Floating,
            last_from: Level::Floating,
            now: SimTime::ZERO,
            pending: Vec::new(),
        }
    }

    /// Advance the pin's clock to `time`, applying queued transitions that
    /// have come due, in timestamp order.
    pub fn settle(&mut self, time: SimTime) {
        self.now = time;
        while let Some(&(due, level)) = self.pending.first() {
            if due > time {
                break;
            }
            self.pending.remove(0);
            self.apply(level);
        }
    }

    fn apply(&mut self, level: Level) {
        if level != self.level {
            self.last_from = self.level;
            self.level = level;
        }
    }
}

impl Pin for SimplePin {
    fn set_level(&mut self, time: SimTime, level: Level) {
        if time <= self.now {
            self.apply(level);
        } else {
            // Equal timestamps keep insertion order.
            let at = self.pending.partition_point(|&(due, _)| due <= time);
            self.pending.insert(at, (time, level));
        }
    }

    fn level(&self) -> Level {
        self.level
    }

    fn is_rising_edge(&self) -> bool {
        self.last_from == Level::Low && self.level == Level::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_floating_without_edge() {
        let pin = SimplePin::new();
        assert_eq!(pin.level(), Level::Floating);
        assert!(!pin.is_rising_edge());
    }

    #[test]
    fn immediate_set_applies_at_once() {
        let mut pin = SimplePin::new();
        pin.set_level(SimTime::ZERO, Level::High);
        assert_eq!(pin.level(), Level::High);
    }

    #[test]
    fn rising_edge_reported_after_low_to_high() {
        let mut pin = SimplePin::new();
        pin.set_level(SimTime::ZERO, Level::Low);
        pin.set_level(SimTime::ZERO, Level::High);
        assert!(pin.is_rising_edge());

        pin.set_level(SimTime::ZERO, Level::Low);
        assert!(!pin.is_rising_edge());
    }

    #[test]
    fn future_transition_waits_for_settle() {
        let mut pin = SimplePin::new();
        pin.set_level(SimTime::ZERO, Level::High);
        pin.set_level(SimTime::new(20), Level::Floating);

        assert_eq!(pin.level(), Level::High);
        pin.settle(SimTime::new(19));
        assert_eq!(pin.level(), Level::High);
        pin.settle(SimTime::new(20));
        assert_eq!(pin.level(), Level::Floating);
    }

    #[test]
    fn queued_transitions_apply_in_timestamp_order() {
        let mut pin = SimplePin::new();
        pin.set_level(SimTime::ZERO, Level::Low);
        // Queue out of order; the later one must win after both are due.
        pin.set_level(SimTime::new(22), Level::High);
        pin.set_level(SimTime::new(20), Level::Floating);

        pin.settle(SimTime::new(21));
        assert_eq!(pin.level(), Level::Floating);
        pin.settle(SimTime::new(30));
        assert_eq!(pin.level(), Level::High);
    }
}

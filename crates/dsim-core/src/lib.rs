//! Core traits and types for pin-level digital simulation.
//!
//! Components exchange signal levels through digital pins at absolute
//! timestamps. The host simulator owns electrical behaviour and event
//! scheduling; components only set and read logic levels.

mod error;
mod level;
mod observable;
mod pin;
mod time;

pub use error::BindError;
pub use level::Level;
pub use observable::{Observable, Value};
pub use pin::{Pin, SimplePin};
pub use time::SimTime;

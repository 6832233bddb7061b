//! Errors raised while wiring a component into a host circuit.

use thiserror::Error;

/// Failure to bind a component's pins to a host circuit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The circuit has no pin with the requested name.
    #[error("pin {name} is not present on the circuit")]
    MissingPin {
        /// The name the component asked for.
        name: String,
    },
}

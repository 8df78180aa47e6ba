//! Simulator boundary.

use crate::circuit::Circuit;

/// A simulator that can execute finished circuits.
///
/// Backends own the state representation; the circuit side only describes
/// what to apply. Implementations must apply operations in the order the
/// circuit lists them.
pub trait Backend {
    /// Simulator state, e.g. a density matrix plus classical registers.
    type State;
    /// Error raised while preparing or executing.
    type Error: std::error::Error;

    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Create the initial state for the bits of `circuit`: every qubit in
    /// `|0>`, every classical bit 0.
    fn prepare(&self, circuit: &Circuit) -> Result<Self::State, Self::Error>;

    /// Apply every operation of `circuit` to `state`.
    fn apply(&self, circuit: &Circuit, state: &mut Self::State) -> Result<(), Self::Error>;
}

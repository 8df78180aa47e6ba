//! Insertions expressed as sequences of other gate requests.
//!
//! Sub-requests go through [`Builder::add_gate`] under the aliases `RX`,
//! `RY`, `RZ`, `CZ` and `CPhase`, so they share the caller's clocks and
//! gate-set parameters. They are not logged.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::args::{ArgName, GateArgs};
use crate::builder::Builder;
use crate::error::BuildResult;
use crate::template::{GateCall, Insertion};

fn angle(value: f64) -> GateArgs {
    GateArgs::new().with(ArgName::Angle, value)
}

fn qubit_refs(call: &GateCall) -> Vec<&str> {
    call.qubits.iter().map(String::as_str).collect()
}

/// Hadamard as `RX(-pi)` followed by `RY(-pi/2)`.
#[derive(Debug, Clone, Copy)]
pub struct Hadamard;

impl Insertion for Hadamard {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let q = qubit_refs(call);
        builder.add_gate("RX", &q, angle(-PI))?;
        builder.add_gate("RY", &q, angle(-FRAC_PI_2))?;
        Ok(())
    }
}

/// CNOT as `RY(target, -pi/2) . CZ . RY(target, pi/2)`.
#[derive(Debug, Clone, Copy)]
pub struct Cnot;

impl Insertion for Cnot {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let q = qubit_refs(call);
        builder.add_gate("RY", &q[1..], angle(-FRAC_PI_2))?;
        builder.add_gate("CZ", &q, GateArgs::new())?;
        builder.add_gate("RY", &q[1..], angle(FRAC_PI_2))?;
        Ok(())
    }
}

/// Controlled X rotation as `RY(target, -pi/2) . CPhase(angle) . RY(target, pi/2)`.
#[derive(Debug, Clone, Copy)]
pub struct Crx;

impl Insertion for Crx {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let theta = call.float(ArgName::Angle)?;
        let q = qubit_refs(call);
        builder.add_gate("RY", &q[1..], angle(-FRAC_PI_2))?;
        builder.add_gate("CPhase", &q, angle(theta))?;
        builder.add_gate("RY", &q[1..], angle(FRAC_PI_2))?;
        Ok(())
    }
}

/// Pauli flip as a `-pi` rotation through the given alias.
#[derive(Debug, Clone, Copy)]
pub struct Pauli {
    pub rotation: &'static str,
}

impl Insertion for Pauli {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        builder.add_gate(self.rotation, &qubit_refs(call), angle(-PI))?;
        Ok(())
    }
}

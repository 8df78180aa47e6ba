//! Ideal gates followed by depolarizing noise.
//!
//! Each gate emits its noiseless native operations at the call time and then
//! one depolarizing channel per qubit with probability `depol_noise`.

use std::f64::consts::{FRAC_PI_2, PI};

use tempo_ir::{Operation, ScheduledOp};

use crate::args::ArgName;
use crate::builder::Builder;
use crate::error::BuildResult;
use crate::template::{GateCall, Insertion};

/// The ideal unitary applied before depolarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unitary {
    RotateX,
    RotateY,
    RotateZ,
    Cz,
    Cnot,
    ISwap,
    Hadamard,
    X,
    Y,
    Z,
}

impl Unitary {
    pub fn arity(self) -> usize {
        match self {
            Unitary::Cz | Unitary::Cnot | Unitary::ISwap => 2,
            _ => 1,
        }
    }

    pub fn takes_angle(self) -> bool {
        matches!(self, Unitary::RotateX | Unitary::RotateY | Unitary::RotateZ)
    }
}

fn rx(angle: f64) -> Operation {
    Operation::RotateX {
        angle,
        dephasing_axis: 0.0,
        dephasing_angle: 0.0,
    }
}

fn ry(angle: f64) -> Operation {
    Operation::RotateY {
        angle,
        dephasing_axis: 0.0,
        dephasing_angle: 0.0,
    }
}

fn rz(angle: f64) -> Operation {
    Operation::RotateZ {
        angle,
        dephasing: 0.0,
    }
}

fn cz() -> Operation {
    Operation::CPhase {
        angle: PI,
        dephase_var: 0.0,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Depolarizing {
    pub unitary: Unitary,
}

impl Insertion for Depolarizing {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let pair = call.qubits.clone();
        let first = vec![call.qubits[0].clone()];
        let last = vec![call.qubits[call.qubits.len() - 1].clone()];

        // Operations sharing a timestamp run in emission order.
        let ops: Vec<(Operation, Vec<String>)> = match self.unitary {
            Unitary::RotateX => vec![(rx(call.float(ArgName::Angle)?), first)],
            Unitary::RotateY => vec![(ry(call.float(ArgName::Angle)?), first)],
            Unitary::RotateZ => vec![(rz(call.float(ArgName::Angle)?), first)],
            Unitary::X => vec![(rx(PI), first)],
            Unitary::Y => vec![(ry(PI), first)],
            Unitary::Z => vec![(rz(PI), first)],
            Unitary::Hadamard => vec![(
                Operation::RotateEuler {
                    phi: 0.0,
                    theta: FRAC_PI_2,
                    lamda: PI,
                },
                first,
            )],
            Unitary::Cz => vec![(cz(), pair)],
            Unitary::Cnot => vec![
                (ry(-FRAC_PI_2), last.clone()),
                (cz(), pair),
                (ry(FRAC_PI_2), last),
            ],
            Unitary::ISwap => vec![(
                Operation::ISwap {
                    angle: FRAC_PI_2,
                    dephase_var: 0.0,
                },
                pair,
            )],
        };
        for (operation, bits) in ops {
            builder.emit(ScheduledOp::new(operation, bits, call.time))?;
        }

        let probability = call.float_or_zero(ArgName::DepolNoise);
        if probability > 0.0 {
            for qubit in &call.qubits {
                builder.emit(ScheduledOp::new(
                    Operation::Depolarize { probability },
                    vec![qubit.clone()],
                    call.time,
                ))?;
            }
        }
        Ok(())
    }
}

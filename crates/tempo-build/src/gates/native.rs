//! Insertions that emit a single native operation.

use tempo_ir::{Operation, ScheduledOp};

use crate::args::ArgName;
use crate::builder::Builder;
use crate::error::BuildResult;
use crate::template::{GateCall, Insertion};

fn emit(builder: &mut Builder, call: &GateCall, operation: Operation) -> BuildResult<()> {
    builder.emit(ScheduledOp::new(operation, call.qubits.clone(), call.time))?;
    Ok(())
}

/// Equatorial rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// `RotateX` / `RotateY` with axis and in-plane dephasing.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    pub axis: Axis,
}

impl Insertion for Rotation {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let angle = call.float(ArgName::Angle)?;
        let dephasing_axis = call.float_or_zero(ArgName::DephasingAxis);
        let dephasing_angle = call.float_or_zero(ArgName::DephasingAngle);
        let operation = match self.axis {
            Axis::X => Operation::RotateX {
                angle,
                dephasing_axis,
                dephasing_angle,
            },
            Axis::Y => Operation::RotateY {
                angle,
                dephasing_axis,
                dephasing_angle,
            },
        };
        emit(builder, call, operation)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RotateZ;

impl Insertion for RotateZ {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let operation = Operation::RotateZ {
            angle: call.float(ArgName::Angle)?,
            dephasing: call.float_or_zero(ArgName::Dephasing),
        };
        emit(builder, call, operation)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RotateXY;

impl Insertion for RotateXY {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let operation = Operation::RotateXY {
            phi: call.float(ArgName::Phi)?,
            theta: call.float(ArgName::Theta)?,
            dephasing_axis: call.float_or_zero(ArgName::DephasingAxis),
            dephasing_angle: call.float_or_zero(ArgName::DephasingAngle),
        };
        emit(builder, call, operation)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RotateEuler;

impl Insertion for RotateEuler {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let operation = Operation::RotateEuler {
            phi: call.float(ArgName::Phi)?,
            theta: call.float(ArgName::Theta)?,
            lamda: call.float(ArgName::Lamda)?,
        };
        emit(builder, call, operation)
    }
}

/// Full iSWAP when `fixed_angle` is set, otherwise a partial iSWAP by the
/// caller's `angle`.
#[derive(Debug, Clone, Copy)]
pub struct ISwap {
    pub fixed_angle: Option<f64>,
}

impl Insertion for ISwap {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let angle = match self.fixed_angle {
            Some(angle) => angle,
            None => call.float(ArgName::Angle)?,
        };
        let operation = Operation::ISwap {
            angle,
            dephase_var: call.float_or_zero(ArgName::DephaseVar),
        };
        emit(builder, call, operation)
    }
}

/// Instantaneous preparation into the residual-excitation mixture.
#[derive(Debug, Clone, Copy)]
pub struct Prep;

impl Insertion for Prep {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let operation = Operation::Reset {
            population: call.float_or_zero(ArgName::Population),
        };
        emit(builder, call, operation)
    }
}

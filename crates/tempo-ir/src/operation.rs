//! Native operations understood by simulator backends.

use std::fmt;

use crate::sampler::ReadoutSampler;

/// A native simulator operation.
///
/// Angles are in radians, times in the same unit as the qubit lifetimes.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Rotation about X with dephasing along the axis and in the rotation plane.
    RotateX {
        angle: f64,
        dephasing_axis: f64,
        dephasing_angle: f64,
    },
    /// Rotation about Y with dephasing along the axis and in the rotation plane.
    RotateY {
        angle: f64,
        dephasing_axis: f64,
        dephasing_angle: f64,
    },
    /// Rotation about Z with in-plane dephasing.
    RotateZ { angle: f64, dephasing: f64 },
    /// Rotation by `theta` about the equatorial axis at azimuth `phi`.
    RotateXY {
        phi: f64,
        theta: f64,
        dephasing_axis: f64,
        dephasing_angle: f64,
    },
    /// `Rz(phi) Ry(theta) Rz(lamda)`.
    RotateEuler { phi: f64, theta: f64, lamda: f64 },
    /// Controlled phase with incoherent phase noise of variance `dephase_var`.
    CPhase { angle: f64, dephase_var: f64 },
    /// Partial iSWAP; `angle = pi/2` is a full iSWAP.
    ISwap { angle: f64, dephase_var: f64 },
    /// Amplitude exchange with the environment: excitation and decay
    /// probabilities applied instantaneously.
    Butterfly { p_exc: f64, p_dec: f64 },
    /// Projective measurement.
    Measure {
        /// Classical bit receiving the declared (possibly misread) outcome.
        output_bit: String,
        /// Classical bit receiving the projected outcome.
        real_output_bit: Option<String>,
        sampler: Option<ReadoutSampler>,
    },
    /// Reset to the mixed state `diag(1 - population, population)`.
    Reset { population: f64 },
    /// Free evolution with T1/T2 decay.
    Idle { duration: f64 },
    /// Mix toward the maximally mixed state with the given probability.
    Depolarize { probability: f64 },
}

impl Operation {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::RotateX { .. } => "rotate_x",
            Operation::RotateY { .. } => "rotate_y",
            Operation::RotateZ { .. } => "rotate_z",
            Operation::RotateXY { .. } => "rotate_xy",
            Operation::RotateEuler { .. } => "rotate_euler",
            Operation::CPhase { .. } => "cphase",
            Operation::ISwap { .. } => "iswap",
            Operation::Butterfly { .. } => "butterfly",
            Operation::Measure { .. } => "measure",
            Operation::Reset { .. } => "reset",
            Operation::Idle { .. } => "idle",
            Operation::Depolarize { .. } => "depolarize",
        }
    }

    /// Number of qubits this operation acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Operation::CPhase { .. } | Operation::ISwap { .. } => 2,
            _ => 1,
        }
    }

    /// Classical bits written by this operation.
    pub fn classical_outputs(&self) -> Vec<&str> {
        match self {
            Operation::Measure {
                output_bit,
                real_output_bit,
                ..
            } => std::iter::once(output_bit.as_str())
                .chain(real_output_bit.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }

    /// The rotation angle of a single-angle rotation, for rebinding at run
    /// time. Composite rotations have no single angle and return `None`.
    pub fn angle_mut(&mut self) -> Option<&mut f64> {
        match self {
            Operation::RotateX { angle, .. }
            | Operation::RotateY { angle, .. }
            | Operation::RotateZ { angle, .. }
            | Operation::CPhase { angle, .. }
            | Operation::ISwap { angle, .. } => Some(angle),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::RotateX { angle, .. }
            | Operation::RotateY { angle, .. }
            | Operation::RotateZ { angle, .. }
            | Operation::CPhase { angle, .. }
            | Operation::ISwap { angle, .. } => write!(f, "{}({angle:.4})", self.name()),
            Operation::RotateXY { phi, theta, .. } => {
                write!(f, "rotate_xy({phi:.4}, {theta:.4})")
            }
            Operation::RotateEuler { phi, theta, lamda } => {
                write!(f, "rotate_euler({phi:.4}, {theta:.4}, {lamda:.4})")
            }
            Operation::Butterfly { p_exc, p_dec } => write!(f, "butterfly({p_exc}, {p_dec})"),
            Operation::Measure { output_bit, .. } => write!(f, "measure -> {output_bit}"),
            Operation::Reset { population } => write!(f, "reset({population})"),
            Operation::Idle { duration } => write!(f, "idle({duration})"),
            Operation::Depolarize { probability } => write!(f, "depolarize({probability})"),
        }
    }
}

/// An operation placed on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledOp {
    pub operation: Operation,
    /// Quantum bits, in operation order.
    pub bits: Vec<String>,
    /// Execution timestamp.
    pub time: f64,
    /// Marks Z rotations whose angle follows the quasistatic flux of `bits[0]`.
    pub flux_sensitive: bool,
}

impl ScheduledOp {
    pub fn new(operation: Operation, bits: Vec<String>, time: f64) -> Self {
        Self {
            operation,
            bits,
            time,
            flux_sensitive: false,
        }
    }

    /// Mark this operation as following the quasistatic flux.
    #[must_use]
    pub fn with_flux_sensitivity(mut self) -> Self {
        self.flux_sensitive = true;
        self
    }

    /// Whether this operation acts on the given quantum bit.
    pub fn acts_on(&self, bit: &str) -> bool {
        self.bits.iter().any(|b| b == bit)
    }

    /// Every wire this operation touches: quantum bits then classical outputs.
    pub fn wires(&self) -> impl Iterator<Item = &str> {
        self.bits
            .iter()
            .map(String::as_str)
            .chain(self.operation.classical_outputs())
    }
}

impl fmt::Display for ScheduledOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] @ {}", self.operation, self.bits.join(", "), self.time)
    }
}

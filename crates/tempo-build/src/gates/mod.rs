//! Standard gate library.
//!
//! Every template is registered under a fixed library name; registries map
//! user-facing aliases onto these names.

pub mod composite;
pub mod depolarizing;
pub mod native;
pub mod specialized;

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::{Arc, OnceLock};

use tempo_ir::{ParamKey, Value};

use crate::args::ArgName;
use crate::template::GateTemplate;

pub use composite::{Cnot, Crx, Hadamard, Pauli};
pub use depolarizing::{Depolarizing, Unitary};
pub use native::{Axis, ISwap, Prep, RotateEuler, RotateXY, RotateZ, Rotation};
pub use specialized::{FLUX_DELAY, FluxCPhase, Measurement, Reset};

// `high_frequency` is an override slot only: flux is drawn from the qubit's
// own `static_flux_std`, so a low-frequency control with flux is rejected
// only when a caller or gate-set entry says so explicitly.
fn flux_cphase(name: &str, fixed_angle: Option<f64>) -> GateTemplate {
    GateTemplate::new(name, 2, FluxCPhase { fixed_angle })
        .with_gate_time(ParamKey::CzGateTime)
        .inherit(ArgName::QuasistaticFlux, ParamKey::QuasistaticFlux)
        .inherit(ArgName::DephaseVar, ParamKey::DephaseVar)
        .literal(ArgName::HighFrequency, Value::Unset)
}

fn rotation(name: &str, axis: Axis) -> GateTemplate {
    GateTemplate::new(name, 1, Rotation { axis })
        .with_gate_time(ParamKey::OneqGateTime)
        .inherit(ArgName::DephasingAxis, ParamKey::DephasingAxis)
        .inherit(ArgName::DephasingAngle, ParamKey::DephasingAngle)
        .with_user_args(&[ArgName::Angle])
}

fn iswap(name: &str, fixed_angle: Option<f64>) -> GateTemplate {
    let template = GateTemplate::new(name, 2, ISwap { fixed_angle })
        .with_gate_time(ParamKey::ISwapGateTime)
        .inherit(ArgName::DephaseVar, ParamKey::DephaseVar);
    match fixed_angle {
        Some(_) => template,
        None => template.with_user_args(&[ArgName::Angle]),
    }
}

fn depolarizing(name: &str, unitary: Unitary) -> GateTemplate {
    let template = GateTemplate::new(name, unitary.arity(), Depolarizing { unitary })
        .with_gate_time(ParamKey::DummyTime)
        .inherit(ArgName::DepolNoise, ParamKey::DepolNoise);
    if unitary.takes_angle() {
        template.with_user_args(&[ArgName::Angle])
    } else {
        template
    }
}

fn build_library() -> BTreeMap<String, Arc<GateTemplate>> {
    let templates = [
        flux_cphase("CZ", Some(PI)),
        flux_cphase("CPhase", None).with_user_args(&[ArgName::Angle]),
        rotation("RotateX", Axis::X),
        rotation("RotateY", Axis::Y),
        GateTemplate::new("RotateZ", 1, RotateZ)
            .with_gate_time(ParamKey::OneqGateTime)
            .inherit(ArgName::Dephasing, ParamKey::Dephasing)
            .with_user_args(&[ArgName::Angle]),
        GateTemplate::new("RotateXY", 1, RotateXY)
            .with_gate_time(ParamKey::OneqGateTime)
            .inherit(ArgName::DephasingAxis, ParamKey::DephasingAxis)
            .inherit(ArgName::DephasingAngle, ParamKey::DephasingAngle)
            .with_user_args(&[ArgName::Phi, ArgName::Theta]),
        GateTemplate::new("RotateEuler", 1, RotateEuler)
            .with_gate_time(ParamKey::OneqGateTime)
            .with_user_args(&[ArgName::Phi, ArgName::Theta, ArgName::Lamda]),
        GateTemplate::new("XGate", 1, Pauli { rotation: "RX" }),
        GateTemplate::new("YGate", 1, Pauli { rotation: "RY" }),
        GateTemplate::new("ZGate", 1, Pauli { rotation: "RZ" }),
        GateTemplate::new("Measure", 1, Measurement)
            .with_gate_time(ParamKey::MsmtTime)
            .with_exec_time(0.0)
            .inherit(ArgName::PExcInit, ParamKey::PExcInit)
            .inherit(ArgName::PDecInit, ParamKey::PDecInit)
            .inherit(ArgName::PExcFin, ParamKey::PExcFin)
            .inherit(ArgName::PDecFin, ParamKey::PDecFin)
            .inherit(ArgName::IntervalTime, ParamKey::IntervalTime)
            .inherit(ArgName::MsmtTime, ParamKey::MsmtTime)
            .inherit(ArgName::Sampler, ParamKey::Sampler)
            .literal(ArgName::RealOutputBit, Value::Unset)
            .with_user_args(&[ArgName::OutputBit]),
        iswap("ISwap", Some(FRAC_PI_2)),
        iswap("ISwapRotation", None),
        GateTemplate::new("ResetGate", 1, Reset)
            .with_gate_time(ParamKey::ResetTime)
            .inherit(ArgName::Population, ParamKey::ResidualExcitations)
            .inherit(ArgName::ResetTime, ParamKey::ResetTime),
        GateTemplate::new("PrepGate", 1, Prep)
            .inherit(ArgName::Population, ParamKey::ResidualExcitations),
        GateTemplate::new("Had", 1, Hadamard),
        GateTemplate::new("CNOT", 2, Cnot),
        GateTemplate::new("CRX", 2, Crx).with_user_args(&[ArgName::Angle]),
        depolarizing("DepolRotateX", Unitary::RotateX),
        depolarizing("DepolRotateY", Unitary::RotateY),
        depolarizing("DepolRotateZ", Unitary::RotateZ),
        depolarizing("DepolCZ", Unitary::Cz),
        depolarizing("DepolCNOT", Unitary::Cnot),
        depolarizing("DepolISwap", Unitary::ISwap),
        depolarizing("DepolHadamard", Unitary::Hadamard),
        depolarizing("DepolXGate", Unitary::X),
        depolarizing("DepolYGate", Unitary::Y),
        depolarizing("DepolZGate", Unitary::Z),
        GateTemplate::new("IdealMeasure", 1, Measurement)
            .with_gate_time(ParamKey::DummyTime)
            .inherit(ArgName::Sampler, ParamKey::Sampler)
            .literal(ArgName::RealOutputBit, Value::Unset)
            .with_user_args(&[ArgName::OutputBit]),
    ];

    templates
        .into_iter()
        .map(|t| (t.name().to_string(), Arc::new(t)))
        .collect()
}

/// Names of every template in the standard library.
pub const LIBRARY_NAMES: [&str; 29] = [
    "CZ",
    "CPhase",
    "RotateX",
    "RotateY",
    "RotateZ",
    "RotateXY",
    "RotateEuler",
    "XGate",
    "YGate",
    "ZGate",
    "Measure",
    "ISwap",
    "ISwapRotation",
    "ResetGate",
    "PrepGate",
    "Had",
    "CNOT",
    "CRX",
    "DepolRotateX",
    "DepolRotateY",
    "DepolRotateZ",
    "DepolCZ",
    "DepolCNOT",
    "DepolISwap",
    "DepolHadamard",
    "DepolXGate",
    "DepolYGate",
    "DepolZGate",
    "IdealMeasure",
];

fn library() -> &'static BTreeMap<String, Arc<GateTemplate>> {
    static LIBRARY: OnceLock<BTreeMap<String, Arc<GateTemplate>>> = OnceLock::new();
    LIBRARY.get_or_init(build_library)
}

/// Look up a template by library name.
pub fn library_template(name: &str) -> Option<Arc<GateTemplate>> {
    library().get(name).cloned()
}

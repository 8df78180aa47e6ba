//! Per-qubit parameter records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sampler::{ReadoutSampler, marker};
use crate::value::{Value, lifetime};

/// The closed set of recognized qubit parameters.
///
/// Serialized names match the historical configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamKey {
    #[serde(rename = "t1")]
    T1,
    #[serde(rename = "t2")]
    T2,
    #[serde(rename = "dephasing_axis")]
    DephasingAxis,
    #[serde(rename = "dephasing_angle")]
    DephasingAngle,
    #[serde(rename = "dephasing")]
    Dephasing,
    #[serde(rename = "dephase_var")]
    DephaseVar,
    #[serde(rename = "p_exc_init")]
    PExcInit,
    #[serde(rename = "p_dec_init")]
    PDecInit,
    #[serde(rename = "p_exc_fin")]
    PExcFin,
    #[serde(rename = "p_dec_fin")]
    PDecFin,
    #[serde(rename = "residual_excitations")]
    ResidualExcitations,
    #[serde(rename = "msmt_time")]
    MsmtTime,
    #[serde(rename = "interval_time")]
    IntervalTime,
    #[serde(rename = "oneq_gate_time")]
    OneqGateTime,
    #[serde(rename = "CZ_gate_time")]
    CzGateTime,
    #[serde(rename = "ISwap_gate_time")]
    ISwapGateTime,
    #[serde(rename = "reset_time")]
    ResetTime,
    #[serde(rename = "photons")]
    Photons,
    #[serde(rename = "alpha0")]
    Alpha0,
    #[serde(rename = "kappa")]
    Kappa,
    #[serde(rename = "chi")]
    Chi,
    #[serde(rename = "static_flux_std")]
    StaticFluxStd,
    #[serde(rename = "quasistatic_flux")]
    QuasistaticFlux,
    #[serde(rename = "high_frequency")]
    HighFrequency,
    #[serde(rename = "sampler")]
    Sampler,
    #[serde(rename = "readout_error")]
    ReadoutError,
    #[serde(rename = "depol_noise")]
    DepolNoise,
    #[serde(rename = "dummy_time")]
    DummyTime,
}

impl ParamKey {
    /// Every key, in declaration order.
    pub const ALL: [ParamKey; 28] = [
        ParamKey::T1,
        ParamKey::T2,
        ParamKey::DephasingAxis,
        ParamKey::DephasingAngle,
        ParamKey::Dephasing,
        ParamKey::DephaseVar,
        ParamKey::PExcInit,
        ParamKey::PDecInit,
        ParamKey::PExcFin,
        ParamKey::PDecFin,
        ParamKey::ResidualExcitations,
        ParamKey::MsmtTime,
        ParamKey::IntervalTime,
        ParamKey::OneqGateTime,
        ParamKey::CzGateTime,
        ParamKey::ISwapGateTime,
        ParamKey::ResetTime,
        ParamKey::Photons,
        ParamKey::Alpha0,
        ParamKey::Kappa,
        ParamKey::Chi,
        ParamKey::StaticFluxStd,
        ParamKey::QuasistaticFlux,
        ParamKey::HighFrequency,
        ParamKey::Sampler,
        ParamKey::ReadoutError,
        ParamKey::DepolNoise,
        ParamKey::DummyTime,
    ];

    /// The configuration name of this key.
    pub fn name(self) -> &'static str {
        match self {
            ParamKey::T1 => "t1",
            ParamKey::T2 => "t2",
            ParamKey::DephasingAxis => "dephasing_axis",
            ParamKey::DephasingAngle => "dephasing_angle",
            ParamKey::Dephasing => "dephasing",
            ParamKey::DephaseVar => "dephase_var",
            ParamKey::PExcInit => "p_exc_init",
            ParamKey::PDecInit => "p_dec_init",
            ParamKey::PExcFin => "p_exc_fin",
            ParamKey::PDecFin => "p_dec_fin",
            ParamKey::ResidualExcitations => "residual_excitations",
            ParamKey::MsmtTime => "msmt_time",
            ParamKey::IntervalTime => "interval_time",
            ParamKey::OneqGateTime => "oneq_gate_time",
            ParamKey::CzGateTime => "CZ_gate_time",
            ParamKey::ISwapGateTime => "ISwap_gate_time",
            ParamKey::ResetTime => "reset_time",
            ParamKey::Photons => "photons",
            ParamKey::Alpha0 => "alpha0",
            ParamKey::Kappa => "kappa",
            ParamKey::Chi => "chi",
            ParamKey::StaticFluxStd => "static_flux_std",
            ParamKey::QuasistaticFlux => "quasistatic_flux",
            ParamKey::HighFrequency => "high_frequency",
            ParamKey::Sampler => "sampler",
            ParamKey::ReadoutError => "readout_error",
            ParamKey::DepolNoise => "depol_noise",
            ParamKey::DummyTime => "dummy_time",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| format!("unknown qubit parameter '{s}'"))
    }
}

/// Typed parameter record of one qubit. Every field is optional; an absent
/// field resolves to [`Value::Unset`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QubitParams {
    #[serde(with = "lifetime")]
    pub t1: Option<f64>,
    #[serde(with = "lifetime")]
    pub t2: Option<f64>,
    pub dephasing_axis: Option<f64>,
    pub dephasing_angle: Option<f64>,
    pub dephasing: Option<f64>,
    pub dephase_var: Option<f64>,
    pub p_exc_init: Option<f64>,
    pub p_dec_init: Option<f64>,
    pub p_exc_fin: Option<f64>,
    pub p_dec_fin: Option<f64>,
    pub residual_excitations: Option<f64>,
    pub msmt_time: Option<f64>,
    pub interval_time: Option<f64>,
    pub oneq_gate_time: Option<f64>,
    #[serde(rename = "CZ_gate_time")]
    pub cz_gate_time: Option<f64>,
    #[serde(rename = "ISwap_gate_time")]
    pub iswap_gate_time: Option<f64>,
    pub reset_time: Option<f64>,
    pub photons: Option<bool>,
    pub alpha0: Option<f64>,
    pub kappa: Option<f64>,
    pub chi: Option<f64>,
    pub static_flux_std: Option<f64>,
    pub quasistatic_flux: Option<f64>,
    pub high_frequency: Option<bool>,
    #[serde(with = "marker")]
    pub sampler: Option<ReadoutSampler>,
    pub readout_error: Option<f64>,
    /// Depolarization probability applied after each gate.
    pub depol_noise: Option<f64>,
    /// Uniform gate time of models without per-gate timing.
    pub dummy_time: Option<f64>,
}

impl QubitParams {
    /// Look up a parameter.
    pub fn get(&self, key: ParamKey) -> Value {
        match key {
            ParamKey::T1 => self.t1.into(),
            ParamKey::T2 => self.t2.into(),
            ParamKey::DephasingAxis => self.dephasing_axis.into(),
            ParamKey::DephasingAngle => self.dephasing_angle.into(),
            ParamKey::Dephasing => self.dephasing.into(),
            ParamKey::DephaseVar => self.dephase_var.into(),
            ParamKey::PExcInit => self.p_exc_init.into(),
            ParamKey::PDecInit => self.p_dec_init.into(),
            ParamKey::PExcFin => self.p_exc_fin.into(),
            ParamKey::PDecFin => self.p_dec_fin.into(),
            ParamKey::ResidualExcitations => self.residual_excitations.into(),
            ParamKey::MsmtTime => self.msmt_time.into(),
            ParamKey::IntervalTime => self.interval_time.into(),
            ParamKey::OneqGateTime => self.oneq_gate_time.into(),
            ParamKey::CzGateTime => self.cz_gate_time.into(),
            ParamKey::ISwapGateTime => self.iswap_gate_time.into(),
            ParamKey::ResetTime => self.reset_time.into(),
            ParamKey::Photons => self.photons.into(),
            ParamKey::Alpha0 => self.alpha0.into(),
            ParamKey::Kappa => self.kappa.into(),
            ParamKey::Chi => self.chi.into(),
            ParamKey::StaticFluxStd => self.static_flux_std.into(),
            ParamKey::QuasistaticFlux => self.quasistatic_flux.into(),
            ParamKey::HighFrequency => self.high_frequency.into(),
            ParamKey::Sampler => self.sampler.clone().into(),
            ParamKey::ReadoutError => self.readout_error.into(),
            ParamKey::DepolNoise => self.depol_noise.into(),
            ParamKey::DummyTime => self.dummy_time.into(),
        }
    }
}

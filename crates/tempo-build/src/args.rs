//! Gate arguments and their sources.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempo_ir::{ParamKey, QubitParams, Value};

/// The closed set of argument names a gate can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgName {
    // Supplied by the caller.
    Angle,
    Phi,
    Theta,
    Lamda,
    OutputBit,
    RealOutputBit,
    // Inherited from qubit parameters.
    QuasistaticFlux,
    DephaseVar,
    HighFrequency,
    DephasingAxis,
    DephasingAngle,
    Dephasing,
    PExcInit,
    PDecInit,
    PExcFin,
    PDecFin,
    IntervalTime,
    MsmtTime,
    Sampler,
    Population,
    ResetTime,
    DepolNoise,
}

impl ArgName {
    pub const ALL: [ArgName; 22] = [
        ArgName::Angle,
        ArgName::Phi,
        ArgName::Theta,
        ArgName::Lamda,
        ArgName::OutputBit,
        ArgName::RealOutputBit,
        ArgName::QuasistaticFlux,
        ArgName::DephaseVar,
        ArgName::HighFrequency,
        ArgName::DephasingAxis,
        ArgName::DephasingAngle,
        ArgName::Dephasing,
        ArgName::PExcInit,
        ArgName::PDecInit,
        ArgName::PExcFin,
        ArgName::PDecFin,
        ArgName::IntervalTime,
        ArgName::MsmtTime,
        ArgName::Sampler,
        ArgName::Population,
        ArgName::ResetTime,
        ArgName::DepolNoise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArgName::Angle => "angle",
            ArgName::Phi => "phi",
            ArgName::Theta => "theta",
            ArgName::Lamda => "lamda",
            ArgName::OutputBit => "output_bit",
            ArgName::RealOutputBit => "real_output_bit",
            ArgName::QuasistaticFlux => "quasistatic_flux",
            ArgName::DephaseVar => "dephase_var",
            ArgName::HighFrequency => "high_frequency",
            ArgName::DephasingAxis => "dephasing_axis",
            ArgName::DephasingAngle => "dephasing_angle",
            ArgName::Dephasing => "dephasing",
            ArgName::PExcInit => "p_exc_init",
            ArgName::PDecInit => "p_dec_init",
            ArgName::PExcFin => "p_exc_fin",
            ArgName::PDecFin => "p_dec_fin",
            ArgName::IntervalTime => "interval_time",
            ArgName::MsmtTime => "msmt_time",
            ArgName::Sampler => "sampler",
            ArgName::Population => "population",
            ArgName::ResetTime => "reset_time",
            ArgName::DepolNoise => "depol_noise",
        }
    }
}

impl fmt::Display for ArgName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArgName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgName::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown gate argument '{s}'"))
    }
}

/// Named argument values of one gate call or gate-set entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateArgs(BTreeMap<ArgName, Value>);

impl GateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, builder style.
    #[must_use]
    pub fn with(mut self, name: ArgName, value: impl Into<Value>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: ArgName, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name, value.into())
    }

    pub fn get(&self, name: ArgName) -> Option<&Value> {
        self.0.get(&name)
    }

    pub fn get_mut(&mut self, name: ArgName) -> Option<&mut Value> {
        self.0.get_mut(&name)
    }

    pub fn contains(&self, name: ArgName) -> bool {
        self.0.contains_key(&name)
    }

    /// The float value of an argument, treating absent and unset alike.
    pub fn float(&self, name: ArgName) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn text(&self, name: ArgName) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArgName, &Value)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = ArgName> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `overrides` on these arguments; the overrides win.
    pub fn merged_with(&self, overrides: &GateArgs) -> GateArgs {
        let mut merged = self.clone();
        for (name, value) in overrides.iter() {
            merged.0.insert(name, value.clone());
        }
        merged
    }
}

impl FromIterator<(ArgName, Value)> for GateArgs {
    fn from_iter<I: IntoIterator<Item = (ArgName, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where a template argument gets its value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSource {
    /// A fixed value.
    Literal(Value),
    /// The named parameter of the gate's first qubit.
    Inherit(ParamKey),
}

impl ArgSource {
    pub fn resolve(&self, params: &QubitParams) -> Value {
        match self {
            ArgSource::Literal(v) => v.clone(),
            ArgSource::Inherit(key) => params.get(*key),
        }
    }

    /// The inherited key, if any.
    pub fn key(&self) -> Option<ParamKey> {
        match self {
            ArgSource::Inherit(key) => Some(*key),
            ArgSource::Literal(_) => None,
        }
    }
}

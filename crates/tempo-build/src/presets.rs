//! Transmon and depolarizing presets.
//!
//! [`QubitConfig`] carries the default parameters of a flux-tunable transmon.
//! It can be loaded from YAML or JSON with any subset of fields set.
//!
//! ```yaml
//! t1: 20000
//! t2: 15000
//! CZ_gate_time: 60
//! static_flux_std: 0.01
//! high_frequency: true
//! ```

use std::f64::consts::{PI, SQRT_2};
use std::sync::PoisonError;

use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tempo_ir::{Qubit, QubitParams, QubitRoster, ReadoutSampler, SharedRng};

use crate::connectivity::Connectivity;
use crate::error::{BuildError, BuildResult};
use crate::registry::TemplateRegistry;
use crate::setup::Setup;
use crate::update::QuasistaticFluxUpdate;

/// Parameters of one transmon qubit.
///
/// With `noise_flag` set, lifetimes are divided by `scale` and error rates
/// multiplied by it. Without it the qubit is ideal: infinite lifetimes, zero
/// rates, no flux and a readout that never misreports. Times are in ns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QubitConfig {
    pub noise_flag: bool,
    pub scale: f64,
    pub t1: f64,
    pub t2: f64,
    pub dephasing_axis: f64,
    pub dephasing_angle: f64,
    pub dephasing: f64,
    pub p_exc_init: f64,
    pub p_dec_init: f64,
    pub p_exc_fin: f64,
    pub p_dec_fin: f64,
    pub residual_excitations: f64,
    pub photons: bool,
    pub alpha0: f64,
    pub kappa: f64,
    pub chi: f64,
    /// Standard deviation of the quasistatic flux; `None` disables flux.
    pub static_flux_std: Option<f64>,
    pub high_frequency: bool,
    pub dephase_var: f64,
    pub msmt_time: f64,
    pub interval_time: f64,
    pub oneq_gate_time: f64,
    #[serde(rename = "CZ_gate_time")]
    pub cz_gate_time: f64,
    pub reset_time: f64,
    pub readout_error: f64,
}

impl Default for QubitConfig {
    fn default() -> Self {
        Self {
            noise_flag: true,
            scale: 1.0,
            t1: 30000.0,
            t2: 30000.0,
            dephasing_axis: 1e-4,
            dephasing_angle: 5e-4,
            dephasing: 5e-4,
            p_exc_init: 0.0,
            p_dec_init: 0.005,
            p_exc_fin: 0.0,
            p_dec_fin: 0.015,
            residual_excitations: 0.01,
            photons: false,
            alpha0: 4.0,
            kappa: 1.0 / 250.0,
            chi: 1.3e-3,
            static_flux_std: None,
            high_frequency: false,
            dephase_var: 1e-2 / (2.0 * PI),
            msmt_time: 600.0,
            interval_time: 150.0,
            oneq_gate_time: 20.0,
            cz_gate_time: 40.0,
            reset_time: 500.0,
            readout_error: 0.005,
        }
    }
}

impl QubitConfig {
    /// The default timings without any noise.
    pub fn noiseless() -> Self {
        Self {
            noise_flag: false,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> BuildResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> BuildResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> BuildResult<()> {
        if self.scale.is_nan() || self.scale <= 0.0 {
            return Err(BuildError::InvalidConfig(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        for (name, value) in [("t1", self.t1), ("t2", self.t2)] {
            if value.is_nan() || value <= 0.0 {
                return Err(BuildError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let probabilities = [
            ("p_exc_init", self.p_exc_init),
            ("p_dec_init", self.p_dec_init),
            ("p_exc_fin", self.p_exc_fin),
            ("p_dec_fin", self.p_dec_fin),
            ("residual_excitations", self.residual_excitations),
            ("readout_error", self.readout_error),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(BuildError::InvalidConfig(format!(
                    "{name} must be a probability, got {value}"
                )));
            }
        }

        let non_negative = [
            ("dephasing_axis", self.dephasing_axis),
            ("dephasing_angle", self.dephasing_angle),
            ("dephasing", self.dephasing),
            ("dephase_var", self.dephase_var),
            ("msmt_time", self.msmt_time),
            ("interval_time", self.interval_time),
            ("oneq_gate_time", self.oneq_gate_time),
            ("CZ_gate_time", self.cz_gate_time),
            ("reset_time", self.reset_time),
            ("static_flux_std", self.static_flux_std.unwrap_or(0.0)),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(BuildError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve into a qubit parameter record.
    ///
    /// Draws the initial quasistatic flux and builds the readout sampler
    /// from `rng`.
    pub fn to_params(&self, rng: &SharedRng) -> BuildResult<QubitParams> {
        self.validate()?;

        let timing = QubitParams {
            msmt_time: Some(self.msmt_time),
            interval_time: Some(self.interval_time),
            oneq_gate_time: Some(self.oneq_gate_time),
            cz_gate_time: Some(self.cz_gate_time),
            iswap_gate_time: Some(self.cz_gate_time * SQRT_2),
            reset_time: Some(self.reset_time),
            ..QubitParams::default()
        };

        if !self.noise_flag {
            return Ok(QubitParams {
                t1: Some(f64::INFINITY),
                t2: Some(f64::INFINITY),
                dephasing_axis: Some(0.0),
                dephasing_angle: Some(0.0),
                dephasing: Some(0.0),
                dephase_var: Some(0.0),
                p_exc_init: Some(0.0),
                p_dec_init: Some(0.0),
                p_exc_fin: Some(0.0),
                p_dec_fin: Some(0.0),
                residual_excitations: Some(0.0),
                photons: Some(false),
                high_frequency: Some(false),
                sampler: Some(ReadoutSampler::uniform(rng.clone())),
                readout_error: Some(0.0),
                ..timing
            });
        }

        let quasistatic_flux = self.static_flux_std.map(|std| {
            let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
            let z: f64 = StandardNormal.sample(&mut *rng);
            std * z
        });

        let scale = self.scale;
        Ok(QubitParams {
            t1: Some(self.t1 / scale),
            t2: Some(self.t2 / scale),
            dephasing_axis: Some(self.dephasing_axis * scale),
            dephasing_angle: Some(self.dephasing_angle * scale),
            dephasing: Some(self.dephasing * scale),
            dephase_var: Some(self.dephase_var * scale),
            p_exc_init: Some(self.p_exc_init * scale),
            p_dec_init: Some(self.p_dec_init * scale),
            p_exc_fin: Some(self.p_exc_fin * scale),
            p_dec_fin: Some(self.p_dec_fin * scale),
            residual_excitations: Some(self.residual_excitations * scale),
            photons: Some(self.photons),
            alpha0: Some(self.alpha0),
            kappa: Some(self.kappa),
            chi: Some(self.chi),
            static_flux_std: self.static_flux_std,
            quasistatic_flux,
            high_frequency: Some(self.high_frequency),
            sampler: Some(ReadoutSampler::new(self.readout_error, rng.clone())),
            readout_error: Some(self.readout_error),
            ..timing
        })
    }
}

fn transmon_setup(
    qubits: Vec<Qubit>,
    connectivity: Option<&Connectivity>,
) -> BuildResult<Setup> {
    Setup::new(
        TemplateRegistry::transmon(),
        vec![QuasistaticFluxUpdate::NAME.to_string()],
        QubitRoster::new(qubits)?,
        connectivity,
    )
}

/// Identical transmons on every named qubit.
///
/// Two-qubit gates exist on every ordered pair unless `connectivity`
/// restricts them.
pub fn quick_setup(
    qubits: &[&str],
    connectivity: Option<&Connectivity>,
    config: &QubitConfig,
    rng: SharedRng,
) -> BuildResult<Setup> {
    let qubits = qubits
        .iter()
        .map(|name| -> BuildResult<Qubit> { Ok(Qubit::quantum(*name, config.to_params(&rng)?)) })
        .collect::<BuildResult<Vec<_>>>()?;
    transmon_setup(qubits, connectivity)
}

/// Transmons with individual parameters.
pub fn asymmetric_setup(
    qubits: &[(&str, QubitConfig)],
    connectivity: Option<&Connectivity>,
    rng: SharedRng,
) -> BuildResult<Setup> {
    let qubits = qubits
        .iter()
        .map(|(name, config)| -> BuildResult<Qubit> {
            Ok(Qubit::quantum(*name, config.to_params(&rng)?))
        })
        .collect::<BuildResult<Vec<_>>>()?;
    transmon_setup(qubits, connectivity)
}

/// Ideal gates of unit duration, each followed by depolarization with
/// probability `depol_noise`, over qubits that never decay.
///
/// Readout misreports with probability `readout_error`. Two-qubit gates
/// exist on every ordered pair.
pub fn depolarizing_setup(
    qubits: &[&str],
    depol_noise: f64,
    readout_error: f64,
    rng: SharedRng,
) -> BuildResult<Setup> {
    for (name, value) in [("depol_noise", depol_noise), ("readout_error", readout_error)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(BuildError::InvalidConfig(format!(
                "{name} must be a probability, got {value}"
            )));
        }
    }

    let qubits = qubits
        .iter()
        .map(|name| {
            let sampler = if readout_error > 0.0 {
                ReadoutSampler::new(readout_error, rng.clone())
            } else {
                ReadoutSampler::uniform(rng.clone())
            };
            Qubit::quantum(
                *name,
                QubitParams {
                    t1: Some(f64::INFINITY),
                    t2: Some(f64::INFINITY),
                    depol_noise: Some(depol_noise),
                    dummy_time: Some(1.0),
                    sampler: Some(sampler),
                    readout_error: Some(readout_error),
                    ..QubitParams::default()
                },
            )
        })
        .collect();
    Setup::new(
        TemplateRegistry::depolarizing(),
        Vec::new(),
        QubitRoster::new(qubits)?,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgName;
    use crate::gate_set::GateKey;
    use tempo_ir::seeded_rng;

    #[test]
    fn test_noisy_params() {
        let config = QubitConfig {
            scale: 2.0,
            ..QubitConfig::default()
        };
        let params = config.to_params(&seeded_rng(0)).unwrap();
        assert_eq!(params.t1, Some(15000.0));
        assert_eq!(params.p_dec_fin, Some(0.03));
        assert_eq!(params.msmt_time, Some(600.0));
        assert!((params.iswap_gate_time.unwrap() - 40.0 * SQRT_2).abs() < 1e-12);
        assert_eq!(params.quasistatic_flux, None);
        assert_eq!(params.sampler.unwrap().readout_error(), 0.005);
    }

    #[test]
    fn test_noiseless_params() {
        let params = QubitConfig::noiseless().to_params(&seeded_rng(0)).unwrap();
        assert_eq!(params.t1, Some(f64::INFINITY));
        assert_eq!(params.dephasing, Some(0.0));
        assert_eq!(params.readout_error, Some(0.0));
        assert_eq!(params.oneq_gate_time, Some(20.0));
        assert_eq!(params.sampler.unwrap().readout_error(), 0.0);
    }

    #[test]
    fn test_initial_flux_draw() {
        let config = QubitConfig {
            static_flux_std: Some(0.5),
            ..QubitConfig::default()
        };
        let a = config.to_params(&seeded_rng(9)).unwrap();
        let b = config.to_params(&seeded_rng(9)).unwrap();
        assert!(a.quasistatic_flux.is_some());
        assert_eq!(a.quasistatic_flux, b.quasistatic_flux);
    }

    #[test]
    fn test_yaml_partial_config() {
        let config = QubitConfig::from_yaml_str("t1: 20000\nCZ_gate_time: 60\n").unwrap();
        assert_eq!(config.t1, 20000.0);
        assert_eq!(config.cz_gate_time, 60.0);
        assert_eq!(config.t2, 30000.0);
        assert!(config.noise_flag);
    }

    #[test]
    fn test_json_config() {
        let config = QubitConfig::from_json_str(r#"{"noise_flag": false}"#).unwrap();
        assert_eq!(config, QubitConfig::noiseless());
    }

    #[test]
    fn test_invalid_config() {
        let bad = QubitConfig {
            readout_error: 1.5,
            ..QubitConfig::default()
        };
        assert!(matches!(bad.validate(), Err(BuildError::InvalidConfig(_))));
        assert!(QubitConfig::from_yaml_str("scale: 0").is_err());
    }

    #[test]
    fn test_asymmetric_setup() {
        let slow = QubitConfig {
            cz_gate_time: 80.0,
            ..QubitConfig::default()
        };
        let setup = asymmetric_setup(
            &[("a", QubitConfig::default()), ("b", slow)],
            None,
            seeded_rng(0),
        )
        .unwrap();
        let ab = setup.gate_set.get(&GateKey::new("CZ", &["a", "b"])).unwrap();
        let ba = setup.gate_set.get(&GateKey::new("CZ", &["b", "a"])).unwrap();
        assert_eq!(ab.builder_args.gate_time, Some(40.0));
        assert_eq!(ba.builder_args.gate_time, Some(80.0));
    }

    #[test]
    fn test_depolarizing_setup() {
        let setup = depolarizing_setup(&["a", "b"], 0.01, 0.0, seeded_rng(0)).unwrap();
        assert!(setup.update_rules.is_empty());

        let cnot = setup.gate_set.get(&GateKey::new("CNOT", &["b", "a"])).unwrap();
        assert_eq!(cnot.builder_args.gate_time, Some(1.0));
        assert_eq!(cnot.circuit_args.float(ArgName::DepolNoise), Some(0.01));

        let params = &setup.qubits.get("a").unwrap().params;
        assert_eq!(params.t1, Some(f64::INFINITY));
        assert_eq!(params.sampler.as_ref().unwrap().readout_error(), 0.0);
    }

    #[test]
    fn test_depolarizing_setup_rejects_bad_rates() {
        assert!(matches!(
            depolarizing_setup(&["a"], 1.5, 0.0, seeded_rng(0)),
            Err(BuildError::InvalidConfig(_))
        ));
        assert!(depolarizing_setup(&["a"], 0.1, f64::NAN, seeded_rng(0)).is_err());
    }
}

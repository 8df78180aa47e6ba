//! Update rules applied between circuit realizations.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use rustc_hash::FxHashMap;
use tempo_ir::{Operation, ParamKey};
use tracing::debug;

use crate::builder::Builder;
use crate::error::{BuildError, BuildResult};

/// A stochastic refresh of builder state, e.g. redrawing noise parameters
/// before the next realization of a circuit.
///
/// Rules are stored by name in persisted setups and resolved with
/// [`rule_by_name`].
pub trait UpdateRule: Send + Sync + fmt::Debug {
    /// Name under which the rule is persisted.
    fn name(&self) -> &'static str;

    /// Apply the rule to the builder and its current circuit.
    fn apply(&self, builder: &mut Builder, rng: &mut dyn RngCore) -> BuildResult<()>;
}

/// Redraws each qubit's quasistatic flux from `N(0, static_flux_std²)`.
///
/// Flux-sensitive Z rotations already in the circuit are rebound to the new
/// flux of their qubit, and gate-set entries that inherit the flux are
/// refreshed so later requests see it too.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuasistaticFluxUpdate;

impl QuasistaticFluxUpdate {
    pub const NAME: &'static str = "update_quasistatic_flux";
}

impl UpdateRule for QuasistaticFluxUpdate {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, builder: &mut Builder, rng: &mut dyn RngCore) -> BuildResult<()> {
        let mut fluxes = FxHashMap::default();
        for qubit in builder.qubits_mut().iter_mut().filter(|q| !q.classical) {
            if let Some(std) = qubit.params.static_flux_std {
                let z: f64 = StandardNormal.sample(&mut *rng);
                qubit.params.quasistatic_flux = Some(std * z);
            }
            if let Some(flux) = qubit.params.quasistatic_flux {
                fluxes.insert(qubit.name.clone(), flux);
            }
        }

        let mut rebound = 0;
        for op in builder
            .circuit_mut()
            .operations_mut()
            .iter_mut()
            .filter(|op| op.flux_sensitive)
        {
            let flux = op.bits.first().and_then(|q| fluxes.get(q));
            if let (Operation::RotateZ { angle, .. }, Some(flux)) = (&mut op.operation, flux) {
                *angle = *flux;
                rebound += 1;
            }
        }
        debug!(
            "Redrew flux on {} qubits, rebound {} rotations",
            fluxes.len(),
            rebound
        );

        builder.refresh_inherited(ParamKey::QuasistaticFlux)
    }
}

/// Resolve a persisted update-rule name.
pub fn rule_by_name(name: &str) -> BuildResult<Arc<dyn UpdateRule>> {
    match name {
        QuasistaticFluxUpdate::NAME => Ok(Arc::new(QuasistaticFluxUpdate)),
        other => Err(BuildError::UnknownUpdateRule(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgName;
    use crate::gate_set::GateKey;
    use crate::presets::{QubitConfig, quick_setup};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempo_ir::seeded_rng;

    fn flux_builder() -> Builder {
        let config = QubitConfig {
            static_flux_std: Some(0.1),
            high_frequency: true,
            ..QubitConfig::default()
        };
        let setup = quick_setup(&["a", "b"], None, &config, seeded_rng(3)).unwrap();
        Builder::new(setup).unwrap()
    }

    #[test]
    fn test_rule_lookup() {
        assert_eq!(
            rule_by_name("update_quasistatic_flux").unwrap().name(),
            QuasistaticFluxUpdate::NAME
        );
        assert!(matches!(
            rule_by_name("update_everything"),
            Err(BuildError::UnknownUpdateRule(_))
        ));
    }

    #[test]
    fn test_flux_rotations_follow_redraw() {
        let mut builder = flux_builder();
        builder
            .add_gate("CZ", &["a", "b"], Default::default())
            .unwrap();
        assert_eq!(builder.circuit().num_ops(), 2);

        let mut rng = StdRng::seed_from_u64(11);
        builder.update(&mut rng).unwrap();

        let flux = builder.qubits().get("a").unwrap().params.quasistatic_flux.unwrap();
        let rotation = builder
            .circuit()
            .operations()
            .iter()
            .find(|op| op.flux_sensitive)
            .unwrap();
        assert!(matches!(rotation.operation, Operation::RotateZ { angle, .. } if angle == flux));

        let entry = builder
            .gate_set()
            .get(&GateKey::new("CZ", &["a", "b"]))
            .unwrap();
        assert_eq!(entry.circuit_args.float(ArgName::QuasistaticFlux), Some(flux));
    }

    #[test]
    fn test_no_flux_std_is_a_no_op() {
        let setup = quick_setup(&["a", "b"], None, &QubitConfig::default(), seeded_rng(3)).unwrap();
        let mut builder = Builder::new(setup).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        builder.update(&mut rng).unwrap();
        assert!(builder.qubits().get("a").unwrap().params.quasistatic_flux.is_none());
    }
}

//! Persisted setups: JSON layout, reload and building from a reloaded setup.

use std::f64::consts::FRAC_PI_2;

use tempo_build::{
    ArgName, Builder, Connectivity, FinalizeOptions, GateArgs, GateKey, QubitConfig, Setup,
    asymmetric_setup, depolarizing_setup, quick_setup,
};
use tempo_ir::seeded_rng;

fn flux_config() -> QubitConfig {
    QubitConfig {
        static_flux_std: Some(0.05),
        high_frequency: true,
        ..QubitConfig::default()
    }
}

#[test]
fn test_json_round_trip() {
    let connectivity: Connectivity = serde_yaml_ng::from_str("a: [b]\nb: [c]\n").unwrap();
    let setup = quick_setup(&["a", "b", "c"], Some(&connectivity), &flux_config(), seeded_rng(3)).unwrap();

    let json = setup.to_json().unwrap();
    let loaded = Setup::from_json(&json, seeded_rng(4)).unwrap();

    assert_eq!(loaded.gate_set, setup.gate_set);
    assert_eq!(loaded.qubits, setup.qubits);
    assert_eq!(loaded.update_rules, setup.update_rules);
    assert_eq!(loaded.registry.library_names(), setup.registry.library_names());
    assert!(!loaded.gate_set.contains(&GateKey::new("CZ", &["a", "c"])));
}

#[test]
fn test_infinite_lifetimes_survive() {
    let setup = quick_setup(&["q"], None, &QubitConfig::noiseless(), seeded_rng(0)).unwrap();
    let loaded = Setup::from_json(&setup.to_json().unwrap(), seeded_rng(0)).unwrap();
    let params = &loaded.qubits.get("q").unwrap().params;
    assert_eq!(params.t1, Some(f64::INFINITY));
    assert_eq!(params.t2, Some(f64::INFINITY));
}

#[test]
fn test_depolarizing_round_trip() {
    let setup = depolarizing_setup(&["a", "b"], 0.02, 0.01, seeded_rng(6)).unwrap();
    let json = setup.to_json().unwrap();
    let loaded = Setup::from_json(&json, seeded_rng(6)).unwrap();

    assert_eq!(loaded.gate_set, setup.gate_set);
    assert_eq!(loaded.registry.library_names(), setup.registry.library_names());
    let params = &loaded.qubits.get("a").unwrap().params;
    assert_eq!(params.depol_noise, Some(0.02));
    assert_eq!(params.dummy_time, Some(1.0));

    let mut builder = Builder::new(loaded).unwrap();
    builder.add_lines(["CNOT a b", "measure a -> m;"]).unwrap();
    assert_eq!(builder.clock("a"), Some(2.0));
    assert_eq!(builder.clock("b"), Some(1.0));
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join(format!("tempo-setup-{}.json", std::process::id()));
    let setup = asymmetric_setup(
        &[("a", QubitConfig::default()), ("b", QubitConfig::noiseless())],
        None,
        seeded_rng(8),
    )
    .unwrap();

    setup.save(&path).unwrap();
    let loaded = Setup::load(&path, seeded_rng(8)).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.gate_set, setup.gate_set);
    let b = loaded.qubits.get("b").unwrap();
    assert_eq!(b.params.sampler.as_ref().unwrap().readout_error(), 0.0);
}

#[test]
fn test_builder_from_reloaded_setup() {
    let setup = quick_setup(&["q", "r"], None, &flux_config(), seeded_rng(5)).unwrap();
    let loaded = Setup::from_json(&setup.to_json().unwrap(), seeded_rng(6)).unwrap();
    let mut builder = Builder::new(loaded).unwrap();

    builder
        .add_gate("RY", &["q"], GateArgs::new().with(ArgName::Angle, FRAC_PI_2))
        .unwrap();
    builder.add_gate("CZ", &["q", "r"], GateArgs::new()).unwrap();
    builder
        .add_gate("Measure", &["q"], GateArgs::new().with(ArgName::OutputBit, "m"))
        .unwrap();
    let duration = builder.finalize(FinalizeOptions::default()).unwrap();
    assert_eq!(duration, 660.0);

    let saved = builder.setup();
    assert_eq!(saved.update_rules, ["update_quasistatic_flux"]);
    assert_eq!(saved.gate_set, builder.gate_set().clone());
}

#[test]
fn test_malformed_json() {
    let result = Setup::from_json("{\"gate_dic\": {}}", seeded_rng(0));
    assert!(matches!(result, Err(tempo_build::BuildError::Json(_))));

    let unknown = r#"{"gate_dic": {"T": "TGate"}, "update_rules": [], "qubit_dic": [], "gate_set": []}"#;
    assert!(matches!(
        Setup::from_json(unknown, seeded_rng(0)),
        Err(tempo_build::BuildError::UnknownGate(_))
    ));
}

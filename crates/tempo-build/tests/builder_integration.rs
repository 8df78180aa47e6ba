//! End-to-end tests: requests through the builder into the density-matrix
//! backend.

use std::f64::consts::{FRAC_PI_2, PI};

use proptest::prelude::*;
use std::collections::BTreeMap;

use tempo_adapter_dm::{ControlOp, Controller, DensityMatrixBackend, SimState};
use tempo_build::{
    ArgName, BuildError, Builder, Connectivity, FinalizeOptions, GateArgs, GateKey, Lifetimes,
    QubitConfig,
    RequestItem, Setup, TemplateRegistry, asymmetric_setup, depolarizing_setup, quick_setup,
};
use tempo_ir::{
    Backend, BitKind, IrError, Operation, Qubit, QubitParams, QubitRoster, seeded_rng,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn builder(qubits: &[&str], config: &QubitConfig) -> Builder {
    init_tracing();
    let setup = quick_setup(qubits, None, config, seeded_rng(42)).unwrap();
    Builder::new(setup).unwrap()
}

fn angle(value: f64) -> GateArgs {
    GateArgs::new().with(ArgName::Angle, value)
}

fn simulate(builder: &mut Builder) -> SimState {
    builder.finalize(FinalizeOptions::default()).unwrap();
    let backend = DensityMatrixBackend::new();
    let mut state = backend.prepare(builder.circuit()).unwrap();
    backend.apply(builder.circuit(), &mut state).unwrap();
    state
}

fn add_bell(builder: &mut Builder) {
    builder.add_gate("RY", &["swap"], angle(FRAC_PI_2)).unwrap();
    builder.add_gate("RY", &["cp"], angle(FRAC_PI_2)).unwrap();
    builder.add_gate("CZ", &["cp", "swap"], GateArgs::new()).unwrap();
    builder.add_gate("RY", &["cp"], angle(-FRAC_PI_2)).unwrap();
}

// ============================================================================
// Bell states
// ============================================================================

#[test]
fn test_ideal_bell_state() {
    let mut builder = builder(&["swap", "cp"], &QubitConfig::noiseless());
    builder.begin_circuit("bell", Lifetimes::default()).unwrap();
    add_bell(&mut builder);

    let state = simulate(&mut builder);
    let diag = state.diagonal();
    let expected = [0.5, 0.0, 0.0, 0.5];
    for (got, want) in diag.iter().zip(expected) {
        assert!((got - want).abs() < 1e-10, "diagonal {diag:?}");
    }
}

#[test]
fn test_noisy_bell_state() {
    let mut builder = builder(&["swap", "cp"], &QubitConfig::default());
    add_bell(&mut builder);

    let diag = simulate(&mut builder).diagonal();
    assert!((diag[0] - 0.5).abs() < 1e-2, "diagonal {diag:?}");
    assert!((diag[3] - 0.5).abs() < 1e-2, "diagonal {diag:?}");
    assert!(diag[1] < 3e-2 && diag[2] < 3e-2, "diagonal {diag:?}");
}

#[test]
fn test_text_requests() {
    let mut builder = builder(&["swap", "cp"], &QubitConfig::noiseless());
    builder
        .add_lines([
            "Ry 1.57079632679 swap",
            "Ry 1.57079632679 cp",
            "",
            "CZ cp swap",
            "Ry -1.57079632679 cp",
        ])
        .unwrap();
    assert_eq!(builder.log().len(), 4);

    let diag = simulate(&mut builder).diagonal();
    assert!((diag[0] - 0.5).abs() < 1e-9);
    assert!((diag[3] - 0.5).abs() < 1e-9);
}

#[test]
fn test_flat_requests() {
    let mut builder = builder(&["swap", "cp"], &QubitConfig::noiseless());
    let requests: [Vec<RequestItem>; 4] = [
        vec!["Ry".into(), "swap".into(), FRAC_PI_2.into()],
        vec!["Ry".into(), "cp".into(), FRAC_PI_2.into()],
        vec!["CZ".into(), "cp".into(), "swap".into()],
        vec!["Ry".into(), "cp".into(), (-FRAC_PI_2).into()],
    ];
    for request in &requests {
        builder.add_flat(request).unwrap();
    }

    let diag = simulate(&mut builder).diagonal();
    assert!((diag[0] - 0.5).abs() < 1e-10);
    assert!((diag[3] - 0.5).abs() < 1e-10);
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_clocks_and_timestamps() {
    let mut builder = builder(&["a", "b"], &QubitConfig::noiseless());
    let ry = builder.add_gate("RY", &["a"], angle(1.0)).unwrap();
    assert_eq!(builder.circuit().operation(ry[0]).unwrap().time, 10.0);

    let cz = builder.add_gate("CZ", &["b", "a"], GateArgs::new()).unwrap();
    assert_eq!(cz.len(), 1);
    // Starts when `a` is free, at the window midpoint.
    assert_eq!(builder.circuit().operation(cz[0]).unwrap().time, 40.0);
    assert_eq!(builder.clock("a"), Some(60.0));
    assert_eq!(builder.clock("b"), Some(60.0));
}

#[test]
fn test_begin_circuit_starts_fresh_session() {
    let mut builder = builder(&["a"], &QubitConfig::noiseless());
    builder.add_gate("RX", &["a"], angle(PI)).unwrap();
    builder.begin_circuit("second", Lifetimes::default()).unwrap();

    assert_eq!(builder.clock("a"), Some(0.0));
    assert!(builder.log().is_empty());
    assert!(builder.circuit().is_empty());
    assert_eq!(builder.circuit().title(), "second");
}

#[test]
fn test_call_site_lifetimes() {
    init_tracing();
    let params = QubitParams {
        oneq_gate_time: Some(20.0),
        ..QubitParams::default()
    };
    let qubits = QubitRoster::new(vec![
        Qubit::quantum("a", params),
        Qubit::classical("m"),
    ])
    .unwrap();
    let setup = Setup::new(TemplateRegistry::transmon(), vec![], qubits, None).unwrap();
    let mut builder = Builder::new(setup).unwrap();
    builder
        .begin_circuit("lifetimes", Lifetimes::new(100.0, 200.0))
        .unwrap();

    let bit = builder.circuit().bit("a").unwrap();
    assert_eq!(bit.kind, BitKind::Quantum { t1: 100.0, t2: 200.0 });
    assert_eq!(builder.circuit().bit("m").unwrap().kind, BitKind::Classical);
    assert_eq!(builder.clock("m"), None);
}

// ============================================================================
// Failed requests
// ============================================================================

#[test]
fn test_connectivity_gap() {
    init_tracing();
    let connectivity = Connectivity::linear(&["a", "b", "c"]);
    let setup = quick_setup(
        &["a", "b", "c"],
        Some(&connectivity),
        &QubitConfig::noiseless(),
        seeded_rng(1),
    )
    .unwrap();
    let mut builder = Builder::new(setup).unwrap();
    builder.add_gate("RY", &["a"], angle(1.0)).unwrap();

    let result = builder.add_gate("CZ", &["a", "c"], GateArgs::new());
    assert!(matches!(result, Err(BuildError::UnknownInstance { .. })));
    assert_eq!(builder.clock("a"), Some(20.0));
    assert_eq!(builder.clock("c"), Some(0.0));
    assert_eq!(builder.circuit().num_ops(), 1);

    builder.add_gate("CZ", &["b", "c"], GateArgs::new()).unwrap();
}

#[test]
fn test_failed_requests_leave_no_trace() {
    let mut builder = builder(&["a"], &QubitConfig::noiseless());
    builder.add_gate("RX", &["a"], angle(1.0)).unwrap();

    let missing = builder.add_gate("RY", &["a"], GateArgs::new());
    assert!(matches!(missing, Err(BuildError::MalformedRequest { .. })));

    let foreign = builder.add_gate("RZ", &["a"], GateArgs::new().with(ArgName::Phi, 1.0));
    assert!(matches!(foreign, Err(BuildError::MalformedRequest { .. })));

    let unknown = builder.add_gate("Toffoli", &["a"], GateArgs::new());
    assert!(matches!(unknown, Err(BuildError::UnknownGate(_))));

    assert!(builder.add_lines(["Ry a"]).is_err());

    assert_eq!(builder.log().len(), 1);
    assert_eq!(builder.circuit().num_ops(), 1);
    assert_eq!(builder.clock("a"), Some(20.0));
}

#[test]
fn test_flux_needs_high_frequency_qubit() {
    let config = QubitConfig {
        static_flux_std: Some(0.1),
        ..QubitConfig::default()
    };
    let mut builder = builder(&["a", "b"], &config);

    let low = GateArgs::new().with(ArgName::HighFrequency, false);
    let result = builder.add_gate("CZ", &["a", "b"], low);
    assert!(matches!(
        result,
        Err(BuildError::FluxRequiresHighFrequency { qubit }) if qubit == "a"
    ));
    assert!(builder.circuit().is_empty());
    assert!(builder.log().is_empty());
    assert_eq!(builder.clock("a"), Some(0.0));

    // Without an explicit override the flux rotation follows the CZ.
    let indices = builder.add_gate("CZ", &["a", "b"], GateArgs::new()).unwrap();
    assert_eq!(indices, [0, 1]);
    assert!(builder.circuit().operations()[1].flux_sensitive);
}

#[test]
fn test_cnot_across_low_and_high_frequency_qubits() {
    init_tracing();
    let lo = QubitConfig {
        static_flux_std: Some(0.01),
        high_frequency: false,
        ..QubitConfig::default()
    };
    let hi = QubitConfig {
        high_frequency: true,
        ..QubitConfig::default()
    };
    let setup = asymmetric_setup(&[("lo", lo), ("hi", hi)], None, seeded_rng(5)).unwrap();
    let mut builder = Builder::new(setup).unwrap();

    builder.add_lines(["CNOT lo hi"]).unwrap();
    assert_eq!(builder.circuit().num_ops(), 4);
    assert_eq!(builder.clock("lo"), Some(60.0));
    assert_eq!(builder.clock("hi"), Some(80.0));

    let flux: Vec<_> = builder
        .circuit()
        .operations()
        .iter()
        .filter(|op| op.flux_sensitive)
        .collect();
    assert_eq!(flux.len(), 1);
    assert!(flux[0].acts_on("lo"));
}

#[test]
fn test_failed_composite_keeps_completed_sub_requests() {
    init_tracing();
    let lo = QubitConfig {
        static_flux_std: Some(0.01),
        ..QubitConfig::default()
    };
    let setup = asymmetric_setup(
        &[("lo", lo), ("hi", QubitConfig::default())],
        None,
        seeded_rng(5),
    )
    .unwrap();
    let mut builder = Builder::new(setup).unwrap();
    builder
        .gate_set_mut()
        .get_mut(&GateKey::new("CZ", &["lo", "hi"]))
        .unwrap()
        .circuit_args
        .insert(ArgName::HighFrequency, false);

    let result = builder.add_lines(["CNOT lo hi"]);
    assert!(matches!(
        result,
        Err(BuildError::FluxRequiresHighFrequency { qubit }) if qubit == "lo"
    ));
    // The leading RY on the target stays, with its clock advance.
    assert_eq!(builder.circuit().num_ops(), 1);
    assert_eq!(builder.clock("hi"), Some(20.0));
    assert_eq!(builder.clock("lo"), Some(0.0));
    assert!(builder.log().is_empty());
}

// ============================================================================
// Composite gates
// ============================================================================

#[test]
fn test_cnot_flips_target() {
    let mut builder = builder(&["c", "t"], &QubitConfig::noiseless());
    builder.add_lines(["X c", "CNOT c t"]).unwrap();
    assert_eq!(builder.log().len(), 2);
    assert_eq!(builder.clock("c"), Some(60.0));
    assert_eq!(builder.clock("t"), Some(80.0));

    let diag = simulate(&mut builder).diagonal();
    assert!((diag[3] - 1.0).abs() < 1e-10, "diagonal {diag:?}");
}

#[test]
fn test_composite_expansion_is_deterministic() {
    let requests = ["Had a", "CRX 0.7 a b", "CNOT b a"];

    let mut first = builder(&["a", "b"], &QubitConfig::default());
    first.add_lines(requests).unwrap();
    let mut second = builder(&["a", "b"], &QubitConfig::default());
    second.add_lines(requests).unwrap();

    assert_eq!(first.circuit().operations(), second.circuit().operations());
    assert_eq!(first.clocks(), second.clocks());
    assert_eq!(first.log().len(), 3);
}

#[test]
fn test_replay_reproduces_circuit() {
    let mut builder = builder(&["swap", "cp"], &QubitConfig::default());
    add_bell(&mut builder);
    let ops = builder.circuit().operations().to_vec();
    let log = builder.log().to_vec();

    builder.replay("again", Lifetimes::default(), &log).unwrap();
    assert_eq!(builder.circuit().operations(), ops.as_slice());
    assert_eq!(builder.log(), log.as_slice());
}

// ============================================================================
// Depolarizing model
// ============================================================================

#[test]
fn test_depolarizing_bell_state() {
    init_tracing();
    let setup = depolarizing_setup(&["a", "b"], 0.0, 0.0, seeded_rng(3)).unwrap();
    let mut builder = Builder::new(setup).unwrap();
    builder.add_lines(["H a", "CNOT a b"]).unwrap();
    assert_eq!(builder.clock("a"), Some(2.0));
    assert_eq!(builder.clock("b"), Some(2.0));

    let diag = simulate(&mut builder).diagonal();
    let expected = [0.5, 0.0, 0.0, 0.5];
    for (got, want) in diag.iter().zip(expected) {
        assert!((got - want).abs() < 1e-10, "diagonal {diag:?}");
    }
}

#[test]
fn test_depolarizing_noise_after_gate() {
    init_tracing();
    let setup = depolarizing_setup(&["q"], 0.3, 0.0, seeded_rng(3)).unwrap();
    let mut builder = Builder::new(setup).unwrap();
    let indices = builder.add_gate("X", &["q"], GateArgs::new()).unwrap();
    assert_eq!(indices.len(), 2);
    assert!(matches!(
        builder.circuit().operations()[1].operation,
        Operation::Depolarize { probability } if probability == 0.3
    ));

    let diag = simulate(&mut builder).diagonal();
    assert!((diag[1] - 0.85).abs() < 1e-10, "diagonal {diag:?}");
}

// ============================================================================
// Adjustable gates
// ============================================================================

#[test]
fn test_adjustable_rotation_after_finalize() {
    let mut builder = builder(&["q"], &QubitConfig::noiseless());
    builder.add_gate("RX", &["q"], angle(0.0)).unwrap();
    let rotation = builder.add_gate("RX", &["q"], angle(0.0)).unwrap();
    builder.add_lines(["measure q -> m;"]).unwrap();
    builder.finalize(FinalizeOptions::default().topological()).unwrap();

    let adjustable = builder.finalized_indices(&rotation).unwrap();
    let op = &builder.circuit().operations()[adjustable[0]];
    assert_eq!(op.time, 30.0);
    assert!(builder.finalized_indices(&[99]).is_none());

    let circuits = BTreeMap::from([("rx".to_string(), builder.circuit().clone())]);
    let mut ctl = Controller::new(vec!["q".into()], vec!["m".into()], circuits)
        .unwrap()
        .with_adjustable_gates("rx", adjustable)
        .unwrap();

    let records = ctl
        .apply_op_list(&[ControlOp::RunWith("rx".into(), vec![PI]), ControlOp::Record])
        .unwrap();
    assert_eq!(records, vec![vec![1]]);

    ctl.reset_state().unwrap();
    let records = ctl
        .apply_op_list(&[ControlOp::RunWith("rx".into(), vec![0.0]), ControlOp::Record])
        .unwrap();
    assert_eq!(records, vec![vec![0]]);
}

// ============================================================================
// Measurement
// ============================================================================

#[test]
fn test_measurement_creates_bits() {
    let mut builder = builder(&["q"], &QubitConfig::noiseless());
    builder.add_lines(["X q", "measure q -> m0;"]).unwrap();
    assert!(builder.circuit().has_bit("m0"));

    let state = simulate(&mut builder);
    assert_eq!(state.bit("m0"), Some(1));
}

#[test]
fn test_measurement_with_real_output_bit() {
    let mut builder = builder(&["q"], &QubitConfig::noiseless());
    let args = GateArgs::new()
        .with(ArgName::OutputBit, "declared")
        .with(ArgName::RealOutputBit, "real");
    builder.add_gate("Measure", &["q"], args).unwrap();

    assert!(builder.circuit().has_bit("declared"));
    assert!(builder.circuit().has_bit("real"));
    let state = simulate(&mut builder);
    assert_eq!(state.bit("declared"), Some(0));
    assert_eq!(state.bit("real"), Some(0));
}

#[test]
fn test_noisy_measurement_butterflies() {
    let mut builder = builder(&["q"], &QubitConfig::default());
    let indices = builder
        .add_gate("Measure", &["q"], GateArgs::new().with(ArgName::OutputBit, "m"))
        .unwrap();
    assert_eq!(indices.len(), 3);

    let ops = builder.circuit().operations();
    assert!(matches!(ops[0].operation, Operation::Butterfly { .. }));
    assert!(matches!(ops[1].operation, Operation::Measure { .. }));
    assert!(matches!(ops[2].operation, Operation::Butterfly { .. }));
    let times: Vec<f64> = ops.iter().map(|op| op.time).collect();
    assert_eq!(times, [0.0, 150.0, 300.0]);
    assert_eq!(builder.clock("q"), Some(600.0));
}

#[test]
fn test_measurement_onto_qubit_name_fails() {
    let mut builder = builder(&["q", "p"], &QubitConfig::noiseless());
    let result = builder.add_gate("Measure", &["q"], GateArgs::new().with(ArgName::OutputBit, "p"));
    assert!(matches!(
        result,
        Err(BuildError::Ir(IrError::DuplicateBit(name))) if name == "p"
    ));
}

// ============================================================================
// Clock invariants
// ============================================================================

#[derive(Debug, Clone)]
enum Request {
    Rotation(usize, f64),
    Cz(usize, usize),
    Hadamard(usize),
    Measure(usize),
}

fn arb_request() -> impl Strategy<Value = Request> {
    prop_oneof![
        (0..3usize, -PI..PI).prop_map(|(q, a)| Request::Rotation(q, a)),
        (0..3usize, 0..3usize).prop_map(|(a, b)| Request::Cz(a, b)),
        (0..3usize).prop_map(Request::Hadamard),
        (0..3usize).prop_map(Request::Measure),
    ]
}

const QUBITS: [&str; 3] = ["q0", "q1", "q2"];

proptest! {
    #[test]
    fn clocks_never_decrease(requests in prop::collection::vec(arb_request(), 1..20)) {
        let setup = quick_setup(&QUBITS, None, &QubitConfig::noiseless(), seeded_rng(7)).unwrap();
        let mut builder = Builder::new(setup).unwrap();

        for request in requests {
            let before = builder.clocks().clone();
            let (qubits, result) = match request {
                Request::Rotation(q, a) => (vec![QUBITS[q]], builder.add_gate("RY", &[QUBITS[q]], angle(a))),
                Request::Cz(a, b) if a != b => {
                    let qs = vec![QUBITS[a], QUBITS[b]];
                    let result = builder.add_gate("CZ", &qs, GateArgs::new());
                    (qs, result)
                }
                Request::Cz(..) => continue,
                Request::Hadamard(q) => (vec![QUBITS[q]], builder.add_gate("H", &[QUBITS[q]], GateArgs::new())),
                Request::Measure(q) => {
                    let args = GateArgs::new().with(ArgName::OutputBit, format!("m{q}"));
                    (vec![QUBITS[q]], builder.add_gate("Measure", &[QUBITS[q]], args))
                }
            };
            let indices = result.unwrap();

            for (name, clock) in builder.clocks() {
                prop_assert!(*clock >= before[name]);
            }
            let start = qubits.iter().map(|q| before[*q]).fold(0.0, f64::max);
            for index in indices {
                prop_assert!(builder.circuit().operation(index).unwrap().time >= start);
            }
        }
    }
}

//! Property tests for timeline closure and ordering.

use proptest::prelude::*;
use tempo_ir::{Circuit, Operation, ScheduledOp};

fn circuit_with(times: &[(usize, f64)]) -> Circuit {
    let mut circuit = Circuit::new("props");
    for q in 0..3 {
        circuit.add_qubit(format!("q{q}"), 1000.0, 800.0).unwrap();
    }
    for &(q, t) in times {
        let op = Operation::RotateZ {
            angle: 0.5,
            dephasing: 0.0,
        };
        circuit
            .add_operation(ScheduledOp::new(op, vec![format!("q{q}")], t))
            .unwrap();
    }
    circuit
}

proptest! {
    #[test]
    fn idles_cover_the_window(
        times in prop::collection::vec((0usize..3, 0.0f64..100.0), 0..20),
    ) {
        let mut circuit = circuit_with(&times);
        circuit.add_waiting_gates(0.0, 100.0);

        for q in 0..3 {
            let name = format!("q{q}");
            let idle: f64 = circuit
                .operations()
                .iter()
                .filter(|op| op.acts_on(&name))
                .filter_map(|op| match op.operation {
                    Operation::Idle { duration } => Some(duration),
                    _ => None,
                })
                .sum();
            prop_assert!((idle - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn topological_order_is_time_sorted(
        times in prop::collection::vec((0usize..3, 0.0f64..100.0), 1..20),
    ) {
        let mut circuit = circuit_with(&times);
        circuit.add_waiting_gates(0.0, 100.0);
        let before = circuit.num_ops();
        circuit.order().unwrap();

        prop_assert_eq!(circuit.num_ops(), before);
        let ts: Vec<f64> = circuit.operations().iter().map(|op| op.time).collect();
        prop_assert!(ts.windows(2).all(|w| w[0] <= w[1]));
    }
}

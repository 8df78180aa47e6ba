//! Insertions that control their own emission.

use tempo_ir::{Operation, ScheduledOp, Value};
use tracing::debug;

use crate::args::ArgName;
use crate::builder::Builder;
use crate::error::{BuildError, BuildResult};
use crate::template::{GateCall, Insertion};

/// Relative delay of the flux Z rotation after its controlled phase.
pub const FLUX_DELAY: f64 = 1e-6;

/// Controlled phase on a flux-tuned pair.
///
/// When the first qubit carries a quasistatic flux, a flux-sensitive Z
/// rotation by that flux is emitted on it just after the phase gate. Update
/// rules later rebind its angle.
#[derive(Debug, Clone, Copy)]
pub struct FluxCPhase {
    /// `Some(pi)` for CZ; `None` takes the caller's `angle`.
    pub fixed_angle: Option<f64>,
}

impl Insertion for FluxCPhase {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let angle = match self.fixed_angle {
            Some(angle) => angle,
            None => call.float(ArgName::Angle)?,
        };
        let flux = call.args.float(ArgName::QuasistaticFlux);
        let high_frequency = call.args.get(ArgName::HighFrequency).and_then(Value::as_bool);
        if flux.is_some() && high_frequency == Some(false) {
            return Err(BuildError::FluxRequiresHighFrequency {
                qubit: call.qubits[0].clone(),
            });
        }

        builder.emit(ScheduledOp::new(
            Operation::CPhase {
                angle,
                dephase_var: call.float_or_zero(ArgName::DephaseVar),
            },
            call.qubits.clone(),
            call.time,
        ))?;

        if let Some(flux) = flux {
            debug!("Flux rotation {:.4} on {}", flux, call.qubits[0]);
            builder.emit(
                ScheduledOp::new(
                    Operation::RotateZ {
                        angle: flux,
                        dephasing: 0.0,
                    },
                    vec![call.qubits[0].clone()],
                    call.time * (1.0 + FLUX_DELAY),
                )
                .with_flux_sensitivity(),
            )?;
        }
        Ok(())
    }
}

/// Readout with butterfly decay before and after.
///
/// The pre-readout butterfly sits at the window start, the measurement at
/// `interval_time` after it and the post-readout butterfly one interval
/// later. Butterflies with zero total probability are skipped. Output bits
/// are registered on first use.
#[derive(Debug, Clone, Copy)]
pub struct Measurement;

impl Insertion for Measurement {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        let output_bit = call.text(ArgName::OutputBit)?.to_string();
        let real_output_bit = call.args.text(ArgName::RealOutputBit).map(str::to_string);
        builder.ensure_classical_bit(&output_bit)?;
        if let Some(real) = &real_output_bit {
            builder.ensure_classical_bit(real)?;
        }

        let interval = call.float_or_zero(ArgName::IntervalTime);
        let qubit = vec![call.qubits[0].clone()];

        let (p_exc, p_dec) = (
            call.float_or_zero(ArgName::PExcInit),
            call.float_or_zero(ArgName::PDecInit),
        );
        if p_exc + p_dec > 0.0 {
            builder.emit(ScheduledOp::new(
                Operation::Butterfly { p_exc, p_dec },
                qubit.clone(),
                call.time,
            ))?;
        }

        let sampler = call.args.get(ArgName::Sampler).and_then(Value::as_sampler).cloned();
        builder.emit(ScheduledOp::new(
            Operation::Measure {
                output_bit,
                real_output_bit,
                sampler,
            },
            qubit.clone(),
            call.time + interval,
        ))?;

        let (p_exc, p_dec) = (
            call.float_or_zero(ArgName::PExcFin),
            call.float_or_zero(ArgName::PDecFin),
        );
        if p_exc + p_dec > 0.0 {
            builder.emit(ScheduledOp::new(
                Operation::Butterfly { p_exc, p_dec },
                qubit,
                call.time + 2.0 * interval,
            ))?;
        }
        Ok(())
    }
}

/// Timed reset into the residual-excitation mixture.
#[derive(Debug, Clone, Copy)]
pub struct Reset;

impl Insertion for Reset {
    fn insert(&self, builder: &mut Builder, call: &GateCall) -> BuildResult<()> {
        builder.emit(ScheduledOp::new(
            Operation::Reset {
                population: call.float_or_zero(ArgName::Population),
            },
            call.qubits.clone(),
            call.time,
        ))?;
        Ok(())
    }
}

//! Readout sampling and caller-owned random sources.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{IrError, IrResult};

/// A random source shared between samplers and update rules.
///
/// Always created by the caller from an explicit seed; nothing in this
/// workspace falls back to entropy or a global generator.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Create a [`SharedRng`] from a seed.
pub fn seeded_rng(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(StdRng::seed_from_u64(seed)))
}

/// Result of a single readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Bit reported to the experimenter (after readout error).
    pub declared: u8,
    /// State the qubit was projected into.
    pub projected: u8,
}

/// Uniformly noisy readout: the qubit is projected according to the Born
/// probability, then the reported bit is flipped with `readout_error`.
#[derive(Clone)]
pub struct ReadoutSampler {
    readout_error: f64,
    rng: Option<SharedRng>,
}

impl ReadoutSampler {
    /// Create a sampler with the given readout error.
    pub fn new(readout_error: f64, rng: SharedRng) -> Self {
        Self {
            readout_error,
            rng: Some(rng),
        }
    }

    /// A sampler that never misreports.
    pub fn uniform(rng: SharedRng) -> Self {
        Self::new(0.0, rng)
    }

    /// A placeholder restored from a persisted record. It must be re-attached
    /// before it can sample.
    pub fn detached() -> Self {
        Self {
            readout_error: 0.0,
            rng: None,
        }
    }

    /// Probability of flipping the reported bit.
    pub fn readout_error(&self) -> f64 {
        self.readout_error
    }

    /// Whether a random source is attached.
    pub fn is_attached(&self) -> bool {
        self.rng.is_some()
    }

    /// Sample one readout given the probability of finding the qubit in `|1>`.
    pub fn sample(&self, p_one: f64) -> IrResult<Outcome> {
        let rng = self.rng.as_ref().ok_or(IrError::DetachedSampler)?;
        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);

        let projected = u8::from(rng.r#gen::<f64>() < p_one.clamp(0.0, 1.0));
        let flipped = rng.r#gen::<f64>() < self.readout_error;
        Ok(Outcome {
            declared: projected ^ u8::from(flipped),
            projected,
        })
    }
}

impl fmt::Debug for ReadoutSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadoutSampler")
            .field("readout_error", &self.readout_error)
            .field("attached", &self.is_attached())
            .finish()
    }
}

// Random state is not part of a sampler's identity.
impl PartialEq for ReadoutSampler {
    fn eq(&self, other: &Self) -> bool {
        self.readout_error == other.readout_error
    }
}

/// Serde adapter that stores an optional sampler as a boolean marker.
pub(crate) mod marker {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ReadoutSampler;

    pub fn serialize<S: Serializer>(
        sampler: &Option<ReadoutSampler>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(sampler.is_some())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ReadoutSampler>, D::Error> {
        let present = Option::<bool>::deserialize(deserializer)?.unwrap_or(false);
        Ok(present.then(ReadoutSampler::detached))
    }
}

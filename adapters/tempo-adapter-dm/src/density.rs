//! Dense density-matrix state.

use ndarray::Array2;
use num_complex::Complex64;

use crate::channels::Matrix;

/// A `2^n x 2^n` density matrix.
///
/// Qubit 0 is the most significant bit of the basis index, so the diagonal
/// of a two-qubit state reads `[|00>, |01>, |10>, |11>]` with the first
/// qubit on the left.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    rho: Array2<Complex64>,
}

impl DensityMatrix {
    /// Create the all-zero pure state.
    pub fn new(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut rho = Array2::zeros((dim, dim));
        rho[[0, 0]] = Complex64::new(1.0, 0.0);
        Self { num_qubits, rho }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// The raw matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.rho
    }

    #[inline]
    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    /// Index into a local operator for the bits of `index` on `targets`.
    fn local_index(&self, index: usize, targets: &[usize]) -> usize {
        targets.iter().fold(0, |acc, &q| {
            (acc << 1) | usize::from(index & self.mask(q) != 0)
        })
    }

    /// Lift a local operator on `targets` to the full register.
    fn embed(&self, targets: &[usize], op: &Matrix) -> Matrix {
        let target_mask = targets.iter().fold(0, |acc, &q| acc | self.mask(q));
        let dim = self.dim();
        let mut full = Array2::zeros((dim, dim));
        for i in 0..dim {
            for j in 0..dim {
                if i & !target_mask == j & !target_mask {
                    full[[i, j]] = op[[self.local_index(i, targets), self.local_index(j, targets)]];
                }
            }
        }
        full
    }

    /// `rho -> U rho U^dagger`.
    pub fn apply_unitary(&mut self, targets: &[usize], unitary: &Matrix) {
        let u = self.embed(targets, unitary);
        let u_dag = u.t().mapv(|c| c.conj());
        self.rho = u.dot(&self.rho).dot(&u_dag);
    }

    /// `rho -> sum_k K rho K^dagger`.
    pub fn apply_kraus(&mut self, targets: &[usize], kraus: &[Matrix]) {
        let dim = self.dim();
        let mut out = Array2::<Complex64>::zeros((dim, dim));
        for k in kraus {
            let k = self.embed(targets, k);
            let k_dag = k.t().mapv(|c| c.conj());
            out = out + k.dot(&self.rho).dot(&k_dag);
        }
        self.rho = out;
    }

    /// Populations of the computational basis states.
    pub fn diagonal(&self) -> Vec<f64> {
        self.rho.diag().iter().map(|c| c.re).collect()
    }

    pub fn trace(&self) -> f64 {
        self.diagonal().iter().sum()
    }

    /// Probability of finding `qubit` in `|1>`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = self.mask(qubit);
        let p: f64 = self
            .diagonal()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, p)| p)
            .sum();
        p / self.trace()
    }

    /// Marginal distribution over `qubits`, indexed with `qubits[0]` as the
    /// most significant bit.
    pub fn marginal(&self, qubits: &[usize]) -> Vec<f64> {
        let mut probs = vec![0.0; 1 << qubits.len()];
        for (i, p) in self.diagonal().into_iter().enumerate() {
            probs[self.local_index(i, qubits)] += p;
        }
        probs
    }

    /// Project `qubit` onto `|outcome>` and renormalize.
    ///
    /// Returns `false` without touching the state if the outcome has zero
    /// probability.
    pub fn project(&mut self, qubit: usize, outcome: u8) -> bool {
        let mask = self.mask(qubit);
        let keep = |i: usize| (i & mask != 0) == (outcome == 1);
        let norm: f64 = self
            .diagonal()
            .iter()
            .enumerate()
            .filter(|&(i, _)| keep(i))
            .map(|(_, p)| p)
            .sum();
        if norm <= f64::EPSILON {
            return false;
        }

        for ((i, j), value) in self.rho.indexed_iter_mut() {
            if keep(i) && keep(j) {
                *value /= norm;
            } else {
                *value = Complex64::new(0.0, 0.0);
            }
        }
        true
    }
}

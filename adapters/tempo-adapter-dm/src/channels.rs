//! Unitaries and Kraus channels of the native operations.
//!
//! Multi-qubit matrices use the first listed qubit as the most significant
//! index, i.e. `U = kron(U_q0, U_q1)` for product operators.

use ndarray::{Array2, array};
use num_complex::Complex64;

/// A dense complex matrix.
pub type Matrix = Array2<Complex64>;

fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn im(x: f64) -> Complex64 {
    Complex64::new(0.0, x)
}

pub fn identity(dim: usize) -> Matrix {
    Array2::eye(dim)
}

pub fn pauli_x() -> Matrix {
    array![[re(0.0), re(1.0)], [re(1.0), re(0.0)]]
}

pub fn pauli_y() -> Matrix {
    array![[re(0.0), im(-1.0)], [im(1.0), re(0.0)]]
}

pub fn pauli_z() -> Matrix {
    array![[re(1.0), re(0.0)], [re(0.0), re(-1.0)]]
}

pub fn rotate_x(theta: f64) -> Matrix {
    let (s, c) = (theta / 2.0).sin_cos();
    array![[re(c), im(-s)], [im(-s), re(c)]]
}

pub fn rotate_y(theta: f64) -> Matrix {
    let (s, c) = (theta / 2.0).sin_cos();
    array![[re(c), re(-s)], [re(s), re(c)]]
}

pub fn rotate_z(theta: f64) -> Matrix {
    array![
        [Complex64::from_polar(1.0, -theta / 2.0), re(0.0)],
        [re(0.0), Complex64::from_polar(1.0, theta / 2.0)]
    ]
}

/// Rotation by `theta` about the equatorial axis `(cos phi, sin phi, 0)`.
pub fn rotate_xy(phi: f64, theta: f64) -> Matrix {
    let (s, c) = (theta / 2.0).sin_cos();
    array![
        [re(c), im(-s) * Complex64::from_polar(1.0, -phi)],
        [im(-s) * Complex64::from_polar(1.0, phi), re(c)]
    ]
}

pub fn rotate_euler(phi: f64, theta: f64, lamda: f64) -> Matrix {
    rotate_z(phi).dot(&rotate_y(theta)).dot(&rotate_z(lamda))
}

pub fn cphase(angle: f64) -> Matrix {
    let mut u = identity(4);
    u[[3, 3]] = Complex64::from_polar(1.0, angle);
    u
}

/// Partial iSWAP; `angle = pi/2` swaps `|01>` and `|10>` with a phase `i`.
pub fn iswap(angle: f64) -> Matrix {
    let (s, c) = angle.sin_cos();
    let mut u = identity(4);
    u[[1, 1]] = re(c);
    u[[2, 2]] = re(c);
    u[[1, 2]] = im(s);
    u[[2, 1]] = im(s);
    u
}

/// Pauli channel with the given error probabilities.
pub fn pauli_channel(px: f64, py: f64, pz: f64) -> Vec<Matrix> {
    let (px, py, pz) = (px.max(0.0), py.max(0.0), pz.max(0.0));
    let keep = (1.0 - px - py - pz).max(0.0);
    vec![
        identity(2).mapv(|v| v * keep.sqrt()),
        pauli_x().mapv(|v| v * px.sqrt()),
        pauli_y().mapv(|v| v * py.sqrt()),
        pauli_z().mapv(|v| v * pz.sqrt()),
    ]
}

/// Depolarization: with probability `p` the qubit is replaced by the
/// maximally mixed state.
pub fn depolarizing(p: f64) -> Vec<Matrix> {
    let q = p.clamp(0.0, 1.0) / 4.0;
    pauli_channel(q, q, q)
}

/// Pure dephasing that multiplies the coherences by `factor`.
pub fn dephasing(factor: f64) -> Vec<Matrix> {
    let lambda = (1.0 - factor * factor).clamp(0.0, 1.0);
    vec![
        array![[re(1.0), re(0.0)], [re(0.0), re((1.0 - lambda).sqrt())]],
        array![[re(0.0), re(0.0)], [re(0.0), re(lambda.sqrt())]],
    ]
}

/// Instantaneous excitation/decay with probabilities `p_exc` and `p_dec`.
pub fn butterfly(p_exc: f64, p_dec: f64) -> Vec<Matrix> {
    vec![
        array![
            [re((1.0 - p_exc).sqrt()), re(0.0)],
            [re(0.0), re((1.0 - p_dec).sqrt())]
        ],
        array![[re(0.0), re(0.0)], [re(p_exc.sqrt()), re(0.0)]],
        array![[re(0.0), re(p_dec.sqrt())], [re(0.0), re(0.0)]],
    ]
}

/// Replace the qubit by `diag(1 - population, population)`.
pub fn reset(population: f64) -> Vec<Matrix> {
    let (g, e) = ((1.0 - population).sqrt(), population.sqrt());
    vec![
        array![[re(g), re(0.0)], [re(0.0), re(0.0)]],
        array![[re(0.0), re(g)], [re(0.0), re(0.0)]],
        array![[re(0.0), re(0.0)], [re(e), re(0.0)]],
        array![[re(0.0), re(0.0)], [re(0.0), re(e)]],
    ]
}

/// Free decay over `duration` with energy relaxation `t1` and total
/// coherence time `t2`. Infinite lifetimes disable the respective process;
/// a `t2` longer than `2 * t1` is treated as `2 * t1`.
pub fn decay(duration: f64, t1: f64, t2: f64) -> Vec<Matrix> {
    let gamma = if t1.is_finite() {
        1.0 - (-duration / t1).exp()
    } else {
        0.0
    };
    let rate_t1 = if t1.is_finite() { 1.0 / (2.0 * t1) } else { 0.0 };
    let rate_t2 = if t2.is_finite() { 1.0 / t2 } else { 0.0 };
    let pure = (-(rate_t2 - rate_t1).max(0.0) * duration).exp();

    let damping = [
        array![[re(1.0), re(0.0)], [re(0.0), re((1.0 - gamma).sqrt())]],
        array![[re(0.0), re(gamma.sqrt())], [re(0.0), re(0.0)]],
    ];
    let mut kraus = Vec::with_capacity(4);
    for d in dephasing(pure) {
        for a in &damping {
            kraus.push(d.dot(a));
        }
    }
    kraus
}

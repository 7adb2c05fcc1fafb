//! Hartmann 6-dimensional function and its fidelity-augmented variant.
//!
//! Defined on the unit hypercube with six local minima; the global minimum
//! is `-3.32237` at `(0.20169, 0.150011, 0.476874, 0.275332, 0.311652, 0.6573)`.

const ALPHA: [f64; 4] = [1.0, 1.2, 3.0, 3.2];

const A: [[f64; 6]; 4] = [
    [10.0, 3.0, 17.0, 3.5, 1.7, 8.0],
    [0.05, 10.0, 17.0, 0.1, 8.0, 14.0],
    [3.0, 3.5, 1.7, 10.0, 17.0, 8.0],
    [17.0, 8.0, 0.05, 10.0, 0.1, 14.0],
];

const P: [[f64; 6]; 4] = [
    [1312.0, 1696.0, 5569.0, 124.0, 8283.0, 5886.0],
    [2329.0, 4135.0, 8307.0, 3736.0, 1004.0, 9991.0],
    [2348.0, 1451.0, 3522.0, 2883.0, 3047.0, 6650.0],
    [4047.0, 8828.0, 8732.0, 5743.0, 1091.0, 381.0],
];

pub const HARTMANN6_OPTIMUM: [f64; 6] = [0.20169, 0.150011, 0.476874, 0.275332, 0.311652, 0.6573];
pub const HARTMANN6_OPTIMAL_VALUE: f64 = -3.32237;

fn weighted_sum(x: &[f64; 6], alpha: &[f64; 4]) -> f64 {
    let mut outer = 0.0;
    for i in 0..4 {
        let inner: f64 = (0..6).map(|j| A[i][j] * (x[j] - 1e-4 * P[i][j]).powi(2)).sum();
        outer += alpha[i] * (-inner).exp();
    }
    -outer
}

pub fn hartmann6(x: &[f64; 6]) -> f64 {
    weighted_sum(x, &ALPHA)
}

/// Hartmann6 over the first six coordinates; the seventh is a fidelity in
/// `[0, 1]` that lowers the weight of the first basin as it drops below 1.
pub fn aug_hartmann6(x: &[f64; 7]) -> f64 {
    let mut alpha = ALPHA;
    alpha[0] -= 0.1 * (1.0 - x[6]);
    let head = [x[0], x[1], x[2], x[3], x[4], x[5]];
    weighted_sum(&head, &alpha)
}

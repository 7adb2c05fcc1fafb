/// Colville function, four-dimensional, usually evaluated on `[-10, 10]^4`.
/// Global minimum `0` at `(1, 1, 1, 1)`.
pub fn colville(x: &[f64; 4]) -> f64 {
    let [x1, x2, x3, x4] = *x;

    let t1 = 100.0 * (x1.powi(2) - x2).powi(2);
    let t2 = (x1 - 1.0).powi(2);
    let t3 = (x3 - 1.0).powi(2);
    let t4 = 90.0 * (x3.powi(2) - x4).powi(2);
    let t5 = 10.1 * (x2 - 1.0).powi(2);
    let t6 = 10.1 * (x4 - 1.0).powi(2);
    let t7 = 19.8 * (x2 - 1.0) * (x4 - 1.0);

    t1 + t2 + t3 + t4 + t5 + t6 + t7
}

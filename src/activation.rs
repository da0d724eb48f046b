use crate::linear_algebra::Value;

/// The logistic sigmoid, computed so that `exp` only ever sees a
/// non-positive argument and large inputs saturate instead of overflowing.
pub fn sigmoid(x: Value) -> Value {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub fn sigmoid_prime(x: Value) -> Value {
    let s = sigmoid(x);
    s * (1.0 - s)
}

//! Dense vector kernels used by the iterative solver
//!
//! Every reduction runs sequentially in index order so repeated runs on the
//! same input produce bit-identical results.

/// Inner product of two equally long slices
///
/// Extra elements of the longer slice are ignored.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0, |sum, (x, y)| x.mul_add(*y, sum))
}

/// Euclidean norm
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `y <- y + alpha * x`
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (target, value) in y.iter_mut().zip(x) {
        *target = alpha.mul_add(*value, *target);
    }
}

/// `y <- x + beta * y`, the search-direction update of conjugate gradient
pub fn xpby(x: &[f64], beta: f64, y: &mut [f64]) {
    for (target, value) in y.iter_mut().zip(x) {
        *target = beta.mul_add(*target, *value);
    }
}

/// `out <- a - b`
pub fn difference(a: &[f64], b: &[f64], out: &mut [f64]) {
    for ((target, x), y) in out.iter_mut().zip(a).zip(b) {
        *target = x - y;
    }
}

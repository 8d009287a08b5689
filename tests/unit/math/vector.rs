//! Tests for the dense vector kernels used by conjugate gradient

#[cfg(test)]
mod tests {
    use pdeinpaint::math::vector::{axpy, difference, dot, norm, xpby};

    // Tests the inner product and the norm derived from it
    #[test]
    fn test_dot_and_norm() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, -5.0, 6.0];
        assert!((dot(&a, &b) - 12.0).abs() < f64::EPSILON);
        assert!((norm(&[3.0, 4.0]) - 5.0).abs() < f64::EPSILON);
        assert_eq!(dot(&[], &[]), 0.0);
    }

    // Tests y <- y + alpha * x
    // Verified by swapping the roles of x and y
    #[test]
    fn test_axpy() {
        let mut y = [1.0, 1.0, 1.0];
        axpy(2.0, &[1.0, 2.0, 3.0], &mut y);
        assert_eq!(y, [3.0, 5.0, 7.0]);
    }

    // Tests y <- x + beta * y
    #[test]
    fn test_xpby() {
        let mut y = [1.0, 2.0];
        xpby(&[10.0, 20.0], 0.5, &mut y);
        assert_eq!(y, [10.5, 21.0]);
    }

    // Tests element-wise difference into a separate buffer
    #[test]
    fn test_difference() {
        let mut out = [0.0; 3];
        difference(&[5.0, 5.0, 5.0], &[1.0, 2.0, 6.0], &mut out);
        assert_eq!(out, [4.0, 3.0, -1.0]);
    }

    // Tests repeated reductions are bit-identical
    #[test]
    fn test_reductions_are_deterministic() {
        let values: Vec<f64> = (0..1000).map(|i| (f64::from(i) * 0.37).sin()).collect();
        let first = dot(&values, &values);
        for _ in 0..5 {
            assert_eq!(dot(&values, &values).to_bits(), first.to_bits());
        }
    }
}

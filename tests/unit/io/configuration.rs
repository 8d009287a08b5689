//! Tests for default parameters and their relationships

#[cfg(test)]
mod tests {
    use pdeinpaint::io::configuration::{
        DEFAULT_COMPRESSION_RATIO, DEFAULT_GAUSSIAN_ACCURACY, DEFAULT_TOLERANCE, DIFFUSION_BELOW,
        DIFFUSION_BELOW_LEFT, DIFFUSION_BELOW_RIGHT, DIFFUSION_RIGHT, DITHER_SUFFIX,
        DITHER_THRESHOLD, FILTER_SUFFIX, INPAINT_SUFFIX, MASK_SUFFIX, MAX_INTENSITY,
    };

    // Tests the error-diffusion weights distribute the whole error
    // Verified by changing one weight
    #[test]
    fn test_diffusion_weights_sum_to_one() {
        let total = DIFFUSION_RIGHT + DIFFUSION_BELOW_LEFT + DIFFUSION_BELOW + DIFFUSION_BELOW_RIGHT;
        assert!((total - 1.0).abs() < f64::EPSILON);
    }

    // Tests the quantiser threshold sits halfway up the intensity range
    #[test]
    fn test_threshold_midpoint() {
        assert!((DITHER_THRESHOLD * 2.0 - MAX_INTENSITY).abs() < f64::EPSILON);
    }

    // Tests defaults lie in their valid ranges
    #[test]
    fn test_default_ranges() {
        assert!(DEFAULT_COMPRESSION_RATIO > 0.0 && DEFAULT_COMPRESSION_RATIO <= 1.0);
        assert!(DEFAULT_TOLERANCE > 0.0);
        assert!((DEFAULT_GAUSSIAN_ACCURACY - 2.0).abs() < f64::EPSILON);
    }

    // Tests output suffixes are distinct so outputs never collide
    #[test]
    fn test_suffixes_distinct() {
        let suffixes = [INPAINT_SUFFIX, MASK_SUFFIX, DITHER_SUFFIX, FILTER_SUFFIX];
        for (i, a) in suffixes.iter().enumerate() {
            for b in suffixes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
            assert!(a.starts_with('_'));
        }
    }
}

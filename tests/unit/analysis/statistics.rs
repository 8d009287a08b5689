//! Tests for grid statistics and quality metrics

#[cfg(test)]
mod tests {
    use pdeinpaint::InpaintError;
    use pdeinpaint::analysis::statistics::{max, mean, mean_squared_error, min, psnr};
    use pdeinpaint::spatial::grid::Grid;

    // Tests extremes and mean of a small integer grid
    #[test]
    fn test_min_max_mean() -> pdeinpaint::Result<()> {
        let grid = Grid::from_vec(3, 2, vec![4, -2, 9, 0, 7, 0])?;
        assert_eq!(min(&grid), -2);
        assert_eq!(max(&grid), 9);
        assert!((mean(&grid) - 3.0).abs() < f64::EPSILON);
        Ok(())
    }

    // Tests squared error across element kinds
    #[test]
    fn test_mean_squared_error() -> pdeinpaint::Result<()> {
        let a = Grid::from_vec(2, 2, vec![0, 0, 10, 10])?;
        let b = Grid::from_vec(2, 2, vec![1.0, -1.0, 10.0, 12.0])?;
        assert!((mean_squared_error(&a, &b)? - 1.5).abs() < f64::EPSILON);
        Ok(())
    }

    // Tests identical images have infinite PSNR and a known error gives the expected dB
    #[test]
    fn test_psnr() -> pdeinpaint::Result<()> {
        let a = Grid::filled(4, 4, 100.0)?;
        assert_eq!(psnr(&a, &a)?, f64::INFINITY);

        let b = Grid::filled(4, 4, 110.0)?;
        let expected = 10.0 * (255.0_f64 * 255.0 / 100.0).log10();
        assert!((psnr(&a, &b)? - expected).abs() < 1e-12);
        Ok(())
    }

    // Tests shape mismatch is reported
    #[test]
    fn test_shape_mismatch() -> pdeinpaint::Result<()> {
        let a = Grid::<f64>::new(2, 3)?;
        let b = Grid::<f64>::new(3, 2)?;
        assert!(matches!(
            mean_squared_error(&a, &b),
            Err(InpaintError::DimensionMismatch { .. })
        ));
        Ok(())
    }
}

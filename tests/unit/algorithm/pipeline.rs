//! Tests for the end-to-end inpainting pipeline

#[cfg(test)]
mod tests {
    use pdeinpaint::InpaintError;
    use pdeinpaint::algorithm::pipeline::{Inpainter, InpaintingConfig, inpaint};
    use pdeinpaint::analysis::statistics::{max, min};
    use pdeinpaint::spatial::grid::Grid;
    use pdeinpaint::spatial::mask::Mask;

    fn tight() -> Inpainter {
        Inpainter::new(InpaintingConfig {
            tolerance: 1e-10,
            ..InpaintingConfig::default()
        })
    }

    // Tests a linear ramp is recovered exactly from its border
    // Verified by leaving known neighbours out of the right-hand side
    #[test]
    fn test_ramp_recovered_from_border() -> pdeinpaint::Result<()> {
        let ramp = Grid::from_fn(4, 4, |_, col| (col * 10) as f64)?;
        let mask = Mask::border(4, 4)?;
        let reconstruction = tight().reconstruct(&ramp, &mask)?;

        assert!(reconstruction.converged);
        for (got, expected) in reconstruction.image.iter().zip(ramp.iter()) {
            assert!((got - expected).abs() < 1e-6, "{got} vs {expected}");
        }
        Ok(())
    }

    // Tests known pixels are copied bit-for-bit and unknown ones obey the maximum principle
    #[test]
    fn test_known_identity_and_maximum_principle() -> pdeinpaint::Result<()> {
        let image = Grid::from_fn(9, 7, |row, col| ((row * 13 + col * 29) % 97) as f64 * 2.5)?;
        let mask = Mask::from_fn(9, 7, |row, col| (row + col) % 4 == 0)?;
        let reconstruction = tight().reconstruct(&image, &mask)?;

        let known: Vec<f64> = mask
            .known_indices()
            .filter_map(|index| image.get_linear(index))
            .collect();
        let low = known.iter().copied().fold(f64::INFINITY, f64::min);
        let high = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        for index in 0..image.pixel_count() {
            let got = reconstruction.image.get_linear(index).unwrap_or(f64::NAN);
            if mask.is_known_linear(index) {
                assert_eq!(Some(got.to_bits()), image.get_linear(index).map(f64::to_bits));
            } else {
                assert!(got >= low - 1e-6 && got <= high + 1e-6, "{got}");
            }
        }
        Ok(())
    }

    // Tests a fully known mask skips the solve
    #[test]
    fn test_all_known_short_circuits() -> pdeinpaint::Result<()> {
        let image = Grid::from_fn(3, 3, |row, col| (row + col) as f64)?;
        let reconstruction = tight().reconstruct(&image, &Mask::all_known(3, 3)?)?;

        assert_eq!(reconstruction.iterations, 0);
        assert!(reconstruction.converged);
        assert_eq!(reconstruction.image, image);
        Ok(())
    }

    // Tests mask and image must agree in shape
    #[test]
    fn test_shape_mismatch() -> pdeinpaint::Result<()> {
        let image = Grid::<f64>::new(4, 4)?;
        assert!(matches!(
            tight().reconstruct(&image, &Mask::border(5, 4)?),
            Err(InpaintError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    // Tests strict mode turns an exhausted budget into an error
    #[test]
    fn test_require_convergence() -> pdeinpaint::Result<()> {
        let image = Grid::from_fn(8, 8, |row, col| ((row * 7 + col * 3) % 11) as f64 * 20.0)?;
        let mask = Mask::border(8, 8)?;
        let config = InpaintingConfig {
            max_iterations: 1,
            tolerance: 1e-12,
            ..InpaintingConfig::default()
        };

        let lenient = Inpainter::new(config).reconstruct(&image, &mask)?;
        assert!(!lenient.converged);
        assert_eq!(lenient.iterations, 1);

        let strict = Inpainter::new(InpaintingConfig {
            require_convergence: true,
            ..config
        });
        assert!(matches!(
            strict.reconstruct(&image, &mask),
            Err(InpaintError::NonConvergence { .. })
        ));
        Ok(())
    }

    // Tests the generated mask is part of the result and respected
    #[test]
    fn test_inpaint_uses_generated_mask() -> pdeinpaint::Result<()> {
        let image = Grid::from_fn(16, 16, |row, col| {
            if (row / 4 + col / 4) % 2 == 0 { 40.0 } else { 200.0 }
        })?;
        let reconstruction = tight().inpaint(&image)?;

        assert_eq!(reconstruction.mask.dimensions(), (16, 16));
        assert!(reconstruction.mask.known_count() >= 1);
        for index in reconstruction.mask.known_indices() {
            assert_eq!(
                reconstruction.image.get_linear(index),
                image.get_linear(index)
            );
        }
        Ok(())
    }

    // Tests the free function stays within the input's intensity range
    #[test]
    fn test_free_function() -> pdeinpaint::Result<()> {
        let image = Grid::from_fn(12, 10, |row, col| ((row * 19 + col * 5) % 256) as f64)?;
        let output = inpaint(&image, 0.2, 2_000, 1e-8)?;

        assert_eq!(output.dimensions(), image.dimensions());
        assert!(min(&output) >= min(&image) - 1e-6);
        assert!(max(&output) <= max(&image) + 1e-6);

        assert!(matches!(
            inpaint(&image, 0.0, 10, 1e-4),
            Err(InpaintError::InvalidParameter { .. })
        ));
        Ok(())
    }
}

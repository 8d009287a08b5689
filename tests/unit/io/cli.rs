//! Tests for command-line parsing and subcommand execution

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use pdeinpaint::analysis::kernel::KernelSpec;
    use pdeinpaint::io::cli::{Cli, Command, Runner, output_path};
    use pdeinpaint::io::configuration::{
        DEFAULT_COMPRESSION_RATIO, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, DEFAULT_TOLERANCE,
        INPAINT_SUFFIX,
    };
    use pdeinpaint::io::image::{read_image, write_image};
    use pdeinpaint::spatial::grid::Grid;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("pdeinpaint").chain(args.iter().copied()))
    }

    fn text(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn write_gradient(dir: &TempDir, name: &str) -> pdeinpaint::Result<PathBuf> {
        let path = dir.path().join(name);
        let image = Grid::from_fn(12, 10, |row, col| (row * 20 + col * 5) as i32)?;
        write_image(&image, &path)?;
        Ok(path)
    }

    // Tests defaults come from the configuration constants
    // Verified by changing clap default values
    #[test]
    fn test_inpaint_defaults() {
        let cli = parse(&["inpaint", "photo.pgm"]);
        let Command::Inpaint(args) = &cli.command else {
            unreachable!("parsed a different subcommand");
        };

        assert_eq!(args.input, PathBuf::from("photo.pgm"));
        assert_eq!(args.ratio, DEFAULT_COMPRESSION_RATIO);
        assert_eq!(args.iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(args.tolerance, DEFAULT_TOLERANCE);
        assert!(args.output.is_none());
        assert!(!args.strict);
        assert!(cli.should_show_progress());
        assert_eq!(cli.log_filter(), "warn");
    }

    // Tests global flags are accepted after the subcommand
    #[test]
    fn test_global_flags() {
        let cli = parse(&["mask", "a.png", "--random", "-q", "-vv"]);
        assert!(cli.quiet);
        assert!(!cli.should_show_progress());
        assert_eq!(cli.log_filter(), "debug");

        let Command::Mask(args) = &cli.command else {
            unreachable!("parsed a different subcommand");
        };
        assert!(args.random);
        assert_eq!(args.seed, DEFAULT_SEED);
    }

    // Tests kernel strings are parsed at the argument level
    #[test]
    fn test_filter_kernel_argument() {
        let cli = parse(&["filter", "a.pgm", "--kernel", "sobel-x", "--absolute"]);
        let Command::Filter(args) = &cli.command else {
            unreachable!("parsed a different subcommand");
        };
        assert_eq!(args.kernel.family().name(), "sobel-x");
        assert!(args.absolute);

        let defaulted = parse(&["filter", "a.pgm"]);
        let Command::Filter(args) = &defaulted.command else {
            unreachable!("parsed a different subcommand");
        };
        assert_eq!(args.kernel, KernelSpec::gaussian(1.0));

        assert!(Cli::try_parse_from(["pdeinpaint", "filter", "a.pgm", "-k", "box"]).is_err());
    }

    // Tests default output names keep directory and extension
    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("dir/photo.pgm"), INPAINT_SUFFIX),
            PathBuf::from("dir/photo_inpainted.pgm")
        );
        assert_eq!(
            output_path(Path::new("photo.png"), "_mask"),
            PathBuf::from("photo_mask.png")
        );
    }

    // Tests inpainting writes the image and the requested mask
    #[test]
    fn test_run_inpaint() -> pdeinpaint::Result<()> {
        let dir = TempDir::new()?;
        let input = write_gradient(&dir, "gradient.pgm")?;
        let mask_path = dir.path().join("mask.png");

        let written = Runner::new(parse(&[
            "-q",
            "inpaint",
            &text(&input),
            "--ratio",
            "0.3",
            "--mask-output",
            &text(&mask_path),
        ]))
        .run()?;

        assert_eq!(written, dir.path().join("gradient_inpainted.pgm"));
        assert_eq!(read_image(&written)?.dimensions(), (12, 10));
        let mask = read_image(&mask_path)?;
        assert!(mask.iter().all(|value| value == 0 || value == 255));
        assert!(mask.iter().any(|value| value == 255));
        Ok(())
    }

    // Tests a supplied mask image replaces mask selection
    #[test]
    fn test_run_inpaint_with_mask_file() -> pdeinpaint::Result<()> {
        let dir = TempDir::new()?;
        let input = write_gradient(&dir, "gradient.pgm")?;
        let mask_path = dir.path().join("border.pgm");
        let border = Grid::from_fn(12, 10, |row, col| {
            if row == 0 || col == 0 || row == 9 || col == 11 { 255 } else { 0 }
        })?;
        write_image(&border, &mask_path)?;
        let output = dir.path().join("out.pgm");

        Runner::new(parse(&[
            "-q",
            "inpaint",
            &text(&input),
            "--mask",
            &text(&mask_path),
            "--tolerance",
            "1e-9",
            "--output",
            &text(&output),
            "--strict",
        ]))
        .run()?;

        assert_eq!(read_image(&output)?, read_image(&input)?);
        Ok(())
    }

    // Tests the remaining subcommands produce two-level or filtered output
    #[test]
    fn test_run_mask_dither_filter() -> pdeinpaint::Result<()> {
        let dir = TempDir::new()?;
        let input = write_gradient(&dir, "gradient.png")?;
        let path = text(&input);

        let mask = Runner::new(parse(&["-q", "mask", &path, "--random", "-r", "0.5"])).run()?;
        let mask_grid = read_image(&mask)?;
        assert_eq!(mask_grid.iter().filter(|&value| value == 255).count(), 60);

        let dithered = Runner::new(parse(&["-q", "dither", &path])).run()?;
        assert_eq!(dithered, dir.path().join("gradient_dithered.png"));
        assert!(read_image(&dithered)?.iter().all(|value| value == 0 || value == 255));

        let filtered = Runner::new(parse(&["-q", "filter", &path, "-k", "laplacian"])).run()?;
        let interior = read_image(&filtered)?.get(5, 5);
        assert_eq!(interior, Some(0));
        Ok(())
    }
}

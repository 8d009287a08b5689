//! CLI entry point for diffusion-based image inpainting

use clap::Parser;
use pdeinpaint::io::cli::{Cli, Runner};

fn main() -> pdeinpaint::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();
    Runner::new(cli).run().map(|_| ())
}

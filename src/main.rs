use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use qrsmith::{ECLevel, MaskPattern, QRBuilder, Theme, Version};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Largest canvas is (177 + 2 * 64) * 64 pixels a side
const MAX_BORDER: i64 = 64;
const MAX_SCALE: i64 = 64;

/// Generate a QR code from text, as a PNG file or a terminal preview.
#[derive(Parser)]
#[command(name = "qrsmith")]
struct Cli {
    /// Text to encode. Read from stdin when omitted
    text: Option<String>,

    /// Error correction level: L, M, Q or H
    #[arg(short, long, default_value = "M")]
    ec_level: ECLevel,

    /// Smallest version the search may pick
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=40))]
    min_version: u8,

    /// Fixed version; fails if the text doesn't fit
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=40))]
    version: Option<u8>,

    /// Fixed mask pattern instead of the lowest penalty one
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
    mask: Option<u8>,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(0..=MAX_BORDER))]
    border: u16,

    /// Pixels per module in the PNG output
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE))]
    scale: u32,

    /// Colour theme: mono, cyber or minimal
    #[arg(long, default_value = "mono")]
    theme: Theme,

    /// Write a PNG here instead of printing a preview
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbose).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = match cli.text {
        Some(text) => text,
        None => io::read_to_string(io::stdin()).context("failed to read text from stdin")?,
    };
    let text = text.trim();
    if text.is_empty() {
        bail!("Nothing to encode: input text is empty");
    }

    let mut builder = QRBuilder::new(text.as_bytes());
    builder
        .ec_level(cli.ec_level)
        .min_version(Version::new(cli.min_version)?)
        .quiet_zone(cli.border.into());
    if let Some(v) = cli.version {
        builder.version(Version::new(v)?);
    }
    if let Some(m) = cli.mask {
        builder.mask(MaskPattern::try_new(m)?);
    }
    let symbol = builder.build().context("failed to generate QR code")?;

    match cli.output {
        Some(path) => {
            symbol
                .render(cli.scale, &cli.theme)
                .save(&path)
                .with_context(|| format!("failed to write QR code to {}", path.display()))?;
            info!(path = %path.display(), theme = %cli.theme, "Saved QR code {}", symbol.metadata());
        }
        None => {
            print!("{}", symbol.to_str(1));
            println!("{}", symbol.metadata());
        }
    }

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use clap::Parser;
    use test_case::test_case;

    use super::Cli;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["qrsmith", "HELLO"]).unwrap();
        assert_eq!(cli.text.as_deref(), Some("HELLO"));
        assert_eq!(cli.border, 4);
        assert_eq!(cli.scale, 10);
        assert!(cli.output.is_none());
    }

    #[test_case(&["--scale", "64"])]
    #[test_case(&["--border", "64"])]
    #[test_case(&["--border", "0", "--scale", "1"])]
    fn test_size_limits(args: &[&str]) {
        assert!(Cli::try_parse_from(["qrsmith", "HI"].iter().chain(args)).is_ok());
    }

    #[test_case(&["--scale", "0"])]
    #[test_case(&["--scale", "65"])]
    #[test_case(&["--scale", "4294967295"])]
    #[test_case(&["--border", "65"])]
    #[test_case(&["--border", "70000"])]
    #[test_case(&["--mask", "8"])]
    #[test_case(&["--version", "41"])]
    fn test_out_of_range(args: &[&str]) {
        assert!(Cli::try_parse_from(["qrsmith", "HI"].iter().chain(args)).is_err());
    }
}

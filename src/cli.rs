use crate::constants::{DEFAULT_INPUT_DIR, DEFAULT_QUALITY, DEFAULT_WORKERS};
use clap::builder::TypedValueParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-webpify",
    about = "Convert images in a directory tree to WebP, replacing the originals",
    long_about = "img-webpify walks a directory recursively and converts JPEG, PNG, BMP, GIF and TIFF \
                  images to WebP in place. PNG images with transparency are encoded losslessly, \
                  everything else is encoded lossy at the requested quality. The original file is \
                  removed only after its WebP replacement has been written.",
    version,
    after_help = "EXAMPLES:\n  \
    img-webpify\n  \
    img-webpify --input-dir ./static/img --quality 75\n  \
    img-webpify -i ./assets -w 8 --quiet"
)]
pub struct Args {
    #[arg(
        short = 'i',
        long,
        default_value = DEFAULT_INPUT_DIR,
        help = "Input directory containing images",
        long_help = "Root directory to scan. All subdirectories are processed; \
                     converted files are written next to their originals."
    )]
    pub input_dir: PathBuf,

    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(0..=100),
        help = "WebP quality (0-100)",
        long_help = "Lossy WebP quality from 0 (smallest) to 100 (best). \
                     Ignored for PNG images with transparency, which are encoded losslessly."
    )]
    pub quality: u8,

    #[arg(
        short = 'w',
        long,
        default_value_t = DEFAULT_WORKERS,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize),
        help = "Number of worker threads",
        long_help = "Size of the fixed worker pool. Each worker converts one image at a time."
    )]
    pub workers: usize,

    #[arg(long, conflicts_with = "verbose", help = "Only print warnings, errors and the summary")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print per-file debug detail")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["img-webpify"]).unwrap();
        assert_eq!(args.input_dir, PathBuf::from("./public/images"));
        assert_eq!(args.quality, 80);
        assert_eq!(args.workers, 4);
        assert!(!args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_explicit_values() {
        let args = Args::try_parse_from([
            "img-webpify",
            "--input-dir",
            "/srv/img",
            "--quality",
            "0",
            "--workers",
            "8",
        ])
        .unwrap();
        assert_eq!(args.input_dir, PathBuf::from("/srv/img"));
        assert_eq!(args.quality, 0);
        assert_eq!(args.workers, 8);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Args::try_parse_from(["img-webpify", "--quality", "101"]).is_err());
        assert!(Args::try_parse_from(["img-webpify", "--workers", "0"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["img-webpify", "--quiet", "--verbose"]).is_err());
    }
}

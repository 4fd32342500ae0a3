//! Command line arguments for the `buckutils` binary.
//!
//! Also compiled by `build.rs` to generate the man page, so this module only
//! depends on `clap` and the `buckutils` library.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use buckutils::config::{CompressionLevel, Config, OverwriteMode, PageSelection, PreviewOptions};
use buckutils::error::{BuckError, Result};

/// Combine, reorder, preview and rename PDF files.
///
/// Use `combine` for one-shot merges, `shell` to build and reorder a list
/// interactively, `preview` to see what pages contain and `rename` to give a
/// file a better name.
#[derive(Parser, Debug)]
#[command(name = "buckutils")]
#[command(version)]
#[command(about = "Combine, reorder, preview and rename PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Verbose output - show statistics and debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Combine PDF files into one document
    ///
    /// Documents are combined in the order given. Use --pages to pick and
    /// reorder individual pages instead.
    ///
    /// Examples:
    ///   buckutils combine cover.pdf report.pdf -o combined.pdf
    ///   buckutils combine scans/*.pdf -o all.pdf
    ///   buckutils combine a.pdf b.pdf --pages "2:1,1:1-3" -o out.pdf
    Combine(CombineArgs),

    /// Rename a PDF file in its directory
    ///
    /// The extension is kept when the new name has none. An existing file
    /// is never replaced.
    ///
    /// Example:
    ///   buckutils rename scan_0042.pdf invoice-march
    Rename(RenameArgs),

    /// Show page count, version and size of PDF files
    Inspect(InspectArgs),

    /// Print a text preview (and optionally a thumbnail) of pages
    Preview(PreviewArgs),

    /// Start an interactive session to build, reorder and combine a list
    Shell(ShellArgs),
}

/// Arguments of `combine`.
#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Input PDF files or glob patterns, in output order
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Explicit page order as DOC:PAGES items (e.g. "2:1,1:1-3")
    ///
    /// DOC is the 1-based position of an input, PAGES a page number or an
    /// inclusive range. A page may appear more than once.
    #[arg(long, value_name = "ORDER")]
    pub pages: Option<String>,

    /// Dry run - check inputs and report without writing the output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Force overwrite of an existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for the output PDF
    ///
    /// - none: write streams as they were read
    /// - standard: compress uncompressed streams (default)
    /// - maximum: also drop empty streams
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Read more input paths from a file (one per line, '#' starts a comment)
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,
}

impl CombineArgs {
    /// Turn the arguments into a validated [`Config`].
    ///
    /// `inputs` are the resolved input paths: patterns expanded and the
    /// input list appended.
    ///
    /// # Errors
    ///
    /// Returns [`BuckError::InvalidConfig`] for a bad compression level, a
    /// malformed page order, or a configuration that fails validation.
    pub fn to_config(&self, inputs: Vec<PathBuf>, verbose: bool, quiet: bool) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let page_order = self
            .pages
            .as_deref()
            .map(PageSelection::parse)
            .transpose()
            .map_err(|e| BuckError::invalid_config(e.to_string()))?;

        let config = Config {
            inputs,
            output: self.output.clone(),
            page_order,
            overwrite_mode,
            compression,
            dry_run: self.dry_run,
            verbose,
            quiet,
        };

        config.validate().map_err(|e| {
            BuckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}

/// Arguments of `rename`.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// File to rename
    #[arg(value_name = "FILE")]
    pub source: PathBuf,

    /// New file name, without directory
    #[arg(value_name = "NAME")]
    pub new_name: String,
}

/// Arguments of `inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PDF files or glob patterns
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<String>,

    /// Print a JSON array instead of text
    #[arg(long)]
    pub json: bool,
}

/// Preview settings shared by `preview` and `shell`.
#[derive(Args, Debug, Clone)]
pub struct PreviewFlags {
    /// Skip PNG thumbnails even when Ghostscript is available
    #[arg(long)]
    pub no_images: bool,

    /// Ghostscript executable, skipping discovery
    #[arg(long, value_name = "PATH", env = "BUCKUTILS_GHOSTSCRIPT")]
    pub ghostscript: Option<PathBuf>,

    /// Thumbnail resolution in dots per inch
    #[arg(long, value_name = "DPI", default_value_t = 50)]
    #[arg(value_parser = clap::value_parser!(u32).range(10..=600))]
    pub resolution: u32,

    /// Directory for thumbnails (default: the system temp dir)
    #[arg(long, value_name = "DIR")]
    pub thumbnail_dir: Option<PathBuf>,

    /// Maximum characters of page text to show
    #[arg(long, value_name = "N", default_value_t = 240)]
    pub text_limit: usize,

    /// Number of preview workers (default: one per CPU core)
    #[arg(short, long, value_name = "N")]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: Option<u64>,
}

impl PreviewFlags {
    /// Renderer settings for these flags.
    pub fn to_options(&self) -> PreviewOptions {
        PreviewOptions {
            text_limit: self.text_limit,
            render_images: !self.no_images,
            resolution: self.resolution,
            workers: self.jobs.map(|jobs| jobs as usize),
            ghostscript: self.ghostscript.clone(),
            output_dir: self.thumbnail_dir.clone(),
        }
    }
}

/// Arguments of `preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// PDF files or glob patterns
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<String>,

    /// Preview every page, not only the first page of each file
    #[arg(long)]
    pub all_pages: bool,

    /// Print a JSON array instead of text
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub preview: PreviewFlags,
}

/// Arguments of `shell`.
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Files to start the list with
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Work with individual pages instead of whole documents
    #[arg(long)]
    pub pages: bool,

    /// Compression level for combined output
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    #[command(flatten)]
    pub preview: PreviewFlags,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("buckutils").chain(args.iter().copied())).unwrap()
    }

    fn combine_args(args: &[&str]) -> CombineArgs {
        match parse(args).command {
            Command::Combine(args) => args,
            other => panic!("expected combine, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_combine_to_config() {
        let args = combine_args(&["combine", "a.pdf", "b.pdf", "-o", "out.pdf"]);
        let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
        let config = args.to_config(inputs, false, false).unwrap();

        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.output, PathBuf::from("out.pdf"));
        assert_eq!(config.compression, CompressionLevel::Standard);
        assert_eq!(config.overwrite_mode, OverwriteMode::Prompt);
        assert!(config.page_order.is_none());
        assert!(!config.dry_run);
    }

    #[rstest]
    #[case(&[], OverwriteMode::Prompt)]
    #[case(&["--force"], OverwriteMode::Force)]
    #[case(&["--no-clobber"], OverwriteMode::NoClobber)]
    fn test_overwrite_modes(#[case] flags: &[&str], #[case] expected: OverwriteMode) {
        let mut argv = vec!["combine", "a.pdf", "-o", "out.pdf"];
        argv.extend_from_slice(flags);
        let config = combine_args(&argv)
            .to_config(vec![PathBuf::from("a.pdf")], false, false)
            .unwrap();

        assert_eq!(config.overwrite_mode, expected);
    }

    #[test]
    fn test_force_conflicts_with_no_clobber() {
        let result = Cli::try_parse_from([
            "buckutils", "combine", "a.pdf", "-o", "out.pdf", "--force", "--no-clobber",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_order_is_parsed() {
        let args = combine_args(&["combine", "a.pdf", "b.pdf", "-o", "out.pdf", "--pages", "2:1,1:1-2"]);
        let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
        let config = args.to_config(inputs, false, false).unwrap();

        assert_eq!(config.page_order.unwrap().len(), 3);
    }

    #[rstest]
    #[case::malformed("banana")]
    #[case::missing_document("3:1")]
    fn test_bad_page_order_is_invalid_config(#[case] order: &str) {
        let args = combine_args(&["combine", "a.pdf", "b.pdf", "-o", "out.pdf", "--pages", order]);
        let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];

        assert!(matches!(
            args.to_config(inputs, false, false),
            Err(BuckError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_output_equal_to_input_is_rejected() {
        let args = combine_args(&["combine", "a.pdf", "-o", "a.pdf"]);
        assert!(args.to_config(vec![PathBuf::from("a.pdf")], false, false).is_err());
    }

    #[test]
    fn test_input_list_makes_inputs_optional() {
        let args = combine_args(&["combine", "--input-list", "files.txt", "-o", "out.pdf"]);
        assert!(args.inputs.is_empty());
        assert_eq!(args.input_list, Some(PathBuf::from("files.txt")));

        assert!(Cli::try_parse_from(["buckutils", "combine", "-o", "out.pdf"]).is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["buckutils", "-v", "-q", "inspect", "a.pdf"]).is_err());
    }

    #[test]
    fn test_preview_flags_to_options() {
        let cli = parse(&["preview", "a.pdf", "--jobs", "3", "--resolution", "72"]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        let options = args.preview.to_options();

        assert!(options.render_images);
        assert_eq!(options.workers, Some(3));
        assert_eq!(options.resolution, 72);
        assert_eq!(options.text_limit, 240);
    }

    #[test]
    fn test_no_images_turns_thumbnails_off() {
        let cli = parse(&["shell", "--no-images"]);
        let Command::Shell(args) = cli.command else {
            panic!("expected shell");
        };
        assert!(!args.preview.to_options().render_images);
    }

    #[test]
    fn test_zero_jobs_is_rejected() {
        assert!(Cli::try_parse_from(["buckutils", "preview", "a.pdf", "--jobs", "0"]).is_err());
    }
}

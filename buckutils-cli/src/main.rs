//! buckutils - combine, reorder, preview and rename PDF files.

mod cli;
mod inputs;
mod shell;
mod telemetry;

use clap::Parser;
use std::io::{self, Write};
use std::process;
use std::str::FromStr;

use crate::cli::{Cli, CombineArgs, Command, InspectArgs, PreviewArgs, RenameArgs, ShellArgs};
use crate::shell::Shell;
use buckutils::catalog::{Catalog, CatalogEntry, PageRef, SourceDocument};
use buckutils::combine::{Combiner, select_pages};
use buckutils::config::{CompressionLevel, Config, Granularity, OverwriteMode};
use buckutils::error::{BuckError, Result};
use buckutils::io::PdfReader;
use buckutils::output::{self, OutputFormatter, ProgressBar};
use buckutils::preview::{PagePreview, PreviewEvent, PreviewRenderer};
use buckutils::utils::collect_paths_for_patterns;
use buckutils::{NAME, Session, VERSION};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    telemetry::init_subscriber(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);

    match &cli.command {
        Command::Combine(args) => combine(args, &cli).await,
        Command::Rename(args) => rename(args, &formatter),
        Command::Inspect(args) => inspect(args, &formatter),
        Command::Preview(args) => preview(args, &formatter).await,
        Command::Shell(args) => run_shell(args, formatter).await,
    }
}

async fn combine(args: &CombineArgs, cli: &Cli) -> Result<()> {
    let inputs = inputs::resolve_inputs(&args.inputs, args.input_list.as_deref()).await?;
    let config = args.to_config(inputs, cli.verbose, cli.quiet)?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{NAME} v{VERSION}"));
        formatter.blank_line();
    }

    formatter.info(&format!("Reading {} file(s)...", config.inputs.len()));
    let combiner = Combiner::with_compression(config.compression);

    match config.granularity() {
        Granularity::Document => {
            let mut catalog: Catalog<SourceDocument> = Catalog::new();
            catalog.add_all(&config.inputs)?;
            if formatter.is_verbose() {
                output::display_catalog(&formatter, &catalog);
            }
            write_combined(&combiner, catalog.list(), &config, &formatter)
        }
        Granularity::Page => {
            let selection = config
                .page_order
                .as_ref()
                .ok_or_else(|| BuckError::invalid_config("Page order is missing"))?;
            let pages = select_pages(&config.inputs, selection)?;
            if formatter.is_verbose() {
                for (index, page) in pages.iter().enumerate() {
                    formatter.list_item(index + 1, &page.label());
                }
            }
            write_combined(&combiner, &pages, &config, &formatter)
        }
    }
}

fn write_combined<T: CatalogEntry>(
    combiner: &Combiner,
    entries: &[T],
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<()> {
    if config.dry_run {
        let result = combiner.build(entries)?;
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!(
            "  Output would be: {} ({} page(s))",
            config.output.display(),
            result.statistics.total_pages
        ));
        formatter.info("  Run without --dry-run to create the combined PDF");
        return Ok(());
    }

    handle_output_overwrite(config, formatter)?;

    formatter.info(&format!("Writing to: {}", config.output.display()));
    let stats = combiner.combine(entries, &config.output)?;

    if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Successfully created {} ({})",
            config.output.display(),
            stats.format_output_size().unwrap_or_default()
        ));
        if formatter.is_verbose() {
            formatter.blank_line();
            formatter.section("Statistics");
            output::display_combine_statistics(formatter, &stats);
            formatter.detail(
                "Compression",
                match config.compression {
                    CompressionLevel::None => "none",
                    CompressionLevel::Standard => "standard",
                    CompressionLevel::Maximum => "maximum",
                },
            );
        }
    }
    Ok(())
}

/// Decide what to do when the output file already exists.
fn handle_output_overwrite(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(BuckError::output_exists(&config.output)),
        OverwriteMode::Prompt => {
            if formatter.is_quiet() {
                return Err(BuckError::output_exists(&config.output));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| BuckError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(BuckError::Cancelled),
            }
        }
    }
}

fn rename(args: &RenameArgs, formatter: &OutputFormatter) -> Result<()> {
    let mut session: Session<SourceDocument> =
        Session::new(Combiner::new(), PreviewRenderer::text_only());
    session.select_rename(&args.source);
    session.propose_name(args.new_name.as_str())?;
    let renamed = session.apply_rename()?;

    formatter.success(&format!(
        "Renamed {} to {}",
        args.source.display(),
        renamed.display()
    ));
    Ok(())
}

fn inspect(args: &InspectArgs, formatter: &OutputFormatter) -> Result<()> {
    let reader = PdfReader::new();
    let summaries = collect_paths_for_patterns(&args.inputs)?
        .iter()
        .map(|path| reader.inspect(path))
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        print_json(&summaries)?;
        return Ok(());
    }

    for summary in &summaries {
        output::display_summary(formatter, summary);
    }
    Ok(())
}

async fn preview(args: &PreviewArgs, formatter: &OutputFormatter) -> Result<()> {
    let paths = collect_paths_for_patterns(&args.inputs)?;
    let renderer = PreviewRenderer::new(args.preview.to_options());
    if !args.preview.no_images && !renderer.renders_images() && !args.json {
        formatter.info("Ghostscript was not found; showing text previews only");
    }

    let previews = if args.all_pages {
        render_previews::<PageRef>(&paths, renderer, formatter, args.json).await?
    } else {
        render_previews::<SourceDocument>(&paths, renderer, formatter, args.json).await?
    };

    if args.json {
        print_json(&previews)?;
        return Ok(());
    }

    for preview in &previews {
        output::display_preview(formatter, preview);
    }
    Ok(())
}

/// Build a catalog of `paths`, render every preview and return them in
/// catalog order.
async fn render_previews<T: CatalogEntry>(
    paths: &[std::path::PathBuf],
    renderer: PreviewRenderer,
    formatter: &OutputFormatter,
    json: bool,
) -> Result<Vec<PagePreview>> {
    let mut session: Session<T> = Session::new(Combiner::new(), renderer);
    for path in paths {
        session.add(path)?;
    }

    let requests = session.preview_requests();
    let mut progress = if json || formatter.is_quiet() {
        ProgressBar::disabled()
    } else {
        ProgressBar::auto(requests.len())
    };
    progress.set_message("Rendering previews");

    let mut rx = session.preview_queue().spawn(requests);
    while let Some(event) = rx.recv().await {
        match event {
            PreviewEvent::Ready(preview) => {
                session.apply_preview(preview);
            }
            PreviewEvent::Failed { key, reason } => formatter.warning(&format!(
                "No preview for {} page {}: {reason}",
                key.path.display(),
                key.page_index + 1
            )),
        }
        progress.increment();
    }
    progress.finish();

    let mut previews = Vec::new();
    for index in 0..session.list().len() {
        if let Some(preview) = session.preview(index)? {
            previews.push(preview.clone());
        }
    }
    Ok(previews)
}

async fn run_shell(args: &ShellArgs, formatter: OutputFormatter) -> Result<()> {
    let combiner = Combiner::with_compression(CompressionLevel::from_str(&args.compression)?);
    let renderer = PreviewRenderer::new(args.preview.to_options());
    let paths = collect_paths_for_patterns(&args.inputs)?;

    formatter.section(&format!("{NAME} v{VERSION}"));
    if args.pages {
        let session: Session<PageRef> = Session::new(combiner, renderer);
        start_shell(session, &paths, formatter).await
    } else {
        let session: Session<SourceDocument> = Session::new(combiner, renderer);
        start_shell(session, &paths, formatter).await
    }
}

async fn start_shell<T: CatalogEntry>(
    mut session: Session<T>,
    paths: &[std::path::PathBuf],
    formatter: OutputFormatter,
) -> Result<()> {
    for path in paths {
        session.add(path)?;
    }
    output::display_catalog(&formatter, session.catalog());

    let mut shell = Shell::new(session, formatter);
    shell.run().await?;
    tracing::debug!(items = shell.session().list().len(), "shell session ended");
    Ok(())
}

fn print_json<S: serde::Serialize>(value: &S) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| BuckError::other(format!("Failed to serialize output: {err}")))?;
    println!("{json}");
    Ok(())
}

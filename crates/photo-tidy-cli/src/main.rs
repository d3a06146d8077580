use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crossbeam::channel::unbounded;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use photo_tidy_core::config::LogLevel;
use photo_tidy_core::{logging, Config, Organizer, RunContext};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "photo-tidy")]
#[command(about = "Rename and tidy date-partitioned photo folders")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Root folder holding the YYMMDD date folders
    root: PathBuf,

    /// Run without making changes
    #[arg(long)]
    dry_run: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename the files of every leaf folder after its date folder
    Rename(CommonArgs),

    /// Move the files of every leaf folder into a story subfolder
    Story(CommonArgs),

    /// Remove empty folders
    Prune(CommonArgs),

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "photo-tidy.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => {
            let organizer = setup(&args)?;
            run_rename(&organizer, &args.root)
        }

        Commands::Story(args) => {
            let organizer = setup(&args)?;
            let summary = organizer.move_to_story(&args.root)?;
            println!(
                "Moved {} files into story folders ({} skipped, {} failed)",
                summary.moved, summary.skipped, summary.failed
            );
            Ok(())
        }

        Commands::Prune(args) => {
            let organizer = setup(&args)?;
            let summary = organizer.remove_empty_folders(&args.root)?;
            println!("Removed {} empty folders", summary.removed);
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

/// Load and validate the configuration, then start logging
fn setup(args: &CommonArgs) -> anyhow::Result<Organizer> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Override config with command line arguments
    if args.dry_run {
        config.dry_run = true;
    }
    config.log_level = match args.verbose {
        0 => config.log_level,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };

    config.validate()?;

    let log_dir = config
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);
    if let Err(e) = logging::init_logger(&log_dir, config.log_level.into()) {
        env_logger::Builder::new()
            .filter_level(config.log_level.into())
            .init();
        warn!("Could not initialize file logger: {}", e);
    }

    if config.dry_run {
        println!("Dry run: no files will be changed");
    }
    Ok(Organizer::new(config))
}

fn run_rename(organizer: &Organizer, root: &Path) -> anyhow::Result<()> {
    let (tx, rx) = unbounded();
    let ctx = Arc::new(RunContext::new().with_progress_channel(tx));

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{wide_bar} {percent}% | {msg}")
            .context("invalid progress bar template")?
            .progress_chars("█▓▒░ "),
    );
    progress_bar.set_message("Collecting folders... (Enter pauses)");

    // Each Enter on stdin flips pause/resume. Holds a weak handle so the
    // progress channel can close when the worker finishes.
    {
        let ctx = Arc::downgrade(&ctx);
        let progress_bar = progress_bar.clone();
        std::thread::Builder::new()
            .name("pause-toggle".to_string())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Some(ctx) = ctx.upgrade() else {
                        break;
                    };
                    if line.is_err() {
                        break;
                    }
                    if ctx.toggle_pause() {
                        progress_bar.set_message("Paused (Enter resumes)");
                    } else {
                        progress_bar.set_message("Resumed");
                    }
                }
            })?;
    }

    info!("Starting rename under {}", root.display());
    let worker = organizer.spawn_rename(root, Arc::clone(&ctx))?;

    // The channel closes once the worker drops its context
    drop(ctx);
    for update in rx.iter() {
        progress_bar.set_position(update.percent.round() as u64);
        progress_bar.set_message(format!(
            "{}/{} folders | {}s elapsed",
            update.processed,
            update.total,
            update.elapsed.as_secs()
        ));
    }

    let summary = worker.join()?;
    progress_bar.finish_with_message(format!(
        "Done: {} renamed, {} skipped, {} failed in {} folders",
        summary.renamed, summary.skipped, summary.failed, summary.leaf_folders
    ));
    if summary.failed_folders > 0 {
        warn!("{} folders could not be read", summary.failed_folders);
        println!("{} folders could not be read, see the log", summary.failed_folders);
    }
    Ok(())
}

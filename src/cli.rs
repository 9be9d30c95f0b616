//! The command line interface for fireplain.
use crate::input::load_dataset;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, get_output_dir};
use crate::pipeline;
use crate::settings::Settings;
use crate::spread::ErrorPolicy;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for fireplain.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Log and skip iterations whose spread graph can't be built, rather than stopping
    #[arg(long)]
    pub skip_failed_iterations: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build spread graphs and fireplains for a dataset.
    Run {
        /// Path to the dataset directory.
        dataset_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example datasets.
    Example {
        /// The available subcommands for managing example datasets.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a dataset.
    Validate {
        /// The path to the dataset directory.
        dataset_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { dataset_dir, opts } => handle_run_command(&dataset_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { dataset_dir } => handle_validate_command(&dataset_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start fireplain
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ fireplain --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
pub fn handle_run_command(
    dataset_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let mut settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // These settings can be overridden by command-line arguments
    if opts.overwrite {
        settings.overwrite = true;
    }
    if opts.skip_failed_iterations {
        settings.on_iteration_error = ErrorPolicy::Skip;
    }

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(dataset_path)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let dataset = load_dataset(dataset_path).context("Failed to load dataset.")?;
    info!("Loaded dataset from {}", dataset_path.display());
    info!("Output folder: {}", output_path.display());

    let summary = pipeline::run(&dataset, output_path, settings.on_iteration_error)?;
    write_metadata(output_path, dataset_path, &summary)
        .context("Failed to save metadata.")?;
    info!(
        "Run complete! Wrote {} spread graphs and {} fireplains",
        summary.spread_graphs, summary.fireplains
    );

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(dataset_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the dataset
    load_dataset(dataset_path).context("Failed to validate dataset.")?;
    info!("Dataset validation successful!");

    Ok(())
}

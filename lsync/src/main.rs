use anyhow::{Context, Result};
use clap::Parser;

mod prompt;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lsync",
    version,
    about = "Mirror a source directory tree into a destination tree (one way)",
    long_about = "`lsync` is a tool for keeping a destination directory in sync with a source directory.

It creates missing folders, copies missing files and, optionally, updates files whose source copy
is newer and deletes destination entries that no longer exist in the source. Every phase asks for
confirmation first unless --yes is given.

EXIT CODES:
    0 - Sync finished (declined phases included)
    1 - Cancelled with Ctrl+C
    2 - Errors occurred

EXAMPLE:
    # Preview everything, including updates and deletions
    lsync /path/to/source /path/to/destination --dry-run --modified --delete"
)]
struct Args {
    // Sync options
    /// Preview mode - report what would be done without changing the destination
    #[arg(long, help_heading = "Sync options")]
    dry_run: bool,

    /// Also copy files whose source modification time is newer than the destination's
    #[arg(long, help_heading = "Sync options")]
    modified: bool,

    /// Delete files and folders in destination that no longer exist in source
    #[arg(long, help_heading = "Sync options")]
    delete: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long = "yes", help_heading = "Sync options")]
    yes: bool,

    /// Path to the configuration file
    ///
    /// When not given, `lsync.toml` in the current directory is used if it exists.
    #[arg(long, value_name = "PATH", help_heading = "Sync options")]
    config: Option<std::path::PathBuf>,

    // Progress & output
    /// Show copy progress with an estimated remaining time
    #[arg(long, help_heading = "Progress & output")]
    progress: bool,

    /// Set the type of progress display
    ///
    /// If specified, --progress flag is implied.
    ///
    /// Options are: `ProgressBar` (animated progress bar), `TextUpdates` (appropriate for logging), Auto (default, will
    /// choose between `ProgressBar` or `TextUpdates` depending on the type of terminal attached to stderr)
    #[arg(long, value_name = "TYPE", help_heading = "Progress & output")]
    progress_type: Option<common::ProgressType>,

    /// Verbose level (implies "summary"): -v INFO / -vv DEBUG / -vvv TRACE (default: ERROR)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Progress & output")]
    verbose: u8,

    /// Print summary at the end
    #[arg(long, help_heading = "Progress & output")]
    summary: bool,

    /// Quiet mode, don't report errors
    #[arg(short = 'q', long = "quiet", help_heading = "Progress & output")]
    quiet: bool,

    // ARGUMENTS
    /// Path to the source folder
    #[arg()]
    source: String,

    /// Path to the destination folder
    #[arg()]
    destination: String,
}

const ERROR_EXIT_CODE: i32 = 2;

fn run(args: &Args, config: &common::ConfigFile, output: &common::OutputConfig) -> Result<()> {
    let source = std::path::PathBuf::from(common::clean_path(&args.source));
    let destination = std::path::PathBuf::from(common::clean_path(&args.destination));
    common::ensure_dir(&source).context("source folder")?;
    common::ensure_dir(&destination).context("destination folder")?;
    let settings = config.sync_settings(args.dry_run, args.modified, args.delete);
    let assume_yes = args.yes || config.sync.assume_yes;

    println!("Source folder: {}", source.display());
    println!("Destination folder: {}", destination.display());
    println!("dry run mode:         {}", settings.dry_run);
    println!("sync modified files:  {}", settings.modified);
    println!("delete files:         {}", settings.delete);

    let sigint = common::interrupt::install().context("failed installing Ctrl+C handler")?;
    let mut terminal =
        prompt::TerminalDecider::new(std::io::stdin().lock(), std::io::stdout()).with_sigint(sigint);
    if !assume_yes && !terminal.ask_yes_no("Do you want to continue?") {
        return Ok(());
    }
    let mut always_yes = common::prompt::AssumeYes;
    let decider: &mut dyn common::prompt::Decider = if assume_yes {
        &mut always_yes
    } else {
        &mut terminal
    };

    let progress_type = if args.progress || args.progress_type.is_some() || config.output.progress
    {
        Some(args.progress_type.unwrap_or_default())
    } else {
        None
    };
    let progress = common::progress::make_sink(progress_type);
    let mut stdout = std::io::stdout();
    let mut session = common::Session::new(decider, &mut stdout)
        .with_interrupt(sigint)
        .with_progress(progress.as_ref());
    let summary = common::sync(&mut session, &source, &destination, &settings)?;
    if output.print_summary {
        println!("{}", summary);
    }
    Ok(())
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<common::Error>() {
        Some(common::Error::Cancelled {
            in_progress,
            previous,
        }) => {
            println!("\n\nUser cancelled operation");
            println!("   Copying file: {}", in_progress.display());
            match previous {
                Some(previous) => println!("   Previous file was {}", previous.display()),
                None => println!("   No file was copied before it"),
            }
            common::interrupt::CANCELLED_EXIT_CODE
        }
        Some(common::Error::Interrupted { phase }) => {
            println!("\n\nUser cancelled operation before {}", phase);
            common::interrupt::CANCELLED_EXIT_CODE
        }
        _ => {
            tracing::error!("{:#}", error);
            ERROR_EXIT_CODE
        }
    }
}

fn main() {
    let args = Args::parse();
    let config = common::ConfigFile::discover(args.config.as_deref());
    let file_output = config
        .as_ref()
        .map(|config| config.output.clone())
        .unwrap_or_default();
    let verbose = args.verbose.max(file_output.verbose);
    let output = common::OutputConfig {
        quiet: args.quiet,
        verbose,
        print_summary: args.summary || file_output.summary || verbose > 0,
    };
    common::logging::init(&output);
    let res = config
        .map_err(anyhow::Error::from)
        .and_then(|config| run(&args, &config, &output));
    if let Err(error) = res {
        std::process::exit(exit_code(&error));
    }
}

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use git_markers::{DEFAULT_PATTERN, GitMarkers};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "git-markers")]
#[command(about = "Report TODO-style comments added by a change set")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List markers in lines added since a revision (e.g. "origin/main")
    Scan {
        /// Revision to diff the work tree against
        #[arg(default_value = "HEAD")]
        against: String,
        /// Regular expression for the marker
        #[arg(short, long, default_value = DEFAULT_PATTERN)]
        pattern: String,
        /// Repository to scan
        #[arg(short = 'C', long, default_value = ".")]
        repo: String,
        /// Prefix each finding with the author from git blame
        #[arg(long)]
        blame: bool,
    },
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Print a man page
    Man,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan {
            against,
            pattern,
            repo,
            blame,
        } => {
            let report = GitMarkers::open(&repo)?
                .with_pattern(&pattern)?
                .with_blame(blame)
                .scan(&against)?;

            print!("{report}");
            for err in report.failures.values() {
                eprintln!("error: {err}");
            }

            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "git-markers", &mut io::stdout());
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

mod commands;
mod helpers;

use clap::Parser;
use sammy_core::SammyError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("sammy-cards".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "sammy-cards",
    version,
    about = "Read, check and rewrite SAMMY parameter and input files"
)]
struct Cli {
    /// Log card selection and merge details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Parse a file and list its populated card sets
    Check(commands::CheckArgs),
    /// Parse a file and write it back in fixed-column form
    Format(commands::FormatArgs),
    /// Merge single-isotope parameter files into one
    Merge(commands::MergeArgs),
    /// Resolve command text against the input-file command registry
    Lookup(commands::LookupArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Check(args) => commands::run_check_command(args),
        CliCommand::Format(args) => commands::run_format_command(args),
        CliCommand::Merge(args) => commands::run_merge_command(args),
        CliCommand::Lookup(args) => commands::run_lookup_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Codec(#[from] SammyError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Codec(_) => 2,
            Self::Internal(_) => 3,
        }
    }

    pub fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => format!("ERROR: [Usage] {}", message.trim_end()),
            Self::Codec(error) => error.diagnostic_line(),
            Self::Internal(error) => format!("ERROR: [Io] {error:#}"),
        }
    }
}

use std::error::Error;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    expand::{self, ExpandArgs},
    generate::{self, GenerateArgs},
    verify::{self, VerifyArgs},
};
use tracing::Level;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "sgt", about = "Space-group table compiler")]
struct Cli {
    /// Diagnostics verbosity; messages go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile the table from syminfo.lib and a reference enumeration.
    Generate(GenerateArgs),
    /// Check every database record against its Hall symbol.
    Verify(VerifyArgs),
    /// Print the operations generated by a Hall symbol.
    Expand(ExpandArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Verify(args) => verify::run(&args),
        Command::Expand(args) => expand::run(&args),
    }
}

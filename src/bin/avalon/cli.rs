//! Command-line surface: a `clap`-derived `Cli`, mirroring the teacher's
//! `Cli`/`LogLevel` shape (a verbosity flag feeding `log::Level`).

use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Checks and runs Avalon source programs")]
pub struct Cli {
    /// The root source file to compile.
    pub file: std::path::PathBuf,

    /// Logging verbosity (spec.md §6 doesn't mandate a format for this; it
    /// only governs how much of the pipeline's `debug!`/`trace!` chatter
    /// reaches the terminal).
    #[arg(short, long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Arguments forwarded to the program's `__main__` entry function.
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

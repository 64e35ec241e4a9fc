//! Command-line interface

use crate::app::Options;
use crate::config::{OptionMatching, APP_NAME};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = APP_NAME, about = "A small tabbed terminal", disable_version_flag = true)]
pub struct Cli {
    /// Read configuration from this file
    #[arg(short = 'c', value_name = "config")]
    pub config: Option<PathBuf>,

    /// Start in this working directory
    #[arg(short = 'w', value_name = "workdir")]
    pub workdir: Option<PathBuf>,

    /// Execute a command instead of the shell
    #[arg(short = 'e', value_name = "command")]
    pub command: Option<String>,

    /// Fixed window title
    #[arg(short = 't', value_name = "title")]
    pub title: Option<String>,

    /// Enable debug messages
    #[arg(short = 'd')]
    pub debug: bool,

    /// Print version and exit
    #[arg(short = 'v')]
    pub version: bool,

    /// Accept only full option names in the config file
    #[arg(long = "strict-config")]
    pub strict_config: bool,
}

/// What `main` should do after parsing
#[derive(Debug)]
pub enum Command {
    Run(Box<Options>),
    /// Print to stderr and exit with status 0
    Exit(String),
}

impl Cli {
    pub fn into_options(self, argv: Vec<OsString>) -> Options {
        Options {
            config_path: self.config,
            working_dir: self.workdir,
            command: self.command,
            title: self.title,
            debug: self.debug,
            matching: if self.strict_config {
                OptionMatching::Exact
            } else {
                OptionMatching::Prefix
            },
            argv,
        }
    }
}

pub fn banner() -> String {
    format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"))
}

/// Parse `argv`. Errors, help and version all end in [`Command::Exit`].
pub fn parse<I, T>(argv: I) -> Command
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    match Cli::try_parse_from(&argv) {
        Ok(cli) if cli.version => Command::Exit(banner()),
        Ok(cli) => Command::Run(Box::new(cli.into_options(argv))),
        Err(e) => Command::Exit(e.render().to_string()),
    }
}

//! tabterm entry point

use anyhow::Result;
use tabterm::cli::{self, Command};
use tabterm::core::{ProcessLauncher, PtyFactory};
use tabterm::ui::TUI;
use tabterm::AppContext;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let options = match cli::parse(std::env::args_os()) {
        Command::Run(options) => options,
        Command::Exit(message) => {
            eprintln!("{}", message.trim_end());
            return Ok(());
        }
    };

    let filter = if options.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if let Some(path) = &options.config_path {
        log::debug!("config file: {}", path.display());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let factory = PtyFactory::new(tx)?;
    let mut app = AppContext::new(factory, Box::new(ProcessLauncher), *options);

    let mut tui = TUI::new()?;
    let result = tui.run(&mut app, &mut rx);
    drop(tui);

    app.shutdown();
    result
}

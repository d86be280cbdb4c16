//! Draftwright CLI - Follow document-creation chats from the command line.

use clap::Parser;
use draftwright_cli::commands;
use draftwright_cli::repl;
use draftwright_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v` flags.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> draftwright_cli::Result<()> {
    // Load config from the given path, or the default one (created on first use)
    let path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        let cfg = Config::default();
        cfg.save_to(&path).ok();
        cfg
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => repl::run_repl(&config, &formatter)?,
        Some(Command::Replay(args)) => commands::execute_replay(args, &config, &formatter)?,
        Some(Command::Detect(args)) => commands::execute_detect(args, &config, &formatter)?,
    }

    Ok(())
}

mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use netinv_config::Config;
use netinv_core::JsonStore;

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let cfg = netinv_config::load_config_or_default();

    let format = resolve_format(&cli.global, &cfg);
    output::init_color(resolve_color(&cli.global, &cfg));

    match cli.command {
        // Config commands don't need the inventory (or a login)
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, format),

        // Shell completions generation
        Command::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "netinv", &mut std::io::stdout());
            Ok(())
        }

        // All other commands operate on the loaded inventory
        cmd => {
            let data_path = cli
                .global
                .data_file
                .clone()
                .unwrap_or_else(|| netinv_config::data_path(&cfg));
            let store = JsonStore::new(data_path);
            let inventory = store.load();

            commands::util::authenticate(&cfg.auth, cli.global.quiet)?;

            tracing::debug!(command = ?cmd, devices = inventory.len(), "dispatching command");
            let mut ctx = commands::Context {
                inventory,
                store,
                global: &cli.global,
                format,
            };
            commands::dispatch(cmd, &mut ctx)
        }
    }
}

/// Output format: CLI flag wins, then the config default, then `table`.
fn resolve_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

fn resolve_color(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

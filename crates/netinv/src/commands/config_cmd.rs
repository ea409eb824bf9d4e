//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use netinv_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts, format: OutputFormat) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(config::load_config_or_default());
            let out = output::render_single(format, &cfg, format_toml, |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init_wizard(global),
    }
}

/// Replace stored passwords with a placeholder before display.
fn redacted(mut cfg: Config) -> Config {
    for password in cfg.auth.users.values_mut() {
        *password = "********".into();
    }
    cfg
}

fn format_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|_| format!("{cfg:#?}"))
}

fn init_wizard(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("netinv configuration");
    eprintln!("  Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let data_file: String = Input::new()
        .with_prompt("Inventory data file (empty for the default location)")
        .allow_empty(true)
        .default(
            cfg.data_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        )
        .interact_text()
        .map_err(util::prompt_err)?;
    cfg.data_file = (!data_file.trim().is_empty()).then(|| data_file.trim().into());

    let formats = &["table", "json", "json-compact", "yaml", "plain"];
    let current = formats
        .iter()
        .position(|f| *f == cfg.defaults.output)
        .unwrap_or(0);
    let selected = Select::new()
        .with_prompt("Default output format")
        .items(formats)
        .default(current)
        .interact()
        .map_err(util::prompt_err)?;
    cfg.defaults.output = formats[selected].into();

    let require_login = Confirm::new()
        .with_prompt("Require a login before inventory commands?")
        .default(!cfg.auth.users.is_empty())
        .interact()
        .map_err(util::prompt_err)?;

    if require_login {
        if !cfg.auth.users.is_empty() {
            let keep = Confirm::new()
                .with_prompt(format!("Keep the {} existing user(s)?", cfg.auth.users.len()))
                .default(true)
                .interact()
                .map_err(util::prompt_err)?;
            if !keep {
                cfg.auth.users.clear();
            }
        }
        loop {
            let username: String = Input::new()
                .with_prompt("Username (empty to finish)")
                .allow_empty(true)
                .interact_text()
                .map_err(util::prompt_err)?;
            let username = username.trim().to_string();
            if username.is_empty() {
                if cfg.auth.users.is_empty() {
                    output::warning("at least one user is needed to require a login");
                    continue;
                }
                break;
            }
            let password = rpassword::prompt_password("Password: ").map_err(CliError::Prompt)?;
            if password.is_empty() {
                output::warning("password cannot be empty");
                continue;
            }
            cfg.auth.users.insert(username, password);
        }
    } else {
        cfg.auth.users.clear();
    }

    config::save_config(&cfg)?;
    output::success(
        global.quiet,
        &format!("Configuration written to {}", config_path.display()),
    );
    Ok(())
}

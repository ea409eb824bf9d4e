//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod report_cmd;
pub mod services;
pub mod util;
pub mod vlans;

use netinv_core::{Inventory, JsonStore};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything an inventory-bound handler needs: the loaded collection,
/// its backing store, and the resolved presentation options.
pub struct Context<'a> {
    pub inventory: Inventory,
    pub store: JsonStore,
    pub global: &'a GlobalOpts,
    pub format: OutputFormat,
}

impl Context<'_> {
    /// Persist the collection after a successful mutation.
    pub fn save(&self) -> Result<(), CliError> {
        self.store.save(&self.inventory)?;
        Ok(())
    }
}

/// Dispatch an inventory-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &mut Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Add(args) => devices::handle_add(ctx, args),
        Command::List => {
            devices::handle_list(ctx);
            Ok(())
        }
        Command::Search { term } => {
            devices::handle_search(ctx, &term);
            Ok(())
        }
        Command::Show { device } => devices::handle_show(ctx, &device),
        Command::Edit { device } => devices::handle_edit(ctx, &device),
        Command::Remove { device } => devices::handle_remove(ctx, &device),
        Command::Services(args) => services::handle(ctx, args),
        Command::Vlans(args) => vlans::handle(ctx, args),
        Command::Report => {
            report_cmd::handle_report(ctx);
            Ok(())
        }
        Command::Export(args) => report_cmd::handle_export(ctx, &args),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions { .. } => unreachable!(),
    }
}

//! VLAN command handlers.

use tabled::Tabled;

use netinv_core::Vlan;

use crate::cli::{VlansArgs, VlansCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct VlanRow {
    #[tabled(rename = "ID")]
    id: u16,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Vlan> for VlanRow {
    fn from(v: &Vlan) -> Self {
        Self {
            id: v.id,
            name: v.name.clone(),
        }
    }
}

pub fn handle(ctx: &mut Context<'_>, args: VlansArgs) -> Result<(), CliError> {
    match args.command {
        VlansCommand::Add { device, id, name } => {
            let index = util::resolve_device(&ctx.inventory, &device)?;
            util::require_vlans(&ctx.inventory.records()[index])?;
            let vlan = ctx
                .inventory
                .add_vlan(index, &id, name.as_deref().unwrap_or(""))?;
            let summary = format!("{} ({})", vlan.id, vlan.name);
            ctx.save()?;
            output::success(
                ctx.global.quiet,
                &format!(
                    "Added VLAN {summary} to '{}'",
                    ctx.inventory.records()[index].name
                ),
            );
            Ok(())
        }

        // Removal stays open to every type so stale memberships left by a
        // type change can be cleaned up.
        VlansCommand::Remove { device, id } => {
            let index = util::resolve_device(&ctx.inventory, &device)?;
            let vlan = ctx.inventory.remove_vlan(index, id)?;
            ctx.save()?;
            output::success(
                ctx.global.quiet,
                &format!(
                    "Removed VLAN {} ({}) from '{}'",
                    vlan.id,
                    vlan.name,
                    ctx.inventory.records()[index].name
                ),
            );
            Ok(())
        }

        VlansCommand::List { device } => {
            let index = util::resolve_device(&ctx.inventory, &device)?;
            let rec = &ctx.inventory.records()[index];
            if rec.vlans.is_empty() {
                output::note(
                    ctx.global.quiet,
                    &format!("no VLANs configured on '{}'", rec.name),
                );
                return Ok(());
            }
            let out = output::render_list(ctx.format, &rec.vlans, |v| VlanRow::from(v), |v| {
                v.id.to_string()
            });
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

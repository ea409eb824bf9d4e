//! Service command handlers.

use crate::cli::{ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

pub fn handle(ctx: &mut Context<'_>, args: ServicesArgs) -> Result<(), CliError> {
    match args.command {
        ServicesCommand::Attach { device, service } => {
            let index = util::resolve_device(&ctx.inventory, &device)?;
            util::require_services(&ctx.inventory.records()[index])?;
            let service = util::parse_service(&service)?;
            ctx.inventory.attach_service(index, service)?;
            ctx.save()?;
            output::success(
                ctx.global.quiet,
                &format!("Attached {service} to '{}'", ctx.inventory.records()[index].name),
            );
            Ok(())
        }

        ServicesCommand::Detach { device, service } => {
            let index = util::resolve_device(&ctx.inventory, &device)?;
            let service = util::parse_service(&service)?;
            ctx.inventory.detach_service(index, service)?;
            ctx.save()?;
            output::success(
                ctx.global.quiet,
                &format!("Detached {service} from '{}'", ctx.inventory.records()[index].name),
            );
            Ok(())
        }

        ServicesCommand::List { device } => {
            let index = util::resolve_device(&ctx.inventory, &device)?;
            let rec = &ctx.inventory.records()[index];
            let services: Vec<String> = rec.services.iter().map(ToString::to_string).collect();
            if services.is_empty() {
                output::note(
                    ctx.global.quiet,
                    &format!("no services attached to '{}'", rec.name),
                );
                return Ok(());
            }
            let out = output::render_single(
                ctx.format,
                &services,
                |s| s.join("\n"),
                |s| s.join("\n"),
            );
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }
    }
}

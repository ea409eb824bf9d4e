//! Device command handlers: add, list, search, show, edit, remove.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use strum::IntoEnumIterator;
use tabled::Tabled;

use netinv_core::{
    AddressSpec, DeviceRecord, DeviceType, EditSession, Layer, NewDevice, Service, validate,
};

use crate::cli::{AddArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Mask")]
    mask: String,
    #[tabled(rename = "Layer")]
    layer: String,
    #[tabled(rename = "Services")]
    services: String,
    #[tabled(rename = "VLANs")]
    vlans: String,
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(rec: &DeviceRecord) -> Self {
        Self {
            name: rec.name.clone(),
            device_type: rec.device_type.to_string(),
            ip: rec
                .address
                .as_ref()
                .map_or_else(String::new, |a| a.value.clone()),
            mask: rec.subnet_mask.clone().unwrap_or_default(),
            layer: rec.layer.map_or_else(String::new, |l| l.to_string()),
            services: rec
                .services
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            vlans: rec
                .vlans
                .iter()
                .map(|v| v.id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub fn detail(rec: &DeviceRecord) -> String {
    let mut lines = vec![
        format!("Name:     {}", rec.name),
        format!("Type:     {}", rec.device_type),
        format!(
            "IP:       {}",
            rec.address
                .as_ref()
                .map_or_else(|| "-".into(), |a| format!("{} ({})", a.value, a.family))
        ),
        format!("Mask:     {}", rec.subnet_mask.as_deref().unwrap_or("-")),
        format!(
            "Layer:    {}",
            rec.layer.map_or_else(|| "-".into(), |l| l.to_string())
        ),
    ];
    if rec.device_type.supports_services() || !rec.services.is_empty() {
        let svcs = if rec.services.is_empty() {
            "(none)".into()
        } else {
            rec.services
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(format!("Services: {svcs}"));
    }
    if rec.device_type.supports_vlans() || !rec.vlans.is_empty() {
        if rec.vlans.is_empty() {
            lines.push("VLANs:    (none)".into());
        } else {
            lines.push("VLANs:".into());
            for vlan in &rec.vlans {
                lines.push(format!("  {:>4}  {}", vlan.id, vlan.name));
            }
        }
    }
    lines.join("\n")
}

// ── Add ─────────────────────────────────────────────────────────────

pub fn handle_add(ctx: &mut Context<'_>, args: AddArgs) -> Result<(), CliError> {
    let draft = if args.is_interactive() {
        add_wizard(ctx)?
    } else {
        draft_from_flags(&args)?
    };

    let rec = ctx.inventory.add(draft)?.clone();
    ctx.save()?;

    output::success(ctx.global.quiet, &format!("Added device '{}'", rec.name));
    if ctx.format != OutputFormat::Table {
        let out = output::render_single(ctx.format, &rec, detail, |r| r.name.clone());
        output::print_output(&out, ctx.global.quiet);
    }
    Ok(())
}

fn draft_from_flags(args: &AddArgs) -> Result<NewDevice, CliError> {
    let raw_type = args.device_type.as_deref().ok_or_else(|| CliError::Usage {
        field: "type".into(),
        reason: "required in non-interactive mode (or run `netinv add` with no flags)".into(),
    })?;
    let name = args.name.as_deref().ok_or_else(|| CliError::Usage {
        field: "name".into(),
        reason: "required in non-interactive mode (or run `netinv add` with no flags)".into(),
    })?;

    let device_type = util::parse_device_type(raw_type)?;
    let mut draft = NewDevice::new(device_type, name);

    if args.mask.is_some() && args.ip.is_none() {
        return Err(CliError::Usage {
            field: "mask".into(),
            reason: "--mask requires --ip".into(),
        });
    }
    if let Some(ref ip) = args.ip {
        draft.address = Some(AddressSpec {
            value: ip.clone(),
            mask: args.mask.clone(),
        });
    }
    if let Some(ref layer) = args.layer {
        draft.layer = Some(util::parse_layer(layer)?);
    }

    if !args.services.is_empty() {
        if !device_type.supports_services() {
            return Err(CliError::Unsupported {
                name: name.into(),
                feature: "services".into(),
                supported: "server, router, and firewall".into(),
            });
        }
        for raw in &args.services {
            let service = util::parse_service(raw)?;
            if !draft.services.contains(&service) {
                draft.services.push(service);
            }
        }
    }

    if !args.vlans.is_empty() {
        if !device_type.supports_vlans() {
            return Err(CliError::Unsupported {
                name: name.into(),
                feature: "VLANs".into(),
                supported: "switch, router, firewall, and server".into(),
            });
        }
        draft.vlans = args.vlans.iter().map(|v| util::parse_vlan_spec(v)).collect();
    }

    Ok(draft)
}

/// Interactive add: each field is prompted and re-prompted until valid,
/// so the final `Inventory::add` cannot fail on input rules.
fn add_wizard(ctx: &Context<'_>) -> Result<NewDevice, CliError> {
    eprintln!("New device\n");

    let types: Vec<DeviceType> = DeviceType::iter().collect();
    let type_labels: Vec<String> = types.iter().map(ToString::to_string).collect();
    let selected = Select::new()
        .with_prompt("Device type")
        .items(&type_labels)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    let device_type = types[selected];

    let name = loop {
        let raw: String = Input::new()
            .with_prompt("Device name")
            .interact_text()
            .map_err(util::prompt_err)?;
        match ctx.inventory.check_name(&raw, None) {
            Ok(name) => break name,
            Err(err) => output::warning(&err.to_string()),
        }
    };

    let mut draft = NewDevice::new(device_type, name);
    draft.address = prompt_address(ctx, None)?;
    draft.layer = prompt_layer(None)?;

    if device_type.supports_services() {
        let all: Vec<Service> = Service::iter().collect();
        let labels: Vec<String> = all.iter().map(ToString::to_string).collect();
        let picked = MultiSelect::new()
            .with_prompt("Services (space to toggle, enter to accept)")
            .items(&labels)
            .interact()
            .map_err(util::prompt_err)?;
        draft.services = picked.into_iter().map(|i| all[i]).collect();
    }

    if device_type.supports_vlans() {
        let mut add_more = Confirm::new()
            .with_prompt("Add a VLAN membership?")
            .default(false)
            .interact()
            .map_err(util::prompt_err)?;
        while add_more {
            let raw_id: String = Input::new()
                .with_prompt("VLAN id (1-4094)")
                .interact_text()
                .map_err(util::prompt_err)?;
            match validate::vlan_id(&raw_id) {
                Ok(id) if draft.vlans.iter().any(|v| v.id.parse() == Ok(id)) => {
                    output::warning(&format!("VLAN {id} is already listed"));
                }
                Ok(id) => {
                    let raw_name: String = Input::new()
                        .with_prompt(format!("VLAN name (empty for VLAN_{id})"))
                        .allow_empty(true)
                        .interact_text()
                        .map_err(util::prompt_err)?;
                    match validate::vlan_name(&raw_name, id) {
                        Ok(_) => draft.vlans.push(netinv_core::VlanSpec {
                            id: id.to_string(),
                            name: raw_name.trim().to_string(),
                        }),
                        Err(err) => output::warning(&err.to_string()),
                    }
                }
                Err(err) => output::warning(&err.to_string()),
            }
            add_more = Confirm::new()
                .with_prompt("Add another VLAN?")
                .default(false)
                .interact()
                .map_err(util::prompt_err)?;
        }
    }

    Ok(draft)
}

/// Prompt for an optional IP + mask, re-prompting until valid.
/// `exclude` carries the record index when editing, so a device may
/// keep its own address.
fn prompt_address(
    ctx: &Context<'_>,
    exclude: Option<usize>,
) -> Result<Option<AddressSpec>, CliError> {
    let wanted = Confirm::new()
        .with_prompt("Configure an IP address?")
        .default(true)
        .interact()
        .map_err(util::prompt_err)?;
    if !wanted {
        return Ok(None);
    }

    loop {
        let raw: String = Input::new()
            .with_prompt("IP address (IPv4 or IPv6)")
            .interact_text()
            .map_err(util::prompt_err)?;
        let (family, value) = match validate::address(&raw) {
            Ok(v) => v,
            Err(err) => {
                output::warning(&err.to_string());
                continue;
            }
        };
        if let Err(err) = ctx.inventory.check_address_unique(&value, exclude) {
            output::warning(&err.to_string());
            continue;
        }

        let mask = match family {
            netinv_core::AddressFamily::V6 => None,
            netinv_core::AddressFamily::V4 => Some(prompt_mask(&value)?),
        };
        return Ok(Some(AddressSpec { value, mask }));
    }
}

fn prompt_mask(address: &str) -> Result<String, CliError> {
    loop {
        let raw: String = Input::new()
            .with_prompt("Subnet mask")
            .interact_text()
            .map_err(util::prompt_err)?;
        match validate::subnet_mask_v4(&raw) {
            Ok(mask) => return Ok(mask),
            Err(err) => {
                output::warning(&err.to_string());
                if let Some((class, mask)) = validate::suggest_default_mask(address) {
                    output::note(false, &format!("class {class} address, typical mask {mask}"));
                }
            }
        }
    }
}

fn prompt_layer(current: Option<Layer>) -> Result<Option<Layer>, CliError> {
    let layers: Vec<Layer> = Layer::iter().collect();
    let mut labels: Vec<String> = vec!["(none)".into()];
    labels.extend(layers.iter().map(ToString::to_string));
    let default = current
        .and_then(|c| layers.iter().position(|&l| l == c))
        .map_or(0, |i| i + 1);
    let selected = Select::new()
        .with_prompt("Network layer")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(util::prompt_err)?;
    Ok((selected > 0).then(|| layers[selected - 1]))
}

// ── List / Search / Show ────────────────────────────────────────────

pub fn handle_list(ctx: &Context<'_>) {
    if ctx.inventory.is_empty() {
        output::note(ctx.global.quiet, "inventory is empty; run `netinv add`");
        return;
    }
    let out = output::render_list(
        ctx.format,
        ctx.inventory.records(),
        |r| DeviceRow::from(r),
        |r| r.name.clone(),
    );
    output::print_output(&out, ctx.global.quiet);
}

pub fn handle_search(ctx: &Context<'_>, term: &str) {
    let matches: Vec<DeviceRecord> = ctx
        .inventory
        .search(term)
        .into_iter()
        .map(|(_, rec)| rec.clone())
        .collect();
    if matches.is_empty() {
        output::note(ctx.global.quiet, &format!("no devices matching '{term}'"));
        return;
    }
    let out = output::render_list(ctx.format, &matches, |r| DeviceRow::from(r), |r| r.name.clone());
    output::print_output(&out, ctx.global.quiet);
}

pub fn handle_show(ctx: &Context<'_>, device: &str) -> Result<(), CliError> {
    let index = util::resolve_device(&ctx.inventory, device)?;
    let rec = &ctx.inventory.records()[index];
    let out = output::render_single(ctx.format, rec, detail, |r| r.name.clone());
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

// ── Remove ──────────────────────────────────────────────────────────

pub fn handle_remove(ctx: &mut Context<'_>, device: &str) -> Result<(), CliError> {
    let index = util::resolve_device(&ctx.inventory, device)?;
    let name = ctx.inventory.records()[index].name.clone();
    if !util::confirm(&format!("Delete device '{name}'?"), ctx.global.yes)? {
        output::note(ctx.global.quiet, "aborted");
        return Ok(());
    }
    ctx.inventory.remove(index);
    ctx.save()?;
    output::success(ctx.global.quiet, &format!("Removed device '{name}'"));
    Ok(())
}

// ── Edit session ────────────────────────────────────────────────────

const EDIT_MENU: &[&str] = &[
    "Name",
    "Type",
    "IP address and mask",
    "Network layer",
    "Attach service",
    "Detach service",
    "Add VLAN",
    "Remove VLAN",
    "Save and exit",
    "Discard and exit",
];

pub fn handle_edit(ctx: &mut Context<'_>, device: &str) -> Result<(), CliError> {
    let index = util::resolve_device(&ctx.inventory, device)?;
    let quiet = ctx.global.quiet;

    let saved = {
        let mut session = EditSession::begin(&mut ctx.inventory, index)
            .unwrap_or_else(|| unreachable!("index comes from find_by_name"));
        edit_loop(&mut session)?
    };

    if saved {
        ctx.save()?;
        output::success(quiet, "Changes saved");
    } else {
        output::note(quiet, "changes discarded");
    }
    Ok(())
}

fn edit_loop(session: &mut EditSession<'_>) -> Result<bool, CliError> {
    loop {
        eprintln!("\n{}\n", detail(session.draft()));
        let marker = if session.is_dirty() {
            " (unsaved changes)"
        } else {
            ""
        };
        let choice = Select::new()
            .with_prompt(format!("Edit field{marker}"))
            .items(EDIT_MENU)
            .default(0)
            .interact()
            .map_err(util::prompt_err)?;

        match choice {
            0 => {
                let raw: String = Input::new()
                    .with_prompt("New name")
                    .with_initial_text(session.draft().name.clone())
                    .interact_text()
                    .map_err(util::prompt_err)?;
                if let Err(err) = session.rename(&raw) {
                    output::warning(&err.to_string());
                }
            }
            1 => {
                let types: Vec<DeviceType> = DeviceType::iter().collect();
                let labels: Vec<String> = types.iter().map(ToString::to_string).collect();
                let current = types
                    .iter()
                    .position(|&t| t == session.draft().device_type)
                    .unwrap_or(0);
                let selected = Select::new()
                    .with_prompt("Device type")
                    .items(&labels)
                    .default(current)
                    .interact()
                    .map_err(util::prompt_err)?;
                if let Some(warning) = session.retype(types[selected]) {
                    output::warning(&warning.to_string());
                }
            }
            2 => edit_address(session)?,
            3 => {
                let layer = prompt_layer(session.draft().layer)?;
                session.set_layer(layer);
            }
            4 => edit_attach_service(session)?,
            5 => edit_detach_service(session)?,
            6 => edit_add_vlan(session)?,
            7 => edit_remove_vlan(session)?,
            8 => match session.commit() {
                Ok(()) => return Ok(true),
                Err(err) => output::warning(&format!("cannot save: {err}")),
            },
            _ => {
                if !session.is_dirty()
                    || Confirm::new()
                        .with_prompt("Discard unsaved changes?")
                        .default(false)
                        .interact()
                        .map_err(util::prompt_err)?
                {
                    session.discard();
                    return Ok(false);
                }
            }
        }
    }
}

fn edit_address(session: &mut EditSession<'_>) -> Result<(), CliError> {
    let keep_or_clear = &["Set a new address", "Clear the address"];
    let choice = Select::new()
        .with_prompt("IP address")
        .items(keep_or_clear)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    if choice == 1 {
        session
            .set_address(None)
            .unwrap_or_else(|_| unreachable!("clearing an address cannot fail"));
        return Ok(());
    }

    loop {
        let raw: String = Input::new()
            .with_prompt("IP address (IPv4 or IPv6)")
            .interact_text()
            .map_err(util::prompt_err)?;
        let (family, value) = match validate::address(&raw) {
            Ok(v) => v,
            Err(err) => {
                output::warning(&err.to_string());
                continue;
            }
        };
        let mask = match family {
            netinv_core::AddressFamily::V6 => None,
            netinv_core::AddressFamily::V4 => Some(prompt_mask(&value)?),
        };
        match session.set_address(Some(&AddressSpec { value, mask })) {
            Ok(()) => return Ok(()),
            Err(err) => output::warning(&err.to_string()),
        }
    }
}

fn edit_attach_service(session: &mut EditSession<'_>) -> Result<(), CliError> {
    let device_type = session.draft().device_type;
    if !device_type.supports_services() {
        output::warning(&format!("{device_type} devices do not support services"));
        return Ok(());
    }
    let available: Vec<Service> = Service::iter()
        .filter(|s| !session.draft().services.contains(s))
        .collect();
    if available.is_empty() {
        output::note(false, "all services are already attached");
        return Ok(());
    }
    let labels: Vec<String> = available.iter().map(ToString::to_string).collect();
    let selected = Select::new()
        .with_prompt("Attach service")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    if let Err(err) = session.attach_service(available[selected]) {
        output::warning(&err.to_string());
    }
    Ok(())
}

fn edit_detach_service(session: &mut EditSession<'_>) -> Result<(), CliError> {
    let attached: Vec<Service> = session.draft().services.iter().copied().collect();
    if attached.is_empty() {
        output::note(false, "no services attached");
        return Ok(());
    }
    let labels: Vec<String> = attached.iter().map(ToString::to_string).collect();
    let selected = Select::new()
        .with_prompt("Detach service")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    if let Err(err) = session.detach_service(attached[selected]) {
        output::warning(&err.to_string());
    }
    Ok(())
}

fn edit_add_vlan(session: &mut EditSession<'_>) -> Result<(), CliError> {
    let device_type = session.draft().device_type;
    if !device_type.supports_vlans() {
        output::warning(&format!("{device_type} devices do not support VLANs"));
        return Ok(());
    }
    let raw_id: String = Input::new()
        .with_prompt("VLAN id (1-4094)")
        .interact_text()
        .map_err(util::prompt_err)?;
    let raw_name: String = Input::new()
        .with_prompt("VLAN name (empty for the default)")
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)?;
    match session.add_vlan(&raw_id, &raw_name) {
        Ok(vlan) => output::note(false, &format!("added VLAN {} ({})", vlan.id, vlan.name)),
        Err(err) => output::warning(&err.to_string()),
    }
    Ok(())
}

fn edit_remove_vlan(session: &mut EditSession<'_>) -> Result<(), CliError> {
    let vlans = session.draft().vlans.clone();
    if vlans.is_empty() {
        output::note(false, "no VLANs configured");
        return Ok(());
    }
    let labels: Vec<String> = vlans.iter().map(|v| format!("{} ({})", v.id, v.name)).collect();
    let selected = Select::new()
        .with_prompt("Remove VLAN")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    match session.remove_vlan(vlans[selected].id) {
        Ok(vlan) => output::note(false, &format!("removed VLAN {}", vlan.id)),
        Err(err) => output::warning(&err.to_string()),
    }
    Ok(())
}

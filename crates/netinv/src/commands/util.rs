//! Shared helpers for command handlers.

use std::str::FromStr;

use netinv_config::AuthConfig;
use netinv_core::{DeviceRecord, DeviceType, Inventory, Layer, Service, VlanSpec};

use crate::error::CliError;
use crate::output;

/// Resolve a device name to its inventory index (case-insensitive exact match).
pub fn resolve_device(inventory: &Inventory, identifier: &str) -> Result<usize, CliError> {
    inventory
        .find_by_name(identifier)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "device".into(),
            identifier: identifier.into(),
            list_command: "list".into(),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(std::io::Error::other(e.to_string()))
}

// ── Flag-value parsers ──────────────────────────────────────────────

pub fn parse_device_type(raw: &str) -> Result<DeviceType, CliError> {
    DeviceType::from_str(raw.trim()).map_err(|_| CliError::Usage {
        field: "type".into(),
        reason: format!("'{raw}' is not one of pc, server, router, switch, firewall, printer"),
    })
}

pub fn parse_layer(raw: &str) -> Result<Layer, CliError> {
    Layer::from_str(raw.trim()).map_err(|_| CliError::Usage {
        field: "layer".into(),
        reason: format!(
            "'{raw}' is not one of core, distribution, access, transport, \
             application, physical, data-link, network"
        ),
    })
}

pub fn parse_service(raw: &str) -> Result<Service, CliError> {
    Service::from_str(raw.trim()).map_err(|_| CliError::Usage {
        field: "service".into(),
        reason: format!("'{raw}' is not one of dns, dhcp, web, database, mail, vpn"),
    })
}

/// Parse a `--vlan` flag value of the form `id` or `id:name`.
pub fn parse_vlan_spec(raw: &str) -> VlanSpec {
    match raw.split_once(':') {
        Some((id, name)) => VlanSpec {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
        },
        None => VlanSpec {
            id: raw.trim().to_string(),
            name: String::new(),
        },
    }
}

// ── Capability gates ────────────────────────────────────────────────

pub fn require_services(rec: &DeviceRecord) -> Result<(), CliError> {
    if rec.device_type.supports_services() {
        return Ok(());
    }
    Err(CliError::Unsupported {
        name: rec.name.clone(),
        feature: "services".into(),
        supported: "server, router, and firewall".into(),
    })
}

pub fn require_vlans(rec: &DeviceRecord) -> Result<(), CliError> {
    if rec.device_type.supports_vlans() {
        return Ok(());
    }
    Err(CliError::Unsupported {
        name: rec.name.clone(),
        feature: "VLANs".into(),
        supported: "switch, router, firewall, and server".into(),
    })
}

// ── Login gate ──────────────────────────────────────────────────────

const MAX_LOGIN_ATTEMPTS: u8 = 3;

/// Prompt for credentials when the config declares users; up to three
/// attempts before giving up.
pub fn authenticate(auth: &AuthConfig, quiet: bool) -> Result<(), CliError> {
    if !auth.required() {
        return Ok(());
    }

    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let username: String = dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let password = rpassword::prompt_password("Password: ").map_err(CliError::Prompt)?;

        if auth.verify(username.trim(), &password) {
            output::note(quiet, &format!("Welcome, {}", username.trim()));
            return Ok(());
        }

        let remaining = MAX_LOGIN_ATTEMPTS - attempt;
        if remaining > 0 {
            output::warning(&format!(
                "incorrect credentials ({remaining} attempt{} left)",
                if remaining == 1 { "" } else { "s" }
            ));
        }
    }
    Err(CliError::AuthFailed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn vlan_spec_with_and_without_name() {
        let spec = parse_vlan_spec("10:Management");
        assert_eq!(spec.id, "10");
        assert_eq!(spec.name, "Management");

        let spec = parse_vlan_spec(" 20 ");
        assert_eq!(spec.id, "20");
        assert!(spec.name.is_empty());
    }

    #[test]
    fn parsers_accept_case_insensitive_values() {
        assert_eq!(parse_device_type("Router").unwrap(), DeviceType::Router);
        assert_eq!(parse_layer("ACCESS").unwrap(), Layer::Access);
        assert_eq!(parse_service("dns").unwrap(), Service::Dns);
    }

    #[test]
    fn parsers_reject_unknown_values() {
        assert!(matches!(
            parse_device_type("toaster"),
            Err(CliError::Usage { .. })
        ));
        assert!(matches!(parse_service("ftp"), Err(CliError::Usage { .. })));
    }
}

//! Clap derive structures for the `netinv` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netinv -- inventory manager for network devices
#[derive(Debug, Parser)]
#[command(
    name = "netinv",
    version,
    about = "Manage an inventory of network devices from the command line",
    long_about = "An inventory manager for network devices (PCs, servers, routers,\n\
        switches, firewalls, printers) with validated IP/VLAN/service data,\n\
        JSON persistence, and statistical reports.\n\n\
        Run `netinv add` with no flags for the interactive wizard.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Inventory data file (overrides config)
    #[arg(long, short = 'f', env = "NETINV_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', env = "NETINV_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new device (interactive wizard when no flags are given)
    #[command(alias = "new")]
    Add(AddArgs),

    /// List all devices
    #[command(alias = "ls")]
    List,

    /// Search devices by name (case-insensitive substring)
    Search {
        /// Name or part of a name
        term: String,
    },

    /// Show one device in full
    #[command(alias = "get")]
    Show {
        /// Device name
        device: String,
    },

    /// Edit a device in an interactive session (save or discard at the end)
    Edit {
        /// Device name
        device: String,
    },

    /// Attach and detach device services
    #[command(alias = "svc")]
    Services(ServicesArgs),

    /// Manage VLAN memberships
    #[command(alias = "vlan")]
    Vlans(VlansArgs),

    /// Delete a device
    #[command(alias = "rm", alias = "delete")]
    Remove {
        /// Device name
        device: String,
    },

    /// Statistical report of the inventory
    Report,

    /// Export the inventory to a text report file
    Export(ExportArgs),

    /// Manage netinv configuration
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

// ── Add ─────────────────────────────────────────────────────────────

#[derive(Debug, Args, Default)]
pub struct AddArgs {
    /// Device type (pc, server, router, switch, firewall, printer)
    #[arg(long, short = 't', value_name = "TYPE")]
    pub device_type: Option<String>,

    /// Device name (1-50 chars; letters, digits, spaces, '-', '.', '_')
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// IP address (IPv4 or IPv6)
    #[arg(long)]
    pub ip: Option<String>,

    /// IPv4 subnet mask (required with an IPv4 --ip)
    #[arg(long)]
    pub mask: Option<String>,

    /// Network layer (core, distribution, access, transport, application,
    /// physical, data-link, network)
    #[arg(long)]
    pub layer: Option<String>,

    /// Service to attach (dns, dhcp, web, database, mail, vpn); repeatable
    #[arg(long = "service", value_name = "SERVICE")]
    pub services: Vec<String>,

    /// VLAN membership as `id` or `id:name`; repeatable
    #[arg(long = "vlan", value_name = "ID[:NAME]")]
    pub vlans: Vec<String>,
}

impl AddArgs {
    /// No flags at all means the user wants the wizard.
    pub fn is_interactive(&self) -> bool {
        self.device_type.is_none()
            && self.name.is_none()
            && self.ip.is_none()
            && self.mask.is_none()
            && self.layer.is_none()
            && self.services.is_empty()
            && self.vlans.is_empty()
    }
}

// ── Services ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServicesCommand {
    /// Attach a service to a device
    Attach {
        /// Device name
        device: String,
        /// Service (dns, dhcp, web, database, mail, vpn)
        service: String,
    },

    /// Detach a service from a device
    Detach {
        /// Device name
        device: String,
        /// Service (dns, dhcp, web, database, mail, vpn)
        service: String,
    },

    /// List the services attached to a device
    List {
        /// Device name
        device: String,
    },
}

// ── VLANs ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlansArgs {
    #[command(subcommand)]
    pub command: VlansCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlansCommand {
    /// Add a VLAN membership to a device
    Add {
        /// Device name
        device: String,
        /// VLAN id (1-4094)
        id: String,
        /// VLAN display name (defaults to VLAN_<id>)
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a VLAN membership from a device
    Remove {
        /// Device name
        device: String,
        /// VLAN id
        id: u16,
    },

    /// List the VLANs configured on a device
    List {
        /// Device name
        device: String,
    },
}

// ── Export ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination file (default: netinv-report.txt in the current directory)
    #[arg(long, short = 'O', value_name = "PATH")]
    pub out: Option<PathBuf>,
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the effective configuration (passwords masked)
    Show,

    /// Interactively create or update the config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_add_is_interactive() {
        assert!(AddArgs::default().is_interactive());
        let args = AddArgs {
            name: Some("x".into()),
            ..AddArgs::default()
        };
        assert!(!args.is_interactive());
    }
}

//! CLI error types with miette diagnostics.
//!
//! Maps core validation and store errors into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use netinv_core::{StoreError, ValidationError};

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation (core rules) ──────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(netinv::validation))]
    Invalid(#[from] ValidationError),

    /// CLI-level input problems (bad flag values, malformed specs).
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netinv::usage))]
    Usage { field: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(netinv::not_found),
        help("Run: netinv {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("'{name}' does not support {feature}")]
    #[diagnostic(
        code(netinv::unsupported),
        help("Only {supported} devices carry {feature}.")
    )]
    Unsupported {
        name: String,
        feature: String,
        supported: String,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(netinv::auth_failed),
        help(
            "Too many failed login attempts.\n\
             Users are configured in the [auth] section of the config file:\n\
             run `netinv config path` to locate it."
        )
    )]
    AuthFailed,

    // ── Persistence / configuration ──────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(netinv::store),
        help("Check permissions on the data file; run `netinv config show` for its location.")
    )]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(code(netinv::config))]
    Config(#[from] netinv_config::ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Interactive prompt failed")]
    #[diagnostic(
        code(netinv::prompt),
        help("Run in a terminal, or pass the values as flags (see --help).")
    )]
    Prompt(#[source] std::io::Error),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid(err) => match err {
                ValidationError::DuplicateName { .. }
                | ValidationError::DuplicateAddress { .. }
                | ValidationError::DuplicateVlanId { .. }
                | ValidationError::AlreadyAttached { .. } => exit_code::CONFLICT,
                _ => exit_code::USAGE,
            },
            Self::Usage { .. } | Self::Unsupported { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::AuthFailed => exit_code::AUTH,
            Self::Store(_) | Self::Config(_) | Self::Prompt(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_errors_map_to_conflict() {
        let err = CliError::from(ValidationError::DuplicateName { name: "x".into() });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn plain_validation_maps_to_usage() {
        let err = CliError::from(ValidationError::EmptyName);
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn not_found_maps_to_its_own_code() {
        let err = CliError::NotFound {
            resource_type: "device".into(),
            identifier: "x".into(),
            list_command: "list".into(),
        };
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}

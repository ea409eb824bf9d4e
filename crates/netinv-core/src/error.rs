//! Typed rejection and persistence errors.
//!
//! Every validator failure is recoverable: it leaves the record and the
//! collection untouched, and interactive callers are expected to reprompt.

use std::path::PathBuf;

use thiserror::Error;

/// A validation rejection. The display text is written to be shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    // ── Address / mask ───────────────────────────────────────────────
    #[error("{what} cannot be empty")]
    EmptyInput { what: &'static str },

    #[error("IP address must not contain whitespace")]
    ContainsWhitespace,

    #[error("{what} is not well formed")]
    BadFormat { what: &'static str },

    #[error("reserved IPv4 address: {reason}")]
    ReservedRange { reason: &'static str },

    #[error("subnet mask bits are not contiguous")]
    NonContiguousBits,

    #[error("subnet mask 0.0.0.0 is not assignable")]
    ZeroMask,

    #[error("IP address '{value}' is already assigned to another device")]
    DuplicateAddress { value: String },

    // ── Names ────────────────────────────────────────────────────────
    #[error("device name cannot be empty")]
    EmptyName,

    #[error("{what} may only contain {allowed}")]
    BadCharset {
        what: &'static str,
        allowed: &'static str,
    },

    #[error("{what} must not exceed {max} characters")]
    TooLong { what: &'static str, max: usize },

    #[error("device name '{name}' is already in use")]
    DuplicateName { name: String },

    // ── VLANs ────────────────────────────────────────────────────────
    #[error("VLAN id must be a number")]
    NotANumber,

    #[error("VLAN id must be between {min} and {max}")]
    OutOfRange { min: u16, max: u16 },

    #[error("VLAN {id} already exists on this device")]
    DuplicateVlanId { id: u16 },

    #[error("VLAN {id} is not configured on this device")]
    VlanNotFound { id: u16 },

    // ── Services ─────────────────────────────────────────────────────
    #[error("unknown service '{value}'")]
    UnknownService { value: String },

    #[error("service {service} is already attached")]
    AlreadyAttached { service: String },

    #[error("service {service} is not attached")]
    NotAttached { service: String },

    // ── Capabilities ─────────────────────────────────────────────────
    #[error("{device_type} devices do not support {feature}")]
    UnsupportedFeature {
        device_type: String,
        feature: &'static str,
    },
}

/// A persistence failure. Reported to the caller, but the in-memory
/// inventory stays authoritative for the rest of the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize inventory")]
    Serialize(#[from] serde_json::Error),
}

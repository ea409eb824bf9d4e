//! Inventory engine for the netinv CLI.
//!
//! This crate owns the domain model and the data-integrity rules for an
//! inventory of network devices:
//!
//! - **[`validate`]** — Pure validators for every raw field that can enter a
//!   record: IP addresses (with IPv4 reserved-range rejection), subnet masks
//!   (contiguous-bitmask checks plus class-based default suggestions), device
//!   names, VLAN ids/names, and service sets. Each rejection is a typed
//!   [`ValidationError`] the caller can surface verbatim.
//!
//! - **Domain model** ([`model`]) — [`DeviceRecord`] and its fixed
//!   enumerations ([`DeviceType`], [`Layer`], [`Service`]). Record-local
//!   invariants (sorted, unique VLANs; canonical service set; family-coherent
//!   address/mask pairing) are enforced by the record's own mutators.
//!
//! - **[`Inventory`]** — The owning collection. Enforces the cross-record
//!   invariants: case-insensitive name uniqueness and IP address uniqueness,
//!   with self-exclusion while editing.
//!
//! - **[`EditSession`]** — Transactional working copy for multi-step edits.
//!   Mutations apply to a draft through the same validated operations as
//!   creation; the draft replaces the original only on explicit commit.
//!
//! - **[`JsonStore`]** — Whole-file JSON persistence. Loads leniently
//!   (absent or corrupt storage yields an empty inventory) and saves
//!   atomically via a temp file renamed into place.
//!
//! No terminal I/O happens here; prompting and rendering belong to the CLI.

pub mod error;
pub mod inventory;
pub mod model;
pub mod report;
pub mod session;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{StoreError, ValidationError};
pub use inventory::{AddressSpec, Inventory, NewDevice, RetypeWarning, VlanSpec};
pub use report::Report;
pub use session::{EditSession, SessionState};
pub use store::JsonStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{AddressFamily, DeviceAddress, DeviceRecord, DeviceType, Layer, Service, Vlan};

//! The owning device collection and its cross-record invariants.
//!
//! `Inventory` is the only place that checks name uniqueness and
//! address uniqueness; per-record invariants live on
//! [`DeviceRecord`](crate::model::DeviceRecord). Every operation validates
//! first and mutates second, so a rejection never leaves partial state.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{AddressFamily, DeviceAddress, DeviceRecord, DeviceType, Layer, Service, Vlan};
use crate::validate;

/// Raw address input: the value plus an optional IPv4 mask.
///
/// The mask is required when the value turns out to be IPv4 and ignored
/// (forced absent) when it is IPv6.
#[derive(Debug, Clone, Default)]
pub struct AddressSpec {
    pub value: String,
    pub mask: Option<String>,
}

/// Raw VLAN input as collected from the user.
#[derive(Debug, Clone)]
pub struct VlanSpec {
    pub id: String,
    pub name: String,
}

/// Everything needed to create a record. Name, address, and VLAN fields are
/// raw; validation runs inside [`Inventory::add`].
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub device_type: DeviceType,
    pub name: String,
    pub address: Option<AddressSpec>,
    pub layer: Option<Layer>,
    pub services: Vec<Service>,
    pub vlans: Vec<VlanSpec>,
}

impl NewDevice {
    pub fn new(device_type: DeviceType, name: impl Into<String>) -> Self {
        Self {
            device_type,
            name: name.into(),
            address: None,
            layer: None,
            services: Vec::new(),
            vlans: Vec::new(),
        }
    }
}

/// Emitted when a type change leaves data behind that the new type does not
/// support. The data is deliberately retained; the caller decides whether to
/// surface the warning and let the user clean up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetypeWarning {
    pub old: DeviceType,
    pub new: DeviceType,
    pub stale_services: bool,
    pub stale_vlans: bool,
}

impl std::fmt::Display for RetypeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match (self.stale_services, self.stale_vlans) {
            (true, true) => "services and VLANs",
            (true, false) => "services",
            _ => "VLANs",
        };
        write!(
            f,
            "type changed from {} to {}, which does not support {what}; \
             the existing {what} were kept and can be removed by editing the device",
            self.old, self.new
        )
    }
}

/// In-memory collection of device records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    records: Vec<DeviceRecord>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from deserialized records, restoring record-local invariants
    /// that a hand-edited file may have broken.
    pub fn from_records(mut records: Vec<DeviceRecord>) -> Self {
        for rec in &mut records {
            rec.normalize();
        }
        Self { records }
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DeviceRecord> {
        self.records.get(index)
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Case-insensitive exact-name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let lowered = name.trim().to_lowercase();
        self.records
            .iter()
            .position(|r| r.name.to_lowercase() == lowered)
    }

    /// Case-insensitive substring search over names.
    pub fn search(&self, term: &str) -> Vec<(usize, &DeviceRecord)> {
        let lowered = term.trim().to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.name.to_lowercase().contains(&lowered))
            .collect()
    }

    // ── Creation ────────────────────────────────────────────────────

    /// Validate and append a new record. Fails with the first validation
    /// error encountered and inserts nothing on failure.
    pub fn add(&mut self, draft: NewDevice) -> Result<&DeviceRecord, ValidationError> {
        let name = validate::name(&draft.name, &self.names(), None)?;
        let (address, subnet_mask) = self.validated_address(draft.address.as_ref(), None)?;

        let mut vlans: Vec<Vlan> = Vec::with_capacity(draft.vlans.len());
        for spec in &draft.vlans {
            let id = validate::vlan_id(&spec.id)?;
            if vlans.iter().any(|v| v.id == id) {
                return Err(ValidationError::DuplicateVlanId { id });
            }
            let name = validate::vlan_name(&spec.name, id)?;
            vlans.push(Vlan { id, name });
        }
        vlans.sort_by_key(|v| v.id);

        self.records.push(DeviceRecord {
            device_type: draft.device_type,
            name,
            address,
            subnet_mask,
            layer: draft.layer,
            services: draft.services.into_iter().collect(),
            vlans,
        });
        Ok(self.records.last().unwrap_or_else(|| unreachable!()))
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Rename the record at `index`, enforcing uniqueness against every
    /// other record. Keeping the current name is a no-op.
    pub fn rename(&mut self, index: usize, raw: &str) -> Result<(), ValidationError> {
        if self.records[index].name == raw.trim() {
            return Ok(());
        }
        let name = validate::name(raw, &self.names(), Some(index))?;
        self.records[index].name = name;
        Ok(())
    }

    /// Replace the device type. Stale services/VLANs are retained; a warning
    /// is returned when the new type does not support data the record still
    /// carries.
    pub fn retype(&mut self, index: usize, new: DeviceType) -> Option<RetypeWarning> {
        let rec = &mut self.records[index];
        let old = rec.device_type;
        rec.device_type = new;
        retype_warning(rec, old)
    }

    /// Set, replace, or clear (`spec == None`) the address block.
    pub fn set_address(
        &mut self,
        index: usize,
        spec: Option<&AddressSpec>,
    ) -> Result<(), ValidationError> {
        let (address, subnet_mask) = self.validated_address(spec, Some(index))?;
        let rec = &mut self.records[index];
        rec.address = address;
        rec.subnet_mask = subnet_mask;
        Ok(())
    }

    /// Set or clear the network layer. Unconstrained metadata.
    pub fn set_layer(&mut self, index: usize, layer: Option<Layer>) {
        self.records[index].layer = layer;
    }

    pub fn attach_service(&mut self, index: usize, service: Service) -> Result<(), ValidationError> {
        self.records[index].attach_service(service)
    }

    pub fn detach_service(&mut self, index: usize, service: Service) -> Result<(), ValidationError> {
        self.records[index].detach_service(service)
    }

    pub fn add_vlan(
        &mut self,
        index: usize,
        raw_id: &str,
        raw_name: &str,
    ) -> Result<Vlan, ValidationError> {
        self.records[index].add_vlan(raw_id, raw_name).cloned()
    }

    pub fn remove_vlan(&mut self, index: usize, id: u16) -> Result<Vlan, ValidationError> {
        self.records[index].remove_vlan(id)
    }

    /// Remove and return the record at `index`.
    pub fn remove(&mut self, index: usize) -> DeviceRecord {
        self.records.remove(index)
    }

    /// Splice a committed edit-session draft back into the collection.
    pub(crate) fn replace(&mut self, index: usize, record: DeviceRecord) {
        self.records[index] = record;
    }

    // ── Shared validation, used by `EditSession` and interactive
    //    drivers that want to reprompt before building a full draft ──

    fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Validate a candidate name against the collection.
    pub fn check_name(
        &self,
        raw: &str,
        exclude: Option<usize>,
    ) -> Result<String, ValidationError> {
        validate::name(raw, &self.names(), exclude)
    }

    /// Enforce address uniqueness across the collection.
    pub fn check_address_unique(
        &self,
        value: &str,
        exclude: Option<usize>,
    ) -> Result<(), ValidationError> {
        for (i, rec) in self.records.iter().enumerate() {
            if Some(i) == exclude {
                continue;
            }
            if rec.address.as_ref().is_some_and(|a| a.value == value) {
                return Err(ValidationError::DuplicateAddress {
                    value: value.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Validate a raw address spec into the `(address, subnet_mask)` pair
    /// stored on a record, honouring the family/mask coherence rules:
    /// IPv4 requires a valid mask, IPv6 forces the mask absent.
    pub(crate) fn validated_address(
        &self,
        spec: Option<&AddressSpec>,
        exclude: Option<usize>,
    ) -> Result<(Option<DeviceAddress>, Option<String>), ValidationError> {
        let Some(spec) = spec else {
            return Ok((None, None));
        };

        let (family, value) = validate::address(&spec.value)?;
        self.check_address_unique(&value, exclude)?;

        let mask = match family {
            AddressFamily::V4 => {
                let raw = spec.mask.as_deref().unwrap_or("");
                Some(validate::subnet_mask_v4(raw)?)
            }
            AddressFamily::V6 => None,
        };
        Ok((Some(DeviceAddress { value, family }), mask))
    }
}

pub(crate) fn retype_warning(rec: &DeviceRecord, old: DeviceType) -> Option<RetypeWarning> {
    let new = rec.device_type;
    let stale_services = !new.supports_services() && !rec.services.is_empty();
    let stale_vlans = !new.supports_vlans() && !rec.vlans.is_empty();
    (stale_services || stale_vlans).then_some(RetypeWarning {
        old,
        new,
        stale_services,
        stale_vlans,
    })
}

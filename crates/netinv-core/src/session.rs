//! Transactional working-copy editing.
//!
//! An [`EditSession`] clones one record and applies mutations to the clone
//! through the same validated operations used at creation time. The live
//! collection only changes on [`commit`](EditSession::commit); a discarded
//! session leaves no trace. Cross-record checks (name and address
//! uniqueness) run against the live collection with the edited slot
//! excluded.

use crate::error::ValidationError;
use crate::inventory::{retype_warning, AddressSpec, Inventory, RetypeWarning};
use crate::model::{DeviceRecord, DeviceType, Layer, Service, Vlan};

/// Lifecycle of an edit session.
///
/// `Clean → Dirty` on the first successful mutation; `Dirty → Saved` on a
/// commit that passes re-validation; `→ Discarded` on explicit discard from
/// either live state. A failed commit stays `Dirty` so the caller can
/// correct the conflicting field and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Clean,
    Dirty,
    Saved,
    Discarded,
}

/// A working copy of one record, committed or discarded explicitly.
pub struct EditSession<'a> {
    inventory: &'a mut Inventory,
    index: usize,
    draft: DeviceRecord,
    state: SessionState,
}

impl<'a> EditSession<'a> {
    /// Open a session for the record at `index`. Returns `None` when the
    /// index is out of bounds.
    pub fn begin(inventory: &'a mut Inventory, index: usize) -> Option<Self> {
        let draft = inventory.get(index)?.clone();
        Some(Self {
            inventory,
            index,
            draft,
            state: SessionState::Clean,
        })
    }

    /// The draft as edited so far. Not visible in the collection until
    /// commit.
    pub fn draft(&self) -> &DeviceRecord {
        &self.draft
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty
    }

    fn mark_dirty(&mut self) {
        if self.state == SessionState::Clean {
            self.state = SessionState::Dirty;
        }
    }

    fn require_capability(
        &self,
        supported: bool,
        feature: &'static str,
    ) -> Result<(), ValidationError> {
        if supported {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedFeature {
                device_type: self.draft.device_type.to_string(),
                feature,
            })
        }
    }

    // ── Field mutations (draft only) ────────────────────────────────

    /// Rename the draft. Keeping the current name is a no-op that does not
    /// dirty the session.
    pub fn rename(&mut self, raw: &str) -> Result<(), ValidationError> {
        if self.draft.name == raw.trim() {
            return Ok(());
        }
        self.draft.name = self.inventory.check_name(raw, Some(self.index))?;
        self.mark_dirty();
        Ok(())
    }

    /// Change the draft's type, retaining stale services/VLANs per the
    /// warn-but-retain policy.
    pub fn retype(&mut self, new: DeviceType) -> Option<RetypeWarning> {
        let old = self.draft.device_type;
        if old == new {
            return None;
        }
        self.draft.device_type = new;
        self.mark_dirty();
        retype_warning(&self.draft, old)
    }

    /// Set, replace, or clear the draft's address block.
    pub fn set_address(&mut self, spec: Option<&AddressSpec>) -> Result<(), ValidationError> {
        let (address, subnet_mask) = self
            .inventory
            .validated_address(spec, Some(self.index))?;
        self.draft.address = address;
        self.draft.subnet_mask = subnet_mask;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_layer(&mut self, layer: Option<Layer>) {
        if self.draft.layer != layer {
            self.draft.layer = layer;
            self.mark_dirty();
        }
    }

    /// Attach a service to the draft. Rejected on types that do not carry
    /// services; detaching stays open so stale entries left by a type
    /// change can be cleaned up.
    pub fn attach_service(&mut self, service: Service) -> Result<(), ValidationError> {
        self.require_capability(self.draft.device_type.supports_services(), "services")?;
        self.draft.attach_service(service)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn detach_service(&mut self, service: Service) -> Result<(), ValidationError> {
        self.draft.detach_service(service)?;
        self.mark_dirty();
        Ok(())
    }

    /// Add a VLAN membership to the draft. Rejected on types that do not
    /// carry VLANs; removal stays open for stale cleanup.
    pub fn add_vlan(&mut self, raw_id: &str, raw_name: &str) -> Result<Vlan, ValidationError> {
        self.require_capability(self.draft.device_type.supports_vlans(), "VLANs")?;
        let vlan = self.draft.add_vlan(raw_id, raw_name)?.clone();
        self.mark_dirty();
        Ok(vlan)
    }

    pub fn remove_vlan(&mut self, id: u16) -> Result<Vlan, ValidationError> {
        let vlan = self.draft.remove_vlan(id)?;
        self.mark_dirty();
        Ok(vlan)
    }

    // ── Terminal transitions ────────────────────────────────────────

    /// Re-validate the draft against the live collection and splice it in.
    ///
    /// Name and address uniqueness are checked again at commit time; on
    /// failure the session stays dirty and the collection is untouched.
    pub fn commit(&mut self) -> Result<(), ValidationError> {
        self.inventory.check_name(&self.draft.name, Some(self.index))?;
        if let Some(addr) = &self.draft.address {
            self.inventory
                .check_address_unique(&addr.value, Some(self.index))?;
        }
        self.inventory.replace(self.index, self.draft.clone());
        self.state = SessionState::Saved;
        Ok(())
    }

    /// Throw the draft away. The collection is untouched.
    pub fn discard(&mut self) {
        self.state = SessionState::Discarded;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inventory::NewDevice;
    use crate::model::AddressFamily;
    use pretty_assertions::assert_eq;

    fn seeded() -> Inventory {
        let mut inv = Inventory::new();
        let mut db = NewDevice::new(DeviceType::Server, "DB01");
        db.address = Some(AddressSpec {
            value: "192.168.1.10".into(),
            mask: Some("255.255.255.0".into()),
        });
        inv.add(db).unwrap();
        inv.add(NewDevice::new(DeviceType::Switch, "SW1")).unwrap();
        inv
    }

    #[test]
    fn begin_on_bad_index_returns_none() {
        let mut inv = seeded();
        assert!(EditSession::begin(&mut inv, 5).is_none());
    }

    #[test]
    fn clean_until_first_mutation() {
        let mut inv = seeded();
        let mut session = EditSession::begin(&mut inv, 1).unwrap();
        assert_eq!(session.state(), SessionState::Clean);

        // A no-op rename does not dirty the session.
        session.rename("SW1").unwrap();
        assert_eq!(session.state(), SessionState::Clean);

        session.rename("SW-Core").unwrap();
        assert_eq!(session.state(), SessionState::Dirty);
    }

    #[test]
    fn draft_changes_are_invisible_until_commit() {
        let mut inv = seeded();
        let mut session = EditSession::begin(&mut inv, 1).unwrap();
        session.rename("SW-Core").unwrap();
        session.add_vlan("10", "Data").unwrap();
        assert_eq!(session.draft().name, "SW-Core");

        session.commit().unwrap();
        assert_eq!(session.state(), SessionState::Saved);

        let rec = inv.get(1).unwrap();
        assert_eq!(rec.name, "SW-Core");
        assert_eq!(rec.vlans.len(), 1);
    }

    #[test]
    fn discard_leaves_the_collection_untouched() {
        let mut inv = seeded();
        let mut session = EditSession::begin(&mut inv, 1).unwrap();
        session.rename("SW-Core").unwrap();
        session.discard();
        assert_eq!(session.state(), SessionState::Discarded);
        assert_eq!(inv.get(1).unwrap().name, "SW1");
    }

    #[test]
    fn edit_to_ipv6_drops_previous_mask() {
        let mut inv = seeded();
        let mut session = EditSession::begin(&mut inv, 0).unwrap();
        session
            .set_address(Some(&AddressSpec {
                value: "2001:db8::1".into(),
                mask: None,
            }))
            .unwrap();
        session.commit().unwrap();

        let rec = inv.get(0).unwrap();
        assert_eq!(rec.address.as_ref().unwrap().family, AddressFamily::V6);
        assert!(rec.subnet_mask.is_none());
    }

    #[test]
    fn session_rejects_duplicates_against_live_records() {
        let mut inv = seeded();
        let mut session = EditSession::begin(&mut inv, 1).unwrap();
        assert_eq!(
            session.rename("db01").unwrap_err(),
            ValidationError::DuplicateName { name: "db01".into() }
        );
        assert_eq!(
            session
                .set_address(Some(&AddressSpec {
                    value: "192.168.1.10".into(),
                    mask: Some("255.255.255.0".into()),
                }))
                .unwrap_err(),
            ValidationError::DuplicateAddress {
                value: "192.168.1.10".into()
            }
        );
        // Keeping its own address while editing is allowed.
        let mut own = EditSession::begin(&mut inv, 0).unwrap();
        own.set_address(Some(&AddressSpec {
            value: "192.168.1.10".into(),
            mask: Some("255.255.0.0".into()),
        }))
        .unwrap();
    }

    #[test]
    fn failed_commit_stays_dirty() {
        let mut inv = seeded();
        let mut session = EditSession::begin(&mut inv, 1).unwrap();
        session.add_vlan("10", "").unwrap();
        // Simulate a conflict introduced after the draft was edited: force
        // the draft name to collide at commit time.
        session.draft.name = "DB01".into();
        assert!(session.commit().is_err());
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(inv.get(1).unwrap().name, "SW1");

        // Correct the field and retry.
        let mut session = EditSession::begin(&mut inv, 1).unwrap();
        session.rename("SW-Fixed").unwrap();
        session.commit().unwrap();
        assert_eq!(inv.get(1).unwrap().name, "SW-Fixed");
    }

    #[test]
    fn retype_in_session_warns_but_retains() {
        let mut inv = Inventory::new();
        let mut draft = NewDevice::new(DeviceType::Router, "edge");
        draft.services = vec![Service::Vpn];
        inv.add(draft).unwrap();

        let mut session = EditSession::begin(&mut inv, 0).unwrap();
        let warning = session.retype(DeviceType::Pc).unwrap();
        assert!(warning.stale_services);
        assert!(!warning.stale_vlans);
        assert_eq!(session.draft().services.len(), 1);

        // Re-selecting the current type is a no-op.
        assert!(session.retype(DeviceType::Pc).is_none());
    }

    #[test]
    fn non_bearing_draft_rejects_service_and_vlan_additions() {
        let mut inv = Inventory::new();
        inv.add(NewDevice::new(DeviceType::Printer, "PRN01")).unwrap();

        let mut session = EditSession::begin(&mut inv, 0).unwrap();
        assert_eq!(
            session.attach_service(Service::Dns).unwrap_err(),
            ValidationError::UnsupportedFeature {
                device_type: "Printer".into(),
                feature: "services",
            }
        );
        assert_eq!(
            session.add_vlan("10", "").unwrap_err(),
            ValidationError::UnsupportedFeature {
                device_type: "Printer".into(),
                feature: "VLANs",
            }
        );
        assert_eq!(session.state(), SessionState::Clean);
    }

    #[test]
    fn stale_entries_removable_after_retype() {
        let mut inv = Inventory::new();
        let mut draft = NewDevice::new(DeviceType::Router, "edge");
        draft.services = vec![Service::Dhcp];
        draft.vlans = vec![crate::inventory::VlanSpec {
            id: "20".into(),
            name: String::new(),
        }];
        inv.add(draft).unwrap();

        let mut session = EditSession::begin(&mut inv, 0).unwrap();
        session.retype(DeviceType::Pc);

        // New additions are refused on the new type, but the leftovers can
        // still be cleared out.
        assert!(session.attach_service(Service::Dns).is_err());
        assert!(session.add_vlan("30", "").is_err());
        session.detach_service(Service::Dhcp).unwrap();
        session.remove_vlan(20).unwrap();
        session.commit().unwrap();

        let rec = inv.get(0).unwrap();
        assert!(rec.services.is_empty());
        assert!(rec.vlans.is_empty());
    }
}

// ── Device domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::ValidationError;
use crate::validate;

/// Kind of inventoried device. Determines which optional feature sets
/// (services, VLANs) are meaningful for the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum DeviceType {
    #[strum(to_string = "PC")]
    Pc,
    Server,
    Router,
    Switch,
    Firewall,
    Printer,
}

impl DeviceType {
    /// Whether attached services are meaningful for this device type.
    pub fn supports_services(self) -> bool {
        matches!(self, Self::Server | Self::Router | Self::Firewall)
    }

    /// Whether VLAN memberships are meaningful for this device type.
    pub fn supports_vlans(self) -> bool {
        matches!(self, Self::Switch | Self::Router | Self::Firewall | Self::Server)
    }
}

/// Optional network-layer classification. Pure metadata; not tied to the
/// device type in the data model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum Layer {
    Core,
    Distribution,
    Access,
    Transport,
    Application,
    Physical,
    #[strum(to_string = "Data Link", serialize = "data-link")]
    DataLink,
    Network,
}

/// A service a device can host. Semantically meaningful only for
/// service-bearing types (see [`DeviceType::supports_services`]), but the
/// field exists on every record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum Service {
    #[strum(to_string = "DNS")]
    Dns,
    #[strum(to_string = "DHCP")]
    Dhcp,
    Web,
    Database,
    Mail,
    #[strum(to_string = "VPN")]
    Vpn,
}

/// Address family of a configured IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFamily {
    #[serde(rename = "IPv4")]
    V4,
    #[serde(rename = "IPv6")]
    V6,
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// A configured IP address with its detected family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAddress {
    pub value: String,
    pub family: AddressFamily,
}

/// One VLAN membership entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    pub name: String,
}

/// One inventoried network device.
///
/// Record-local invariants are upheld by the mutators below: `vlans` stays
/// sorted ascending with unique ids, `services` is a canonical ordered set,
/// and a subnet mask is only ever paired with an IPv4 address. Cross-record
/// invariants (name and address uniqueness) live in
/// [`Inventory`](crate::Inventory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_type: DeviceType,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<DeviceAddress>,

    /// Present only when `address` is IPv4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub services: BTreeSet<Service>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlans: Vec<Vlan>,
}

impl DeviceRecord {
    /// Attach a service. Fails if it is already present.
    pub fn attach_service(&mut self, service: Service) -> Result<(), ValidationError> {
        if !self.services.insert(service) {
            return Err(ValidationError::AlreadyAttached {
                service: service.to_string(),
            });
        }
        Ok(())
    }

    /// Detach a service. Fails if it is absent.
    pub fn detach_service(&mut self, service: Service) -> Result<(), ValidationError> {
        if !self.services.remove(&service) {
            return Err(ValidationError::NotAttached {
                service: service.to_string(),
            });
        }
        Ok(())
    }

    /// Add a VLAN membership from raw id and name input, keeping the list
    /// sorted ascending by id. A blank name defaults to `VLAN_<id>`.
    pub fn add_vlan(&mut self, raw_id: &str, raw_name: &str) -> Result<&Vlan, ValidationError> {
        let id = validate::vlan_id(raw_id)?;
        if self.vlans.iter().any(|v| v.id == id) {
            return Err(ValidationError::DuplicateVlanId { id });
        }
        let name = validate::vlan_name(raw_name, id)?;

        let pos = self.vlans.partition_point(|v| v.id < id);
        self.vlans.insert(pos, Vlan { id, name });
        Ok(&self.vlans[pos])
    }

    /// Remove a VLAN membership by id.
    pub fn remove_vlan(&mut self, id: u16) -> Result<Vlan, ValidationError> {
        match self.vlans.iter().position(|v| v.id == id) {
            Some(pos) => Ok(self.vlans.remove(pos)),
            None => Err(ValidationError::VlanNotFound { id }),
        }
    }

    /// Restore record-local invariants after deserializing from storage.
    pub(crate) fn normalize(&mut self) {
        self.vlans.sort_by_key(|v| v.id);
        self.vlans.dedup_by_key(|v| v.id);
        if self
            .address
            .as_ref()
            .is_none_or(|a| a.family == AddressFamily::V6)
        {
            self.subnet_mask = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn switch(name: &str) -> DeviceRecord {
        DeviceRecord {
            device_type: DeviceType::Switch,
            name: name.into(),
            address: None,
            subnet_mask: None,
            layer: None,
            services: BTreeSet::new(),
            vlans: Vec::new(),
        }
    }

    #[test]
    fn vlans_stay_sorted_regardless_of_insertion_order() {
        let mut rec = switch("sw1");
        rec.add_vlan("30", "c").unwrap();
        rec.add_vlan("10", "a").unwrap();
        rec.add_vlan("20", "b").unwrap();
        let ids: Vec<u16> = rec.vlans.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn duplicate_vlan_id_is_rejected() {
        let mut rec = switch("sw1");
        rec.add_vlan("10", "a").unwrap();
        assert_eq!(
            rec.add_vlan("10", "again"),
            Err(ValidationError::DuplicateVlanId { id: 10 })
        );
        assert_eq!(rec.vlans.len(), 1);
    }

    #[test]
    fn blank_vlan_name_gets_deterministic_default() {
        let mut rec = switch("sw1");
        let vlan = rec.add_vlan("20", "  ").unwrap();
        assert_eq!(vlan.name, "VLAN_20");
    }

    #[test]
    fn remove_missing_vlan_fails() {
        let mut rec = switch("sw1");
        assert_eq!(
            rec.remove_vlan(99),
            Err(ValidationError::VlanNotFound { id: 99 })
        );
    }

    #[test]
    fn second_attach_fails_and_leaves_record_unchanged() {
        let mut rec = switch("sw1");
        rec.attach_service(Service::Web).unwrap();
        let before = rec.clone();
        assert!(matches!(
            rec.attach_service(Service::Web),
            Err(ValidationError::AlreadyAttached { .. })
        ));
        assert_eq!(rec, before);
    }

    #[test]
    fn detach_absent_service_fails() {
        let mut rec = switch("sw1");
        assert!(matches!(
            rec.detach_service(Service::Dns),
            Err(ValidationError::NotAttached { .. })
        ));
    }

    #[test]
    fn normalize_sorts_vlans_and_strips_ipv6_mask() {
        let mut rec = switch("sw1");
        rec.vlans = vec![
            Vlan { id: 30, name: "c".into() },
            Vlan { id: 10, name: "a".into() },
        ];
        rec.address = Some(DeviceAddress {
            value: "2001:db8::1".into(),
            family: AddressFamily::V6,
        });
        rec.subnet_mask = Some("255.0.0.0".into());
        rec.normalize();
        assert_eq!(rec.vlans[0].id, 10);
        assert!(rec.subnet_mask.is_none());
    }

    #[test]
    fn service_bearing_and_vlan_bearing_type_sets() {
        assert!(DeviceType::Server.supports_services());
        assert!(DeviceType::Router.supports_services());
        assert!(DeviceType::Firewall.supports_services());
        assert!(!DeviceType::Switch.supports_services());
        assert!(!DeviceType::Pc.supports_services());

        assert!(DeviceType::Switch.supports_vlans());
        assert!(DeviceType::Server.supports_vlans());
        assert!(!DeviceType::Printer.supports_vlans());
    }
}

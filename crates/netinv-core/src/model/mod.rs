//! Canonical domain types.

mod device;

pub use device::{AddressFamily, DeviceAddress, DeviceRecord, DeviceType, Layer, Service, Vlan};

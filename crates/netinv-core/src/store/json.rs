// ── JSON inventory storage ──
//
// Each save replaces the whole file, written to a temp file in the same
// directory and renamed into place so a crash mid-write never corrupts
// previously saved data.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::inventory::Inventory;
use crate::model::DeviceRecord;

/// File-backed inventory storage.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the inventory. An absent file yields an empty inventory; an
    /// unreadable or unparseable one is logged and treated the same, so a
    /// damaged data file never blocks the session.
    pub fn load(&self) -> Inventory {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Inventory::new();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "could not read data file, starting empty");
                return Inventory::new();
            }
        };

        match serde_json::from_str::<Vec<DeviceRecord>>(&contents) {
            Ok(records) => Inventory::from_records(records),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "data file is not valid inventory JSON, starting empty");
                Inventory::new()
            }
        }
    }

    /// Persist the full inventory atomically.
    pub fn save(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        let payload = serde_json::to_string_pretty(inventory.records())?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tmp.write_all(payload.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        tmp.persist(&self.path).map_err(|err| StoreError::Write {
            path: self.path.clone(),
            source: err.error,
        })?;

        tracing::debug!(path = %self.path.display(), devices = inventory.len(), "inventory saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inventory::{AddressSpec, NewDevice, VlanSpec};
    use crate::model::DeviceType;
    use pretty_assertions::assert_eq;

    fn store_in(dir: &Path) -> JsonStore {
        JsonStore::new(dir.join("inventory.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(dir.path()).load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_and_reload_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut inv = Inventory::new();
        let mut draft = NewDevice::new(DeviceType::Server, "DB01");
        draft.address = Some(AddressSpec {
            value: "192.168.1.10".into(),
            mask: Some("255.255.255.0".into()),
        });
        draft.layer = Some(crate::model::Layer::Access);
        draft.services = vec![crate::model::Service::Database, crate::model::Service::Web];
        draft.vlans = vec![
            VlanSpec { id: "30".into(), name: "c".into() },
            VlanSpec { id: "10".into(), name: String::new() },
        ];
        inv.add(draft).unwrap();

        store.save(&inv).unwrap();
        let reloaded = store.load();

        assert_eq!(reloaded.records(), inv.records());
        let ids: Vec<u16> = reloaded.get(0).unwrap().vlans.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![10, 30]);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut inv = Inventory::new();
        inv.add(NewDevice::new(DeviceType::Pc, "a")).unwrap();
        inv.add(NewDevice::new(DeviceType::Pc, "b")).unwrap();
        store.save(&inv).unwrap();

        inv.remove(0);
        store.save(&inv).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(0).unwrap().name, "b");
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/deeper/inventory.json"));
        store.save(&Inventory::new()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn load_normalizes_hand_edited_vlan_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(
            store.path(),
            r#"[{"device_type":"switch","name":"sw1",
                 "vlans":[{"id":30,"name":"c"},{"id":10,"name":"a"}]}]"#,
        )
        .unwrap();

        let inv = store.load();
        let ids: Vec<u16> = inv.get(0).unwrap().vlans.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![10, 30]);
    }
}

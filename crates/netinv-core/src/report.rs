//! Statistical report aggregation.
//!
//! Pure data: grouping and counting only. Terminal rendering and the text
//! export file live in the CLI.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::DeviceRecord;

/// How many example devices each breakdown group lists.
const SAMPLES_PER_GROUP: usize = 3;

/// One breakdown group with up to three sample summaries.
#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub label: String,
    pub count: usize,
    pub samples: Vec<String>,
}

/// Aggregated inventory statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    /// Per-device-type groups, descending by count.
    pub by_type: Vec<Breakdown>,
    /// Per-layer groups (including devices without a layer), descending by count.
    pub by_layer: Vec<Breakdown>,
}

impl Report {
    pub fn build(records: &[DeviceRecord]) -> Self {
        Self {
            generated_at: Utc::now(),
            total: records.len(),
            by_type: group_by_type(records),
            by_layer: group_by_layer(records),
        }
    }
}

fn address_summary(rec: &DeviceRecord) -> String {
    match (&rec.address, &rec.subnet_mask) {
        (Some(addr), Some(mask)) => format!("{} / {mask}", addr.value),
        (Some(addr), None) => addr.value.clone(),
        (None, _) => "no IP".to_owned(),
    }
}

fn services_summary(rec: &DeviceRecord) -> String {
    if rec.services.is_empty() {
        "none".to_owned()
    } else {
        rec.services
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn group_by_type(records: &[DeviceRecord]) -> Vec<Breakdown> {
    let mut groups: BTreeMap<String, Vec<&DeviceRecord>> = BTreeMap::new();
    for rec in records {
        groups
            .entry(rec.device_type.to_string())
            .or_default()
            .push(rec);
    }
    into_breakdowns(groups, |rec| {
        format!("{} ({})", rec.name, address_summary(rec))
    })
}

fn group_by_layer(records: &[DeviceRecord]) -> Vec<Breakdown> {
    let mut groups: BTreeMap<String, Vec<&DeviceRecord>> = BTreeMap::new();
    for rec in records {
        let label = rec
            .layer
            .map_or_else(|| "unassigned".to_owned(), |l| l.to_string());
        groups.entry(label).or_default().push(rec);
    }
    into_breakdowns(groups, |rec| {
        format!(
            "{} ({}) services: {}",
            rec.name,
            rec.device_type,
            services_summary(rec)
        )
    })
}

fn into_breakdowns(
    groups: BTreeMap<String, Vec<&DeviceRecord>>,
    summarize: impl Fn(&DeviceRecord) -> String,
) -> Vec<Breakdown> {
    let mut out: Vec<Breakdown> = groups
        .into_iter()
        .map(|(label, members)| Breakdown {
            label,
            count: members.len(),
            samples: members
                .iter()
                .take(SAMPLES_PER_GROUP)
                .map(|rec| summarize(rec))
                .collect(),
        })
        .collect();
    // Largest groups first; BTreeMap already fixed the tiebreak order.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inventory::{Inventory, NewDevice};
    use crate::model::{DeviceType, Layer, Service};

    fn seeded() -> Inventory {
        let mut inv = Inventory::new();
        for name in ["pc1", "pc2", "pc3", "pc4"] {
            inv.add(NewDevice::new(DeviceType::Pc, name)).unwrap();
        }
        let mut srv = NewDevice::new(DeviceType::Server, "db");
        srv.layer = Some(Layer::Access);
        srv.services = vec![Service::Database];
        inv.add(srv).unwrap();
        inv
    }

    #[test]
    fn totals_and_group_order() {
        let inv = seeded();
        let report = Report::build(inv.records());
        assert_eq!(report.total, 5);

        // Largest group first.
        assert_eq!(report.by_type[0].label, "PC");
        assert_eq!(report.by_type[0].count, 4);
        assert_eq!(report.by_type[1].label, "Server");
        assert_eq!(report.by_type[1].count, 1);
    }

    #[test]
    fn samples_are_capped_at_three() {
        let inv = seeded();
        let report = Report::build(inv.records());
        assert_eq!(report.by_type[0].samples.len(), 3);
    }

    #[test]
    fn layerless_devices_group_as_unassigned() {
        let inv = seeded();
        let report = Report::build(inv.records());
        assert_eq!(report.by_layer[0].label, "unassigned");
        assert_eq!(report.by_layer[0].count, 4);
        let access = report.by_layer.iter().find(|b| b.label == "Access").unwrap();
        assert_eq!(access.count, 1);
        assert!(access.samples[0].contains("services: Database"));
    }

    #[test]
    fn empty_inventory_reports_zeroes() {
        let report = Report::build(&[]);
        assert_eq!(report.total, 0);
        assert!(report.by_type.is_empty());
        assert!(report.by_layer.is_empty());
    }
}

//! Pure field validators.
//!
//! Every function maps a raw string to either a normalized value or a typed
//! [`ValidationError`]. The same rules run at creation and at edit time, and
//! none of them touch a record or the collection.

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::{AddressFamily, Service};

/// Inclusive VLAN id bounds per IEEE 802.1Q.
pub const VLAN_ID_MIN: u16 = 1;
pub const VLAN_ID_MAX: u16 = 4094;

const NAME_MAX: usize = 50;
const VLAN_NAME_MAX: usize = 30;

/// Historical IPv4 address class, used only for default-mask hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetClass {
    A,
    B,
    C,
}

impl std::fmt::Display for NetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
        }
    }
}

// ── Addresses ───────────────────────────────────────────────────────

/// Validate a raw IP address and detect its family.
///
/// IPv4 addresses in reserved ranges (this-network, loopback, multicast,
/// future-use, broadcast) are rejected with range-specific reasons. IPv6
/// addresses only need to parse; the returned value is the canonical
/// (compressed, lowercase) textual form.
pub fn address(raw: &str) -> Result<(AddressFamily, String), ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput { what: "IP address" });
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(ValidationError::ContainsWhitespace);
    }
    match IpAddr::from_str(trimmed) {
        Ok(IpAddr::V4(v4)) => {
            reject_reserved_v4(v4)?;
            Ok((AddressFamily::V4, v4.to_string()))
        }
        Ok(IpAddr::V6(v6)) => Ok((AddressFamily::V6, v6.to_string())),
        Err(_) => Err(ValidationError::BadFormat { what: "IP address" }),
    }
}

fn reject_reserved_v4(addr: Ipv4Addr) -> Result<(), ValidationError> {
    let first = addr.octets()[0];
    let reason = if addr == Ipv4Addr::BROADCAST {
        "255.255.255.255 is the broadcast address"
    } else if first == 0 {
        "0.x.x.x means 'this network'"
    } else if first == 127 {
        "127.x.x.x is the loopback range"
    } else if (224..=239).contains(&first) {
        "224-239 is the multicast range"
    } else if first >= 240 {
        "240-255 is reserved for future use"
    } else {
        return Ok(());
    };
    Err(ValidationError::ReservedRange { reason })
}

/// Validate an IPv4 subnet mask as a contiguous bitmask dotted quad.
///
/// Returns the normalized `a.b.c.d` form.
pub fn subnet_mask_v4(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput { what: "subnet mask" });
    }

    let mut octets = [0u8; 4];
    let mut parts = trimmed.split('.');
    for slot in &mut octets {
        let part = parts
            .next()
            .ok_or(ValidationError::BadFormat { what: "subnet mask" })?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::BadFormat { what: "subnet mask" });
        }
        *slot = part
            .parse()
            .map_err(|_| ValidationError::BadFormat { what: "subnet mask" })?;
    }
    if parts.next().is_some() {
        return Err(ValidationError::BadFormat { what: "subnet mask" });
    }

    let bits = u32::from_be_bytes(octets);
    if bits == 0 {
        return Err(ValidationError::ZeroMask);
    }
    // A valid mask is a prefix of 1s followed only by 0s.
    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(ValidationError::NonContiguousBits);
    }

    Ok(format!(
        "{}.{}.{}.{}",
        octets[0], octets[1], octets[2], octets[3]
    ))
}

/// Classify an IPv4 address and suggest its classful default mask.
///
/// Only used as a hint when mask validation fails; the suggestion is never
/// silently applied.
pub fn suggest_default_mask(v4: &str) -> Option<(NetClass, &'static str)> {
    let addr = Ipv4Addr::from_str(v4.trim()).ok()?;
    match addr.octets()[0] {
        1..=126 => Some((NetClass::A, "255.0.0.0")),
        128..=191 => Some((NetClass::B, "255.255.0.0")),
        192..=223 => Some((NetClass::C, "255.255.255.0")),
        _ => None,
    }
}

// ── Names ───────────────────────────────────────────────────────────

fn name_char_ok(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '.' | '_')
}

/// Validate a device name against charset, length, and case-insensitive
/// uniqueness. `exclude` skips the record's own slot while editing.
pub fn name(
    raw: &str,
    existing: &[&str],
    exclude: Option<usize>,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !trimmed.chars().all(name_char_ok) {
        return Err(ValidationError::BadCharset {
            what: "device name",
            allowed: "letters, digits, spaces, '-', '.' and '_'",
        });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(ValidationError::TooLong {
            what: "device name",
            max: NAME_MAX,
        });
    }

    let lowered = trimmed.to_lowercase();
    for (i, other) in existing.iter().enumerate() {
        if Some(i) == exclude {
            continue;
        }
        if other.to_lowercase() == lowered {
            return Err(ValidationError::DuplicateName {
                name: trimmed.to_owned(),
            });
        }
    }

    Ok(trimmed.to_owned())
}

// ── VLANs ───────────────────────────────────────────────────────────

/// Validate a raw VLAN id as a number in `[VLAN_ID_MIN, VLAN_ID_MAX]`.
pub fn vlan_id(raw: &str) -> Result<u16, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotANumber);
    }
    let out_of_range = ValidationError::OutOfRange {
        min: VLAN_ID_MIN,
        max: VLAN_ID_MAX,
    };
    let id: u16 = trimmed.parse().map_err(|_| out_of_range.clone())?;
    if !(VLAN_ID_MIN..=VLAN_ID_MAX).contains(&id) {
        return Err(out_of_range);
    }
    Ok(id)
}

/// Validate a VLAN display name. Blank input yields the deterministic
/// default `VLAN_<id>`. Dots are not part of the VLAN-name charset.
pub fn vlan_name(raw: &str, id: u16) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(format!("VLAN_{id}"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_'))
    {
        return Err(ValidationError::BadCharset {
            what: "VLAN name",
            allowed: "letters, digits, spaces, '-' and '_'",
        });
    }
    if trimmed.chars().count() > VLAN_NAME_MAX {
        return Err(ValidationError::TooLong {
            what: "VLAN name",
            max: VLAN_NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

// ── Services ────────────────────────────────────────────────────────

/// Parse a set of raw service identifiers against the fixed enumeration.
///
/// The `Service` enum makes invalid values unrepresentable in a record; this
/// entry point exists for raw string ingestion at the CLI and persistence
/// boundaries.
pub fn service_set<S: AsRef<str>>(values: &[S]) -> Result<Vec<Service>, ValidationError> {
    values
        .iter()
        .map(|v| {
            Service::from_str(v.as_ref().trim()).map_err(|_| ValidationError::UnknownService {
                value: v.as_ref().trim().to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── address ─────────────────────────────────────────────────────

    #[test]
    fn accepts_plain_unicast_v4() {
        assert_eq!(
            address("192.168.1.10").unwrap(),
            (AddressFamily::V4, "192.168.1.10".to_owned())
        );
        assert_eq!(address("10.0.0.1").unwrap().0, AddressFamily::V4);
        assert_eq!(address("172.16.5.4").unwrap().0, AddressFamily::V4);
    }

    #[test]
    fn accepts_and_normalizes_v6() {
        let (family, value) = address("2001:DB8:0:0:0:0:0:1").unwrap();
        assert_eq!(family, AddressFamily::V6);
        assert_eq!(value, "2001:db8::1");
    }

    #[test]
    fn rejects_blank_and_spaced_input() {
        assert_eq!(
            address("   "),
            Err(ValidationError::EmptyInput { what: "IP address" })
        );
        assert_eq!(
            address("192.168. 1.1"),
            Err(ValidationError::ContainsWhitespace)
        );
    }

    #[test]
    fn rejects_garbage_address() {
        assert_eq!(
            address("not-an-ip"),
            Err(ValidationError::BadFormat { what: "IP address" })
        );
        assert_eq!(
            address("300.1.1.1"),
            Err(ValidationError::BadFormat { what: "IP address" })
        );
    }

    #[test]
    fn reserved_ranges_are_rejected_with_distinct_reasons() {
        let reason = |input: &str| match address(input) {
            Err(ValidationError::ReservedRange { reason }) => reason,
            other => panic!("expected ReservedRange for {input}, got {other:?}"),
        };
        assert!(reason("0.1.2.3").contains("this network"));
        assert!(reason("127.0.0.1").contains("loopback"));
        assert!(reason("224.0.0.5").contains("multicast"));
        assert!(reason("239.255.255.250").contains("multicast"));
        assert!(reason("240.0.0.1").contains("future"));
        assert!(reason("255.255.255.255").contains("broadcast"));
    }

    #[test]
    fn loopback_range_is_rejected_beyond_the_well_known_address() {
        assert!(matches!(
            address("127.45.0.9"),
            Err(ValidationError::ReservedRange { .. })
        ));
    }

    // ── subnet_mask_v4 ──────────────────────────────────────────────

    #[test]
    fn accepts_common_masks() {
        assert_eq!(subnet_mask_v4("255.255.255.0").unwrap(), "255.255.255.0");
        assert_eq!(subnet_mask_v4("255.0.0.0").unwrap(), "255.0.0.0");
        assert_eq!(subnet_mask_v4("255.255.255.252").unwrap(), "255.255.255.252");
        assert_eq!(subnet_mask_v4("255.255.255.255").unwrap(), "255.255.255.255");
    }

    #[test]
    fn rejects_non_contiguous_bits() {
        assert_eq!(
            subnet_mask_v4("255.0.255.0"),
            Err(ValidationError::NonContiguousBits)
        );
        assert_eq!(
            subnet_mask_v4("255.255.255.1"),
            Err(ValidationError::NonContiguousBits)
        );
        assert_eq!(
            subnet_mask_v4("0.255.0.0"),
            Err(ValidationError::NonContiguousBits)
        );
    }

    #[test]
    fn rejects_zero_mask() {
        assert_eq!(subnet_mask_v4("0.0.0.0"), Err(ValidationError::ZeroMask));
    }

    #[test]
    fn rejects_malformed_masks() {
        for bad in ["255.255.255", "255.255.255.0.0", "255.256.0.0", "a.b.c.d", "255,255,255,0"] {
            assert_eq!(
                subnet_mask_v4(bad),
                Err(ValidationError::BadFormat { what: "subnet mask" }),
                "input: {bad}"
            );
        }
    }

    // ── suggest_default_mask ────────────────────────────────────────

    #[test]
    fn classful_defaults() {
        assert_eq!(
            suggest_default_mask("10.1.2.3"),
            Some((NetClass::A, "255.0.0.0"))
        );
        assert_eq!(
            suggest_default_mask("172.16.0.1"),
            Some((NetClass::B, "255.255.0.0"))
        );
        assert_eq!(
            suggest_default_mask("192.168.1.1"),
            Some((NetClass::C, "255.255.255.0"))
        );
    }

    #[test]
    fn no_suggestion_outside_classes() {
        assert_eq!(suggest_default_mask("127.0.0.1"), None);
        assert_eq!(suggest_default_mask("230.0.0.1"), None);
        assert_eq!(suggest_default_mask("not-v4"), None);
    }

    // ── name ────────────────────────────────────────────────────────

    #[test]
    fn name_rules() {
        assert_eq!(name("  Core-SW.01 ", &[], None).unwrap(), "Core-SW.01");
        assert_eq!(name("", &[], None), Err(ValidationError::EmptyName));
        assert!(matches!(
            name("bad!name", &[], None),
            Err(ValidationError::BadCharset { .. })
        ));
        assert!(matches!(
            name(&"x".repeat(51), &[], None),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
    }

    #[test]
    fn duplicate_name_is_case_insensitive_with_self_exclusion() {
        let existing = ["Core1"];
        assert_eq!(
            name("core1", &existing, None),
            Err(ValidationError::DuplicateName {
                name: "core1".into()
            })
        );
        // Editing index 0: comparing against itself is skipped.
        assert_eq!(name("core1", &existing, Some(0)).unwrap(), "core1");
    }

    // ── vlan_id / vlan_name ─────────────────────────────────────────

    #[test]
    fn vlan_id_bounds() {
        assert_eq!(vlan_id("1").unwrap(), 1);
        assert_eq!(vlan_id("4094").unwrap(), 4094);
        assert_eq!(
            vlan_id("0"),
            Err(ValidationError::OutOfRange { min: 1, max: 4094 })
        );
        assert_eq!(
            vlan_id("4095"),
            Err(ValidationError::OutOfRange { min: 1, max: 4094 })
        );
        assert_eq!(
            vlan_id("99999"),
            Err(ValidationError::OutOfRange { min: 1, max: 4094 })
        );
        assert_eq!(vlan_id("abc"), Err(ValidationError::NotANumber));
        assert_eq!(vlan_id("-5"), Err(ValidationError::NotANumber));
        assert_eq!(vlan_id(""), Err(ValidationError::NotANumber));
    }

    #[test]
    fn vlan_name_defaults_and_rules() {
        assert_eq!(vlan_name("", 20).unwrap(), "VLAN_20");
        assert_eq!(vlan_name("Data", 10).unwrap(), "Data");
        // Dots are valid in device names but not in VLAN names.
        assert!(matches!(
            vlan_name("bad.name", 10),
            Err(ValidationError::BadCharset { .. })
        ));
        assert!(matches!(
            vlan_name(&"v".repeat(31), 10),
            Err(ValidationError::TooLong { max: 30, .. })
        ));
    }

    // ── service_set ─────────────────────────────────────────────────

    #[test]
    fn parses_known_services_case_insensitively() {
        let parsed = service_set(&["dns", "WEB", "Vpn"]).unwrap();
        assert_eq!(parsed, vec![Service::Dns, Service::Web, Service::Vpn]);
    }

    #[test]
    fn unknown_service_is_rejected() {
        assert_eq!(
            service_set(&["dns", "ftp"]),
            Err(ValidationError::UnknownService { value: "ftp".into() })
        );
    }
}

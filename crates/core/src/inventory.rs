//! Switch roles and input validation for inventory entities.
//!
//! Handlers call these before touching the database so that malformed
//! input surfaces as [`CoreError::Validation`] instead of a constraint error.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a project name, switch name, or SFP serial.
pub const MAX_NAME_LENGTH: usize = 200;

/// Number of physical ports on a White Rabbit switch.
pub const MAX_PORT_NUM: i32 = 18;

/// Highest assignable 802.1Q VLAN id.
pub const MAX_VLAN_ID: i32 = 4094;

/// Six hex octets with one separator style throughout.
static MAC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5}|[0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){5})$")
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Switch roles
// ---------------------------------------------------------------------------

/// Position of a switch in the timing hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchRole {
    Grandmaster,
    Master,
    #[serde(rename = "Boundary Clock")]
    BoundaryClock,
    Slave,
}

impl SwitchRole {
    pub const ALL: [SwitchRole; 4] = [
        SwitchRole::Grandmaster,
        SwitchRole::Master,
        SwitchRole::BoundaryClock,
        SwitchRole::Slave,
    ];

    /// The label stored in the `switches.role` column.
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchRole::Grandmaster => "Grandmaster",
            SwitchRole::Master => "Master",
            SwitchRole::BoundaryClock => "Boundary Clock",
            SwitchRole::Slave => "Slave",
        }
    }

    pub fn is_grandmaster(self) -> bool {
        self == SwitchRole::Grandmaster
    }
}

impl fmt::Display for SwitchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwitchRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SwitchRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = SwitchRole::ALL.iter().map(|r| r.as_str()).collect();
                CoreError::Validation(format!(
                    "Unknown switch role '{s}'. Expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a display name (project name, switch name, SFP serial).
///
/// `field` is used in the error message, e.g. `"Switch name"`.
pub fn validate_name(field: &str, name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(CoreError::Validation(format!(
            "{field} must not contain control characters"
        )));
    }
    Ok(())
}

/// Validate a port number against the switch port count.
pub fn validate_port_number(port_num: i32) -> Result<(), CoreError> {
    if !(1..=MAX_PORT_NUM).contains(&port_num) {
        return Err(CoreError::Validation(format!(
            "Port number {port_num} is out of range (1-{MAX_PORT_NUM})"
        )));
    }
    Ok(())
}

/// Validate a VLAN id. `0` is accepted and means untagged.
pub fn validate_vlan(vlan: i32) -> Result<(), CoreError> {
    if !(0..=MAX_VLAN_ID).contains(&vlan) {
        return Err(CoreError::Validation(format!(
            "VLAN id {vlan} is out of range (0-{MAX_VLAN_ID})"
        )));
    }
    Ok(())
}

/// Collapse the two spellings of "untagged" (`None` and `Some(0)`) into `None`.
pub fn normalize_vlan(vlan: Option<i32>) -> Option<i32> {
    vlan.filter(|v| *v != 0)
}

/// Validate a MAC address and return it in upper-case, colon-separated form.
pub fn validate_mac(mac: &str) -> Result<String, CoreError> {
    let trimmed = mac.trim();
    if !MAC_RE.is_match(trimmed) {
        return Err(CoreError::Validation(format!(
            "Invalid MAC address '{mac}'. Expected six hex octets, e.g. AA:BB:CC:00:00:01"
        )));
    }
    Ok(trimmed.replace('-', ":").to_ascii_uppercase())
}

/// Validate an IPv4 or IPv6 address literal.
pub fn validate_ip(ip: &str) -> Result<(), CoreError> {
    ip.trim()
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| CoreError::Validation(format!("Invalid IP address '{ip}'")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn role_round_trips_through_label() {
        for role in SwitchRole::ALL {
            assert_eq!(role.as_str().parse::<SwitchRole>().unwrap(), role);
        }
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(
            "boundary clock".parse::<SwitchRole>().unwrap(),
            SwitchRole::BoundaryClock
        );
    }

    #[test]
    fn unknown_role_rejected() {
        assert_matches!("Router".parse::<SwitchRole>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_grandmaster_is_grandmaster() {
        assert!(SwitchRole::Grandmaster.is_grandmaster());
        assert!(!SwitchRole::BoundaryClock.is_grandmaster());
    }

    #[test]
    fn role_serializes_as_label() {
        let json = serde_json::to_string(&SwitchRole::BoundaryClock).unwrap();
        assert_eq!(json, "\"Boundary Clock\"");
    }

    #[test]
    fn empty_name_rejected() {
        assert!(validate_name("Switch name", "   ").is_err());
        assert!(validate_name("Switch name", "WRS-1").is_ok());
    }

    #[test]
    fn long_name_rejected() {
        let name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_name("Project name", &name).is_err());
    }

    #[test]
    fn control_characters_in_name_rejected() {
        assert_matches!(
            validate_name("Switch name", "WRS-1\nCONFIG_WR_NODE_MAC=\"x\""),
            Err(CoreError::Validation(msg)) if msg.contains("control characters")
        );
        assert!(validate_name("SFP serial", "SFP\t100").is_err());
        assert!(validate_name("Project name", "Lab\u{0}A").is_err());
        // Surrounding whitespace is trimmed, not rejected.
        assert!(validate_name("Switch name", " WRS-1\n").is_ok());
    }

    #[test]
    fn port_number_bounds() {
        assert!(validate_port_number(0).is_err());
        assert!(validate_port_number(1).is_ok());
        assert!(validate_port_number(MAX_PORT_NUM).is_ok());
        assert!(validate_port_number(MAX_PORT_NUM + 1).is_err());
    }

    #[test]
    fn vlan_bounds_and_untagged() {
        assert!(validate_vlan(0).is_ok());
        assert!(validate_vlan(4094).is_ok());
        assert!(validate_vlan(4095).is_err());
        assert!(validate_vlan(-1).is_err());
        assert_eq!(normalize_vlan(Some(0)), None);
        assert_eq!(normalize_vlan(Some(100)), Some(100));
        assert_eq!(normalize_vlan(None), None);
    }

    #[test]
    fn mac_normalized_to_upper_colon_form() {
        assert_eq!(
            validate_mac("aa-bb-cc-00-00-01").unwrap(),
            "AA:BB:CC:00:00:01"
        );
        assert_eq!(
            validate_mac(" AA:BB:CC:00:00:01 ").unwrap(),
            "AA:BB:CC:00:00:01"
        );
    }

    #[test]
    fn malformed_mac_rejected() {
        assert!(validate_mac("AA:BB:CC:00:00").is_err());
        assert!(validate_mac("GG:BB:CC:00:00:01").is_err());
    }

    #[test]
    fn mixed_mac_separators_rejected() {
        assert!(validate_mac("AA:BB-CC:00-00:01").is_err());
        assert!(validate_mac("AA-BB-CC-00-00:01").is_err());
    }

    #[test]
    fn ip_literals() {
        assert!(validate_ip("192.168.1.10").is_ok());
        assert!(validate_ip("fe80::1").is_ok());
        assert!(validate_ip("wrs-1.local").is_err());
    }
}

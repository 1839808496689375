// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the lease model.

#[cfg(test)]
mod tests {
    use crate::lease::{canonical_mac, Lease, LeaseType};

    fn lease(hostname: Option<&str>, ipv4: &str, mac: &str) -> Lease {
        Lease {
            hostname: hostname.map(str::to_string),
            interface: "LAN".to_string(),
            ipv4: ipv4.to_string(),
            mac: mac.to_string(),
            lease_type: LeaseType::Dynamic,
        }
    }

    #[test]
    fn test_canonical_mac_colon_notation() {
        assert_eq!(canonical_mac("AA:BB:CC:DD:EE:FF"), "aa-bb-cc-dd-ee-ff");
    }

    #[test]
    fn test_canonical_mac_dash_notation() {
        assert_eq!(canonical_mac("00-11-22-33-44-5A"), "00-11-22-33-44-5a");
    }

    #[test]
    fn test_canonical_mac_dotted_notation() {
        assert_eq!(canonical_mac("0011.2233.445a"), "00-11-22-33-44-5a");
    }

    #[test]
    fn test_canonical_mac_bare_notation() {
        assert_eq!(canonical_mac("001122AABBCC"), "00-11-22-aa-bb-cc");
    }

    #[test]
    fn test_canonical_mac_irregular_input_is_lowercased() {
        assert_eq!(canonical_mac("AA:BB:CC"), "aa-bb-cc");
    }

    #[test]
    fn test_hostname_empty_is_none() {
        assert_eq!(lease(Some(""), "10.0.0.1", "aa:bb").hostname(), None);
        assert_eq!(lease(None, "10.0.0.1", "aa:bb").hostname(), None);
        assert_eq!(
            lease(Some("server1"), "10.0.0.1", "aa:bb").hostname(),
            Some("server1")
        );
    }

    #[test]
    fn test_well_formed_requires_address_and_mac() {
        assert!(lease(None, "10.0.0.1", "aa:bb:cc:dd:ee:ff").is_well_formed());
        assert!(!lease(None, "", "aa:bb:cc:dd:ee:ff").is_well_formed());
        assert!(!lease(None, "10.0.0.1", "").is_well_formed());
    }

    #[test]
    fn test_lease_type_serde() {
        let json = serde_json::to_string(&LeaseType::Static).unwrap();
        assert_eq!(json, "\"static\"");

        let parsed: LeaseType = serde_json::from_str("\"dynamic\"").unwrap();
        assert_eq!(parsed, LeaseType::Dynamic);
    }
}

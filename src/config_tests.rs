// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for settings and zone configuration parsing.

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::errors::ConfigError;
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    const OUT_DIR: &str = "/var/lib/bind";

    fn lan_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ZONE_LAN_IFACE", "LAN"),
            ("ZONE_LAN_DOMAIN", "lan.example.com."),
            ("ZONE_LAN_SOA_PRIMARY", "ns1.example.com."),
            ("ZONE_LAN_SOA_RESPONSIBLE", "hostmaster.example.com."),
            ("ZONE_LAN_NS", "ns1.example.com.,ns2.example.com."),
        ]
    }

    fn reverse_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ZONE_RLAN_IFACE", "LAN"),
            ("ZONE_RLAN_TYPE", "rdns"),
            ("ZONE_RLAN_PREFIX", "10.0."),
            ("ZONE_RLAN_DOMAIN", "lan.example.com."),
            ("ZONE_RLAN_SOA_PRIMARY", "ns1.example.com."),
            ("ZONE_RLAN_SOA_RESPONSIBLE", "hostmaster.example.com."),
            ("ZONE_RLAN_NS", "ns1.example.com."),
        ]
    }

    fn without(vars: Vec<(&'static str, &'static str)>, name: &str) -> Vec<(&'static str, &'static str)> {
        vars.into_iter().filter(|(k, _)| *k != name).collect()
    }

    fn with(
        mut vars: Vec<(&'static str, &'static str)>,
        name: &'static str,
        value: &'static str,
    ) -> Vec<(&'static str, &'static str)> {
        vars.retain(|(k, _)| *k != name);
        vars.push((name, value));
        vars
    }

    // =====================================================
    // Forward zones
    // =====================================================

    #[test]
    fn test_parse_default_zone() {
        let zones = parse_zone_configurations(lan_vars(), Path::new(OUT_DIR)).unwrap();
        assert_eq!(zones.len(), 1);

        let zone = &zones[0];
        assert_eq!(zone.key, "LAN");
        assert_eq!(zone.domain, "lan.example.com.");
        assert_eq!(zone.origin, "lan.example.com");
        assert_eq!(zone.firewall_interface, "LAN");
        assert_eq!(zone.output_path, PathBuf::from("/var/lib/bind/db.lan.example.com"));
        assert_eq!(zone.ttl, 300);
        assert!(!zone.static_only);
        assert_eq!(
            zone.soa,
            SoaConfig {
                name_servers: vec!["ns1.example.com.".into(), "ns2.example.com.".into()],
                person: "hostmaster.example.com.".into(),
                primary_ns: "ns1.example.com.".into(),
            }
        );
        assert_eq!(
            zone.kind,
            ZoneKind::Default {
                records: RecordToggles {
                    include_hostname: true,
                    include_mac: true,
                }
            }
        );
        assert_eq!(zone.kind_name(), "default");
    }

    #[test]
    fn test_include_is_case_insensitive() {
        let vars = with(lan_vars(), "ZONE_LAN_INCLUDE", " MAC ");
        let zones = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap();

        assert_eq!(
            zones[0].kind,
            ZoneKind::Default {
                records: RecordToggles {
                    include_hostname: false,
                    include_mac: true,
                }
            }
        );
    }

    #[test]
    fn test_static_only_flag() {
        let vars = with(lan_vars(), "ZONE_LAN_STATIC_ONLY", "true");
        let zones = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap();
        assert!(zones[0].static_only);

        let vars = with(lan_vars(), "ZONE_LAN_STATIC_ONLY", "yes");
        let zones = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap();
        assert!(!zones[0].static_only);
    }

    #[test]
    fn test_record_ttl_applies_to_all_zones() {
        let mut vars = lan_vars();
        vars.extend(reverse_vars());
        vars.push(("RECORD_TTL", "60"));

        let zones = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap();
        assert!(zones.iter().all(|z| z.ttl == 60));
    }

    #[test]
    fn test_record_ttl_must_be_positive() {
        let mut vars = lan_vars();
        vars.push(("RECORD_TTL", "0"));

        let err = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "RECORD_TTL"));
    }

    #[test]
    fn test_name_servers_skip_empty_items() {
        let vars = with(lan_vars(), "ZONE_LAN_NS", "ns1.example.com.,,");
        let zones = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap();
        assert_eq!(zones[0].soa.name_servers, vec!["ns1.example.com.".to_string()]);
    }

    #[test]
    fn test_name_servers_must_not_be_empty() {
        let vars = with(lan_vars(), "ZONE_LAN_NS", ",");
        let err = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "ZONE_LAN_NS"));
    }

    #[test]
    fn test_missing_required_variable() {
        let vars = without(lan_vars(), "ZONE_LAN_IFACE");
        let err = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVariable {
                name: "ZONE_LAN_IFACE".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_record_names() {
        for bad in ["", "localhost", "ns1 .example.com."] {
            let vars = with(lan_vars(), "ZONE_LAN_SOA_PRIMARY", bad);
            let err = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "ZONE_LAN_SOA_PRIMARY"),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_zone_type() {
        let vars = with(lan_vars(), "ZONE_LAN_TYPE", "forward");
        let err = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "ZONE_LAN_TYPE"));
    }

    // =====================================================
    // Reverse zones
    // =====================================================

    #[test]
    fn test_parse_reverse_zone() {
        let zones = parse_zone_configurations(reverse_vars(), Path::new(OUT_DIR)).unwrap();
        let zone = &zones[0];

        assert_eq!(zone.key, "RLAN");
        assert_eq!(zone.origin, "0.10.in-addr.arpa");
        assert_eq!(
            zone.output_path,
            PathBuf::from("/var/lib/bind/db.10.0.in-addr.arpa")
        );
        assert_eq!(
            zone.kind,
            ZoneKind::Reverse {
                ptr_subnet: "10.0.".to_string()
            }
        );
        assert_eq!(zone.kind_name(), "reverse");
    }

    #[test]
    fn test_reverse_zone_requires_prefix() {
        let vars = without(reverse_vars(), "ZONE_RLAN_PREFIX");
        let err = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVariable {
                name: "ZONE_RLAN_PREFIX".to_string()
            }
        );
    }

    #[test]
    fn test_reverse_zone_prefix_format() {
        for good in ["10.", "10.0.", "192.168.1."] {
            let vars = with(reverse_vars(), "ZONE_RLAN_PREFIX", good);
            assert!(
                parse_zone_configurations(vars, Path::new(OUT_DIR)).is_ok(),
                "'{good}' should be accepted"
            );
        }

        for bad in ["10.0", "10.0.0.0.", "1000.", "a.b.", ".", ""] {
            let vars = with(reverse_vars(), "ZONE_RLAN_PREFIX", bad);
            assert!(
                parse_zone_configurations(vars, Path::new(OUT_DIR)).is_err(),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_reverse_origin() {
        assert_eq!(reverse_origin("10."), "10.in-addr.arpa");
        assert_eq!(reverse_origin("10.0."), "0.10.in-addr.arpa");
        assert_eq!(reverse_origin("192.168.1."), "1.168.192.in-addr.arpa");
    }

    // =====================================================
    // Zone discovery
    // =====================================================

    #[test]
    fn test_zones_sorted_by_key_and_unrelated_vars_ignored() {
        let mut vars = reverse_vars();
        vars.extend(lan_vars());
        vars.push(("ZONES_DIR", "/tmp"));
        vars.push(("ZONE_", "x"));
        vars.push(("ZONE_lower_IFACE", "x"));
        vars.push(("PATH", "/usr/bin"));

        let zones = parse_zone_configurations(vars, Path::new(OUT_DIR)).unwrap();
        let keys: Vec<&str> = zones.iter().map(|z| z.key.as_str()).collect();
        assert_eq!(keys, vec!["LAN", "RLAN"]);
    }

    #[test]
    fn test_no_zone_variables() {
        let zones =
            parse_zone_configurations(vec![("HOME", "/root")], Path::new(OUT_DIR)).unwrap();
        assert!(zones.is_empty());
    }

    // =====================================================
    // Settings
    // =====================================================

    fn cli(out_dir: &Path, extra: &[&str]) -> CliArgs {
        let mut argv = vec![
            "hibiscus".to_string(),
            "--out-dir".to_string(),
            out_dir.display().to_string(),
            "--opnsense-url".to_string(),
            "https://fw.example.com/api/".to_string(),
            "--opnsense-api-key".to_string(),
            "key".to_string(),
            "--opnsense-api-secret".to_string(),
            "secret".to_string(),
        ];
        argv.extend(extra.iter().map(|s| (*s).to_string()));
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_settings_load() {
        let dir = TempDir::new().unwrap();
        let args = cli(
            dir.path(),
            &[
                "--refresh-interval",
                "30",
                "--healthchecks-url",
                "https://hc-ping.com/uuid/",
            ],
        );

        let settings = Settings::load(args, lan_vars()).unwrap();

        assert_eq!(settings.out_dir, dir.path());
        assert_eq!(settings.refresh_interval, Some(Duration::from_secs(30)));
        assert_eq!(settings.opnsense.url, "https://fw.example.com/api");
        assert_eq!(
            settings.healthchecks_url.as_deref(),
            Some("https://hc-ping.com/uuid")
        );
        assert_eq!(
            settings.zones[0].output_path,
            dir.path().join("db.lan.example.com")
        );
    }

    #[test]
    fn test_settings_reject_zero_interval() {
        let dir = TempDir::new().unwrap();
        let args = cli(dir.path(), &["--refresh-interval", "0"]);

        let err = Settings::load(args, lan_vars()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "REFRESH_INTERVAL"));
    }

    #[test]
    fn test_settings_reject_non_http_healthchecks_url() {
        let dir = TempDir::new().unwrap();
        let args = cli(dir.path(), &["--healthchecks-url", "ftp://hc.example.com"]);

        let err = Settings::load(args, lan_vars()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "HEALTHCHECKS_URL"));
    }

    #[test]
    fn test_settings_reject_missing_out_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let args = cli(&missing, &[]);

        let err = Settings::load(args, lan_vars()).unwrap_err();
        assert!(matches!(err, ConfigError::OutputDirectory { .. }));
    }

    #[test]
    fn test_output_dir_check_leaves_no_files() {
        let dir = TempDir::new().unwrap();

        assert_eq!(validate_output_dir(dir.path()).unwrap(), dir.path());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_output_dir_must_not_be_a_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("db.example.com");
        std::fs::write(&file, "").unwrap();

        let err = validate_output_dir(&file).unwrap_err();
        assert!(matches!(err, ConfigError::OutputDirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_dir_must_be_writable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users bypass directory permissions.
        let privileged = std::fs::write(locked.join("db.check"), "").is_ok();
        let result = validate_output_dir(&locked);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        assert!(matches!(
            result,
            Err(ConfigError::OutputDirectory { ref reason, .. }) if reason.contains("not writable")
        ));
    }

    #[test]
    fn test_opnsense_settings_debug_redacts_secrets() {
        let settings = OpnsenseSettings {
            url: "https://fw.example.com/api".to_string(),
            api_key: "key-value".to_string(),
            api_secret: "secret-value".to_string(),
        };

        let debug = format!("{settings:?}");
        assert!(!debug.contains("key-value"));
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("fw.example.com"));
    }
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use clap::Parser;
use hibiscus::config::{CliArgs, Settings};
use serde_json::{json, Value};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the OPNsense lease search endpoint on the mock server
pub const LEASES_PATH: &str = "/api/dhcpv4/leases/searchLease";

/// One OPNsense lease row
pub fn row(hostname: &str, address: &str, mac: &str, interface: &str, kind: &str) -> Value {
    json!({
        "address": address,
        "hostname": hostname,
        "if_descr": interface,
        "mac": mac,
        "status": "online",
        "type": kind
    })
}

/// Mount a lease search response on `server`, replacing earlier ones
pub async fn serve_leases(server: &MockServer, rows: Vec<Value>) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path(LEASES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": 1,
            "rowCount": rows.len(),
            "total": rows.len(),
            "rows": rows
        })))
        .mount(server)
        .await;
}

/// Zone variables for a LAN forward zone and its reverse zone
pub fn zone_vars() -> Vec<(String, String)> {
    [
        ("ZONE_LAN_IFACE", "LAN"),
        ("ZONE_LAN_DOMAIN", "lan.example.com."),
        ("ZONE_LAN_SOA_PRIMARY", "ns1.example.com."),
        ("ZONE_LAN_SOA_RESPONSIBLE", "hostmaster.example.com."),
        ("ZONE_LAN_NS", "ns1.example.com.,ns2.example.com."),
        ("ZONE_LANREV_IFACE", "LAN"),
        ("ZONE_LANREV_DOMAIN", "lan.example.com."),
        ("ZONE_LANREV_SOA_PRIMARY", "ns1.example.com."),
        ("ZONE_LANREV_SOA_RESPONSIBLE", "hostmaster.example.com."),
        ("ZONE_LANREV_NS", "ns1.example.com."),
        ("ZONE_LANREV_TYPE", "rdns"),
        ("ZONE_LANREV_PREFIX", "10.0."),
        ("UNRELATED", "ignored"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Load settings pointing at the mock server and writing into `out_dir`
pub fn settings(server: &MockServer, out_dir: &Path, extra: &[&str]) -> Settings {
    let url = format!("{}/api", server.uri());
    let out_dir = out_dir.display().to_string();
    let mut argv = vec![
        "hibiscus",
        "--out-dir",
        out_dir.as_str(),
        "--opnsense-url",
        url.as_str(),
        "--opnsense-api-key",
        "key",
        "--opnsense-api-secret",
        "secret",
    ];
    argv.extend_from_slice(extra);

    let args = CliArgs::try_parse_from(argv).unwrap();
    Settings::load(args, zone_vars()).unwrap()
}

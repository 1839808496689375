// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zonefile text rendering.

use crate::config::ZoneConfig;
use crate::constants::{
    COLUMN_SEPARATOR, SOA_EXPIRE_SECS, SOA_NEGATIVE_TTL_SECS, SOA_REFRESH_SECS, SOA_RETRY_SECS,
};

use super::ZoneRecord;

const ZONE_TEMPLATE: &str = include_str!("../../templates/zone.tmpl");

/// Render the zonefile of `zone` holding `records` with the given serial.
///
/// Output is deterministic: the same zone, records and serial always render
/// the same bytes. Record names are right-padded to the longest name in
/// `records` so that the class column lines up.
#[must_use]
pub fn render_zonefile(zone: &ZoneConfig, records: &[ZoneRecord], serial: &str) -> String {
    let name_servers = zone
        .soa
        .name_servers
        .iter()
        .map(|ns| format!("@   IN  NS    {ns}"))
        .collect::<Vec<_>>()
        .join("\n");

    let values = [
        ("DOMAIN", zone.domain.clone()),
        ("ORIGIN", zone.origin.clone()),
        ("TTL", zone.ttl.to_string()),
        ("PRIMARY_NS", zone.soa.primary_ns.clone()),
        ("PERSON", zone.soa.person.clone()),
        ("SERIAL", serial.to_string()),
        ("REFRESH", SOA_REFRESH_SECS.to_string()),
        ("RETRY", SOA_RETRY_SECS.to_string()),
        ("EXPIRE", SOA_EXPIRE_SECS.to_string()),
        ("NEGATIVE_TTL", SOA_NEGATIVE_TTL_SECS.to_string()),
        ("NAME_SERVERS", name_servers),
        ("RECORDS", render_records(records)),
    ];

    fill_template(ZONE_TEMPLATE, &values)
}

/// Substitute `{{KEY}}` placeholders in one pass over `template`.
///
/// Substituted text is never scanned again. Unknown placeholders are kept
/// verbatim.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let value = after_open.find("}}").and_then(|close| {
            let key = &after_open[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (value, close))
        });

        match value {
            Some((value, close)) => {
                output.push_str(value);
                rest = &after_open[close + 2..];
            }
            None => {
                output.push_str("{{");
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Render record lines with the name column padded to the longest name.
#[must_use]
pub fn render_records(records: &[ZoneRecord]) -> String {
    let width = records
        .iter()
        .map(|record| record.name.chars().count())
        .max()
        .unwrap_or(0);

    records
        .iter()
        .map(|record| {
            format!(
                "{name:<width$}{COLUMN_SEPARATOR}IN{COLUMN_SEPARATOR}{kind}{COLUMN_SEPARATOR}{value}",
                name = record.name,
                kind = record.record_type,
                value = record.value,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;

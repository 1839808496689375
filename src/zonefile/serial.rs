// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone serial generation and normalization.
//!
//! The serial is the only part of a rendered zonefile that changes on every
//! cycle. Normalizing the serial of the file on disk to the serial of the
//! candidate lets the commit step compare everything else byte for byte.

use chrono::Utc;

use crate::constants::{SERIAL_MARKER, SERIAL_SEPARATOR};

/// Serial for a zonefile rendered now: whole seconds since the Unix epoch.
#[must_use]
pub fn current_serial() -> String {
    Utc::now().timestamp().to_string()
}

/// Replace every serial field in `content` with `serial`.
///
/// A serial field is a run of ASCII digits, followed by at least one
/// whitespace character, followed by `; Serial`. The old serial may have any
/// number of digits. Each field is rewritten as `<serial>  ; Serial`;
/// everything else is copied unchanged.
///
/// # Examples
///
/// ```
/// use hibiscus::zonefile::serial::replace_serial;
///
/// assert_eq!(replace_serial("300   ; Serial", "1000223344"), "1000223344  ; Serial");
/// ```
#[must_use]
pub fn replace_serial(content: &str, serial: &str) -> String {
    let mut output = String::with_capacity(content.len() + serial.len());
    let mut copied = 0;

    for (marker, _) in content.match_indices(SERIAL_MARKER) {
        let Some(start) = serial_field_start(&content[copied..marker]) else {
            continue;
        };
        let start = copied + start;

        output.push_str(&content[copied..start]);
        output.push_str(serial);
        output.push_str(SERIAL_SEPARATOR);
        output.push_str(SERIAL_MARKER);
        copied = marker + SERIAL_MARKER.len();
    }

    output.push_str(&content[copied..]);
    output
}

/// Offset in `prefix` where the digits of a serial field ending right before
/// the marker begin.
fn serial_field_start(prefix: &str) -> Option<usize> {
    let bytes = prefix.as_bytes();
    let mut cursor = bytes.len();

    while cursor > 0 && bytes[cursor - 1].is_ascii_whitespace() {
        cursor -= 1;
    }
    if cursor == bytes.len() {
        return None;
    }

    let digits_end = cursor;
    while cursor > 0 && bytes[cursor - 1].is_ascii_digit() {
        cursor -= 1;
    }
    if cursor == digits_end {
        return None;
    }

    Some(cursor)
}

#[cfg(test)]
#[path = "serial_tests.rs"]
mod serial_tests;

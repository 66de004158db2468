// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for contact traffic.

use serde_json::{json, Value};
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A submission every field check accepts.
pub fn valid_body(i: usize) -> Value {
    json!({
        "name": format!("Visitor {i}"),
        "email": format!("visitor{i}@example.com"),
        "company": "Acme Studios",
        "message": format!("Hello, this is enquiry number {i}."),
    })
}

/// Submissions that each break exactly one field rule.
pub fn invalid_bodies() -> Vec<(&'static str, Value)> {
    vec![
        ("short name", json!({"name": "J", "email": "jo@x.com", "message": "Hello there, testing."})),
        ("long name", json!({"name": "x".repeat(101), "email": "jo@x.com", "message": "Hello there, testing."})),
        ("no at", json!({"name": "Jo", "email": "jo.x.com", "message": "Hello there, testing."})),
        ("no dot", json!({"name": "Jo", "email": "jo@localhost", "message": "Hello there, testing."})),
        ("long company", json!({"name": "Jo", "email": "jo@x.com", "company": "x".repeat(101), "message": "Hello there, testing."})),
        ("short message", json!({"name": "Jo", "email": "jo@x.com", "message": "Hi"})),
        ("long message", json!({"name": "Jo", "email": "jo@x.com", "message": "x".repeat(2001)})),
        ("missing fields", json!({})),
        ("wrong types", json!({"name": 1, "email": true, "message": ["a"]})),
    ]
}

/// Bodies that are not a JSON object at all.
pub fn malformed_bodies() -> Vec<&'static str> {
    vec![
        "",
        "name=Jo&email=jo@x.com",
        "{\"name\": \"Jo\"",
        "<contact/>",
        "[1, 2, 3]",
        "\"just a string\"",
        "null",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_valid_body_passes_validator() {
        for i in 0..10 {
            assert!(contact_gateway::validate(&valid_body(i)).is_ok());
        }
    }

    #[test]
    fn test_invalid_bodies_fail_validator() {
        for (label, body) in invalid_bodies() {
            assert!(contact_gateway::validate(&body).is_err(), "{label} should fail");
        }
    }
}

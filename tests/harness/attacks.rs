// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique client addresses to simulate
    pub unique_ips: usize,
    /// Every n-th request carries an invalid form (0 disables)
    pub invalid_every: usize,
    /// Every n-th request carries a malformed body (0 disables)
    pub malformed_every: usize,
    /// Omit identifying headers so every request shares the "unknown" key
    pub anonymous: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 1,
            invalid_every: 0,
            malformed_every: 0,
            anonymous: false,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Many clients, a few requests each.
    pub fn distributed_attack() -> Self {
        Self {
            total_requests: 500,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// Flood of junk forms from one client.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 60,
            unique_ips: 1,
            invalid_every: 2,
            malformed_every: 3,
            ..Default::default()
        }
    }

    /// Requests stripped of proxy headers.
    pub fn anonymous_flood() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 1,
            anonymous: true,
            ..Default::default()
        }
    }
}

/// Upper bound on accepted requests for a pattern within one window.
pub fn max_accepted(config: &AttackConfig, limit: usize) -> usize {
    let clients = if config.anonymous { 1 } else { config.unique_ips };
    clients * limit
}

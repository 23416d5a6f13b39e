// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status query commands.
//!
//! The miner answers two read-only queries. `summary` carries the flat
//! `key=value` counters (hashrate); `estats` carries the bracketed extended
//! status (mode, level, display, temperatures, power supply readings).

use std::fmt;

use crate::command::Command;

/// Status query to issue.
///
/// # Examples
///
/// ```
/// use avalon_mini::command::{Command, StatusCommand};
///
/// assert_eq!(StatusCommand::Summary.to_wire(), "summary");
/// assert_eq!(StatusCommand::Estats.payload(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCommand {
    /// Flat counters, including hashrate averages.
    Summary,
    /// Extended per-device status.
    Estats,
}

impl StatusCommand {
    /// Returns both queries in the order a poll issues them.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Summary, Self::Estats]
    }

    /// Returns the literal command string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Estats => "estats",
        }
    }
}

impl fmt::Display for StatusCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Command for StatusCommand {
    fn name(&self) -> String {
        self.as_str().to_string()
    }

    fn payload(&self) -> Option<String> {
        None
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and display commands.

use crate::command::{ASCSET, Command};
use crate::types::PowerState;

/// Verb used to power the miner on.
const SOFT_ON_VERB: &str = "softon";

/// Verb used to power the miner off.
///
/// Vendor material disagrees on whether off is `softoff,1` or `softon,0`;
/// `softoff,1` is what the miners in the field have been observed to accept.
const SOFT_OFF_VERB: &str = "softoff";

/// Command to soft power the miner on or off.
///
/// The miner expects the current UNIX time in whole seconds as a nonce.
///
/// # Examples
///
/// ```
/// use avalon_mini::command::{Command, PowerCommand};
///
/// let on = PowerCommand::on(1_700_000_000);
/// assert_eq!(on.to_wire(), "ascset|0,softon,1:1700000000");
///
/// let off = PowerCommand::off(1_700_000_000);
/// assert_eq!(off.to_wire(), "ascset|0,softoff,1:1700000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerCommand {
    state: PowerState,
    timestamp: i64,
}

impl PowerCommand {
    /// Creates a power command for the given target state.
    #[must_use]
    pub const fn new(state: PowerState, timestamp: i64) -> Self {
        Self { state, timestamp }
    }

    /// Creates a command to power the miner on.
    #[must_use]
    pub const fn on(timestamp: i64) -> Self {
        Self::new(PowerState::On, timestamp)
    }

    /// Creates a command to power the miner off.
    #[must_use]
    pub const fn off(timestamp: i64) -> Self {
        Self::new(PowerState::Off, timestamp)
    }

    /// Returns the target state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }

    /// Returns the epoch-seconds nonce.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Command for PowerCommand {
    fn name(&self) -> String {
        ASCSET.to_string()
    }

    fn payload(&self) -> Option<String> {
        let verb = match self.state {
            PowerState::On => SOFT_ON_VERB,
            PowerState::Off => SOFT_OFF_VERB,
        };
        Some(format!("0,{verb},1:{}", self.timestamp))
    }
}

/// Command to switch the front display on or off.
///
/// # Examples
///
/// ```
/// use avalon_mini::command::{Command, DisplayCommand};
/// use avalon_mini::types::PowerState;
///
/// let cmd = DisplayCommand::new(PowerState::On);
/// assert_eq!(cmd.to_wire(), "ascset|0,display,set,1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCommand(PowerState);

impl DisplayCommand {
    /// Creates a display command.
    #[must_use]
    pub const fn new(state: PowerState) -> Self {
        Self(state)
    }

    /// Returns the target state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.0
    }
}

impl Command for DisplayCommand {
    fn name(&self) -> String {
        ASCSET.to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(format!("0,display,set,{}", self.0.as_flag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_wire() {
        let cmd = PowerCommand::on(1_733_000_123);
        assert_eq!(cmd.name(), "ascset");
        assert_eq!(cmd.payload(), Some("0,softon,1:1733000123".to_string()));
        assert_eq!(cmd.state(), PowerState::On);
    }

    #[test]
    fn power_off_wire() {
        let cmd = PowerCommand::new(PowerState::Off, 42);
        assert_eq!(cmd.to_wire(), "ascset|0,softoff,1:42");
        assert_eq!(cmd.timestamp(), 42);
    }

    #[test]
    fn display_wire() {
        assert_eq!(
            DisplayCommand::new(PowerState::On).to_wire(),
            "ascset|0,display,set,1"
        );
        assert_eq!(
            DisplayCommand::new(PowerState::Off).to_wire(),
            "ascset|0,display,set,0"
        );
    }
}

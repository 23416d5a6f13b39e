// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! cgminer API command definitions.
//!
//! This module provides typed representations of the commands the miner
//! accepts. Encoding is pure: no command touches the network or the clock,
//! timestamps are supplied by the caller.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Wire form |
//! |-------------|---------|-----------|
//! | [`PowerCommand`] | Soft power on/off | `ascset\|0,softon,1:<epoch>` |
//! | [`DisplayCommand`] | Front display on/off | `ascset\|0,display,set,1` |
//! | [`WorkModeCommand`] | Heating/mining/night | `ascset\|0,workmode,set,2` |
//! | [`WorkLevelCommand`] | Eco/super | `ascset\|0,worklevel,set,-1` |
//! | [`StatusCommand`] | Status queries | `summary`, `estats` |
//!
//! # Command Structure
//!
//! Each command consists of:
//! - A command name (e.g., `ascset`, `summary`)
//! - An optional parameter list, joined to the name with `|`
//!
//! # Examples
//!
//! ```
//! use avalon_mini::command::{Command, WorkModeCommand};
//! use avalon_mini::types::WorkMode;
//!
//! let cmd = WorkModeCommand::new(WorkMode::Night);
//! assert_eq!(cmd.name(), "ascset");
//! assert_eq!(cmd.to_wire(), "ascset|0,workmode,set,2");
//! ```

mod power;
mod status;
mod work;

pub use power::{DisplayCommand, PowerCommand};
pub use status::StatusCommand;
pub use work::{WorkLevelCommand, WorkModeCommand};

/// Name of the vendor extension command used for every setting.
pub(crate) const ASCSET: &str = "ascset";

/// A command that can be sent to the miner.
pub trait Command {
    /// Returns the command name, e.g. `"ascset"` or `"estats"`.
    fn name(&self) -> String;

    /// Returns the command parameters, if any.
    fn payload(&self) -> Option<String>;

    /// Returns the full command string as written to the socket.
    ///
    /// Format: `<name>|<payload>` or just `<name>` if there is no payload.
    fn to_wire(&self) -> String {
        match self.payload() {
            Some(p) => format!("{}|{}", self.name(), p),
            None => self.name(),
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Work mode and work level commands.

use crate::command::{ASCSET, Command};
use crate::types::{WorkLevel, WorkMode};

/// Command to select the work mode.
///
/// # Examples
///
/// ```
/// use avalon_mini::command::{Command, WorkModeCommand};
/// use avalon_mini::types::WorkMode;
///
/// let cmd = WorkModeCommand::new(WorkMode::Heating);
/// assert_eq!(cmd.to_wire(), "ascset|0,workmode,set,0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkModeCommand(WorkMode);

impl WorkModeCommand {
    /// Creates a work mode command.
    #[must_use]
    pub const fn new(mode: WorkMode) -> Self {
        Self(mode)
    }

    /// Returns the target mode.
    #[must_use]
    pub const fn mode(&self) -> WorkMode {
        self.0
    }
}

impl Command for WorkModeCommand {
    fn name(&self) -> String {
        ASCSET.to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(format!("0,workmode,set,{}", self.0.index()))
    }
}

/// Command to select the work level.
///
/// # Examples
///
/// ```
/// use avalon_mini::command::{Command, WorkLevelCommand};
/// use avalon_mini::types::WorkLevel;
///
/// let cmd = WorkLevelCommand::new(WorkLevel::Eco);
/// assert_eq!(cmd.to_wire(), "ascset|0,worklevel,set,-1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkLevelCommand(WorkLevel);

impl WorkLevelCommand {
    /// Creates a work level command.
    #[must_use]
    pub const fn new(level: WorkLevel) -> Self {
        Self(level)
    }

    /// Returns the target level.
    #[must_use]
    pub const fn level(&self) -> WorkLevel {
        self.0
    }
}

impl Command for WorkLevelCommand {
    fn name(&self) -> String {
        ASCSET.to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(format!("0,worklevel,set,{}", self.0.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_mode_commands() {
        let wires: Vec<String> = WorkMode::ALL
            .into_iter()
            .map(|m| WorkModeCommand::new(m).to_wire())
            .collect();
        assert_eq!(
            wires,
            [
                "ascset|0,workmode,set,0",
                "ascset|0,workmode,set,1",
                "ascset|0,workmode,set,2",
            ]
        );
    }

    #[test]
    fn work_level_commands() {
        assert_eq!(
            WorkLevelCommand::new(WorkLevel::Super).to_wire(),
            "ascset|0,worklevel,set,0"
        );
        assert_eq!(WorkLevelCommand::new(WorkLevel::Eco).level(), WorkLevel::Eco);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off state shared by the miner power switch and the front display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Phrases reported in `SYSTEMSTATU[Work: ...]` while the miner is powered.
pub const POWERED_PHRASES: [&str; 2] = ["In Work", "In Init"];

/// Represents the on/off state of the miner or its display.
///
/// # Examples
///
/// ```
/// use avalon_mini::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "on");
/// assert_eq!("0".parse::<PowerState>().unwrap(), PowerState::Off);
/// assert_eq!(PowerState::from_system_work("In Init"), PowerState::On);
/// assert_eq!(PowerState::from_system_work("In Idle"), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    /// Switched off.
    #[default]
    Off,
    /// Switched on.
    On,
}

impl PowerState {
    /// Returns the lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns the numeric flag the miner uses (`1` on, `0` off).
    #[must_use]
    pub const fn as_flag(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Returns `true` if the state is [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Maps a raw flag such as `LcdOnoff[1]` to a state.
    ///
    /// Only `1` means on; every other value is off.
    #[must_use]
    pub const fn from_flag(flag: i64) -> Self {
        if flag == 1 { Self::On } else { Self::Off }
    }

    /// Maps the system-work phrase to the miner power state.
    ///
    /// `"In Work"` and `"In Init"` are on; any other phrase, including
    /// `"In Idle"`, is off. Matching is exact.
    #[must_use]
    pub fn from_system_work(phrase: &str) -> Self {
        if POWERED_PHRASES.contains(&phrase) {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "0" | "false" => Ok(Self::Off),
            "on" | "1" | "true" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(value: PowerState) -> Self {
        value.is_on()
    }
}

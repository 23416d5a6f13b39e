// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Work mode and work level selections.
//!
//! Both are exposed by the miner as small signed indices, `WORKMODE[n]` and
//! `WORKLEVEL[n]` in `estats`, and set with `ascset|0,workmode,set,n` /
//! `ascset|0,worklevel,set,n`.
//!
//! | Index | Work mode | Work level |
//! |-------|-----------|------------|
//! | -1    |           | Eco        |
//! | 0     | Heating   | Super      |
//! | 1     | Mining    |            |
//! | 2     | Night     |            |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Operating mode of the miner.
///
/// # Examples
///
/// ```
/// use avalon_mini::types::WorkMode;
///
/// assert_eq!(WorkMode::Night.index(), 2);
/// assert_eq!(WorkMode::from_index(1), Some(WorkMode::Mining));
/// assert_eq!("heating".parse::<WorkMode>().unwrap(), WorkMode::Heating);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    /// Heater operation.
    #[default]
    Heating,
    /// Full mining operation.
    Mining,
    /// Quiet night operation.
    Night,
}

impl WorkMode {
    /// All selectable modes, in index order.
    pub const ALL: [Self; 3] = [Self::Heating, Self::Mining, Self::Night];

    /// Returns the index the miner uses for this mode.
    #[must_use]
    pub const fn index(&self) -> i32 {
        match self {
            Self::Heating => 0,
            Self::Mining => 1,
            Self::Night => 2,
        }
    }

    /// Looks up a mode by miner index.
    ///
    /// Returns `None` for indices outside the known table.
    #[must_use]
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Heating),
            1 => Some(Self::Mining),
            2 => Some(Self::Night),
            _ => None,
        }
    }

    /// Returns the option label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::Mining => "mining",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValueError::UnknownWorkMode(s.to_string()))
    }
}

impl TryFrom<i64> for WorkMode {
    type Error = ValueError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or_else(|| ValueError::UnknownWorkMode(index.to_string()))
    }
}

/// Performance level of the miner.
///
/// # Examples
///
/// ```
/// use avalon_mini::types::WorkLevel;
///
/// assert_eq!(WorkLevel::Eco.index(), -1);
/// assert_eq!(WorkLevel::from_index(0), Some(WorkLevel::Super));
/// assert!(WorkLevel::from_index(1).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkLevel {
    /// Reduced power draw.
    #[default]
    Eco,
    /// Full power.
    Super,
}

impl WorkLevel {
    /// All selectable levels, in display order.
    pub const ALL: [Self; 2] = [Self::Eco, Self::Super];

    /// Returns the index the miner uses for this level.
    #[must_use]
    pub const fn index(&self) -> i32 {
        match self {
            Self::Eco => -1,
            Self::Super => 0,
        }
    }

    /// Looks up a level by miner index.
    #[must_use]
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            -1 => Some(Self::Eco),
            0 => Some(Self::Super),
            _ => None,
        }
    }

    /// Returns the option label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Eco => "eco",
            Self::Super => "super",
        }
    }
}

impl fmt::Display for WorkLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkLevel {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValueError::UnknownWorkLevel(s.to_string()))
    }
}

impl TryFrom<i64> for WorkLevel {
    type Error = ValueError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or_else(|| ValueError::UnknownWorkLevel(index.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_mode_index_roundtrip() {
        for mode in WorkMode::ALL {
            assert_eq!(WorkMode::from_index(i64::from(mode.index())), Some(mode));
        }
    }

    #[test]
    fn work_mode_unknown_index() {
        assert_eq!(WorkMode::from_index(3), None);
        assert_eq!(WorkMode::from_index(-1), None);
        assert!(matches!(
            WorkMode::try_from(9),
            Err(ValueError::UnknownWorkMode(_))
        ));
    }

    #[test]
    fn work_mode_from_label() {
        assert_eq!("Mining".parse::<WorkMode>().unwrap(), WorkMode::Mining);
        assert_eq!("night".parse::<WorkMode>().unwrap(), WorkMode::Night);
        assert!("turbo".parse::<WorkMode>().is_err());
    }

    #[test]
    fn work_level_table() {
        assert_eq!(WorkLevel::from_index(-1), Some(WorkLevel::Eco));
        assert_eq!(WorkLevel::from_index(0), Some(WorkLevel::Super));
        assert_eq!(WorkLevel::from_index(1), None);
        assert_eq!(WorkLevel::Super.index(), 0);
    }

    #[test]
    fn work_level_from_label() {
        assert_eq!("eco".parse::<WorkLevel>().unwrap(), WorkLevel::Eco);
        assert!(matches!(
            "medium".parse::<WorkLevel>(),
            Err(ValueError::UnknownWorkLevel(_))
        ));
    }

    #[test]
    fn defaults_match_initial_display() {
        assert_eq!(WorkMode::default(), WorkMode::Heating);
        assert_eq!(WorkLevel::default(), WorkLevel::Eco);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is emitted whenever a reconciled value changes, either
//! because a command was issued or because a poll brought news. Consumers
//! receive them through [`Subscribable`](crate::subscription::Subscribable)
//! callbacks or from the return value of [`Device::poll`](crate::Device::poll).
//!
//! # Examples
//!
//! ```
//! use avalon_mini::state::StateChange;
//! use avalon_mini::types::{PowerState, WorkMode};
//!
//! let batch = StateChange::batch(vec![
//!     StateChange::Power(PowerState::On),
//!     StateChange::WorkMode(WorkMode::Night),
//! ]);
//! assert_eq!(batch.change_count(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{PowerState, WorkLevel, WorkMode};

/// Represents a change in reconciled miner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    /// Miner power state changed.
    Power(PowerState),

    /// Front display state changed.
    Display(PowerState),

    /// Selected work mode changed.
    WorkMode(WorkMode),

    /// Selected work level changed.
    WorkLevel(WorkLevel),

    /// Hashrate in MH/s changed.
    Hashrate(f64),

    /// Ambient temperature in °C changed.
    AmbientTemperature(f64),

    /// Target temperature in °C changed.
    TargetTemperature(f64),

    /// Power draw in watts changed.
    PowerDraw(f64),

    /// Multiple changes at once.
    ///
    /// Used when a poll updates several values.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns `true` if this is a change to a commandable on/off value.
    #[must_use]
    pub fn is_switch(&self) -> bool {
        matches!(self, Self::Power(_) | Self::Display(_))
    }

    /// Returns `true` if this is a change to a selectable option.
    #[must_use]
    pub fn is_selection(&self) -> bool {
        matches!(self, Self::WorkMode(_) | Self::WorkLevel(_))
    }

    /// Returns `true` if this is a read-only measurement.
    #[must_use]
    pub fn is_telemetry(&self) -> bool {
        matches!(
            self,
            Self::Hashrate(_)
                | Self::AmbientTemperature(_)
                | Self::TargetTemperature(_)
                | Self::PowerDraw(_)
        )
    }

    /// Returns the number of individual changes.
    ///
    /// For batch changes, returns the total count of nested changes.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }
}

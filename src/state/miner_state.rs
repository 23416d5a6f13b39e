// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of issued commands with polled miner state.
//!
//! The miner reports the effect of a command only a few seconds after it
//! was accepted. A poll landing in between would flip the displayed value
//! back and then forward again. Power and display therefore hold a grace
//! deadline after every command: polls arriving before the deadline are
//! ignored for that value.
//!
//! All methods take the current [`Instant`] explicitly so the arithmetic can
//! be exercised without real time passing.

use std::time::{Duration, Instant};

use crate::response::StatusSnapshot;
use crate::types::{PowerState, WorkLevel, WorkMode};

use super::StateChange;

/// How long polled power/display values are ignored after a command.
///
/// Longer than the miner's observed reporting lag, so the first poll after
/// a command is always suppressed.
pub const GRACE_PERIOD: Duration = Duration::from_secs(8);

/// A value that can be both commanded and polled.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use avalon_mini::state::CommandableState;
/// use avalon_mini::types::PowerState;
///
/// let t0 = Instant::now();
/// let mut power = CommandableState::new(PowerState::Off);
///
/// power.command(PowerState::On, t0, Duration::from_secs(8));
/// assert!(!power.is_trusted(t0 + Duration::from_secs(3)));
///
/// // A stale poll inside the window is ignored.
/// assert_eq!(power.observe(PowerState::Off, t0 + Duration::from_secs(3)), None);
/// assert_eq!(power.value(), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandableState<T> {
    value: T,
    pending_until: Option<Instant>,
}

impl<T: Copy + PartialEq> CommandableState<T> {
    /// Creates a trusted state holding `initial`.
    #[must_use]
    pub const fn new(initial: T) -> Self {
        Self {
            value: initial,
            pending_until: None,
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.value
    }

    /// Returns the grace deadline of the last command, if not yet cleared.
    #[must_use]
    pub fn pending_until(&self) -> Option<Instant> {
        self.pending_until
    }

    /// Returns `false` while a grace window is active at `now`.
    #[must_use]
    pub fn is_trusted(&self, now: Instant) -> bool {
        self.pending_until.is_none_or(|deadline| now >= deadline)
    }

    /// Records a command: the value is taken optimistically and polls are
    /// ignored until `now + grace`.
    ///
    /// A later command replaces both the value and the deadline.
    pub fn command(&mut self, target: T, now: Instant, grace: Duration) {
        self.value = target;
        self.pending_until = Some(now + grace);
    }

    /// Offers a polled value.
    ///
    /// Returns the new value if it was adopted and differs from the previous
    /// one. Returns `None` if the value is unchanged or a grace window is
    /// active.
    pub fn observe(&mut self, polled: T, now: Instant) -> Option<T> {
        if !self.is_trusted(now) {
            return None;
        }
        self.pending_until = None;
        if polled == self.value {
            return None;
        }
        self.value = polled;
        Some(polled)
    }
}

/// Reconciled state of one miner.
///
/// Holds what the consumer should display: power and display with their
/// grace windows, the selected work mode and level, and the last known
/// measurements. A measurement missing from a poll keeps its previous value.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use avalon_mini::response::StatusSnapshot;
/// use avalon_mini::state::{MinerState, StateChange};
/// use avalon_mini::types::WorkMode;
///
/// let mut state = MinerState::new();
/// let now = Instant::now();
///
/// let changes = state.apply_snapshot(&StatusSnapshot::from_estats("WORKMODE[1] TA[24]"), now);
/// assert_eq!(state.work_mode(), WorkMode::Mining);
/// assert_eq!(state.ambient_temperature(), Some(24.0));
/// assert_eq!(changes.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MinerState {
    power: CommandableState<PowerState>,
    display: CommandableState<PowerState>,
    work_mode: WorkMode,
    work_level: WorkLevel,
    hashrate_mhs: Option<f64>,
    ambient_temperature: Option<f64>,
    target_temperature: Option<f64>,
    power_draw: Option<f64>,
}

impl Default for MinerState {
    fn default() -> Self {
        Self {
            power: CommandableState::new(PowerState::Off),
            display: CommandableState::new(PowerState::On),
            work_mode: WorkMode::default(),
            work_level: WorkLevel::default(),
            hashrate_mhs: None,
            ambient_temperature: None,
            target_temperature: None,
            power_draw: None,
        }
    }
}

impl MinerState {
    /// Creates the initial state: power off, display on, heating, eco,
    /// no measurements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Accessors ==========

    /// Displayed miner power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power.value()
    }

    /// Power state with its grace deadline.
    #[must_use]
    pub fn power_state(&self) -> &CommandableState<PowerState> {
        &self.power
    }

    /// Displayed front display state.
    #[must_use]
    pub fn display(&self) -> PowerState {
        self.display.value()
    }

    /// Display state with its grace deadline.
    #[must_use]
    pub fn display_state(&self) -> &CommandableState<PowerState> {
        &self.display
    }

    /// Selected work mode.
    #[must_use]
    pub fn work_mode(&self) -> WorkMode {
        self.work_mode
    }

    /// Selected work level.
    #[must_use]
    pub fn work_level(&self) -> WorkLevel {
        self.work_level
    }

    /// Last known hashrate in MH/s.
    #[must_use]
    pub fn hashrate_mhs(&self) -> Option<f64> {
        self.hashrate_mhs
    }

    /// Last known ambient temperature in °C.
    #[must_use]
    pub fn ambient_temperature(&self) -> Option<f64> {
        self.ambient_temperature
    }

    /// Last known target temperature in °C.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Last known power draw in watts.
    #[must_use]
    pub fn power_draw(&self) -> Option<f64> {
        self.power_draw
    }

    // ========== Commands ==========

    /// Records a power command issued at `now`.
    pub fn command_power(&mut self, target: PowerState, now: Instant) -> StateChange {
        self.power.command(target, now, GRACE_PERIOD);
        StateChange::Power(target)
    }

    /// Records a display command issued at `now`.
    pub fn command_display(&mut self, target: PowerState, now: Instant) -> StateChange {
        self.display.command(target, now, GRACE_PERIOD);
        StateChange::Display(target)
    }

    /// Records a work mode selection.
    pub fn command_work_mode(&mut self, mode: WorkMode) -> StateChange {
        self.work_mode = mode;
        StateChange::WorkMode(mode)
    }

    /// Records a work level selection.
    pub fn command_work_level(&mut self, level: WorkLevel) -> StateChange {
        self.work_level = level;
        StateChange::WorkLevel(level)
    }

    // ========== Polls ==========

    /// Folds one snapshot into the state and returns what changed.
    ///
    /// - Power and display are ignored while their grace window is active.
    /// - Work mode/level indices outside the known tables are ignored.
    /// - Unset fields never overwrite a known value.
    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot, now: Instant) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if let Some(polled) = snapshot.power() {
            if self.power.is_trusted(now) {
                changes.extend(self.power.observe(polled, now).map(StateChange::Power));
            } else {
                tracing::debug!(polled = %polled, "Power poll ignored during grace window");
            }
        }

        if let Some(polled) = snapshot.display() {
            if self.display.is_trusted(now) {
                changes.extend(self.display.observe(polled, now).map(StateChange::Display));
            } else {
                tracing::debug!(polled = %polled, "Display poll ignored during grace window");
            }
        }

        if let Some(index) = snapshot.work_mode() {
            match WorkMode::from_index(index) {
                Some(mode) if mode != self.work_mode => {
                    self.work_mode = mode;
                    changes.push(StateChange::WorkMode(mode));
                }
                Some(_) => {}
                None => tracing::debug!(index, "Ignoring unknown work mode index"),
            }
        }

        if let Some(index) = snapshot.work_level() {
            match WorkLevel::from_index(index) {
                Some(level) if level != self.work_level => {
                    self.work_level = level;
                    changes.push(StateChange::WorkLevel(level));
                }
                Some(_) => {}
                None => tracing::debug!(index, "Ignoring unknown work level index"),
            }
        }

        changes.extend(
            update_measurement(&mut self.hashrate_mhs, snapshot.hashrate_mhs())
                .map(StateChange::Hashrate),
        );
        changes.extend(
            update_measurement(&mut self.ambient_temperature, snapshot.ambient_temperature())
                .map(StateChange::AmbientTemperature),
        );
        changes.extend(
            update_measurement(&mut self.target_temperature, snapshot.target_temperature())
                .map(StateChange::TargetTemperature),
        );
        changes.extend(
            update_measurement(&mut self.power_draw, snapshot.power_draw())
                .map(StateChange::PowerDraw),
        );

        changes
    }
}

/// Stores `polled` if it is known and different; returns it in that case.
fn update_measurement(slot: &mut Option<f64>, polled: Option<f64>) -> Option<f64> {
    let value = polled?;
    if *slot == Some(value) {
        return None;
    }
    *slot = Some(value);
    Some(value)
}

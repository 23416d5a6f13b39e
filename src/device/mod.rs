// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level session with one Avalon Mini miner.
//!
//! A [`Device`] owns everything a single miner needs: the transport, the
//! reconciled [`MinerState`], the subscription callbacks and the clock the
//! grace windows are measured with. Separate devices share nothing.
//!
//! ```no_run
//! use avalon_mini::Device;
//! use avalon_mini::types::WorkMode;
//!
//! # async fn example() -> avalon_mini::Result<()> {
//! let device = Device::tcp("192.168.1.60").build()?;
//!
//! device.power_on().await?;
//! device.set_work_mode(WorkMode::Night).await?;
//!
//! // Polls within eight seconds of the command cannot undo it.
//! let changes = device.poll().await?;
//! println!("{} value(s) changed", changes.len());
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::DeviceBuilder;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::command::{
    Command, DisplayCommand, PowerCommand, StatusCommand, WorkLevelCommand, WorkModeCommand,
};
use crate::error::Error;
use crate::protocol::{CommandResponse, Protocol, TcpClient, TcpConfig};
use crate::response::StatusSnapshot;
use crate::state::{Clock, MinerState, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{PowerState, WorkLevel, WorkMode};

/// Display name used when none is configured.
pub const DEFAULT_NAME: &str = "Avalon Mini";

/// Suggested interval between [`Device::poll`] calls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// An Avalon Mini miner reached through protocol `P`.
///
/// Every control operation sends its command first. Only when the round
/// trip succeeds is the reconciled state updated and the change dispatched
/// to subscribers; a failed command leaves the state untouched.
///
/// # Creating a Device
///
/// ```no_run
/// use std::time::Duration;
/// use avalon_mini::Device;
///
/// # fn example() -> avalon_mini::Result<()> {
/// let device = Device::tcp("192.168.1.60")
///     .with_port(4028)
///     .with_timeout(Duration::from_secs(3))
///     .with_name("Garage heater")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: Arc<P>,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<MinerState>>,
    callbacks: Arc<CallbackRegistry>,
    name: String,
}

impl<P: Protocol> Device<P> {
    /// Creates a device around an existing protocol client.
    pub(crate) fn new(protocol: P, clock: Arc<dyn Clock>, name: String) -> Self {
        Self {
            protocol: Arc::new(protocol),
            clock,
            state: Arc::new(RwLock::new(MinerState::new())),
            callbacks: Arc::new(CallbackRegistry::new()),
            name,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the reconciled state.
    #[must_use]
    pub fn state(&self) -> MinerState {
        self.state.read().clone()
    }

    /// Returns the underlying protocol client.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Sends a command without touching the reconciled state.
    ///
    /// # Errors
    ///
    /// Returns error if the round trip fails.
    pub async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, Error> {
        self.protocol
            .send_command(command)
            .await
            .map_err(Error::Protocol)
    }

    // ========== Power ==========

    /// Starts hashing.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn power_on(&self) -> Result<CommandResponse, Error> {
        self.set_power(PowerState::On).await
    }

    /// Stops hashing.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn power_off(&self) -> Result<CommandResponse, Error> {
        self.set_power(PowerState::Off).await
    }

    /// Sets the miner power state.
    ///
    /// The command carries the current Unix time. On success the state
    /// shows `target` immediately and polls are ignored for the grace
    /// period.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_power(&self, target: PowerState) -> Result<CommandResponse, Error> {
        let cmd = PowerCommand::new(target, self.clock.unix_timestamp());
        let response = self.send_command(&cmd).await?;
        tracing::info!(device = %self.name, power = %target, "Power command accepted");

        let change = self.state.write().command_power(target, self.clock.now());
        self.callbacks.dispatch(&change);
        Ok(response)
    }

    // ========== Display ==========

    /// Turns the front display on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn display_on(&self) -> Result<CommandResponse, Error> {
        self.set_display(PowerState::On).await
    }

    /// Turns the front display off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn display_off(&self) -> Result<CommandResponse, Error> {
        self.set_display(PowerState::Off).await
    }

    /// Sets the front display state, with the same grace handling as power.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_display(&self, target: PowerState) -> Result<CommandResponse, Error> {
        let cmd = DisplayCommand::new(target);
        let response = self.send_command(&cmd).await?;
        tracing::info!(device = %self.name, display = %target, "Display command accepted");

        let change = self.state.write().command_display(target, self.clock.now());
        self.callbacks.dispatch(&change);
        Ok(response)
    }

    // ========== Work Mode / Level ==========

    /// Selects a work mode.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_work_mode(&self, mode: WorkMode) -> Result<CommandResponse, Error> {
        let cmd = WorkModeCommand::new(mode);
        let response = self.send_command(&cmd).await?;
        tracing::info!(device = %self.name, mode = %mode, "Work mode command accepted");

        let change = self.state.write().command_work_mode(mode);
        self.callbacks.dispatch(&change);
        Ok(response)
    }

    /// Selects a work level.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn set_work_level(&self, level: WorkLevel) -> Result<CommandResponse, Error> {
        let cmd = WorkLevelCommand::new(level);
        let response = self.send_command(&cmd).await?;
        tracing::info!(device = %self.name, level = %level, "Work level command accepted");

        let change = self.state.write().command_work_level(level);
        self.callbacks.dispatch(&change);
        Ok(response)
    }

    /// Selects a work mode by its label (`"Heating"`, `"Mining"`, `"Night"`).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownWorkMode`](crate::error::ValueError::UnknownWorkMode)
    /// without sending anything if the label is unknown, or error if the
    /// command fails.
    pub async fn select_work_mode(&self, label: &str) -> Result<CommandResponse, Error> {
        let mode: WorkMode = label.parse()?;
        self.set_work_mode(mode).await
    }

    /// Selects a work level by its label (`"Eco"`, `"Super"`).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::UnknownWorkLevel`](crate::error::ValueError::UnknownWorkLevel)
    /// without sending anything if the label is unknown, or error if the
    /// command fails.
    pub async fn select_work_level(&self, label: &str) -> Result<CommandResponse, Error> {
        let level: WorkLevel = label.parse()?;
        self.set_work_level(level).await
    }

    // ========== Status ==========

    /// Sends `summary` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns error if the round trip fails.
    pub async fn summary(&self) -> Result<CommandResponse, Error> {
        self.send_command(&StatusCommand::Summary).await
    }

    /// Sends `estats` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns error if the round trip fails.
    pub async fn estats(&self) -> Result<CommandResponse, Error> {
        self.send_command(&StatusCommand::Estats).await
    }

    /// Runs one status query and parses its response.
    ///
    /// The reconciled state is not touched.
    ///
    /// # Errors
    ///
    /// Returns error if the round trip fails. Malformed fields are not
    /// errors; they come back unset.
    pub async fn fetch_status(&self, query: StatusCommand) -> Result<StatusSnapshot, Error> {
        let response = self.send_command(&query).await?;
        Ok(StatusSnapshot::parse(query, response.body()))
    }

    /// Fetches `summary` then `estats` and folds both into the state.
    ///
    /// Returns the changes that were dispatched to subscribers, in the
    /// order they were applied.
    ///
    /// # Errors
    ///
    /// Returns error if either round trip fails. The state is then left
    /// exactly as it was.
    pub async fn poll(&self) -> Result<Vec<StateChange>, Error> {
        let summary = self.fetch_status(StatusCommand::Summary).await?;
        let estats = self.fetch_status(StatusCommand::Estats).await?;

        let changes = {
            let now = self.clock.now();
            let mut state = self.state.write();
            let mut changes = state.apply_snapshot(&summary, now);
            changes.extend(state.apply_snapshot(&estats, now));
            changes
        };

        tracing::debug!(device = %self.name, changes = changes.len(), "Poll applied");
        self.callbacks.dispatch_all(&changes);
        Ok(changes)
    }
}

// ========== TCP Device Entry Point ==========

impl Device<TcpClient> {
    /// Creates a builder for a miner at `host` on the default port.
    ///
    /// Equivalent to `Device::tcp_config(TcpConfig::new(host))`.
    #[must_use]
    pub fn tcp(host: impl Into<String>) -> DeviceBuilder {
        DeviceBuilder::new(TcpConfig::new(host))
    }

    /// Creates a builder from a full transport configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use avalon_mini::Device;
    /// use avalon_mini::protocol::TcpConfig;
    ///
    /// # fn example() -> avalon_mini::Result<()> {
    /// let config = TcpConfig::new("192.168.1.60").with_port(14028);
    /// let device = Device::tcp_config(config).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn tcp_config(config: TcpConfig) -> DeviceBuilder {
        DeviceBuilder::new(config)
    }

    /// Returns the transport configuration.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        self.protocol.config()
    }
}

// ========== Subscriptions ==========

impl<P: Protocol> Subscribable for Device<P> {
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks.on_power_changed(callback)
    }

    fn on_display_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks.on_display_changed(callback)
    }

    fn on_work_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(WorkMode) + Send + Sync + 'static,
    {
        self.callbacks.on_work_mode_changed(callback)
    }

    fn on_work_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(WorkLevel) + Send + Sync + 'static,
    {
        self.callbacks.on_work_level_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

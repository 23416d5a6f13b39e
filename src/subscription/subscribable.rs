// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish miner state changes.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::{PowerState, WorkLevel, WorkMode};

/// Trait for types that support state change subscriptions.
///
/// Callbacks fire after a successful command and after each poll that
/// changed something. Values ignored by the reconciler, such as stale polls
/// inside a grace window, never fire a callback.
///
/// # Examples
///
/// ```no_run
/// use avalon_mini::Device;
/// use avalon_mini::subscription::Subscribable;
///
/// # async fn example() -> avalon_mini::Result<()> {
/// let device = Device::tcp("192.168.1.60").build()?;
///
/// let sub_id = device.on_power_changed(|state| {
///     println!("Miner is now {state}");
/// });
///
/// device.poll().await?;
/// device.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to miner power changes.
    fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to front display changes.
    fn on_display_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static;

    /// Subscribes to work mode changes.
    fn on_work_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(WorkMode) + Send + Sync + 'static;

    /// Subscribes to work level changes.
    fn on_work_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(WorkLevel) + Send + Sync + 'static;

    /// Subscribes to every change, measurements included.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

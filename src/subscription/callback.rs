// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for miner state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{PowerState, WorkLevel, WorkMode};

/// Unique identifier for a subscription.
///
/// Returned when creating a subscription and used to unsubscribe later.
/// IDs are unique within a device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type SwitchCallback = Arc<dyn Fn(PowerState) + Send + Sync>;
type WorkModeCallback = Arc<dyn Fn(WorkMode) + Send + Sync>;
type WorkLevelCallback = Arc<dyn Fn(WorkLevel) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for miner subscription callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability so callbacks can be
/// registered and dispatched from any task. Callbacks run synchronously on
/// the dispatching task, in no particular order.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power_callbacks: RwLock<HashMap<SubscriptionId, SwitchCallback>>,
    display_callbacks: RwLock<HashMap<SubscriptionId, SwitchCallback>>,
    work_mode_callbacks: RwLock<HashMap<SubscriptionId, WorkModeCallback>>,
    work_level_callbacks: RwLock<HashMap<SubscriptionId, WorkLevelCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power_callbacks: RwLock::new(HashMap::new()),
            display_callbacks: RwLock::new(HashMap::new()),
            work_mode_callbacks: RwLock::new(HashMap::new()),
            work_level_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a callback for miner power changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for display changes.
    pub fn on_display_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.display_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for work mode changes.
    pub fn on_work_mode_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(WorkMode) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.work_mode_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for work level changes.
    pub fn on_work_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(WorkLevel) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.work_level_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving every individual change.
    ///
    /// Batches are flattened before reaching this callback.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Removes a callback. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power_callbacks.write().remove(&id).is_some()
            || self.display_callbacks.write().remove(&id).is_some()
            || self.work_mode_callbacks.write().remove(&id).is_some()
            || self.work_level_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Removes all callbacks.
    pub fn clear(&self) {
        self.power_callbacks.write().clear();
        self.display_callbacks.write().clear();
        self.work_mode_callbacks.write().clear();
        self.work_level_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a change to the matching callbacks.
    ///
    /// A [`StateChange::Batch`] is dispatched item by item; the batch itself
    /// is never delivered.
    pub fn dispatch(&self, change: &StateChange) {
        if let StateChange::Batch(changes) = change {
            for nested in changes {
                self.dispatch(nested);
            }
            return;
        }

        tracing::trace!(?change, "Dispatching state change");
        for callback in self.state_changed_callbacks.read().values() {
            callback(change);
        }

        match change {
            StateChange::Power(state) => {
                for callback in self.power_callbacks.read().values() {
                    callback(*state);
                }
            }
            StateChange::Display(state) => {
                for callback in self.display_callbacks.read().values() {
                    callback(*state);
                }
            }
            StateChange::WorkMode(mode) => {
                for callback in self.work_mode_callbacks.read().values() {
                    callback(*mode);
                }
            }
            StateChange::WorkLevel(level) => {
                for callback in self.work_level_callbacks.read().values() {
                    callback(*level);
                }
            }
            // Measurements only reach generic callbacks
            StateChange::Hashrate(_)
            | StateChange::AmbientTemperature(_)
            | StateChange::TargetTemperature(_)
            | StateChange::PowerDraw(_)
            | StateChange::Batch(_) => {}
        }
    }

    /// Dispatches each change in order.
    pub fn dispatch_all(&self, changes: &[StateChange]) {
        for change in changes {
            self.dispatch(change);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.power_callbacks.read().len()
            + self.display_callbacks.read().len()
            + self.work_mode_callbacks.read().len()
            + self.work_level_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for miner state changes.
//!
//! - [`SubscriptionId`] - Identifier returned by every registration
//! - [`CallbackRegistry`] - Stores callbacks and dispatches changes
//! - [`Subscribable`] - Trait implemented by [`Device`](crate::Device)
//!
//! The miner pushes nothing; changes are discovered by
//! [`Device::poll`](crate::Device::poll) or produced by commands, and
//! dispatched from there.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;

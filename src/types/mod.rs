// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for miner control.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off state of the miner and of its display
//! - [`WorkMode`] - Heating, mining or night operation
//! - [`WorkLevel`] - Eco or super performance level

mod power;
mod work;

pub use power::{POWERED_PHRASES, PowerState};
pub use work::{WorkLevel, WorkMode};

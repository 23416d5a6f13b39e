// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Miner state management types.
//!
//! [`MinerState`] reconciles commands issued through the library with the
//! values the miner reports when polled. [`StateChange`] describes each
//! value that changed as a result, and [`Clock`] supplies the time the
//! reconciliation is measured against.
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, Instant};
//! use avalon_mini::response::StatusSnapshot;
//! use avalon_mini::state::MinerState;
//! use avalon_mini::types::PowerState;
//!
//! let mut state = MinerState::new();
//! let t0 = Instant::now();
//!
//! state.command_power(PowerState::On, t0);
//!
//! // The miner still reports idle three seconds later; the poll is ignored.
//! let idle = StatusSnapshot::from_estats("SYSTEMSTATU[Work: In Idle]");
//! assert!(state.apply_snapshot(&idle, t0 + Duration::from_secs(3)).is_empty());
//! assert_eq!(state.power(), PowerState::On);
//! ```

mod clock;
mod miner_state;
mod state_change;

pub use clock::{Clock, ManualClock, SystemClock};
pub use miner_state::{CommandableState, GRACE_PERIOD, MinerState};
pub use state_change::StateChange;

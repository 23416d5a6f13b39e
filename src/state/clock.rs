// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time sources for grace windows and command nonces.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of time for a [`Device`](crate::Device).
///
/// Grace windows are measured with the monotonic [`now`](Self::now); power
/// commands carry the wall-clock [`unix_timestamp`](Self::unix_timestamp).
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current monotonic instant.
    fn now(&self) -> Instant;

    /// Returns the current wall-clock time in whole seconds since the epoch.
    fn unix_timestamp(&self) -> i64;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use avalon_mini::state::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_700_000_000);
/// let start = clock.now();
/// clock.advance(Duration::from_secs(3));
///
/// assert_eq!(clock.now() - start, Duration::from_secs(3));
/// assert_eq!(clock.unix_timestamp(), 1_700_000_003);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    unix_origin: i64,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    /// Creates a clock frozen at `unix_origin` seconds since the epoch.
    #[must_use]
    pub fn new(unix_origin: i64) -> Self {
        Self {
            origin: Instant::now(),
            unix_origin,
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Returns the time elapsed since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn unix_timestamp(&self) -> i64 {
        let secs = i64::try_from(self.elapsed().as_secs()).unwrap_or(i64::MAX);
        self.unix_origin.saturating_add(secs)
    }
}

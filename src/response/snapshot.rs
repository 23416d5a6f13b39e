// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized status built from one response.

use serde::{Deserialize, Serialize};

use crate::command::StatusCommand;
use crate::error::ParseError;
use crate::response::bracket::{
    EstatsField, FieldKind, extract_decimal, extract_integer, extract_positional,
    extract_system_work,
};
use crate::response::kv::KvMap;
use crate::types::PowerState;

/// Status values parsed from a single round trip.
///
/// Every field is optional: `None` means the response did not carry the
/// field (or carried it malformed), and must be read as "unknown", never as
/// zero or off. A `summary` response only fills [`hashrate_mhs`]; an
/// `estats` response fills everything else.
///
/// [`hashrate_mhs`]: Self::hashrate_mhs
///
/// # Examples
///
/// ```
/// use avalon_mini::response::StatusSnapshot;
/// use avalon_mini::types::PowerState;
///
/// let raw = "WORKMODE[2] WORKLEVEL[-1] SoftOFF[0] LcdOnoff[1]";
/// let snapshot = StatusSnapshot::from_estats(raw);
///
/// assert_eq!(snapshot.work_mode(), Some(2));
/// assert_eq!(snapshot.work_level(), Some(-1));
/// assert_eq!(snapshot.soft_off(), Some(0));
/// assert_eq!(snapshot.display(), Some(PowerState::On));
/// assert_eq!(snapshot.ambient_temperature(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub(crate) work_mode: Option<i64>,
    pub(crate) work_level: Option<i64>,
    pub(crate) soft_off: Option<i64>,
    pub(crate) display: Option<PowerState>,
    pub(crate) hashrate_mhs: Option<f64>,
    pub(crate) ambient_temperature: Option<f64>,
    pub(crate) target_temperature: Option<f64>,
    pub(crate) power_draw: Option<f64>,
    pub(crate) system_work: Option<String>,
    pub(crate) power: Option<PowerState>,
}

impl StatusSnapshot {
    /// Builds a snapshot from the response to `query`.
    #[must_use]
    pub fn parse(query: StatusCommand, raw: &str) -> Self {
        match query {
            StatusCommand::Summary => Self::from_summary(raw),
            StatusCommand::Estats => Self::from_estats(raw),
        }
    }

    /// Builds a snapshot from a `summary` response.
    #[must_use]
    pub fn from_summary(raw: &str) -> Self {
        let kv = KvMap::parse(raw);
        let hashrate_mhs = absorb(kv.hashrate_mhs());
        if hashrate_mhs.is_none() {
            tracing::debug!(keys = kv.len(), "No usable hashrate key in summary");
        }

        Self {
            hashrate_mhs,
            ..Self::default()
        }
    }

    /// Builds a snapshot from an `estats` response.
    #[must_use]
    pub fn from_estats(raw: &str) -> Self {
        let mut snapshot = Self::default();

        for field in EstatsField::ALL {
            match field.kind() {
                FieldKind::Integer => {
                    let value = absorb(extract_integer(raw, field));
                    match field {
                        EstatsField::WorkMode => snapshot.work_mode = value,
                        EstatsField::WorkLevel => snapshot.work_level = value,
                        EstatsField::SoftOff => snapshot.soft_off = value,
                        EstatsField::LcdOnOff => snapshot.display = value.map(PowerState::from_flag),
                        _ => {}
                    }
                }
                FieldKind::Decimal => {
                    let value = absorb(extract_decimal(raw, field));
                    match field {
                        EstatsField::AmbientTemperature => snapshot.ambient_temperature = value,
                        EstatsField::TargetTemperature => snapshot.target_temperature = value,
                        _ => {}
                    }
                }
                FieldKind::Positional { index, min_tokens } => {
                    snapshot.power_draw = absorb(extract_positional(raw, field, index, min_tokens));
                }
                FieldKind::Text => {
                    // A status field without a recognizable phrase still
                    // reports the miner as not working.
                    snapshot.system_work = extract_system_work(raw);
                    snapshot.power = field.find(raw).map(|_| {
                        snapshot
                            .system_work
                            .as_deref()
                            .map_or(PowerState::Off, PowerState::from_system_work)
                    });
                }
            }
        }

        snapshot
    }

    /// Raw `WORKMODE` index.
    #[must_use]
    pub fn work_mode(&self) -> Option<i64> {
        self.work_mode
    }

    /// Raw `WORKLEVEL` index.
    #[must_use]
    pub fn work_level(&self) -> Option<i64> {
        self.work_level
    }

    /// Raw `SoftOFF` flag.
    #[must_use]
    pub fn soft_off(&self) -> Option<i64> {
        self.soft_off
    }

    /// Display state from `LcdOnoff`.
    #[must_use]
    pub fn display(&self) -> Option<PowerState> {
        self.display
    }

    /// Hashrate in MH/s.
    #[must_use]
    pub fn hashrate_mhs(&self) -> Option<f64> {
        self.hashrate_mhs
    }

    /// Ambient (inlet) temperature in °C.
    #[must_use]
    pub fn ambient_temperature(&self) -> Option<f64> {
        self.ambient_temperature
    }

    /// Target temperature in °C.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Power draw in watts.
    #[must_use]
    pub fn power_draw(&self) -> Option<f64> {
        self.power_draw
    }

    /// System-work phrase, e.g. `"In Work"`.
    #[must_use]
    pub fn system_work(&self) -> Option<&str> {
        self.system_work.as_deref()
    }

    /// Miner power state derived from the system-work phrase.
    ///
    /// Unset only when the response carried no `SYSTEMSTATU` field.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    /// Returns `true` if no field was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Downgrades a malformed field to unset.
fn absorb<T>(result: Result<Option<T>, ParseError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed status field");
        None
    })
}

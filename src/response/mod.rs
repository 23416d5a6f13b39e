// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for cgminer API text.
//!
//! The miner replies in free text using two unrelated layouts:
//!
//! - `summary`: `|`-separated sections of `,`-separated `key=value` items,
//!   read with [`KvMap`]
//! - `estats`: `NAME[contents]` fields scattered through the text, read
//!   with the [`EstatsField`] extraction table
//!
//! [`StatusSnapshot`] runs the extractors relevant to a query and turns the
//! result into typed, optional values. Missing or malformed fields become
//! unset values; parsing a response never fails.

mod bracket;
mod kv;
mod snapshot;

pub use bracket::{
    EstatsField, FieldKind, PS_MIN_TOKENS, PS_POWER_INDEX, bracket_fields, extract_decimal,
    extract_integer, extract_positional, extract_system_work, find_bracket,
};
pub use kv::{HASHRATE_KEYS, KvMap};
pub use snapshot::StatusSnapshot;

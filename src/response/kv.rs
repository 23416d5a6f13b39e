// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat `key=value` parsing for `summary` style responses.

use std::collections::HashMap;

use crate::error::ParseError;

/// Hashrate keys in order of preference, freshest window first.
///
/// All values are reported in MH/s.
pub const HASHRATE_KEYS: [&str; 5] = ["MHS 5s", "MHS av", "MHS 1m", "MHS 5m", "MHS 15m"];

/// Flat mapping of the `key=value` items in a response.
///
/// The response is split on `|` into sections, each section on `,` into
/// items, and each item on its first `=`. Keys and values are trimmed;
/// items without `=` and items with an empty key are skipped. When a key
/// repeats, the last occurrence wins.
///
/// # Examples
///
/// ```
/// use avalon_mini::response::KvMap;
///
/// let kv = KvMap::parse("STATUS=S,When=1|SUMMARY,Elapsed=558,MHS av=32581844.99");
/// assert_eq!(kv.get("Elapsed"), Some("558"));
/// assert_eq!(kv.get("MHS av"), Some("32581844.99"));
/// assert_eq!(kv.get("SUMMARY"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvMap {
    entries: HashMap<String, String>,
}

impl KvMap {
    /// Parses a raw response body.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();

        for section in raw.split('|') {
            for item in section.split(',') {
                let Some((key, value)) = item.split_once('=') else {
                    continue;
                };
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                entries.insert(key.to_string(), value.trim().to_string());
            }
        }

        Self { entries }
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all key/value pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the first hashrate key present, in [`HASHRATE_KEYS`] order.
    #[must_use]
    pub fn hashrate_entry(&self) -> Option<(&'static str, &str)> {
        HASHRATE_KEYS
            .into_iter()
            .find_map(|key| self.get(key).map(|value| (key, value)))
    }

    /// Returns the hashrate in MH/s from the preferred available window.
    ///
    /// Returns `Ok(None)` if no hashrate key is present.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the chosen value is not a
    /// finite number. Coarser windows are not consulted in that case.
    pub fn hashrate_mhs(&self) -> Result<Option<f64>, ParseError> {
        let Some((key, value)) = self.hashrate_entry() else {
            return Ok(None);
        };

        match value.parse::<f64>() {
            Ok(mhs) if mhs.is_finite() => Ok(Some(mhs)),
            Ok(_) => Err(ParseError::InvalidValue {
                field: key.to_string(),
                message: format!("non-finite hashrate {value:?}"),
            }),
            Err(e) => Err(ParseError::InvalidValue {
                field: key.to_string(),
                message: format!("{e}: {value:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "STATUS=S,When=1733000000,Code=11,Msg=Summary,Description=cgminer 4.11.1|SUMMARY,Elapsed=558,MHS av=32581844.99,MHS 5s=36807196.51,MHS 1m=33000000.00,Accepted=12|";

    #[test]
    fn prefers_freshest_window() {
        let kv = KvMap::parse("STATUS=S|SUMMARY,Elapsed=558,MHS av=32581844.99,MHS 5s=36807196.51");
        assert_eq!(kv.hashrate_entry(), Some(("MHS 5s", "36807196.51")));
        assert_eq!(kv.hashrate_mhs().unwrap(), Some(36_807_196.51));
    }

    #[test]
    fn falls_back_to_coarser_average() {
        let kv = KvMap::parse("SUMMARY,MHS 15m=10.5,MHS 1m=11.25");
        assert_eq!(kv.hashrate_mhs().unwrap(), Some(11.25));
    }

    #[test]
    fn missing_hashrate_is_unset() {
        let kv = KvMap::parse("STATUS=S|SUMMARY,Elapsed=558");
        assert_eq!(kv.hashrate_mhs().unwrap(), None);
    }

    #[test]
    fn malformed_hashrate_is_error() {
        let kv = KvMap::parse("SUMMARY,MHS 5s=fast,MHS av=1.0");
        let err = kv.hashrate_mhs().unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "MHS 5s"));
    }

    #[test]
    fn last_occurrence_wins() {
        let kv = KvMap::parse("A=1,B=2|A=3");
        assert_eq!(kv.get("A"), Some("3"));
        assert_eq!(kv.len(), 2);
    }

    #[test]
    fn trims_and_skips_malformed_items() {
        let kv = KvMap::parse(" key = value ,noequals, =orphan,x=a=b");
        assert_eq!(kv.get("key"), Some("value"));
        assert_eq!(kv.get("x"), Some("a=b"));
        assert_eq!(kv.len(), 2);
    }

    #[test]
    fn empty_input() {
        assert!(KvMap::parse("").is_empty());
        assert_eq!(KvMap::parse("").iter().count(), 0);
    }

    #[test]
    fn parse_is_idempotent() {
        for raw in [SUMMARY, "", "a=1|a=2,b", "|||,,,===", "MHS 5s=1|MHS 5s=2"] {
            assert_eq!(KvMap::parse(raw), KvMap::parse(raw));
        }
    }

    #[test]
    fn parses_real_summary() {
        let kv = KvMap::parse(SUMMARY);
        assert_eq!(kv.get("Msg"), Some("Summary"));
        assert_eq!(kv.get("Accepted"), Some("12"));
        assert_eq!(kv.hashrate_mhs().unwrap(), Some(36_807_196.51));
    }
}

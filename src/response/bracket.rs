// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `NAME[contents]` field extraction for `estats` style responses.
//!
//! An extended status line looks like
//! `Ver[MM4v2_X3] ... WORKMODE[2] WORKLEVEL[-1] SoftOFF[0] LcdOnoff[1]
//! TA[25] TarT[90] PS[0 1215 2034 37 756 2032 808]
//! SYSTEMSTATU[Work: In Work, Hash Board: 1] ...`.
//! Each field the library reads is described by an [`EstatsField`]: the tag
//! (or tags, across firmware variants) and how to interpret the contents.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

/// Position of the power-draw watts reading inside `PS[...]`.
///
/// Observed on shipping firmware, not documented by the vendor.
pub const PS_POWER_INDEX: usize = 4;

/// Minimum number of `PS[...]` tokens for the power reading to be present.
pub const PS_MIN_TOKENS: usize = PS_POWER_INDEX + 1;

/// Key inside `SYSTEMSTATU[...]` that carries the system-work phrase.
const SYSTEM_WORK_KEY: &str = "Work";

/// Innermost `NAME[contents]` occurrences; nested brackets are skipped over
/// so that fields inside a wrapper such as `MM ID0[...]` are still found.
static BRACKET_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\[([^\[\]]*)\]").expect("bracket field pattern")
});

/// How the contents of a bracket field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single integer with an optional leading minus sign.
    Integer,
    /// A single number with an optional minus sign and decimal fraction.
    Decimal,
    /// Whitespace-separated numbers; one position is read.
    Positional {
        /// Zero-based token position.
        index: usize,
        /// Fewer tokens than this means the field is absent.
        min_tokens: usize,
    },
    /// Free text.
    Text,
}

/// The extended status fields the library reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EstatsField {
    /// `WORKMODE[n]`
    WorkMode,
    /// `WORKLEVEL[n]`
    WorkLevel,
    /// `SoftOFF[n]`
    SoftOff,
    /// `LcdOnoff[n]`
    LcdOnOff,
    /// `TA[t]`, or `ITemp[t]` on older firmware.
    AmbientTemperature,
    /// `TarT[t]`
    TargetTemperature,
    /// `PS[...]`, power supply readings.
    PowerSupply,
    /// `SYSTEMSTATU[Work: <phrase>, ...]`
    SystemStatus,
}

impl EstatsField {
    /// Every field, in the order the snapshot builder reads them.
    pub const ALL: [Self; 8] = [
        Self::WorkMode,
        Self::WorkLevel,
        Self::SoftOff,
        Self::LcdOnOff,
        Self::AmbientTemperature,
        Self::TargetTemperature,
        Self::PowerSupply,
        Self::SystemStatus,
    ];

    /// Tags to look for, in order of preference.
    #[must_use]
    pub const fn tags(&self) -> &'static [&'static str] {
        match self {
            Self::WorkMode => &["WORKMODE"],
            Self::WorkLevel => &["WORKLEVEL"],
            Self::SoftOff => &["SoftOFF"],
            Self::LcdOnOff => &["LcdOnoff"],
            Self::AmbientTemperature => &["TA", "ITemp"],
            Self::TargetTemperature => &["TarT"],
            Self::PowerSupply => &["PS"],
            Self::SystemStatus => &["SYSTEMSTATU"],
        }
    }

    /// How the field contents are interpreted.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::WorkMode | Self::WorkLevel | Self::SoftOff | Self::LcdOnOff => FieldKind::Integer,
            Self::AmbientTemperature | Self::TargetTemperature => FieldKind::Decimal,
            Self::PowerSupply => FieldKind::Positional {
                index: PS_POWER_INDEX,
                min_tokens: PS_MIN_TOKENS,
            },
            Self::SystemStatus => FieldKind::Text,
        }
    }

    /// Finds the raw contents of this field, trying each tag in turn.
    #[must_use]
    pub fn find<'a>(&self, raw: &'a str) -> Option<(&'static str, &'a str)> {
        self.tags()
            .iter()
            .find_map(|tag| find_bracket(raw, tag).map(|contents| (*tag, contents)))
    }
}

/// Iterates over every innermost `NAME[contents]` pair in `raw`.
pub fn bracket_fields(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    BRACKET_FIELD.captures_iter(raw).filter_map(|caps| {
        let name = caps.get(1)?.as_str();
        let contents = caps.get(2)?.as_str();
        Some((name, contents))
    })
}

/// Returns the contents of the first `tag[...]` field in `raw`.
///
/// # Examples
///
/// ```
/// use avalon_mini::response::find_bracket;
///
/// let raw = "Ver[MM4v2] TA[25] TarT[90]";
/// assert_eq!(find_bracket(raw, "TarT"), Some("90"));
/// assert_eq!(find_bracket(raw, "ITemp"), None);
/// ```
#[must_use]
pub fn find_bracket<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    bracket_fields(raw)
        .find(|(name, _)| *name == tag)
        .map(|(_, contents)| contents)
}

/// Extracts an integer field.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the field is present but is not
/// an integer.
pub fn extract_integer(raw: &str, field: EstatsField) -> Result<Option<i64>, ParseError> {
    let Some((tag, contents)) = field.find(raw) else {
        return Ok(None);
    };
    parse_integer(tag, contents).map(Some)
}

/// Extracts a single decimal field.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the field is present but is not
/// a decimal number.
pub fn extract_decimal(raw: &str, field: EstatsField) -> Result<Option<f64>, ParseError> {
    let Some((tag, contents)) = field.find(raw) else {
        return Ok(None);
    };
    parse_decimal(tag, contents).map(Some)
}

/// Extracts one position of a whitespace-separated numeric field.
///
/// A field with fewer than `min_tokens` tokens counts as absent.
///
/// # Errors
///
/// Returns `ParseError::InvalidValue` if the token at `index` is not a
/// decimal number.
pub fn extract_positional(
    raw: &str,
    field: EstatsField,
    index: usize,
    min_tokens: usize,
) -> Result<Option<f64>, ParseError> {
    let Some((tag, contents)) = field.find(raw) else {
        return Ok(None);
    };
    let tokens: Vec<&str> = contents.split_whitespace().collect();
    if tokens.len() < min_tokens.max(index + 1) {
        return Ok(None);
    }
    parse_decimal(tag, tokens[index]).map(Some)
}

/// Extracts the system-work phrase, e.g. `"In Work"`.
///
/// The phrase is the value of the `Work:` entry; contents without any
/// `key: value` entry are taken whole.
#[must_use]
pub fn extract_system_work(raw: &str) -> Option<String> {
    let (_, contents) = EstatsField::SystemStatus.find(raw)?;

    if !contents.contains(':') {
        let phrase = contents.trim();
        return (!phrase.is_empty()).then(|| phrase.to_string());
    }

    contents
        .split(',')
        .filter_map(|entry| entry.split_once(':'))
        .find(|(key, _)| key.trim() == SYSTEM_WORK_KEY)
        .map(|(_, value)| value.trim().to_string())
        .filter(|phrase| !phrase.is_empty())
}

fn parse_integer(tag: &str, text: &str) -> Result<i64, ParseError> {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(tag, format!("expected integer, got {text:?}")));
    }
    text.parse::<i64>()
        .map_err(|e| invalid(tag, format!("{e}: {text:?}")))
}

fn parse_decimal(tag: &str, text: &str) -> Result<f64, ParseError> {
    let text = text.trim();
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let well_formed = match unsigned.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(unsigned),
    };
    if !well_formed {
        return Err(invalid(tag, format!("expected number, got {text:?}")));
    }
    text.parse::<f64>()
        .map_err(|e| invalid(tag, format!("{e}: {text:?}")))
}

fn invalid(tag: &str, message: String) -> ParseError {
    ParseError::InvalidValue {
        field: tag.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESTATS: &str = "STATUS=S,When=1733000000,Code=70,Msg=CGMiner stats,Description=cgminer 4.11.1|STATS=0,ID=AVA100,Elapsed=558,MM ID0=Ver[Mini3-1.0] DNA[020100] Elapsed[558] WORKMODE[2] WORKLEVEL[-1] SoftOFF[0] LcdOnoff[1] TA[25] ITemp[31.5] TarT[90] PS[0 1215 2034 37 756 2032 808] SYSTEMSTATU[Work: In Work, Hash Board: 1] GHSmm[36807.19]|";

    #[test]
    fn finds_fields() {
        assert_eq!(find_bracket(ESTATS, "WORKMODE"), Some("2"));
        assert_eq!(find_bracket(ESTATS, "PS"), Some("0 1215 2034 37 756 2032 808"));
        assert_eq!(find_bracket(ESTATS, "Missing"), None);
    }

    #[test]
    fn tag_must_match_whole_name() {
        // `ITemp` must not satisfy a lookup for `Temp`, nor `DATA` one for `TA`.
        let raw = "ITemp[31] DATA[7]";
        assert_eq!(find_bracket(raw, "Temp"), None);
        assert_eq!(find_bracket(raw, "TA"), None);
    }

    #[test]
    fn nested_wrapper_is_skipped() {
        let raw = "MM ID0[Ver[1] WORKMODE[1]]";
        assert_eq!(find_bracket(raw, "WORKMODE"), Some("1"));
    }

    #[test]
    fn integer_fields() {
        assert_eq!(extract_integer(ESTATS, EstatsField::WorkMode).unwrap(), Some(2));
        assert_eq!(extract_integer(ESTATS, EstatsField::WorkLevel).unwrap(), Some(-1));
        assert_eq!(extract_integer(ESTATS, EstatsField::SoftOff).unwrap(), Some(0));
        assert_eq!(extract_integer(ESTATS, EstatsField::LcdOnOff).unwrap(), Some(1));
    }

    #[test]
    fn integer_rejects_garbage() {
        let err = extract_integer("WORKMODE[two]", EstatsField::WorkMode).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "WORKMODE"));
        assert!(extract_integer("WORKMODE[]", EstatsField::WorkMode).is_err());
        assert!(extract_integer("WORKMODE[1.5]", EstatsField::WorkMode).is_err());
    }

    #[test]
    fn absent_field_is_none() {
        assert_eq!(extract_integer("TA[25]", EstatsField::WorkMode).unwrap(), None);
        assert_eq!(extract_decimal("", EstatsField::TargetTemperature).unwrap(), None);
    }

    #[test]
    fn ambient_prefers_ta_over_itemp() {
        assert_eq!(
            extract_decimal(ESTATS, EstatsField::AmbientTemperature).unwrap(),
            Some(25.0)
        );
        assert_eq!(
            extract_decimal("ITemp[31.5]", EstatsField::AmbientTemperature).unwrap(),
            Some(31.5)
        );
    }

    #[test]
    fn decimal_accepts_sign_and_fraction() {
        assert_eq!(
            extract_decimal("TarT[-4.25]", EstatsField::TargetTemperature).unwrap(),
            Some(-4.25)
        );
        assert!(extract_decimal("TarT[4.]", EstatsField::TargetTemperature).is_err());
        assert!(extract_decimal("TarT[inf]", EstatsField::TargetTemperature).is_err());
    }

    #[test]
    fn power_supply_position() {
        let watts = extract_positional(
            "PS[0 1215 2034 37 756 2032 808]",
            EstatsField::PowerSupply,
            PS_POWER_INDEX,
            PS_MIN_TOKENS,
        )
        .unwrap();
        assert_eq!(watts, Some(756.0));
    }

    #[test]
    fn short_power_supply_is_absent() {
        let watts =
            extract_positional("PS[1 2 3]", EstatsField::PowerSupply, PS_POWER_INDEX, PS_MIN_TOKENS)
                .unwrap();
        assert_eq!(watts, None);
    }

    #[test]
    fn malformed_power_token_is_error() {
        let result =
            extract_positional("PS[0 1 2 3 x 5]", EstatsField::PowerSupply, PS_POWER_INDEX, PS_MIN_TOKENS);
        assert!(result.is_err());
    }

    #[test]
    fn system_work_phrase() {
        assert_eq!(extract_system_work(ESTATS), Some("In Work".to_string()));
        assert_eq!(
            extract_system_work("SYSTEMSTATU[Work: In Idle, Hash Board: 1]"),
            Some("In Idle".to_string())
        );
        assert_eq!(
            extract_system_work("SYSTEMSTATU[In Init]"),
            Some("In Init".to_string())
        );
        assert_eq!(extract_system_work("SYSTEMSTATU[Hash Board: 1]"), None);
        assert_eq!(extract_system_work("SYSTEMSTATU[]"), None);
        assert_eq!(extract_system_work("TA[1]"), None);
    }

    #[test]
    fn field_table() {
        assert_eq!(EstatsField::AmbientTemperature.tags(), &["TA", "ITemp"]);
        assert_eq!(EstatsField::WorkLevel.kind(), FieldKind::Integer);
        assert_eq!(EstatsField::SystemStatus.kind(), FieldKind::Text);
        assert_eq!(bracket_fields(ESTATS).count(), 13);
    }
}

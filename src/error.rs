// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `avalon_mini` library.
//!
//! The hierarchy separates failures a caller has to react to (a connection
//! that could not be made, a setting the device cannot accept) from parse
//! problems, which never escape a status poll: a missing field is simply an
//! unset value, and a malformed number downgrades that one field to unset.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the miner.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response field.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device setup or operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to caller-supplied values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid power or display state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// The work mode label or index is not one the miner knows.
    #[error("unknown work mode: {0}")]
    UnknownWorkMode(String),

    /// The work level label or index is not one the miner knows.
    #[error("unknown work level: {0}")]
    UnknownWorkLevel(String),
}

/// Errors related to the TCP transport.
///
/// Every variant means the round trip did not complete; callers must not
/// assume a command reached the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection to the miner failed (refused, reset, or I/O failure).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or port.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<std::io::Error> for ProtocolError {
    fn from(err: std::io::Error) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}

/// Errors related to parsing a single response field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A field was present but its text could not be converted.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to device setup.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport for the cgminer API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};

// ============================================================================
// TcpConfig - Connection parameters
// ============================================================================

/// Address and timeout of a miner.
///
/// Immutable once a client has been created from it.
///
/// # Examples
///
/// ```
/// use avalon_mini::protocol::TcpConfig;
/// use std::time::Duration;
///
/// let config = TcpConfig::new("192.168.1.60");
/// assert_eq!(config.port(), 4028);
///
/// let config = TcpConfig::new("192.168.1.60")
///     .with_port(4029)
///     .with_timeout(Duration::from_secs(2));
/// assert_eq!(config.address(), "192.168.1.60:4029");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpConfig {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_timeout", with = "duration_secs")]
    timeout: Duration,
}

fn default_port() -> u16 {
    TcpConfig::DEFAULT_PORT
}

fn default_timeout() -> Duration {
    TcpConfig::DEFAULT_TIMEOUT
}

impl TcpConfig {
    /// Default cgminer API port.
    pub const DEFAULT_PORT: u16 = 4028;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the miner
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks that the configuration names a host.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "host must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates a `TcpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty.
    pub fn into_client(self) -> Result<TcpClient, ProtocolError> {
        self.validate()?;
        Ok(TcpClient { config: self })
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TcpClient - One connection per command
// ============================================================================

/// TCP client for the miner's cgminer API.
///
/// Every call opens a fresh connection, writes the command, half-closes the
/// write side and reads until the miner closes. There is no pooling and no
/// retry; the configured timeout bounds the whole round trip.
///
/// # Examples
///
/// ```no_run
/// use avalon_mini::command::StatusCommand;
/// use avalon_mini::protocol::{Protocol, TcpConfig};
///
/// # async fn example() -> avalon_mini::Result<()> {
/// let client = TcpConfig::new("192.168.1.60").into_client()?;
/// let response = client.send_command(&StatusCommand::Estats).await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpClient {
    config: TcpConfig,
}

impl TcpClient {
    /// Creates a new client for the specified host on the default port.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        TcpConfig::new(host).into_client()
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    async fn round_trip(&self, command: &str) -> Result<Vec<u8>, ProtocolError> {
        let mut stream = TcpStream::connect((self.config.host(), self.config.port()))
            .await
            .map_err(|e| self.connection_error(&e))?;

        stream
            .write_all(command.as_bytes())
            .await
            .map_err(|e| self.connection_error(&e))?;
        // The miner treats EOF on our write side as the end of the request.
        stream
            .shutdown()
            .await
            .map_err(|e| self.connection_error(&e))?;

        let mut buf = Vec::with_capacity(4096);
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|e| self.connection_error(&e))?;
        Ok(buf)
    }

    fn connection_error(&self, err: &std::io::Error) -> ProtocolError {
        ProtocolError::ConnectionFailed(format!("{}: {err}", self.config.address()))
    }
}

impl Protocol for TcpClient {
    async fn send_raw(&self, command: &str) -> Result<CommandResponse, ProtocolError> {
        tracing::debug!(
            address = %self.config.address(),
            command = %command,
            "Sending command"
        );

        let timeout = self.config.timeout();
        let bytes = tokio::time::timeout(timeout, self.round_trip(command))
            .await
            .map_err(|_| {
                ProtocolError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
            })??;

        let body = decode_ascii_lossy(&bytes);
        tracing::debug!(
            address = %self.config.address(),
            bytes = bytes.len(),
            "Received response"
        );
        tracing::trace!(body = %body, "Response body");

        Ok(CommandResponse::new(body))
    }
}

/// Decodes bytes as ASCII, dropping any byte outside the ASCII range.
pub(crate) fn decode_ascii_lossy(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| char::from(b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcp_config_default_values() {
        let config = TcpConfig::new("192.168.1.60");
        assert_eq!(config.host(), "192.168.1.60");
        assert_eq!(config.port(), 4028);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn tcp_config_builder_chain() {
        let config = TcpConfig::new("miner.local")
            .with_port(14028)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.port(), 14028);
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.address(), "miner.local:14028");
    }

    #[test]
    fn empty_host_rejected() {
        assert!(matches!(
            TcpConfig::new("  ").into_client(),
            Err(ProtocolError::InvalidAddress(_))
        ));
        assert!(TcpClient::new("").is_err());
    }

    #[test]
    fn tcp_config_deserialize_defaults() {
        let config: TcpConfig = serde_json::from_str(r#"{"host":"10.0.0.5"}"#).unwrap();
        assert_eq!(config, TcpConfig::new("10.0.0.5"));
    }

    #[test]
    fn tcp_config_deserialize_full() {
        let config: TcpConfig =
            serde_json::from_str(r#"{"host":"10.0.0.5","port":4030,"timeout":1.5}"#).unwrap();
        assert_eq!(config.port(), 4030);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn decode_drops_non_ascii() {
        assert_eq!(decode_ascii_lossy(b"TA[25]\xff\xfe TarT[90]"), "TA[25] TarT[90]");
        assert_eq!(decode_ascii_lossy(&[]), "");
    }

    #[test]
    fn client_keeps_config() {
        let client = TcpClient::new("192.168.1.60").unwrap();
        assert_eq!(client.config().port(), TcpConfig::DEFAULT_PORT);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP device builder.

use std::sync::Arc;
use std::time::Duration;

use crate::device::{DEFAULT_NAME, Device};
use crate::error::{DeviceError, Error, ProtocolError};
use crate::protocol::{TcpClient, TcpConfig};
use crate::state::{Clock, SystemClock};

/// Builder for TCP devices.
///
/// Created with `Device::tcp("host")` or
/// `Device::tcp_config(TcpConfig::new("host").with_port(4028))`.
///
/// Building opens no connection: the miner is first contacted by the
/// first command or poll.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use avalon_mini::Device;
///
/// let device = Device::tcp("192.168.1.60")
///     .with_timeout(Duration::from_secs(2))
///     .with_name("Office")
///     .build()
///     .unwrap();
///
/// assert_eq!(device.name(), "Office");
/// assert_eq!(device.config().address(), "192.168.1.60:4028");
/// ```
#[derive(Debug)]
pub struct DeviceBuilder {
    config: TcpConfig,
    name: Option<String>,
    clock: Option<Arc<dyn Clock>>,
}

impl DeviceBuilder {
    pub(crate) fn new(config: TcpConfig) -> Self {
        Self {
            config,
            name: None,
            clock: None,
        }
    }

    /// Overrides the API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Overrides the round-trip timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets the display name used in logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the system clock, e.g. with a
    /// [`ManualClock`](crate::state::ManualClock) in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Returns the transport configuration built so far.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Builds the device.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidConfiguration`] if the host is empty.
    pub fn build(self) -> Result<Device<TcpClient>, Error> {
        let client = self.config.into_client().map_err(|e| match e {
            ProtocolError::InvalidAddress(reason) => {
                Error::Device(DeviceError::InvalidConfiguration(reason))
            }
            other => Error::Protocol(other),
        })?;

        let device = Device::new(
            client,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        );

        tracing::debug!(
            device = %device.name(),
            address = %device.config().address(),
            "Device built"
        );
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ManualClock;

    #[test]
    fn builder_defaults() {
        let builder = DeviceBuilder::new(TcpConfig::new("10.0.0.5"));
        assert_eq!(builder.config().port(), TcpConfig::DEFAULT_PORT);
        assert_eq!(builder.config().timeout(), TcpConfig::DEFAULT_TIMEOUT);
        assert!(builder.name.is_none());
    }

    #[test]
    fn builder_overrides() {
        let builder = DeviceBuilder::new(TcpConfig::new("10.0.0.5"))
            .with_port(14028)
            .with_timeout(Duration::from_millis(750));
        assert_eq!(builder.config().address(), "10.0.0.5:14028");
        assert_eq!(builder.config().timeout(), Duration::from_millis(750));
    }

    #[test]
    fn build_with_name_and_clock() {
        let clock = Arc::new(ManualClock::new(42));
        let device = DeviceBuilder::new(TcpConfig::new("10.0.0.5"))
            .with_name("Shed")
            .with_clock(clock)
            .build()
            .unwrap();
        assert_eq!(device.name(), "Shed");
    }

    #[test]
    fn build_default_name() {
        let device = DeviceBuilder::new(TcpConfig::new("10.0.0.5")).build().unwrap();
        assert_eq!(device.name(), DEFAULT_NAME);
    }

    #[test]
    fn build_rejects_empty_host() {
        let err = DeviceBuilder::new(TcpConfig::new("  ")).build().unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::InvalidConfiguration(_))
        ));
    }
}

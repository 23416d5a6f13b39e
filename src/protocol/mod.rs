// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for the miner's cgminer API.
//!
//! The miner speaks plaintext over TCP (port 4028 by default) with one
//! request per connection: the client writes the command, closes its write
//! side to mark the end of the request, and reads until the miner closes
//! the connection.
//!
//! - [`TcpClient`]: the socket implementation
//! - [`TcpConfig`]: host, port and timeout
//! - [`Protocol`]: the seam the [`Device`](crate::Device) talks through

mod tcp;

pub use tcp::{TcpClient, TcpConfig};

use crate::command::Command;
use crate::error::ProtocolError;

/// Raw response from one round trip.
///
/// No structure is assumed until the body is handed to the
/// [`response`](crate::response) parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Returns the raw response text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consumes the response and returns the raw text.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }

    /// Returns `true` if the miner closed the connection without replying.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Trait for transports that can deliver commands to the miner.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Sends a command to the miner and returns the response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the round trip does not complete.
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, ProtocolError> {
        self.send_raw(&command.to_wire()).await
    }

    /// Sends a raw command string to the miner.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the round trip does not complete.
    async fn send_raw(&self, command: &str) -> Result<CommandResponse, ProtocolError>;
}

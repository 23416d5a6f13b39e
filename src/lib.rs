// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `avalon_mini` - A Rust library to monitor and control Avalon Mini miners.
//!
//! The miner exposes a cgminer-compatible text API on TCP port 4028. This
//! library wraps it in an async API with typed commands, tolerant response
//! parsing and a state model that survives the miner's reporting lag.
//!
//! # Supported Features
//!
//! - **Power control**: Soft power on/off with a Unix-time nonce
//! - **Display control**: Front display on/off
//! - **Operating options**: Work mode (heating, mining, night) and work level
//!   (eco, super)
//! - **Telemetry**: Hashrate, ambient and target temperature, power draw
//! - **Subscriptions**: Callbacks fired when a reconciled value changes
//!
//! # Quick Start
//!
//! ```no_run
//! use avalon_mini::Device;
//! use avalon_mini::types::{WorkLevel, WorkMode};
//!
//! #[tokio::main]
//! async fn main() -> avalon_mini::Result<()> {
//!     let device = Device::tcp("192.168.1.60").build()?;
//!
//!     device.power_on().await?;
//!     device.set_work_mode(WorkMode::Heating).await?;
//!     device.set_work_level(WorkLevel::Eco).await?;
//!
//!     device.poll().await?;
//!     let state = device.state();
//!     println!("power: {}, hashrate: {:?} MH/s", state.power(), state.hashrate_mhs());
//!     Ok(())
//! }
//! ```
//!
//! # Subscriptions
//!
//! ```no_run
//! use avalon_mini::{Device, POLL_INTERVAL, subscription::Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> avalon_mini::Result<()> {
//!     let device = Device::tcp("192.168.1.60").build()?;
//!
//!     device.on_power_changed(|state| println!("Miner is now {state}"));
//!     device.on_state_changed(|change| println!("{change:?}"));
//!
//!     let mut ticker = tokio::time::interval(POLL_INTERVAL);
//!     loop {
//!         ticker.tick().await;
//!         if let Err(e) = device.poll().await {
//!             eprintln!("poll failed: {e}");
//!         }
//!     }
//! }
//! ```
//!
//! # Grace Window
//!
//! After a power or display command the miner keeps reporting the old value
//! for a few seconds. Polled values for that setting are ignored for
//! [`state::GRACE_PERIOD`] after the command, so the reported state never
//! flickers back. Work mode and level have no such window.

pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{
    Command, DisplayCommand, PowerCommand, StatusCommand, WorkLevelCommand, WorkModeCommand,
};
pub use device::{DEFAULT_NAME, Device, DeviceBuilder, POLL_INTERVAL};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{CommandResponse, TcpClient, TcpConfig};
pub use response::StatusSnapshot;
pub use state::{MinerState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{PowerState, WorkLevel, WorkMode};

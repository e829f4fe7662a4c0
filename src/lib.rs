// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `fritzbox_lib` - A Rust client for FRITZ!Box routers.
//!
//! This library provides async APIs for the router's web interface: the
//! home automation endpoint (smart plugs, thermostats, dimmers, buttons)
//! and the network device pages (MAC lookup, wake-on-LAN).
//!
//! # Supported Features
//!
//! - **Session handling**: challenge-response login, re-login on expiry
//! - **Device list**: every home automation device with its capabilities
//! - **Templates**: listing and applying
//! - **Switch commands**: typed requests, catalog of known commands
//! - **Network devices**: MAC to UID lookup, wake-on-LAN
//! - **UPnP metrics**: through a caller-supplied [`UpnpService`]
//!
//! # Quick Start
//!
//! ```no_run
//! use fritzbox_lib::{Capability, Config, FritzBox};
//!
//! #[tokio::main]
//! async fn main() -> fritzbox_lib::Result<()> {
//!     let config = Config::builder()
//!         .address("192.168.178.1")
//!         .user("smarthome")
//!         .password("secret")
//!         .build();
//!     let fritz = FritzBox::new(config)?;
//!
//!     let devices = fritz.device_list().await?;
//!     for plug in devices.with_capability(Capability::Switch) {
//!         fritz.switch_off(&plug.ain).await?;
//!     }
//!
//!     if let Some(uid) = fritz.device_uid("40:8D:5C:5B:63:2D").await? {
//!         fritz.wake_up_device(&uid).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library logs through `tracing` and never installs a subscriber.
//! Response bodies are logged only at `debug` level when
//! [`Config::verbose`] is set, with session ids masked.

mod capabilities;
mod client;
pub mod command;
mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod upnp;

pub use capabilities::{Capability, CapabilitySet};
pub use client::FritzBox;
pub use command::{DataRequest, SwitchRequest};
pub use config::{Config, ConfigBuilder, ConfigWarning};
pub use error::{
    AuthError, ConfigError, DeviceError, Error, ParseError, ProtocolError, Result,
};
pub use model::{Device, DeviceList, Template, TemplateList};
pub use protocol::Session;
pub use upnp::{ActionArgument, ActionResult, NoUpnp, RouterMetrics, UpnpService};

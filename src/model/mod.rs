// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data model of the router's responses.
//!
//! - [`Device`] and [`DeviceList`]: home automation devices with their
//!   optional capability blocks
//! - [`Template`] and [`TemplateList`]: named device groups
//! - [`DataResponse`] and [`WakeUpResponse`]: `/data.lua` responses
//!
//! Device and template lists decode from XML (as sent by the router) and
//! from JSON into the same values, see [`parse_device_list`].

mod blocks;
mod data;
mod device;
pub(crate) mod lenient;
mod parse;
mod template;

pub use blocks::{
    Alert, Button, ColorControl, EtsiUnitInfo, LevelControl, NextChange, Powermeter, Setpoint,
    SimpleOnOff, Switch, Temperature, Thermostat,
};
pub use data::{DataResponse, NetworkDevice, NetworkDevices, WakeUpData, WakeUpResponse};
pub use device::{Device, DeviceList};
pub use parse::{Format, parse_device_list, parse_template_list};
pub use template::{Template, TemplateList};

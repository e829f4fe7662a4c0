// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability blocks of a home automation device.
//!
//! Each block mirrors one optional element of a `<device>` entry. Field names
//! on the wire are the router's element names and are shared by the XML and
//! JSON representations. Raw values are kept in the router's units; accessor
//! methods convert them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

/// Switchable outlet state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Switch {
    /// Whether the outlet is on.
    #[serde(deserialize_with = "lenient::flag")]
    pub state: bool,
    /// Switching via UI/API is locked.
    #[serde(deserialize_with = "lenient::flag")]
    pub lock: bool,
    /// Switching via the button on the device is locked.
    #[serde(rename = "devicelock", deserialize_with = "lenient::flag")]
    pub device_lock: bool,
    /// `auto` or `manuell`.
    pub mode: String,
}

/// Energy meter readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Powermeter {
    /// Current power in mW.
    #[serde(deserialize_with = "lenient::number")]
    pub power: i64,
    /// Total energy in Wh.
    #[serde(deserialize_with = "lenient::number")]
    pub energy: i64,
    /// Voltage in mV.
    #[serde(deserialize_with = "lenient::number")]
    pub voltage: i64,
}

impl Powermeter {
    /// Returns the current power in watts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn watts(&self) -> f64 {
        self.power as f64 / 1000.0
    }

    /// Returns the voltage in volts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn volts(&self) -> f64 {
        self.voltage as f64 / 1000.0
    }
}

/// Temperature sensor reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperature {
    /// Temperature in 0.1 °C, offset already applied.
    #[serde(deserialize_with = "lenient::number")]
    pub celsius: i32,
    /// Configured offset in 0.1 °C.
    #[serde(deserialize_with = "lenient::number")]
    pub offset: i32,
}

impl Temperature {
    /// Returns the temperature in degrees Celsius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn degrees(&self) -> f32 {
        self.celsius as f32 / 10.0
    }
}

/// Plain on/off unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleOnOff {
    /// Whether the unit is on.
    #[serde(deserialize_with = "lenient::flag")]
    pub state: bool,
}

/// Dimmable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelControl {
    /// Level from 0 to 255.
    #[serde(deserialize_with = "lenient::number")]
    pub level: u8,
    /// Level from 0 to 100.
    #[serde(rename = "levelpercentage", deserialize_with = "lenient::number")]
    pub level_percentage: u8,
}

/// Color light state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorControl {
    /// Hue in degrees.
    #[serde(deserialize_with = "lenient::number")]
    pub hue: u16,
    /// Saturation from 0 to 255.
    #[serde(deserialize_with = "lenient::number")]
    pub saturation: u16,
    /// White color temperature in Kelvin.
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: u16,
}

/// Next scheduled setpoint change of a thermostat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextChange {
    /// Unix time of the change.
    #[serde(rename = "endperiod", deserialize_with = "lenient::number")]
    pub end_period: i64,
    /// Setpoint after the change, same encoding as [`Thermostat::target`].
    #[serde(rename = "tchange", deserialize_with = "lenient::number")]
    pub target: u8,
}

/// Radiator thermostat (HKR) state.
///
/// Temperatures use the router's half-degree encoding, see [`Setpoint`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Thermostat {
    /// Measured temperature.
    #[serde(rename = "tist", deserialize_with = "lenient::number")]
    pub current: u8,
    /// Target temperature.
    #[serde(rename = "tsoll", deserialize_with = "lenient::number")]
    pub target: u8,
    /// Comfort temperature.
    #[serde(rename = "komfort", deserialize_with = "lenient::number")]
    pub comfort: u8,
    /// Economy temperature.
    #[serde(rename = "absenk", deserialize_with = "lenient::number")]
    pub economy: u8,
    /// Battery is low.
    #[serde(rename = "batterylow", deserialize_with = "lenient::flag")]
    pub battery_low: bool,
    /// Battery charge in percent.
    #[serde(deserialize_with = "lenient::number")]
    pub battery: u8,
    /// Window-open mode is active. The element name is misspelled upstream.
    #[serde(rename = "windowopenactiv", deserialize_with = "lenient::flag")]
    pub window_open_active: bool,
    /// Unix time at which window-open mode ends.
    #[serde(rename = "windowopenactiveendtime", deserialize_with = "lenient::number")]
    pub window_open_end: i64,
    /// Boost mode is active.
    #[serde(rename = "boostactive", deserialize_with = "lenient::flag")]
    pub boost_active: bool,
    /// Unix time at which boost mode ends.
    #[serde(rename = "boostactiveendtime", deserialize_with = "lenient::number")]
    pub boost_end: i64,
    /// Holiday schedule is active.
    #[serde(rename = "holidayactive", deserialize_with = "lenient::flag")]
    pub holiday_active: bool,
    /// Summer schedule is active.
    #[serde(rename = "summeractive", deserialize_with = "lenient::flag")]
    pub summer_active: bool,
    /// Changing settings via UI/API is locked.
    #[serde(deserialize_with = "lenient::flag")]
    pub lock: bool,
    /// Changing settings on the device is locked.
    #[serde(rename = "devicelock", deserialize_with = "lenient::flag")]
    pub device_lock: bool,
    /// Next scheduled change.
    #[serde(rename = "nextchange", skip_serializing_if = "Option::is_none")]
    pub next_change: Option<NextChange>,
}

/// Decoded thermostat temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    /// Valve closed.
    Off,
    /// Valve fully open.
    On,
    /// Temperature in degrees Celsius.
    Celsius(f32),
    /// Value outside the documented range.
    Unknown(u8),
}

impl Setpoint {
    /// Decodes the half-degree encoding (16..=56 is 8 °C to 28 °C).
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            16..=56 => Self::Celsius(f32::from(raw) / 2.0),
            253 => Self::Off,
            254 => Self::On,
            other => Self::Unknown(other),
        }
    }
}

impl Thermostat {
    /// Returns the decoded target temperature.
    #[must_use]
    pub fn target_setpoint(&self) -> Setpoint {
        Setpoint::from_raw(self.target)
    }

    /// Returns the decoded measured temperature.
    #[must_use]
    pub fn current_setpoint(&self) -> Setpoint {
        Setpoint::from_raw(self.current)
    }

    /// Returns when boost mode ends, if it is active.
    #[must_use]
    pub fn boost_ends_at(&self) -> Option<DateTime<Utc>> {
        self.boost_active
            .then(|| DateTime::from_timestamp(self.boost_end, 0))
            .flatten()
    }
}

/// Alarm sensor state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    /// Alarm bitmask, 0 means no alarm.
    #[serde(deserialize_with = "lenient::number")]
    pub state: u32,
    /// Unix time of the last state change.
    #[serde(rename = "lastalertchgtimestamp", deserialize_with = "lenient::number")]
    pub last_change: i64,
}

impl Alert {
    /// Returns whether any alarm is raised.
    #[must_use]
    pub fn is_alarm(&self) -> bool {
        self.state != 0
    }
}

/// A push button.
///
/// Devices with several buttons report one entry per button with its own
/// identifier; older single-button devices omit the identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    /// Button AIN.
    #[serde(
        rename(serialize = "identifier", deserialize = "@identifier"),
        alias = "identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier: Option<String>,
    /// Button id.
    #[serde(
        rename(serialize = "id", deserialize = "@id"),
        alias = "id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Button name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unix time of the last press.
    #[serde(
        rename = "lastpressedtimestamp",
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_pressed_timestamp: Option<i64>,
}

impl Button {
    /// Returns when the button was last pressed.
    #[must_use]
    pub fn last_pressed(&self) -> Option<DateTime<Utc>> {
        self.last_pressed_timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// ETSI unit metadata of a sub-unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtsiUnitInfo {
    /// Id of the physical device this unit belongs to.
    #[serde(rename = "etsideviceid")]
    pub device_id: String,
    /// Unit type code.
    #[serde(rename = "unittype", deserialize_with = "lenient::number")]
    pub unit_type: u32,
    /// Comma separated interface codes.
    pub interfaces: String,
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home automation devices and device lists.

use serde::{Deserialize, Serialize};

use super::blocks::{
    Alert, Button, ColorControl, EtsiUnitInfo, LevelControl, Powermeter, SimpleOnOff, Switch,
    Temperature, Thermostat,
};
use super::lenient;
use crate::capabilities::{Capability, CapabilitySet};

/// A device managed by the router's home automation service.
///
/// Every capability block is optional; a block that was not in the payload is
/// `None` (or an empty button list), never a zeroed value.
///
/// The JSON form carries buttons twice: the newer `buttons` array and the
/// legacy single `button` object. When only the legacy object is present it is
/// turned into a one-element list, so [`Device::buttons`] and
/// [`Device::button`] always agree.
///
/// # Examples
///
/// ```
/// use fritzbox_lib::model::Device;
/// use fritzbox_lib::Capability;
///
/// let json = r#"{"ain":"08761 0000434","id":"17","name":"Steckdose",
///                "switch":{"state":"1","lock":"0","devicelock":"0","mode":"auto"}}"#;
/// let device: Device = serde_json::from_str(json).unwrap();
///
/// assert!(device.switch.as_ref().unwrap().state);
/// assert!(device.has(Capability::Switch));
/// assert!(device.thermostat.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JsonDevice", into = "JsonDevice")]
pub struct Device {
    /// Actor identification number, stable per physical device.
    pub ain: String,
    /// Internal device id.
    pub id: String,
    /// Product name, e.g. `FRITZ!DECT 200`.
    pub product_name: String,
    /// User-assigned name.
    pub name: String,
    /// Whether the device is connected.
    pub present: bool,
    /// Outlet state.
    pub switch: Option<Switch>,
    /// Temperature sensor.
    pub temperature: Option<Temperature>,
    /// Energy meter.
    pub powermeter: Option<Powermeter>,
    /// Plain on/off unit.
    pub simple_on_off: Option<SimpleOnOff>,
    /// Dimmer.
    pub level_control: Option<LevelControl>,
    /// Color light.
    pub color_control: Option<ColorControl>,
    /// Radiator thermostat.
    pub thermostat: Option<Thermostat>,
    /// Alarm sensor.
    pub alert: Option<Alert>,
    /// Push buttons; empty when the device has none.
    pub buttons: Vec<Button>,
    /// ETSI unit metadata.
    pub unit_info: Option<EtsiUnitInfo>,
}

impl Device {
    /// Returns the capability blocks present on this device.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        let present = [
            (Capability::Switch, self.switch.is_some()),
            (Capability::Temperature, self.temperature.is_some()),
            (Capability::Powermeter, self.powermeter.is_some()),
            (Capability::SimpleOnOff, self.simple_on_off.is_some()),
            (Capability::LevelControl, self.level_control.is_some()),
            (Capability::ColorControl, self.color_control.is_some()),
            (Capability::Thermostat, self.thermostat.is_some()),
            (Capability::Alert, self.alert.is_some()),
            (Capability::Button, !self.buttons.is_empty()),
            (Capability::UnitInfo, self.unit_info.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(capability, is_present)| is_present.then_some(capability))
            .collect()
    }

    /// Returns whether the device carries the given capability block.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    /// Returns the single button of the legacy representation.
    ///
    /// For multi-button devices this is the first button.
    #[must_use]
    pub fn button(&self) -> Option<&Button> {
        self.buttons.first()
    }

    /// Returns all buttons.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

/// JSON representation of a [`Device`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct JsonDevice {
    #[serde(alias = "identifier")]
    ain: String,
    id: String,
    #[serde(rename = "productname")]
    product_name: String,
    name: String,
    #[serde(deserialize_with = "lenient::flag")]
    present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    switch: Option<Switch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<Temperature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    powermeter: Option<Powermeter>,
    #[serde(rename = "simpleonoff", skip_serializing_if = "Option::is_none")]
    simple_on_off: Option<SimpleOnOff>,
    #[serde(rename = "levelcontrol", skip_serializing_if = "Option::is_none")]
    level_control: Option<LevelControl>,
    #[serde(rename = "colorcontrol", skip_serializing_if = "Option::is_none")]
    color_control: Option<ColorControl>,
    #[serde(rename = "hkr", skip_serializing_if = "Option::is_none")]
    thermostat: Option<Thermostat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alert: Option<Alert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button: Option<Button>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buttons: Vec<Button>,
    #[serde(rename = "etsiunitinfo", skip_serializing_if = "Option::is_none")]
    unit_info: Option<EtsiUnitInfo>,
}

impl From<JsonDevice> for Device {
    fn from(json: JsonDevice) -> Self {
        let buttons = if json.buttons.is_empty() {
            json.button.into_iter().collect()
        } else {
            json.buttons
        };

        Self {
            ain: json.ain,
            id: json.id,
            product_name: json.product_name,
            name: json.name,
            present: json.present,
            switch: json.switch,
            temperature: json.temperature,
            powermeter: json.powermeter,
            simple_on_off: json.simple_on_off,
            level_control: json.level_control,
            color_control: json.color_control,
            thermostat: json.thermostat,
            alert: json.alert,
            buttons,
            unit_info: json.unit_info,
        }
    }
}

impl From<Device> for JsonDevice {
    fn from(device: Device) -> Self {
        Self {
            button: device.buttons.first().cloned(),
            ain: device.ain,
            id: device.id,
            product_name: device.product_name,
            name: device.name,
            present: device.present,
            switch: device.switch,
            temperature: device.temperature,
            powermeter: device.powermeter,
            simple_on_off: device.simple_on_off,
            level_control: device.level_control,
            color_control: device.color_control,
            thermostat: device.thermostat,
            alert: device.alert,
            buttons: device.buttons,
            unit_info: device.unit_info,
        }
    }
}

/// Devices in the order the router returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceList {
    devices: Vec<Device>,
}

impl DeviceList {
    /// Creates a list from devices.
    #[must_use]
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Returns the devices.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Finds a device by AIN.
    ///
    /// Whitespace inside the AIN is ignored, so `"087610000434"` matches
    /// `"08761 0000434"`.
    #[must_use]
    pub fn find(&self, ain: &str) -> Option<&Device> {
        let wanted = normalize_ain(ain);
        self.devices.iter().find(|d| normalize_ain(&d.ain) == wanted)
    }

    /// Iterates over devices that carry the given capability.
    pub fn with_capability(&self, capability: Capability) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(move |d| d.has(capability))
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterates over the devices.
    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }
}

impl IntoIterator for DeviceList {
    type Item = Device;
    type IntoIter = std::vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

fn normalize_ain(ain: &str) -> String {
    ain.chars().filter(|c| !c.is_whitespace()).collect()
}

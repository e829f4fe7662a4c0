// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding device and template lists from XML or JSON.
//!
//! The router answers `getdevicelistinfos` and `gettemplatelistinfos` with
//! XML. The JSON form is what [`Device`]'s `Serialize` implementation emits,
//! so lists can be cached or forwarded as JSON and read back into identical
//! values.

use serde::Deserialize;

use super::blocks::{
    Alert, Button, ColorControl, EtsiUnitInfo, LevelControl, Powermeter, SimpleOnOff, Switch,
    Temperature, Thermostat,
};
use super::device::{Device, DeviceList};
use super::lenient;
use super::template::{Template, TemplateList};
use crate::error::ParseError;

/// Encoding of a device or template list payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `<devicelist>` / `<templatelist>` documents as sent by the router.
    Xml,
    /// JSON arrays of devices or templates.
    Json,
}

impl Format {
    /// Guesses the format from the first non-whitespace byte.
    #[must_use]
    pub fn detect(payload: &[u8]) -> Self {
        match payload.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'<') => Self::Xml,
            _ => Self::Json,
        }
    }
}

/// Parses a device list.
///
/// # Errors
///
/// Returns `ParseError::Xml` or `ParseError::Json` with an excerpt of the
/// payload if it does not decode.
///
/// # Examples
///
/// ```
/// use fritzbox_lib::model::{parse_device_list, Format};
///
/// let xml = br#"<devicelist version="1">
///   <device identifier="08761 0000434" id="17" productname="FRITZ!DECT 200">
///     <present>1</present><name>Steckdose</name>
///     <switch><state>1</state><mode>auto</mode><lock>0</lock><devicelock>0</devicelock></switch>
///   </device>
/// </devicelist>"#;
///
/// let list = parse_device_list(xml, Format::Xml).unwrap();
/// assert_eq!(list.devices()[0].name, "Steckdose");
/// ```
pub fn parse_device_list(payload: &[u8], format: Format) -> Result<DeviceList, ParseError> {
    match format {
        Format::Xml => {
            let wire: XmlDeviceList = from_xml(payload)?;
            Ok(wire.into())
        }
        Format::Json => from_json(payload),
    }
}

/// Parses a template list.
///
/// # Errors
///
/// Returns `ParseError::Xml` or `ParseError::Json` with an excerpt of the
/// payload if it does not decode.
pub fn parse_template_list(payload: &[u8], format: Format) -> Result<TemplateList, ParseError> {
    match format {
        Format::Xml => {
            let wire: XmlTemplateList = from_xml(payload)?;
            Ok(TemplateList::new(
                wire.templates.into_iter().map(Template::from).collect(),
            ))
        }
        Format::Json => from_json(payload),
    }
}

fn from_xml<T: serde::de::DeserializeOwned>(payload: &[u8]) -> Result<T, ParseError> {
    let text = std::str::from_utf8(payload).map_err(|e| ParseError::xml(e, payload))?;
    quick_xml::de::from_str(text).map_err(|e| ParseError::xml(e, payload))
}

fn from_json<T: serde::de::DeserializeOwned>(payload: &[u8]) -> Result<T, ParseError> {
    serde_json::from_slice(payload).map_err(|e| ParseError::json(e, payload))
}

#[derive(Debug, Deserialize)]
struct XmlDeviceList {
    #[serde(rename = "device", default)]
    devices: Vec<XmlDevice>,
}

impl From<XmlDeviceList> for DeviceList {
    fn from(wire: XmlDeviceList) -> Self {
        DeviceList::new(wire.devices.into_iter().map(Device::from).collect())
    }
}

// Multi-button devices repeat `<button>`; single-button ones have one.
#[derive(Debug, Deserialize)]
struct XmlDevice {
    #[serde(rename = "@identifier", default)]
    identifier: String,
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@productname", default)]
    product_name: String,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    present: bool,
    #[serde(default)]
    switch: Option<Switch>,
    #[serde(default)]
    temperature: Option<Temperature>,
    #[serde(default)]
    powermeter: Option<Powermeter>,
    #[serde(rename = "simpleonoff", default)]
    simple_on_off: Option<SimpleOnOff>,
    #[serde(rename = "levelcontrol", default)]
    level_control: Option<LevelControl>,
    #[serde(rename = "colorcontrol", default)]
    color_control: Option<ColorControl>,
    #[serde(rename = "hkr", default)]
    thermostat: Option<Thermostat>,
    #[serde(default)]
    alert: Option<Alert>,
    #[serde(rename = "button", default)]
    buttons: Vec<Button>,
    #[serde(rename = "etsiunitinfo", default)]
    unit_info: Option<EtsiUnitInfo>,
}

impl From<XmlDevice> for Device {
    fn from(wire: XmlDevice) -> Self {
        Self {
            ain: wire.identifier,
            id: wire.id,
            product_name: wire.product_name,
            name: wire.name,
            present: wire.present,
            switch: wire.switch,
            temperature: wire.temperature,
            powermeter: wire.powermeter,
            simple_on_off: wire.simple_on_off,
            level_control: wire.level_control,
            color_control: wire.color_control,
            thermostat: wire.thermostat,
            alert: wire.alert,
            buttons: wire.buttons,
            unit_info: wire.unit_info,
        }
    }
}

#[derive(Debug, Deserialize)]
struct XmlTemplateList {
    #[serde(rename = "template", default)]
    templates: Vec<XmlTemplate>,
}

#[derive(Debug, Deserialize)]
struct XmlTemplate {
    #[serde(rename = "@identifier", default)]
    identifier: String,
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    devices: Option<XmlDeviceList>,
}

impl From<XmlTemplate> for Template {
    fn from(wire: XmlTemplate) -> Self {
        Self {
            identifier: wire.identifier,
            id: wire.id,
            name: wire.name,
            devices: wire.devices.map(DeviceList::from).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capability;

    #[test]
    fn detect_format() {
        assert_eq!(Format::detect(b"  <devicelist/>"), Format::Xml);
        assert_eq!(Format::detect(b"[]"), Format::Json);
    }

    #[test]
    fn empty_device_list() {
        let list = parse_device_list(br#"<devicelist version="1"></devicelist>"#, Format::Xml)
            .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn absent_blocks_stay_absent() {
        let xml = br#"<devicelist version="1">
            <device identifier="11630 0123456" id="20" productname="FRITZ!DECT 500">
              <present>1</present><name>Lampe</name>
              <simpleonoff><state>0</state></simpleonoff>
              <levelcontrol><level>26</level><levelpercentage>10</levelpercentage></levelcontrol>
            </device>
        </devicelist>"#;

        let list = parse_device_list(xml, Format::Xml).unwrap();
        let lamp = &list.devices()[0];

        assert_eq!(lamp.level_control.as_ref().map(|l| l.level), Some(26));
        assert!(lamp.switch.is_none());
        assert!(lamp.powermeter.is_none());
        assert!(lamp.buttons().is_empty());
        assert_eq!(lamp.capabilities().len(), 2);
        assert!(lamp.has(Capability::SimpleOnOff));
    }

    #[test]
    fn multiple_buttons() {
        let xml = br#"<devicelist version="1">
            <device identifier="09995 0000015" id="2000" productname="FRITZ!DECT 440">
              <present>1</present><name>Taster</name>
              <button identifier="09995 0000015-1" id="5000"><name>Taster: Oben rechts</name><lastpressedtimestamp>1608557681</lastpressedtimestamp></button>
              <button identifier="09995 0000015-3" id="5001"><name>Taster: Unten rechts</name><lastpressedtimestamp/></button>
            </device>
        </devicelist>"#;

        let list = parse_device_list(xml, Format::Xml).unwrap();
        let device = &list.devices()[0];

        assert_eq!(device.buttons().len(), 2);
        assert_eq!(
            device.button().and_then(|b| b.identifier.as_deref()),
            Some("09995 0000015-1")
        );
        assert_eq!(device.buttons()[1].last_pressed_timestamp, None);
    }

    #[test]
    fn malformed_xml_keeps_excerpt() {
        let err = parse_device_list(b"<devicelist><device>", Format::Xml).unwrap_err();
        assert!(matches!(err, ParseError::Xml { .. }));
        assert_eq!(err.excerpt(), Some("<devicelist><device>"));
    }

    #[test]
    fn malformed_json_keeps_excerpt() {
        let err = parse_device_list(b"{\"ain\":", Format::Json).unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
        assert_eq!(err.excerpt(), Some("{\"ain\":"));
    }

    #[test]
    fn template_with_nested_devices() {
        let xml = br#"<templatelist version="1">
            <template identifier="tmp6F0093-39512EED6" id="60008" functionbitmask="6784" applymask="64">
              <name>Alles aus</name>
              <devices><device identifier="08761 0000434"/><device identifier="11630 0123456"/></devices>
            </template>
        </templatelist>"#;

        let list = parse_template_list(xml, Format::Xml).unwrap();
        let template = &list.templates()[0];

        assert_eq!(template.identifier, "tmp6F0093-39512EED6");
        assert_eq!(template.name, "Alles aus");
        assert_eq!(template.devices.len(), 2);
        assert!(template.devices.find("11630 0123456").is_some());
    }
}

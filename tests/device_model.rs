// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model tests against recorded router payloads.

use fritzbox_lib::model::{Format, Setpoint, parse_device_list, parse_template_list};
use fritzbox_lib::{Capability, DeviceList};

const DEVICELIST_XML: &[u8] = include_bytes!("fixtures/devicelist.xml");
const DEVICELIST_JSON: &[u8] = include_bytes!("fixtures/devicelist.json");
const TEMPLATELIST_XML: &[u8] = include_bytes!("fixtures/templatelist.xml");

fn from_xml() -> DeviceList {
    parse_device_list(DEVICELIST_XML, Format::Xml).unwrap()
}

#[test]
fn xml_and_json_decode_to_the_same_list() {
    let xml = from_xml();
    let json = parse_device_list(DEVICELIST_JSON, Format::Json).unwrap();

    assert_eq!(xml.len(), 4);
    assert_eq!(xml, json);
}

#[test]
fn json_output_reads_back_identically() {
    let devices = from_xml();

    let encoded = serde_json::to_vec(&devices).unwrap();
    let decoded = parse_device_list(&encoded, Format::detect(&encoded)).unwrap();

    assert_eq!(decoded, devices);
}

#[test]
fn legacy_button_becomes_button_list() {
    let json = parse_device_list(DEVICELIST_JSON, Format::Json).unwrap();
    let taster = json.find("09995 0000016").unwrap();

    assert_eq!(taster.buttons().len(), 1);
    let button = taster.button().unwrap();
    assert_eq!(button.identifier.as_deref(), Some("09995 0000016-1"));
    assert_eq!(button.name.as_deref(), Some("Taster Flur: kurz"));
    assert_eq!(
        button.last_pressed().map(|t| t.timestamp()),
        Some(1_608_557_681)
    );
}

#[test]
fn json_output_carries_both_button_keys() {
    let devices = from_xml();
    let value = serde_json::to_value(&devices).unwrap();
    let taster = &value[2];

    assert_eq!(taster["button"]["identifier"], "09995 0000016-1");
    assert_eq!(taster["buttons"][0]["identifier"], "09995 0000016-1");
    // Devices without buttons carry neither key.
    assert!(value[0].get("button").is_none());
    assert!(value[0].get("buttons").is_none());
}

#[test]
fn capabilities_follow_populated_blocks() {
    let devices = from_xml();

    let plug = devices.find("08761 0000434").unwrap();
    assert_eq!(
        plug.capabilities().to_string(),
        "switch,temperature,powermeter,simpleonoff"
    );

    let lamp = devices.find("13077 0013108-1").unwrap();
    assert!(lamp.has(Capability::LevelControl));
    assert!(lamp.has(Capability::ColorControl));
    assert!(lamp.has(Capability::UnitInfo));
    assert!(!lamp.has(Capability::Switch));
    assert!(lamp.powermeter.is_none());
    assert!(!lamp.present);

    assert_eq!(devices.with_capability(Capability::Temperature).count(), 2);
}

#[test]
fn scalar_values_are_decoded() {
    let devices = from_xml();

    let plug = devices.find("08761 0000434").unwrap();
    let meter = plug.powermeter.as_ref().unwrap();
    assert!((meter.watts() - 4.5).abs() < f64::EPSILON);
    assert_eq!(meter.energy, 707);
    assert!((plug.temperature.as_ref().unwrap().degrees() - 22.5).abs() < f32::EPSILON);

    let lamp = devices.find("13077 0013108-1").unwrap();
    let color = lamp.color_control.as_ref().unwrap();
    assert_eq!(color.hue, 0);
    assert_eq!(color.temperature, 2700);
    assert_eq!(lamp.unit_info.as_ref().unwrap().unit_type, 278);
}

#[test]
fn thermostat_fields() {
    let devices = from_xml();
    let hkr = devices
        .find("09995 0335100")
        .and_then(|d| d.thermostat.as_ref())
        .unwrap();

    assert_eq!(hkr.current_setpoint(), Setpoint::Celsius(21.0));
    assert_eq!(hkr.target_setpoint(), Setpoint::Celsius(22.0));
    assert!(hkr.device_lock);
    assert!(!hkr.window_open_active);
    assert_eq!(hkr.battery, 80);
    assert_eq!(
        hkr.boost_ends_at().map(|t| t.timestamp()),
        Some(1_700_000_000)
    );
    assert_eq!(hkr.next_change.as_ref().map(|n| n.target), Some(36));
}

#[test]
fn lookup_ignores_whitespace_in_ain() {
    let devices = from_xml();
    assert!(devices.find("087610000434").is_some());
    assert!(devices.find("00000 0000000").is_none());
}

#[test]
fn template_list() {
    let templates = parse_template_list(TEMPLATELIST_XML, Format::Xml).unwrap();

    assert_eq!(templates.len(), 2);
    let holiday = templates.find_by_name("Heizung Urlaub").unwrap();
    assert_eq!(holiday.id, "60009");
    assert!(holiday.devices.find("09995 0335100").is_some());
    assert!(templates.find_by_name("Unbekannt").is_none());
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Responses of the `/data.lua` endpoint.

use serde::Deserialize;

/// A network client known to the router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkDevice {
    /// MAC address, e.g. `40:8D:5C:5B:63:2D`.
    #[serde(alias = "Mac", alias = "MAC")]
    pub mac: String,
    /// Router-side id, e.g. `landevice3489`.
    #[serde(rename = "UID", alias = "uid", alias = "Uid")]
    pub uid: String,
    /// Host name.
    #[serde(alias = "Name")]
    pub name: String,
    /// Connection type.
    #[serde(rename = "type", alias = "Type")]
    pub kind: String,
}

/// Active and passive network clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkDevices {
    /// Clients currently connected.
    #[serde(alias = "Active")]
    pub active: Vec<NetworkDevice>,
    /// Clients known but not connected.
    #[serde(alias = "Passive")]
    pub passive: Vec<NetworkDevice>,
}

/// Response of the network device page.
///
/// # Examples
///
/// ```
/// use fritzbox_lib::model::DataResponse;
///
/// let json = r#"{"data":{"active":[{"mac":"40:8D:5C:5B:63:2D","UID":"landevice3489"}],"passive":[]}}"#;
/// let response: DataResponse = serde_json::from_str(json).unwrap();
/// assert_eq!(response.device_uid("40:8D:5C:5B:63:2D"), Some("landevice3489"));
/// assert_eq!(response.device_uid("00:00:00:00:00:00"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DataResponse {
    /// The page payload.
    #[serde(alias = "Data")]
    pub data: NetworkDevices,
}

impl DataResponse {
    /// Iterates over active clients, then passive ones.
    pub fn devices(&self) -> impl Iterator<Item = &NetworkDevice> {
        self.data.active.iter().chain(self.data.passive.iter())
    }

    /// Returns the UID of the client with the given MAC address.
    ///
    /// MAC addresses are compared case-insensitively.
    #[must_use]
    pub fn device_uid(&self, mac: &str) -> Option<&str> {
        self.devices()
            .find(|d| d.mac.eq_ignore_ascii_case(mac))
            .map(|d| d.uid.as_str())
    }
}

/// Acknowledgement of a wake-on-LAN request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WakeUpResponse {
    /// The page payload.
    #[serde(alias = "Data")]
    pub data: WakeUpData,
}

/// Payload of a wake-on-LAN acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WakeUpData {
    /// `"ok"` when the router sent the magic packet.
    pub btn_wake: Option<String>,
}

impl WakeUpResponse {
    /// Returns whether the router acknowledged the request.
    #[must_use]
    pub fn acknowledged(&self) -> bool {
        self.data.btn_wake.as_deref() == Some("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passive_devices_are_searched() {
        let response: DataResponse = serde_json::from_str(
            r#"{"data":{"active":[],"passive":[{"mac":"aa:bb:cc:dd:ee:ff","UID":"landevice7"}]}}"#,
        )
        .unwrap();
        assert_eq!(response.device_uid("AA:BB:CC:DD:EE:FF"), Some("landevice7"));
    }

    #[test]
    fn data_is_required() {
        assert!(serde_json::from_str::<DataResponse>("{}").is_err());
    }

    #[test]
    fn wake_up_acknowledgement() {
        let ok: WakeUpResponse = serde_json::from_str(r#"{"data":{"btn_wake":"ok"}}"#).unwrap();
        assert!(ok.acknowledged());

        let missing: WakeUpResponse = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(!missing.acknowledged());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed requests for the router's two request endpoints.
//!
//! | Request | Endpoint | Example |
//! |---------|----------|---------|
//! | [`SwitchRequest`] | `/webservices/homeautoswitch.lua` | `setlevel` for one AIN |
//! | [`DataRequest`] | `/data.lua` | network device page, wake-on-LAN |
//!
//! Both keep extra parameters as an ordered list of key/value pairs because
//! the upstream protocol is open-ended there.
//!
//! # Examples
//!
//! ```
//! use fritzbox_lib::command::SwitchRequest;
//!
//! let request = SwitchRequest::new("setlevel")
//!     .device("13077 0013108-1")
//!     .param("level", 37);
//!
//! assert_eq!(request.command(), "setlevel");
//! assert_eq!(request.ain(), Some("13077 0013108-1"));
//! assert!(request.validate().is_ok());
//! ```

pub mod catalog;

use std::fmt::Display;

use crate::error::Error;

/// A switch command for the home automation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRequest {
    command: String,
    ain: Option<String>,
    params: Vec<(String, String)>,
}

impl SwitchRequest {
    /// Creates a request for the given command name.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ain: None,
            params: Vec::new(),
        }
    }

    /// Targets a device (or template) by AIN.
    #[must_use]
    pub fn device(mut self, ain: impl Into<String>) -> Self {
        self.ain = Some(ain.into());
        self
    }

    /// Adds an extra query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Returns the command name.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the target AIN, if any.
    #[must_use]
    pub fn ain(&self) -> Option<&str> {
        self.ain.as_deref().filter(|ain| !ain.is_empty())
    }

    /// Returns the extra parameters.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Checks the request against the command catalog.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCommand` for commands outside the catalog and
    /// `Error::MissingParameter` when a required parameter is not set.
    pub fn validate(&self) -> Result<(), Error> {
        for param in catalog::required_params(&self.command)? {
            let present = if catalog::is_ain_param(param) {
                self.ain().is_some()
            } else {
                self.params.iter().any(|(key, _)| key == param)
            };
            if !present {
                return Err(Error::MissingParameter {
                    command: self.command.clone(),
                    parameter: (*param).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Builds the query string for the given session id.
    pub(crate) fn query(&self, sid: &str) -> String {
        let mut query = format!(
            "sid={}&switchcmd={}",
            urlencoding::encode(sid),
            urlencoding::encode(&self.command)
        );
        if let Some(ain) = self.ain() {
            query.push_str("&ain=");
            query.push_str(&urlencoding::encode(ain));
        }
        for (key, value) in &self.params {
            query.push('&');
            query.push_str(&urlencoding::encode(key));
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }
        query
    }
}

/// A form request for the `/data.lua` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    fields: Vec<(String, String)>,
}

impl DataRequest {
    /// Creates a request for a page.
    #[must_use]
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            fields: vec![("page".to_string(), page.into())],
        }
    }

    /// The network device overview.
    #[must_use]
    pub fn network_devices() -> Self {
        Self::page("netDev").field("xhrId", "all")
    }

    /// A wake-on-LAN request for a network device.
    #[must_use]
    pub fn wake_up(uid: impl Into<String>) -> Self {
        Self::page("edit_device")
            .field("dev", uid.into())
            .field("oldpage", "net/edit_device.lua")
            .field("btn_wake", "")
    }

    /// Adds a form field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Returns the form fields without the session id.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns the form fields led by the session id.
    pub(crate) fn form(&self, sid: &str) -> Vec<(String, String)> {
        std::iter::once(("sid".to_string(), sid.to_string()))
            .chain(self.fields.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_without_device() {
        let request = SwitchRequest::new("getdevicelistinfos");
        assert_eq!(request.query("abc"), "sid=abc&switchcmd=getdevicelistinfos");
    }

    #[test]
    fn query_encodes_ain_and_params() {
        let request = SwitchRequest::new("setname")
            .device("13077 0013108-1")
            .param("name", "Wohnzimmer Lampe");
        assert_eq!(
            request.query("abc"),
            "sid=abc&switchcmd=setname&ain=13077%200013108-1&name=Wohnzimmer%20Lampe"
        );
    }

    #[test]
    fn empty_ain_is_omitted() {
        let request = SwitchRequest::new("getswitchlist").device("");
        assert_eq!(request.ain(), None);
        assert_eq!(request.query("s"), "sid=s&switchcmd=getswitchlist");
    }

    #[test]
    fn validate_reports_missing_parameter() {
        let request = SwitchRequest::new("setlevel").device("1");
        assert!(matches!(
            request.validate(),
            Err(Error::MissingParameter { parameter, .. }) if parameter == "level"
        ));
    }

    #[test]
    fn validate_template_uses_ain() {
        assert!(SwitchRequest::new("applytemplate").validate().is_err());
        assert!(
            SwitchRequest::new("applytemplate")
                .device("tmp6F0093-39512EED6")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn validate_unknown_command() {
        assert!(matches!(
            SwitchRequest::new("format_disk").validate(),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn wake_up_form() {
        let form = DataRequest::wake_up("landevice3489").form("sid1");
        assert_eq!(form[0], ("sid".to_string(), "sid1".to_string()));
        assert!(form.contains(&("dev".to_string(), "landevice3489".to_string())));
        assert!(form.contains(&("btn_wake".to_string(), String::new())));
        assert!(form.contains(&("page".to_string(), "edit_device".to_string())));
    }

    #[test]
    fn network_devices_form() {
        assert_eq!(
            DataRequest::network_devices().fields(),
            [
                ("page".to_string(), "netDev".to_string()),
                ("xhrId".to_string(), "all".to_string()),
            ]
        );
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level client for one router.
//!
//! [`FritzBox`] logs in lazily on the first request and keeps the session
//! for later ones. When the router rejects the session the request is sent
//! again once after a fresh login.
//!
//! ```no_run
//! use fritzbox_lib::{Config, FritzBox};
//!
//! # async fn example() -> fritzbox_lib::Result<()> {
//! let fritz = FritzBox::new(Config::new("192.168.178.1", "smarthome", "secret"))?;
//!
//! for device in &fritz.device_list().await? {
//!     println!("{} {} [{}]", device.ain, device.name, device.capabilities());
//! }
//!
//! fritz.set_level("13077 0013108-1", 128).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use bytes::Bytes;

use crate::command::{DataRequest, SwitchRequest, catalog};
use crate::config::Config;
use crate::error::{DeviceError, Error};
use crate::model::{
    DataResponse, DeviceList, Format, TemplateList, WakeUpResponse, parse_device_list,
    parse_template_list,
};
use crate::protocol::{RequestExecutor, Session};
use crate::upnp::{self, ActionArgument, ActionResult, NoUpnp, RouterMetrics, UpnpService};

/// Client for the router's home automation and network interfaces.
///
/// The type parameter is the UPnP service used for [`metrics`](Self::metrics)
/// and the other UPnP calls; see [`with_upnp`](Self::with_upnp).
#[derive(Debug)]
pub struct FritzBox<U: UpnpService = NoUpnp> {
    config: Arc<Config>,
    executor: RequestExecutor,
    upnp: U,
}

impl FritzBox<NoUpnp> {
    /// Creates a client from the configuration.
    ///
    /// No request is sent; the first operation logs in.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the address or user is missing and
    /// `Error::Protocol` if the address does not form a valid URL.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        for warning in config.warnings() {
            tracing::debug!(%warning, "Configuration uses a deprecated field");
        }
        let config = Arc::new(config);
        let executor = RequestExecutor::new(Arc::clone(&config), Session::default())?;
        Ok(Self {
            config,
            executor,
            upnp: NoUpnp,
        })
    }
}

impl<U: UpnpService> FritzBox<U> {
    /// Starts from an existing session id instead of logging in.
    #[must_use]
    pub fn with_session(self, sid: impl Into<String>) -> Self {
        self.executor.replace_session(Session::new(sid));
        self
    }

    /// Attaches a UPnP service.
    #[must_use]
    pub fn with_upnp<V: UpnpService>(self, upnp: V) -> FritzBox<V> {
        FritzBox {
            config: self.config,
            executor: self.executor,
            upnp,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current session. It is empty before the first login.
    #[must_use]
    pub fn session(&self) -> Arc<Session> {
        self.executor.session()
    }

    /// Logs in now, replacing any current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the router rejects the
    /// credentials.
    pub async fn login(&self) -> Result<Arc<Session>, Error> {
        self.executor.login().await
    }

    // ========== Home automation ==========

    /// Fetches all home automation devices.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the answer does not parse.
    pub async fn device_list(&self) -> Result<DeviceList, Error> {
        let body = self
            .home_automation(&SwitchRequest::new("getdevicelistinfos"))
            .await?;
        Ok(parse_device_list(&body, Format::Xml)?)
    }

    /// Fetches all templates.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the answer does not parse.
    pub async fn template_list(&self) -> Result<TemplateList, Error> {
        let body = self
            .home_automation(&SwitchRequest::new("gettemplatelistinfos"))
            .await?;
        Ok(parse_template_list(&body, Format::Xml)?)
    }

    /// Sets the level (0-255) of a dimmable device.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_level(&self, ain: &str, level: u8) -> Result<(), Error> {
        self.home_auto_switch(&SwitchRequest::new("setlevel").device(ain).param("level", level))
            .await
    }

    /// Switches a device on.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn switch_on(&self, ain: &str) -> Result<(), Error> {
        self.home_auto_switch(&SwitchRequest::new("setswitchon").device(ain))
            .await
    }

    /// Switches a device off.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn switch_off(&self, ain: &str) -> Result<(), Error> {
        self.home_auto_switch(&SwitchRequest::new("setswitchoff").device(ain))
            .await
    }

    /// Toggles a device.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn switch_toggle(&self, ain: &str) -> Result<(), Error> {
        self.home_auto_switch(&SwitchRequest::new("setswitchtoggle").device(ain))
            .await
    }

    /// Applies a template.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn apply_template(&self, template: &str) -> Result<(), Error> {
        self.home_auto_switch(&SwitchRequest::new("applytemplate").device(template))
            .await
    }

    /// Sends a switch command and discards the answer.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn home_auto_switch(&self, request: &SwitchRequest) -> Result<(), Error> {
        self.home_automation(request).await.map(drop)
    }

    /// Sends a switch command and returns the raw answer.
    ///
    /// The command is not checked against the catalog; call
    /// [`SwitchRequest::validate`] first if needed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionRejected` if the router still answers 403
    /// after a fresh login and `ProtocolError` for other failures.
    pub async fn home_automation(&self, request: &SwitchRequest) -> Result<Bytes, Error> {
        self.executor.query_switch(request).await
    }

    /// Returns the switch command catalog.
    pub fn suggested_switch_commands(
        &self,
    ) -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
        catalog::switch_commands()
    }

    // ========== Network devices ==========

    /// Fetches the network device overview.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the answer does not decode even
    /// after a fresh login.
    pub async fn data(&self) -> Result<DataResponse, Error> {
        self.executor
            .query_data(&DataRequest::network_devices())
            .await
    }

    /// Looks up the UID of a network device by MAC address.
    ///
    /// Returns `Ok(None)` if no device has that address.
    ///
    /// # Errors
    ///
    /// Returns error if the device overview cannot be fetched.
    pub async fn device_uid(&self, mac: &str) -> Result<Option<String>, Error> {
        let data = self.data().await?;
        let uid = data.device_uid(mac).map(str::to_string);
        if uid.is_none() {
            tracing::debug!(mac, "No network device with this MAC address");
        }
        Ok(uid)
    }

    /// Sends a wake-on-LAN request to a network device.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::WakeUpFailed` if the router does not acknowledge
    /// the request.
    pub async fn wake_up_device(&self, uid: &str) -> Result<WakeUpResponse, Error> {
        let response: WakeUpResponse = self.executor.query_data(&DataRequest::wake_up(uid)).await?;
        if !response.acknowledged() {
            tracing::warn!(uid, "Wake-up not acknowledged");
            return Err(DeviceError::WakeUpFailed {
                uid: uid.to_string(),
            }
            .into());
        }
        tracing::debug!(uid, "Wake-up sent");
        Ok(response)
    }

    /// Sends an arbitrary form request to `/data.lua`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the answer does not decode even
    /// after a fresh login.
    pub async fn query_data<T: serde::de::DeserializeOwned>(
        &self,
        request: &DataRequest,
    ) -> Result<T, Error> {
        self.executor.query_data(request).await
    }

    // ========== UPnP ==========

    /// Calls a UPnP action.
    ///
    /// # Errors
    ///
    /// Returns `Error::UpnpUnavailable` without a UPnP service and the
    /// service's error otherwise.
    pub async fn call_upnp_action(
        &self,
        service: &str,
        action: &str,
        argument: Option<ActionArgument>,
    ) -> Result<ActionResult, Error> {
        self.upnp.call_action(service, action, argument).await
    }

    /// Calls a UPnP action without arguments.
    ///
    /// # Errors
    ///
    /// Same as [`call_upnp_action`](Self::call_upnp_action).
    pub async fn upnp_data_map(&self, service: &str, action: &str) -> Result<ActionResult, Error> {
        self.call_upnp_action(service, action, None).await
    }

    /// Reads WAN uptime and traffic counters.
    ///
    /// # Errors
    ///
    /// Returns `Error::UpnpUnavailable` without a UPnP service.
    pub async fn metrics(&self) -> Result<RouterMetrics, Error> {
        let metrics = upnp::fetch_metrics(&self.upnp).await?;
        if self.config.verbose() {
            tracing::debug!(?metrics, "Router metrics");
        }
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn new_requires_user() {
        let result = FritzBox::new(Config::new("fritz.box", "", "secret"));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("user")))
        ));
    }

    #[test]
    fn with_session_seeds_session() {
        let fritz = FritzBox::new(Config::new("fritz.box", "u", "p"))
            .unwrap()
            .with_session("9a7ae1a3b5d24c10");
        assert_eq!(fritz.session().sid(), "9a7ae1a3b5d24c10");
    }

    #[test]
    fn catalog_is_exposed() {
        let fritz = FritzBox::new(Config::new("fritz.box", "u", "p")).unwrap();
        assert!(
            fritz
                .suggested_switch_commands()
                .any(|(name, _)| name == "setlevel")
        );
    }

    #[tokio::test]
    async fn metrics_without_upnp() {
        let fritz = FritzBox::new(Config::new("fritz.box", "u", "p")).unwrap();
        assert!(matches!(fritz.metrics().await, Err(Error::UpnpUnavailable)));
        assert!(matches!(
            fritz.upnp_data_map("svc", "action").await,
            Err(Error::UpnpUnavailable)
        ));
    }
}

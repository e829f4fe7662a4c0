// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UPnP action calls.
//!
//! The router's UPnP (TR-064) interface is reached through an implementation
//! of [`UpnpService`] supplied by the caller. This crate does not discover
//! services or speak SOAP itself; it only derives [`RouterMetrics`] from two
//! well-known actions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseError};
use crate::model::lenient;

/// Output of a UPnP action: argument name to value.
pub type ActionResult = HashMap<String, serde_json::Value>;

/// WAN interface counters.
pub const WAN_COMMON_INTERFACE_SERVICE: &str =
    "urn:schemas-upnp-org:service:WANCommonInterfaceConfig:1";

/// WAN connection status.
pub const WAN_IP_CONNECTION_SERVICE: &str = "urn:schemas-upnp-org:service:WANIPConnection:1";

/// A single input argument of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionArgument {
    /// Argument name, e.g. `NewIndex`.
    pub name: String,
    /// Argument value.
    pub value: serde_json::Value,
}

impl ActionArgument {
    /// Creates an argument.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Invokes UPnP actions on the router.
#[allow(async_fn_in_trait)]
pub trait UpnpService {
    /// Calls `action` of `service` with an optional argument.
    ///
    /// # Errors
    ///
    /// Returns `Error::Upnp` if the service or action is unknown or the call
    /// fails.
    async fn call_action(
        &self,
        service: &str,
        action: &str,
        argument: Option<ActionArgument>,
    ) -> Result<ActionResult, Error>;
}

/// Placeholder used when no UPnP service is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpnp;

impl UpnpService for NoUpnp {
    async fn call_action(
        &self,
        _service: &str,
        _action: &str,
        _argument: Option<ActionArgument>,
    ) -> Result<ActionResult, Error> {
        Err(Error::UpnpUnavailable)
    }
}

/// Traffic counters and uptime of the WAN connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterMetrics {
    /// Seconds since the connection came up.
    #[serde(
        rename = "Uptime",
        alias = "NewUptime",
        default,
        deserialize_with = "lenient::number"
    )]
    pub uptime: i64,
    /// Total bytes received.
    #[serde(
        rename = "X_AVM_DE_TotalBytesReceived64",
        alias = "NewX_AVM_DE_TotalBytesReceived64",
        default,
        deserialize_with = "lenient::number"
    )]
    pub bytes_received: i64,
    /// Total bytes sent.
    #[serde(
        rename = "X_AVM_DE_TotalBytesSent64",
        alias = "NewX_AVM_DE_TotalBytesSent64",
        default,
        deserialize_with = "lenient::number"
    )]
    pub bytes_sent: i64,
    /// Current receive rate in bytes per second.
    #[serde(
        rename = "ByteReceiveRate",
        alias = "NewByteReceiveRate",
        default,
        deserialize_with = "lenient::number"
    )]
    pub receive_rate: i64,
    /// Current send rate in bytes per second.
    #[serde(
        rename = "ByteSendRate",
        alias = "NewByteSendRate",
        default,
        deserialize_with = "lenient::number"
    )]
    pub send_rate: i64,
}

impl RouterMetrics {
    /// Reads the metrics from merged action results.
    ///
    /// Unknown keys are ignored, missing ones stay zero.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if a counter is not a number.
    pub fn from_result(result: ActionResult) -> Result<Self, ParseError> {
        let value = serde_json::Value::Object(result.into_iter().collect());
        serde_json::from_value(value).map_err(|e| ParseError::json(e, b""))
    }
}

/// Calls both metric actions and merges their results.
pub(crate) async fn fetch_metrics<U: UpnpService>(upnp: &U) -> Result<RouterMetrics, Error> {
    let mut merged = upnp
        .call_action(WAN_COMMON_INTERFACE_SERVICE, "GetAddonInfos", None)
        .await?;
    merged.extend(
        upnp.call_action(WAN_IP_CONNECTION_SERVICE, "GetStatusInfo", None)
            .await?,
    );
    tracing::debug!(keys = merged.len(), "Received router metrics");
    Ok(RouterMetrics::from_result(merged)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct FakeUpnp;

    impl UpnpService for FakeUpnp {
        async fn call_action(
            &self,
            service: &str,
            action: &str,
            _argument: Option<ActionArgument>,
        ) -> Result<ActionResult, Error> {
            let pairs = match (service, action) {
                (WAN_COMMON_INTERFACE_SERVICE, "GetAddonInfos") => vec![
                    ("ByteSendRate", json!(1200)),
                    ("ByteReceiveRate", json!("5400")),
                    ("X_AVM_DE_TotalBytesSent64", json!("123456789012")),
                    ("X_AVM_DE_TotalBytesReceived64", json!("987654321098")),
                    ("DNSServer1", json!("192.168.178.1")),
                ],
                (WAN_IP_CONNECTION_SERVICE, "GetStatusInfo") => vec![
                    ("ConnectionStatus", json!("Connected")),
                    ("Uptime", json!(86400)),
                ],
                _ => return Err(Error::Upnp(format!("no action {action}"))),
            };
            Ok(pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect())
        }
    }

    #[tokio::test]
    async fn merges_both_actions() {
        let metrics = fetch_metrics(&FakeUpnp).await.unwrap();
        assert_eq!(
            metrics,
            RouterMetrics {
                uptime: 86400,
                bytes_received: 987_654_321_098,
                bytes_sent: 123_456_789_012,
                receive_rate: 5400,
                send_rate: 1200,
            }
        );
    }

    #[tokio::test]
    async fn no_upnp_is_unavailable() {
        assert!(matches!(
            fetch_metrics(&NoUpnp).await,
            Err(Error::UpnpUnavailable)
        ));
    }

    #[test]
    fn rejects_non_numeric_counter() {
        let result: ActionResult = [("Uptime".to_string(), json!("soon"))].into_iter().collect();
        assert!(RouterMetrics::from_result(result).is_err());
    }
}

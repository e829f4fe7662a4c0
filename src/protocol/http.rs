// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport to the router.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};

use crate::config::Config;
use crate::error::ProtocolError;

/// Status and body of a router response.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Bytes,
}

/// A reqwest client bound to one router.
///
/// Requests are independent; the session id travels in the query string or
/// form body, never in cookies.
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates the transport from the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the address does not form a valid URL or the HTTP
    /// client cannot be created.
    pub(crate) fn new(config: &Config) -> Result<Self, ProtocolError> {
        let base_url = config.base_url();
        Url::parse(&base_url).map_err(|e| ProtocolError::InvalidAddress(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url,
            client,
            timeout: config.timeout(),
        })
    }

    /// Returns the base URL of the router.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of an endpoint path.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Sends a GET request.
    pub(crate) async fn get(&self, url: &str) -> Result<RawResponse, ProtocolError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.read(response).await
    }

    /// Sends a form-encoded POST request.
    pub(crate) async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<RawResponse, ProtocolError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        self.read(response).await
    }

    async fn read(&self, response: reqwest::Response) -> Result<RawResponse, ProtocolError> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        Ok(RawResponse { status, body })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn map_error(&self, error: reqwest::Error) -> ProtocolError {
        if error.is_timeout() {
            ProtocolError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ProtocolError::Http(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_path() {
        let transport = HttpTransport::new(&Config::new("192.168.178.1", "u", "p")).unwrap();
        assert_eq!(transport.base_url(), "https://192.168.178.1");
        assert_eq!(
            transport.endpoint_url("/data.lua"),
            "https://192.168.178.1/data.lua"
        );
    }

    #[test]
    fn keeps_explicit_scheme_and_port() {
        let transport = HttpTransport::new(&Config::new("http://127.0.0.1:8080", "u", "p")).unwrap();
        assert_eq!(
            transport.endpoint_url("/login_sid.lua"),
            "http://127.0.0.1:8080/login_sid.lua"
        );
    }

    #[test]
    fn rejects_unparseable_address() {
        let result = HttpTransport::new(&Config::new("http://[::1", "u", "p"));
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }
}

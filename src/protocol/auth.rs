// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Challenge-response login against `/login_sid.lua`.
//!
//! The router hands out a challenge; the client answers with
//! `<challenge>-<md5(utf16le("<challenge>-<password>"))>` and receives a
//! session id. The all-zero id means the credentials were rejected.

use std::sync::Arc;
use std::time::Instant;

use md5::{Digest, Md5};
use serde::Deserialize;

use super::LOGIN_ENDPOINT;
use super::http::{HttpTransport, RawResponse};
use super::session::{Session, redact_sid};
use crate::config::Config;
use crate::error::{AuthError, Error, ParseError, ProtocolError};
use crate::model::lenient;

/// Computes the response token for a challenge.
///
/// # Examples
///
/// ```
/// use fritzbox_lib::protocol::response_token;
///
/// assert_eq!(
///     response_token("a51eacbd", "p"),
///     "a51eacbd-05f2dd791db47141584e0f220b12c7e1"
/// );
/// ```
#[must_use]
pub fn response_token(challenge: &str, password: &str) -> String {
    let plain = format!("{challenge}-{password}");
    let mut hasher = Md5::new();
    for unit in plain.encode_utf16() {
        hasher.update(unit.to_le_bytes());
    }
    let digest = hasher.finalize();

    let mut token = String::with_capacity(challenge.len() + 1 + digest.len() * 2);
    token.push_str(challenge);
    token.push('-');
    for byte in digest {
        token.push_str(&format!("{byte:02x}"));
    }
    token
}

/// Builds the URL of the second handshake step.
#[must_use]
pub fn challenge_url(base_url: &str, user: &str, challenge: &str, password: &str) -> String {
    format!(
        "{base_url}{LOGIN_ENDPOINT}?username={}&response={}",
        urlencoding::encode(user),
        response_token(challenge, password)
    )
}

/// `<SessionInfo>` document returned by both handshake steps.
#[derive(Debug, Deserialize)]
struct SessionInfo {
    #[serde(rename = "SID", default)]
    sid: String,
    #[serde(rename = "Challenge", default)]
    challenge: Option<String>,
    #[serde(
        rename = "BlockTime",
        default,
        deserialize_with = "lenient::optional_number"
    )]
    block_time: Option<u32>,
}

impl SessionInfo {
    fn parse(response: &RawResponse) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(&response.body)
            .map_err(|e| ParseError::xml(e, &response.body))?;
        quick_xml::de::from_str(text).map_err(|e| ParseError::xml(e, &response.body))
    }
}

/// Performs the two-step login handshake.
#[derive(Debug, Clone)]
pub(crate) struct ChallengeAuthenticator {
    transport: Arc<HttpTransport>,
    config: Arc<Config>,
}

impl ChallengeAuthenticator {
    pub(crate) fn new(transport: Arc<HttpTransport>, config: Arc<Config>) -> Self {
        Self { transport, config }
    }

    /// Logs in and returns the new session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the router answers with the
    /// all-zero session id, `ProtocolError` for transport failures or a
    /// non-200 status, and `ParseError` if the challenge is missing.
    pub(crate) async fn authenticate(&self) -> Result<Session, Error> {
        let start = Instant::now();

        let info = self
            .fetch(&self.transport.endpoint_url(LOGIN_ENDPOINT))
            .await?;
        let challenge = info
            .challenge
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ParseError::MissingField("Challenge".to_string()))?;
        if let Some(block_time) = info.block_time.filter(|t| *t > 0) {
            tracing::warn!(block_time, "Router is throttling login attempts");
        }

        let url = challenge_url(
            self.transport.base_url(),
            self.config.user(),
            &challenge,
            self.config.password(),
        );
        let info = self.fetch(&url).await?;

        if info.sid.is_empty() || info.sid == Session::INVALID_SID {
            tracing::warn!(user = %self.config.user(), "Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        tracing::info!(
            user = %self.config.user(),
            elapsed_ms = start.elapsed().as_millis(),
            "Logged in"
        );
        Ok(Session::new(info.sid))
    }

    async fn fetch(&self, url: &str) -> Result<SessionInfo, Error> {
        // The second URL carries the response token.
        tracing::debug!(endpoint = LOGIN_ENDPOINT, "Sending login request");
        let response = self.transport.get(url).await?;
        if response.status != reqwest::StatusCode::OK {
            return Err(ProtocolError::UnexpectedStatus {
                status: response.status.as_u16(),
                endpoint: LOGIN_ENDPOINT,
            }
            .into());
        }
        if self.config.verbose() {
            tracing::debug!(body = %redact_sid(&response.body), "Login response");
        }
        Ok(SessionInfo::parse(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_matches_known_digest() {
        assert_eq!(
            response_token("a51eacbd", "p"),
            "a51eacbd-05f2dd791db47141584e0f220b12c7e1"
        );
    }

    #[test]
    fn golden_challenge_url() {
        assert_eq!(
            challenge_url("https://a", "u", "a51eacbd", "p"),
            "https://a/login_sid.lua?username=u&response=a51eacbd-05f2dd791db47141584e0f220b12c7e1"
        );
    }

    #[test]
    fn user_is_url_encoded() {
        let url = challenge_url("https://a", "max mustermann", "c", "p");
        assert!(url.contains("username=max%20mustermann&"));
    }

    #[test]
    fn token_is_deterministic() {
        assert_eq!(response_token("c0ffee", "geheim"), response_token("c0ffee", "geheim"));
        assert_ne!(response_token("c0ffee", "geheim"), response_token("c0ffee", "Geheim"));
    }

    fn info(xml: &str) -> SessionInfo {
        SessionInfo::parse(&RawResponse {
            status: reqwest::StatusCode::OK,
            body: bytes::Bytes::from(xml.to_string()),
        })
        .unwrap()
    }

    #[test]
    fn parses_session_info() {
        let info = info(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?><SessionInfo><SID>0000000000000000</SID>\
             <Challenge>a51eacbd</Challenge><BlockTime>0</BlockTime><Rights></Rights></SessionInfo>",
        );
        assert_eq!(info.sid, Session::INVALID_SID);
        assert_eq!(info.challenge.as_deref(), Some("a51eacbd"));
        assert_eq!(info.block_time, Some(0));
    }

    #[test]
    fn parses_session_info_without_challenge() {
        let info = info("<SessionInfo><SID>9a7ae1a3b5d24c10</SID></SessionInfo>");
        assert_eq!(info.sid, "9a7ae1a3b5d24c10");
        assert!(info.challenge.is_none());
        assert!(info.block_time.is_none());
    }

    #[test]
    fn rejects_garbage() {
        let result = SessionInfo::parse(&RawResponse {
            status: reqwest::StatusCode::OK,
            body: bytes::Bytes::from_static(b"<SessionInfo><SID>"),
        });
        assert!(matches!(result, Err(ParseError::Xml { .. })));
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `fritzbox_lib` library.
//!
//! This module provides the error hierarchy for every failure the client can
//! report: configuration problems, transport and status failures, rejected
//! credentials, and payloads that do not decode to the expected shape.

use thiserror::Error;

/// Maximum number of characters of a payload kept in a parse error.
const EXCERPT_LEN: usize = 256;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The client configuration is incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred during HTTP communication with the router.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The router did not accept the credentials or the session.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error reported for a device operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The switch command is not part of the command catalog.
    #[error("unknown switch command: {0}")]
    UnknownCommand(String),

    /// A switch command is missing one of its required parameters.
    #[error("switch command {command} requires parameter {parameter}")]
    MissingParameter {
        /// The command being validated.
        command: String,
        /// The parameter that was not supplied.
        parameter: String,
    },

    /// No UPnP service was attached to the client.
    #[error("no UPnP service configured")]
    UpnpUnavailable,

    /// The UPnP service reported a failure.
    #[error("UPnP error: {0}")]
    Upnp(String),
}

/// Errors raised while building or validating the configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The configuration document could not be read.
    #[error("invalid configuration document: {0}")]
    Invalid(String),
}

/// Errors related to HTTP communication with the router.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The router answered with a status the request path does not accept.
    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The endpoint path that answered.
        endpoint: &'static str,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Authentication failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The handshake returned the all-zero session id.
    #[error("wrong user/password")]
    InvalidCredentials,

    /// The router kept rejecting the session after a fresh login.
    #[error("session rejected after re-authentication")]
    SessionRejected,
}

/// Errors related to parsing router responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {source} (payload: {excerpt:?})")]
    Json {
        /// The underlying decoder error.
        source: serde_json::Error,
        /// The beginning of the offending payload.
        excerpt: String,
    },

    /// XML parsing failed.
    #[error("XML parse error: {message} (payload: {excerpt:?})")]
    Xml {
        /// Description of the decoder failure.
        message: String,
        /// The beginning of the offending payload.
        excerpt: String,
    },

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

impl ParseError {
    /// Builds a JSON error keeping an excerpt of the payload.
    pub(crate) fn json(source: serde_json::Error, payload: &[u8]) -> Self {
        Self::Json {
            source,
            excerpt: excerpt(payload),
        }
    }

    /// Builds an XML error keeping an excerpt of the payload.
    pub(crate) fn xml(message: impl ToString, payload: &[u8]) -> Self {
        Self::Xml {
            message: message.to_string(),
            excerpt: excerpt(payload),
        }
    }

    /// Returns the payload excerpt attached to this error, if any.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Self::Json { excerpt, .. } | Self::Xml { excerpt, .. } => Some(excerpt),
            _ => None,
        }
    }
}

/// Errors related to device operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The router did not acknowledge a wake-on-LAN request.
    #[error("device wakeup seems to have failed for {uid}")]
    WakeUpFailed {
        /// The network device the wake-up was sent to.
        uid: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns a lossy, length-bounded view of a payload for diagnostics.
pub(crate) fn excerpt(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload)
        .chars()
        .take(EXCERPT_LEN)
        .collect()
}

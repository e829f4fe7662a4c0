// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol for talking to the router.
//!
//! The router exposes three endpoints:
//!
//! - [`LOGIN_ENDPOINT`]: challenge-response handshake returning a session id
//! - [`DATA_ENDPOINT`]: form-encoded POST answering with JSON
//! - [`SWITCH_ENDPOINT`]: home automation commands in the query string
//!
//! Requests on the last two carry the session id. When the router signals an
//! expired session (a 403 on the switch endpoint, an undecodable body on the
//! data endpoint) the client logs in again and resends the request once.

mod auth;
mod executor;
mod http;
mod session;

pub use auth::{challenge_url, response_token};
pub use session::Session;

pub(crate) use executor::RequestExecutor;

/// Login handshake endpoint.
pub const LOGIN_ENDPOINT: &str = "/login_sid.lua";

/// Form data endpoint.
pub const DATA_ENDPOINT: &str = "/data.lua";

/// Home automation switch endpoint.
pub const SWITCH_ENDPOINT: &str = "/webservices/homeautoswitch.lua";

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated requests with a single re-authentication retry.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::auth::ChallengeAuthenticator;
use super::http::{HttpTransport, RawResponse};
use super::session::{Session, SessionHolder, redact_sid};
use super::{DATA_ENDPOINT, SWITCH_ENDPOINT};
use crate::command::{DataRequest, SwitchRequest};
use crate::config::Config;
use crate::error::{AuthError, Error, ParseError, ProtocolError};

/// Position in the two-attempt retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    First,
    Retry,
}

impl Attempt {
    /// Returns the attempt after this one, or `None` once retries are used up.
    pub(crate) fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Retry),
            Self::Retry => None,
        }
    }
}

/// Sends requests on behalf of one client and keeps its session fresh.
#[derive(Debug)]
pub(crate) struct RequestExecutor {
    transport: Arc<HttpTransport>,
    authenticator: ChallengeAuthenticator,
    session: SessionHolder,
    verbose: bool,
}

impl RequestExecutor {
    pub(crate) fn new(config: Arc<Config>, initial: Session) -> Result<Self, Error> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        let verbose = config.verbose();
        Ok(Self {
            authenticator: ChallengeAuthenticator::new(Arc::clone(&transport), config),
            transport,
            session: SessionHolder::new(initial),
            verbose,
        })
    }

    /// Returns the current session.
    pub(crate) fn session(&self) -> Arc<Session> {
        self.session.current()
    }

    /// Installs a session obtained elsewhere.
    pub(crate) fn replace_session(&self, session: Session) {
        self.session.replace(session);
    }

    /// Performs a fresh handshake and installs the resulting session.
    pub(crate) async fn login(&self) -> Result<Arc<Session>, Error> {
        let session = self.authenticator.authenticate().await?;
        Ok(self.session.replace(session))
    }

    /// Posts a form to `/data.lua` and decodes the JSON answer.
    ///
    /// A body that does not decode is taken as an expired session: the
    /// client logs in again and resends once.
    pub(crate) async fn query_data<T: DeserializeOwned>(
        &self,
        request: &DataRequest,
    ) -> Result<T, Error> {
        let url = self.transport.endpoint_url(DATA_ENDPOINT);
        let mut session = self.ensure_session().await?;
        let mut attempt = Attempt::First;

        loop {
            let form = request.form(session.sid());
            let response = self
                .send(attempt, DATA_ENDPOINT, || self.transport.post_form(&url, &form))
                .await?;
            if response.status != StatusCode::OK {
                return Err(unexpected(&response, DATA_ENDPOINT));
            }

            match serde_json::from_slice::<T>(&response.body) {
                Ok(value) => return Ok(value),
                Err(e) => match attempt.next() {
                    Some(next) => {
                        tracing::warn!(
                            endpoint = DATA_ENDPOINT,
                            error = %e,
                            "Response did not decode, re-authenticating"
                        );
                        session = self.reauthenticate(&session).await?;
                        attempt = next;
                    }
                    None => return Err(ParseError::json(e, &response.body).into()),
                },
            }
        }
    }

    /// Sends a switch command and returns the body with surrounding line
    /// breaks removed.
    ///
    /// A 403 answer is taken as an expired session: the client logs in again
    /// and resends once.
    pub(crate) async fn query_switch(&self, request: &SwitchRequest) -> Result<Bytes, Error> {
        let mut session = self.ensure_session().await?;
        let mut attempt = Attempt::First;

        loop {
            let url = format!(
                "{}?{}",
                self.transport.endpoint_url(SWITCH_ENDPOINT),
                request.query(session.sid())
            );
            tracing::debug!(
                command = request.command(),
                ain = request.ain().unwrap_or_default(),
                "Sending switch command"
            );
            let response = self
                .send(attempt, SWITCH_ENDPOINT, || self.transport.get(&url))
                .await?;

            match response.status {
                StatusCode::OK => return Ok(trim_line_breaks(response.body)),
                StatusCode::FORBIDDEN => match attempt.next() {
                    Some(next) => {
                        tracing::warn!(
                            endpoint = SWITCH_ENDPOINT,
                            command = request.command(),
                            "Session rejected, re-authenticating"
                        );
                        session = self.reauthenticate(&session).await?;
                        attempt = next;
                    }
                    None => return Err(AuthError::SessionRejected.into()),
                },
                _ => return Err(unexpected(&response, SWITCH_ENDPOINT)),
            }
        }
    }

    async fn send<F, Fut>(
        &self,
        attempt: Attempt,
        endpoint: &'static str,
        request: F,
    ) -> Result<RawResponse, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawResponse, ProtocolError>>,
    {
        let start = Instant::now();
        let response = request().await?;
        tracing::debug!(
            endpoint,
            ?attempt,
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Request completed"
        );
        if self.verbose {
            tracing::debug!(endpoint, body = %redact_sid(&response.body), "Response body");
        }
        Ok(response)
    }

    async fn ensure_session(&self) -> Result<Arc<Session>, Error> {
        let current = self.session.current();
        if !current.is_empty() {
            return Ok(current);
        }
        self.reauthenticate(&current).await
    }

    async fn reauthenticate(&self, stale: &Arc<Session>) -> Result<Arc<Session>, Error> {
        self.session
            .refresh(stale, || self.authenticator.authenticate())
            .await
    }
}

fn unexpected(response: &RawResponse, endpoint: &'static str) -> Error {
    ProtocolError::UnexpectedStatus {
        status: response.status.as_u16(),
        endpoint,
    }
    .into()
}

fn trim_line_breaks(body: Bytes) -> Bytes {
    let is_break = |b: &u8| *b == b'\n' || *b == b'\r';
    let start = body.iter().position(|b| !is_break(b)).unwrap_or(body.len());
    let end = body.iter().rposition(|b| !is_break(b)).map_or(start, |i| i + 1);
    body.slice(start..end)
}

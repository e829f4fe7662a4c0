// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session ids and their holder.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::error::Error;

/// A web session id obtained from the login handshake.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    sid: String,
}

impl Session {
    /// The id the router hands out when a login fails.
    pub const INVALID_SID: &'static str = "0000000000000000";

    /// Wraps a session id.
    #[must_use]
    pub fn new(sid: impl Into<String>) -> Self {
        Self { sid: sid.into() }
    }

    /// Returns the session id.
    #[must_use]
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Returns whether no session has been established yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sid.is_empty()
    }
}

// The id grants full access to the router.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.sid.is_empty() { "<none>" } else { "<redacted>" };
        f.debug_struct("Session").field("sid", &shown).finish()
    }
}

/// Renders a response body for logging with session ids masked.
///
/// Covers the `<SID>` element of login answers and the `"sid"` key of
/// `/data.lua` answers.
pub(crate) fn redact_sid(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = mask_between(&text, "<SID>", "</SID>");
    mask_between(&text, "\"sid\":\"", "\"")
}

fn mask_between(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let value = start + open.len();
        out.push_str(&rest[..value]);
        rest = &rest[value..];
        match rest.find(close) {
            Some(end) => {
                if end > 0 {
                    out.push_str("<redacted>");
                }
                out.push_str(close);
                rest = &rest[end + close.len()..];
            }
            None => {
                out.push_str("<redacted>");
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Holds the current [`Session`] of one client.
///
/// Sessions are immutable values. A re-authentication builds a new one and
/// swaps it in atomically; requests in flight keep the value they started
/// with. Re-authentications are serialized, and a caller that waited while
/// another one replaced the session reuses that result instead of logging
/// in again.
#[derive(Debug, Default)]
pub(crate) struct SessionHolder {
    current: RwLock<Arc<Session>>,
    refresh: Mutex<()>,
}

impl SessionHolder {
    pub(crate) fn new(initial: Session) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            refresh: Mutex::new(()),
        }
    }

    /// Returns the current session.
    pub(crate) fn current(&self) -> Arc<Session> {
        Arc::clone(&self.current.read())
    }

    /// Installs a session unconditionally.
    pub(crate) fn replace(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        *self.current.write() = Arc::clone(&session);
        session
    }

    /// Replaces `stale` with the session produced by `login`.
    ///
    /// `login` is not called when `stale` has already been replaced.
    pub(crate) async fn refresh<F, Fut>(
        &self,
        stale: &Arc<Session>,
        login: F,
    ) -> Result<Arc<Session>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session, Error>>,
    {
        let _guard = self.refresh.lock().await;

        let current = self.current();
        if !Arc::ptr_eq(&current, stale) {
            tracing::debug!("Session already refreshed by another request");
            return Ok(current);
        }

        let fresh = login().await?;
        Ok(self.replace(fresh))
    }
}

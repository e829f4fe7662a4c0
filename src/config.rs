// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration for a FRITZ!Box.
//!
//! A [`Config`] is built once through [`ConfigBuilder`] (or read from a JSON
//! document) and never changes afterwards. Older configuration files use the
//! `FB_address`, `FB_user` and `FB_pass` keys; those are folded into the
//! canonical fields while building, and every use is reported as a
//! [`ConfigWarning`].
//!
//! # Examples
//!
//! ```
//! use fritzbox_lib::Config;
//!
//! let config = Config::builder()
//!     .address("fritz.box")
//!     .user("smarthome")
//!     .password("secret")
//!     .build();
//!
//! assert_eq!(config.address(), "fritz.box");
//! assert!(config.warnings().is_empty());
//! ```

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ConfigError;

/// Immutable connection parameters for one router.
#[derive(Debug)]
pub struct Config {
    address: String,
    user: String,
    password: SecretString,
    verbose: bool,
    timeout: Duration,
    accept_invalid_certs: bool,
    warnings: Vec<ConfigWarning>,
}

impl Config {
    /// Default router address.
    pub const DEFAULT_ADDRESS: &'static str = "fritz.box";
    /// Default user name.
    pub const DEFAULT_USER: &'static str = "freeps";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration from the three required values.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ConfigBuilder::new()
            .address(address)
            .user(user)
            .password(password)
            .build()
    }

    /// Returns a builder with default values.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Reads a configuration from a JSON document.
    ///
    /// Both the current keys (`Address`, `User`, `Password`, `Verbose`) and
    /// the deprecated `FB_*` keys are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the document is not valid JSON.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<ConfigBuilder>(document)
            .map(ConfigBuilder::build)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Checks the fields required before any network call.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the address or user is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::MissingField("address"));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::MissingField("user"));
        }
        Ok(())
    }

    /// Returns the router address (host name, IP, or URL).
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the password.
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Returns whether response bodies are logged.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether self-signed router certificates are accepted.
    #[must_use]
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Returns the warnings recorded while folding deprecated fields.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Builds the base URL of the router.
    ///
    /// Addresses without a scheme are reached over HTTPS.
    #[must_use]
    pub fn base_url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("https://{address}")
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new()
            .address(Self::DEFAULT_ADDRESS)
            .user(Self::DEFAULT_USER)
            .build()
    }
}

/// A deprecated configuration field that was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The deprecated key, e.g. `FB_address`.
    pub legacy: &'static str,
    /// The key that replaces it, e.g. `Address`.
    pub canonical: &'static str,
    /// `true` when both were set and the deprecated value was discarded.
    pub discarded: bool,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.discarded {
            write!(
                f,
                "{} and {} both set, using {}",
                self.legacy, self.canonical, self.canonical
            )
        } else {
            write!(
                f,
                "{} is deprecated, use {} instead",
                self.legacy, self.canonical
            )
        }
    }
}

/// Builder for [`Config`].
///
/// Deserializes from the JSON configuration format, which is how deprecated
/// keys usually reach the library.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigBuilder {
    #[serde(rename = "Address", alias = "address")]
    address: String,
    #[serde(rename = "User", alias = "user")]
    user: String,
    #[serde(rename = "Password", alias = "password")]
    password: SecretString,
    #[serde(rename = "Verbose", alias = "verbose")]
    verbose: bool,
    #[serde(rename = "FB_address")]
    legacy_address: String,
    #[serde(rename = "FB_user")]
    legacy_user: String,
    #[serde(rename = "FB_pass")]
    legacy_password: SecretString,
    #[serde(skip)]
    timeout: Option<Duration>,
    #[serde(skip)]
    strict_tls: bool,
}

impl ConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the router address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the user name.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    /// Enables logging of response bodies.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Rejects certificates that do not validate.
    #[must_use]
    pub fn strict_tls(mut self) -> Self {
        self.strict_tls = true;
        self
    }

    /// Sets the deprecated `FB_address` field.
    #[must_use]
    pub fn legacy_address(mut self, address: impl Into<String>) -> Self {
        self.legacy_address = address.into();
        self
    }

    /// Sets the deprecated `FB_user` field.
    #[must_use]
    pub fn legacy_user(mut self, user: impl Into<String>) -> Self {
        self.legacy_user = user.into();
        self
    }

    /// Sets the deprecated `FB_pass` field.
    #[must_use]
    pub fn legacy_password(mut self, password: impl Into<String>) -> Self {
        self.legacy_password = SecretString::from(password.into());
        self
    }

    /// Folds deprecated fields and builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        let mut warnings = Vec::new();

        let address = fold(
            self.address,
            self.legacy_address,
            "FB_address",
            "Address",
            &mut warnings,
        );
        let user = fold(self.user, self.legacy_user, "FB_user", "User", &mut warnings);
        let password = fold(
            self.password.expose_secret().to_string(),
            self.legacy_password.expose_secret().to_string(),
            "FB_pass",
            "Password",
            &mut warnings,
        );

        Config {
            address,
            user,
            password: SecretString::from(password),
            verbose: self.verbose,
            timeout: self.timeout.unwrap_or(Config::DEFAULT_TIMEOUT),
            accept_invalid_certs: !self.strict_tls,
            warnings,
        }
    }
}

/// Resolves one canonical/deprecated pair. The canonical value wins.
fn fold(
    canonical: String,
    legacy: String,
    legacy_name: &'static str,
    canonical_name: &'static str,
    warnings: &mut Vec<ConfigWarning>,
) -> String {
    if legacy.is_empty() {
        return canonical;
    }

    let discarded = !canonical.is_empty();
    let warning = ConfigWarning {
        legacy: legacy_name,
        canonical: canonical_name,
        discarded,
    };
    tracing::warn!(%warning, "Deprecated configuration field");
    warnings.push(warning);

    if discarded { canonical } else { legacy }
}

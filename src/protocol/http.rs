// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for PDU relay outlets.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ParseError, ProtocolError, Result, ValueError};
use crate::protocol::{OutletRequest, Protocol};
use crate::types::OutletNumber;

/// Header the device requires on every state-changing request.
const CSRF_HEADER: &str = "X-CSRF";

// ============================================================================
// PduConfig - Connection settings for one PDU
// ============================================================================

/// Connection settings for one PDU.
///
/// Every request carries the username and password as HTTP Basic
/// credentials; the device has no session or token mechanism.
///
/// # Examples
///
/// ```
/// use dlpdu_lib::protocol::PduConfig;
/// use std::time::Duration;
///
/// let config = PduConfig::new("192.168.1.20", "admin", "1234")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://192.168.1.20");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PduConfig {
    server_address: String,
    username: String,
    password: String,
    #[serde(default = "PduConfig::default_timeout")]
    timeout: Duration,
}

impl PduConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates settings for the PDU at `server_address` (`host[:port]`).
    #[must_use]
    pub fn new(
        server_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_address: server_address.into(),
            username: username.into(),
            password: password.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    fn default_timeout() -> Duration {
        Self::DEFAULT_TIMEOUT
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the server address as configured.
    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL. The device speaks plain HTTP unless the address
    /// already names a scheme.
    #[must_use]
    pub fn base_url(&self) -> String {
        let address = self.server_address.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{address}")
        }
    }

    /// Checks that no setting is empty.
    ///
    /// Nothing else is validated here; a wrong address or password shows up
    /// as a failed request.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptySetting` naming the first empty field.
    pub fn validate(&self) -> std::result::Result<(), ValueError> {
        if self.server_address.trim().is_empty() {
            return Err(ValueError::EmptySetting("server address"));
        }
        if self.username.is_empty() {
            return Err(ValueError::EmptySetting("username"));
        }
        if self.password.is_empty() {
            return Err(ValueError::EmptySetting("password"));
        }
        Ok(())
    }

    /// Creates an `HttpClient` from these settings.
    ///
    /// # Errors
    ///
    /// Returns error if a setting is empty or the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> Result<HttpClient> {
        self.validate()?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            server_address: self.server_address,
            username: self.username,
            password: self.password,
            client,
        })
    }
}

impl fmt::Debug for PduConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PduConfig")
            .field("server_address", &self.server_address)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// HttpClient - REST client for the relay outlet API
// ============================================================================

/// HTTP client for one PDU.
///
/// Requests are independent: each one carries its own credentials and
/// headers, and nothing is retried. The underlying connection pool may be
/// reused between requests.
///
/// # Examples
///
/// ```no_run
/// use dlpdu_lib::protocol::{PduConfig, Protocol};
/// use dlpdu_lib::types::OutletNumber;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> dlpdu_lib::Result<()> {
/// let client = PduConfig::new("192.168.1.20", "admin", "1234").into_client()?;
/// let cancel = CancellationToken::new();
///
/// let names = client.outlet_names(&cancel).await?;
/// let on = client.outlet_state(OutletNumber::FIRST, &cancel).await?;
/// println!("{} outlets, first is {}", names.len(), if on { "on" } else { "off" });
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    server_address: String,
    username: String,
    password: String,
    client: Client,
}

impl HttpClient {
    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the server address as configured.
    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Builds the full URL for a request.
    fn url(&self, request: &OutletRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }

    /// Sends a request and returns the body if the status matches.
    async fn send(&self, request: &OutletRequest) -> Result<String> {
        let url = self.url(request);

        tracing::debug!(method = %request.method(), url = %url, "Sending PDU request");

        let mut builder = self
            .client
            .request(request.method(), &url)
            .basic_auth(&self.username, Some(&self.password));

        if request.expects_json() {
            builder = builder.header(ACCEPT, "application/json");
        }
        if request.is_write() {
            builder = builder.header(CSRF_HEADER, "x");
        }
        if let Some(body) = request.form_body() {
            builder = builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = builder.send().await.map_err(ProtocolError::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(ProtocolError::Http)?;

        if status != request.expected_status() {
            return Err(ProtocolError::UnexpectedStatus {
                status: status.as_u16(),
                expected: request.expected_status().as_u16(),
                body,
            }
            .into());
        }

        tracing::debug!(status = status.as_u16(), body = %body, "Received PDU response");

        Ok(body)
    }

    /// Sends a request, giving up as soon as `cancel` fires.
    async fn execute(&self, request: &OutletRequest, cancel: &CancellationToken) -> Result<String> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.send(request) => result,
        }
    }

    /// Sends a request and parses the JSON body.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: &OutletRequest,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let body = self.execute(request, cancel).await?;
        serde_json::from_str(&body).map_err(|e| Error::Parse(ParseError::Json(e)))
    }

    /// Logs a failed request with enough context to diagnose it.
    fn log_failure(&self, request: &OutletRequest, err: &Error) {
        let server = self.server_address.as_str();
        let outlet = request.outlet().map(|o| o.value());

        match err {
            Error::Cancelled => {
                tracing::debug!(server, ?outlet, "PDU request cancelled");
            }
            Error::Protocol(ProtocolError::UnexpectedStatus { status, body, .. }) => {
                tracing::error!(
                    server,
                    ?outlet,
                    status,
                    body = %body,
                    "PDU answered with unexpected status"
                );
            }
            Error::Parse(e) => {
                tracing::error!(server, ?outlet, error = %e, "Failed to parse PDU response");
            }
            _ => {
                tracing::error!(server, ?outlet, error = %err, "PDU request failed");
            }
        }
    }

    /// Passes `result` through, logging it if it failed.
    fn logged<T>(&self, request: &OutletRequest, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.log_failure(request, err);
        }
        result
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Protocol for HttpClient {
    async fn outlet_names(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        let request = OutletRequest::ListNames;
        let result = self.fetch_json::<Vec<String>>(&request, cancel).await;
        if let Ok(names) = &result {
            tracing::debug!(server = %self.server_address, names = ?names, "Outlet names");
        }
        self.logged(&request, result)
    }

    async fn outlet_state(&self, outlet: OutletNumber, cancel: &CancellationToken) -> Result<bool> {
        let request = OutletRequest::GetState(outlet);
        let result = self.fetch_json::<bool>(&request, cancel).await;
        self.logged(&request, result)
    }

    async fn set_outlet_state(
        &self,
        outlet: OutletNumber,
        on: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let request = OutletRequest::SetState { outlet, on };
        tracing::debug!(outlet = outlet.value(), on, "Setting outlet state");
        let result = self.execute(&request, cancel).await.map(drop);
        self.logged(&request, result)
    }

    async fn cycle_outlet(&self, outlet: OutletNumber, cancel: &CancellationToken) -> Result<()> {
        let request = OutletRequest::Cycle(outlet);
        tracing::debug!(outlet = outlet.value(), "Cycling outlet");
        let result = self.execute(&request, cancel).await.map(drop);
        self.logged(&request, result)
    }
}

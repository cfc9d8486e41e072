// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `DlPdu` library.
//!
//! Every PDU request resolves to [`Result`]. The error side carries a reason
//! (validation, transport, status, payload, cancellation) so callers can log
//! it, but most callers only look at `is_ok()` / `is_err()`.
//!
//! Two higher-level error types sit on top of [`Error`]:
//!
//! - [`Cancelled`] - the only hard failure of an outlet action or a rescan.
//! - [`ConditionError`] - a failed outlet check, which must abort the
//!   surrounding sequence instead of being read as "outlet is off".

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value was rejected before any request was sent.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The request failed on the wire or the device answered with an
    /// unexpected status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `true` if the operation was cancelled by the caller.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Errors related to value validation.
///
/// These are raised locally; no request reaches the device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Outlet numbers start at 1.
    #[error("the number must be greater than or equal to 1, got {0}")]
    InvalidOutletNumber(i64),

    /// Text that should hold an integer could not be parsed.
    #[error("invalid integer value: {0:?}")]
    InvalidInteger(String),

    /// Unknown outlet action.
    #[error("invalid outlet action: {0}")]
    InvalidAction(String),

    /// Unknown outlet state.
    #[error("invalid outlet state: {0}")]
    InvalidOutletState(String),

    /// Unknown rescan target.
    #[error("invalid rescan target: {0}")]
    InvalidRescanTarget(String),

    /// A required connection setting is empty.
    #[error("{0} must not be empty")]
    EmptySetting(&'static str),
}

/// Errors related to HTTP communication with the PDU.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed (connection refused, timeout, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with a status other than the one its API
    /// documents for the operation.
    #[error("unexpected status {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        /// Status code the device returned.
        status: u16,
        /// Status code the operation requires.
        expected: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// Invalid server address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing PDU responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The caller cancelled an outlet action or rescan before it finished.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Fatal failure of an outlet condition check.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// The outlet state could not be read.
    #[error("failed to get outlet state for {outlet}: {source}")]
    StateUnavailable {
        /// The outlet number as configured on the condition.
        outlet: i64,
        /// Why the read failed.
        #[source]
        source: Error,
    },

    /// The caller cancelled the check.
    #[error("outlet check cancelled")]
    Cancelled,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

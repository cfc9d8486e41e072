// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed requests against the PDU relay REST API.
//!
//! | Request | Method | Path | Success |
//! |---------|--------|------|---------|
//! | [`ListNames`](OutletRequest::ListNames) | GET | `/restapi/relay/outlets/all;/name/` | 207 |
//! | [`GetState`](OutletRequest::GetState) | GET | `/restapi/relay/outlets/{n-1}/state/` | 200 |
//! | [`SetState`](OutletRequest::SetState) | PUT | `/restapi/relay/outlets/{n-1}/state/` | 204 |
//! | [`Cycle`](OutletRequest::Cycle) | POST | `/restapi/relay/outlets/{n-1}/cycle/` | 204 |

use reqwest::{Method, StatusCode};

use crate::types::OutletNumber;

/// Root of the relay outlet resource.
const OUTLETS_ROOT: &str = "/restapi/relay/outlets";

/// A single request against the relay outlet API.
///
/// # Examples
///
/// ```
/// use dlpdu_lib::protocol::OutletRequest;
/// use dlpdu_lib::types::OutletNumber;
///
/// let request = OutletRequest::GetState(OutletNumber::new(5).unwrap());
/// assert_eq!(request.path(), "/restapi/relay/outlets/4/state/");
/// assert_eq!(request.expected_status().as_u16(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletRequest {
    /// List the names of all outlets, in device order.
    ListNames,
    /// Read whether one outlet is on.
    GetState(OutletNumber),
    /// Switch one outlet on or off.
    SetState {
        /// The outlet to switch.
        outlet: OutletNumber,
        /// `true` to switch on.
        on: bool,
    },
    /// Power-cycle one outlet.
    Cycle(OutletNumber),
}

impl OutletRequest {
    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::ListNames | Self::GetState(_) => Method::GET,
            Self::SetState { .. } => Method::PUT,
            Self::Cycle(_) => Method::POST,
        }
    }

    /// Returns the request path, relative to the device root.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::ListNames => format!("{OUTLETS_ROOT}/all;/name/"),
            Self::GetState(outlet) | Self::SetState { outlet, .. } => {
                format!("{OUTLETS_ROOT}/{}/state/", outlet.wire_index())
            }
            Self::Cycle(outlet) => format!("{OUTLETS_ROOT}/{}/cycle/", outlet.wire_index()),
        }
    }

    /// Returns the only status the device answers with on success.
    #[must_use]
    pub fn expected_status(&self) -> StatusCode {
        match self {
            Self::ListNames => StatusCode::MULTI_STATUS,
            Self::GetState(_) => StatusCode::OK,
            Self::SetState { .. } | Self::Cycle(_) => StatusCode::NO_CONTENT,
        }
    }

    /// Returns `true` if the response carries a JSON body.
    #[must_use]
    pub fn expects_json(&self) -> bool {
        matches!(self, Self::ListNames | Self::GetState(_))
    }

    /// Returns `true` for writes, which the device only accepts with an
    /// `X-CSRF` header.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::SetState { .. } | Self::Cycle(_))
    }

    /// Returns the `application/x-www-form-urlencoded` body, if any.
    #[must_use]
    pub fn form_body(&self) -> Option<String> {
        match self {
            Self::SetState { on, .. } => Some(format!("value={on}")),
            _ => None,
        }
    }

    /// Returns the addressed outlet, if the request targets one.
    #[must_use]
    pub fn outlet(&self) -> Option<OutletNumber> {
        match self {
            Self::ListNames => None,
            Self::GetState(outlet) | Self::SetState { outlet, .. } | Self::Cycle(outlet) => {
                Some(*outlet)
            }
        }
    }
}

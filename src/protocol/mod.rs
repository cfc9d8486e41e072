// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol client for the PDU relay REST API.
//!
//! The [`Protocol`] trait names the four operations the device supports.
//! [`HttpClient`] implements them over HTTP; every failure (bad status,
//! malformed body, transport error) comes back as an `Err` and is logged
//! here, so nothing above this layer has to deal with panics or raw
//! transport errors.
//!
//! Outlet numbers are one-based in this API and translated to the device's
//! zero-based index in [`OutletRequest::path`].

mod http;
mod request;

pub use http::{HttpClient, PduConfig};
pub use request::OutletRequest;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::{OutletAction, OutletNumber};

/// Operations a PDU supports on its relay outlets.
///
/// All operations take a cancellation token. A cancelled operation returns
/// [`Error::Cancelled`](crate::Error::Cancelled), never another error kind.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Lists outlet names in device order.
    ///
    /// The position of a name in the list defines its outlet number.
    ///
    /// # Errors
    ///
    /// Returns error on a status other than 207, a transport failure, or a
    /// body that is not a JSON string array.
    async fn outlet_names(&self, cancel: &CancellationToken) -> Result<Vec<String>>;

    /// Reads whether an outlet is on.
    ///
    /// # Errors
    ///
    /// Returns error on a status other than 200, a transport failure, or a
    /// body that is not a JSON boolean.
    async fn outlet_state(&self, outlet: OutletNumber, cancel: &CancellationToken) -> Result<bool>;

    /// Switches an outlet on or off.
    ///
    /// # Errors
    ///
    /// Returns error on a status other than 204 or a transport failure.
    async fn set_outlet_state(
        &self,
        outlet: OutletNumber,
        on: bool,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// Power-cycles an outlet.
    ///
    /// # Errors
    ///
    /// Returns error on a status other than 204 or a transport failure.
    async fn cycle_outlet(&self, outlet: OutletNumber, cancel: &CancellationToken) -> Result<()>;

    /// Performs an outlet action.
    ///
    /// `On` and `Off` write the state, `Cycle` power-cycles. The current
    /// state is not consulted.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying request.
    async fn trigger_action(
        &self,
        outlet: OutletNumber,
        action: OutletAction,
        cancel: &CancellationToken,
    ) -> Result<()> {
        match action {
            OutletAction::On => self.set_outlet_state(outlet, true, cancel).await,
            OutletAction::Off => self.set_outlet_state(outlet, false, cancel).await,
            OutletAction::Cycle => self.cycle_outlet(outlet, cancel).await,
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device abstraction for PDUs and their outlets.
//!
//! A [`PduHub`] discovers the outlets of one PDU. Each [`Outlet`] caches
//! its last polled value and a target value the host wants written. Both
//! are generic over the [`Protocol`](crate::protocol::Protocol) used to
//! reach the device.
//!
//! ```no_run
//! use dlpdu_lib::device::PduHub;
//! use dlpdu_lib::protocol::PduConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> dlpdu_lib::Result<()> {
//! let cancel = CancellationToken::new();
//! let hub = PduHub::http(PduConfig::new("192.168.1.20", "admin", "1234"))?;
//! hub.connect(&cancel).await;
//!
//! if let Some(outlet) = hub.outlet(2) {
//!     outlet.set_target_value(1.0);
//!     outlet.set_value(&cancel).await;
//!     outlet.poll(&cancel).await;
//! }
//! # Ok(())
//! # }
//! ```

mod hub;
mod hub_id;
mod outlet;

pub use hub::PduHub;
pub use hub_id::HubId;
pub use outlet::{Outlet, OutletSnapshot};

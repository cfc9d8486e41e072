// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `DlPdu` Lib - A Rust library to control Digital Loggers power
//! distribution units.
//!
//! This library provides async APIs to the relay outlets of a PDU through
//! its REST interface.
//!
//! # Supported Features
//!
//! - **Discovery**: List the outlets of a PDU, numbered from 1 in device order
//! - **Outlet control**: Switch on, switch off, power-cycle
//! - **State polling**: Cached outlet values with change callbacks
//! - **Sequences**: Idempotent outlet actions, state conditions, and
//!   delayed host rescans
//!
//! Every request takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and is never retried.
//!
//! # Quick Start
//!
//! ## Discover and switch outlets
//!
//! ```no_run
//! use dlpdu_lib::{PduConfig, PduHub};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> dlpdu_lib::Result<()> {
//!     let cancel = CancellationToken::new();
//!     let hub = PduHub::http(PduConfig::new("192.168.1.20", "admin", "1234"))?;
//!
//!     if !hub.connect(&cancel).await {
//!         eprintln!("PDU unreachable");
//!         return Ok(());
//!     }
//!
//!     for outlet in hub.outlets() {
//!         outlet.poll(&cancel).await;
//!         println!("{} {}: {}", outlet.number(), outlet.name(), outlet.value());
//!     }
//!
//!     if let Some(lamp) = hub.outlet(1) {
//!         lamp.set_target_value(1.0);
//!         lamp.set_value(&cancel).await;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Outlet action with rescan
//!
//! ```no_run
//! use dlpdu_lib::sequence::{OutletInstruction, RescanRegistry};
//! use dlpdu_lib::{OutletAction, PduConfig, RescanTarget};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PduConfig::new("192.168.1.20", "admin", "1234").into_client()?;
//!
//!     let mut rescans = RescanRegistry::new();
//!     rescans.register(RescanTarget::Camera, || async {
//!         println!("looking for cameras");
//!     });
//!
//!     // Skipped if outlet 3 is already on
//!     OutletInstruction::new(3, OutletAction::On)
//!         .with_delay(5)
//!         .with_rescan(RescanTarget::Camera)
//!         .execute(&client, &rescans, &CancellationToken::new())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod protocol;
pub mod sequence;
pub mod subscription;
pub mod types;

pub use device::{HubId, Outlet, OutletSnapshot, PduHub};
pub use error::{Cancelled, ConditionError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{HttpClient, OutletRequest, PduConfig, Protocol};
pub use sequence::{
    ActionOutcome, OutletCondition, OutletInstruction, RescanHandler, RescanInstruction,
    RescanRegistry,
};
pub use subscription::{CallbackRegistry, OutletChange, Subscribable, SubscriptionId};
pub use types::{OutletAction, OutletNumber, OutletState, RescanTarget, SwitchValue};

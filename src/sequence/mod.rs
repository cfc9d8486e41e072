// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequence items a host automation runs against a PDU.
//!
//! - [`OutletInstruction`] switches or cycles an outlet, skipping writes
//!   that would not change anything, then optionally triggers a rescan.
//! - [`OutletCondition`] checks an outlet's state for branching.
//! - [`RescanInstruction`] triggers a rescan after a delay.
//!
//! Rescans are host callbacks kept in a [`RescanRegistry`]. All items are
//! serde-serializable so a host can store them with its sequences.

mod action;
mod condition;
mod rescan;
#[cfg(test)]
mod testing;

pub use action::{ActionOutcome, OutletInstruction};
pub use condition::OutletCondition;
pub use rescan::{RescanHandler, RescanInstruction, RescanRegistry};

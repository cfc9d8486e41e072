// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for PDU outlets.
//!
//! These types validate their input at construction, so anything that
//! reaches the protocol layer is already addressable.
//!
//! # Examples
//!
//! ```
//! use dlpdu_lib::types::{OutletAction, OutletNumber, SwitchValue};
//!
//! let outlet = OutletNumber::new(3).unwrap();
//! assert_eq!(outlet.wire_index(), 2);
//!
//! let target = SwitchValue::clamped(7.0);
//! assert!(target.is_on());
//!
//! let action: OutletAction = "cycle".parse().unwrap();
//! assert_eq!(action, OutletAction::Cycle);
//! ```

mod action;
mod outlet_number;
mod rescan_target;
mod switch_value;

pub use action::{OutletAction, OutletState};
pub use outlet_number::OutletNumber;
pub use rescan_target::RescanTarget;
pub use switch_value::SwitchValue;

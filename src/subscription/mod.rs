// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change notifications for outlets.
//!
//! Hosts that bind outlets to a UI subscribe to value and target changes
//! through the [`Subscribable`] trait. A change is stored before its
//! callbacks run, so an observer always reads the new value back.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, OutletChange, SubscriptionId};
pub use subscribable::Subscribable;

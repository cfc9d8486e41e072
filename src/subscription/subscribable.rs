// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that notify observers of changes.

use crate::subscription::{OutletChange, SubscriptionId};
use crate::types::{OutletNumber, SwitchValue};

/// Trait for types that support change subscriptions.
///
/// # Examples
///
/// ```no_run
/// use dlpdu_lib::device::PduHub;
/// use dlpdu_lib::protocol::PduConfig;
/// use dlpdu_lib::subscription::Subscribable;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> dlpdu_lib::Result<()> {
/// let hub = PduHub::http(PduConfig::new("192.168.1.20", "admin", "1234"))?;
/// hub.connect(&CancellationToken::new()).await;
///
/// if let Some(outlet) = hub.outlet(1) {
///     let sub_id = outlet.on_value_changed(|number, value| {
///         println!("Outlet {number} is now {value}");
///     });
///     outlet.poll(&CancellationToken::new()).await;
///     outlet.unsubscribe(sub_id);
/// }
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to polled value changes.
    ///
    /// Called after every successful poll with the value read from the
    /// device.
    fn on_value_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(OutletNumber, SwitchValue) + Send + Sync + 'static;

    /// Subscribes to target value changes.
    ///
    /// Called with the clamped value every time the target is assigned.
    fn on_target_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(OutletNumber, SwitchValue) + Send + Sync + 'static;

    /// Subscribes to all changes.
    fn on_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OutletChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single relay outlet.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::protocol::Protocol;
use crate::subscription::{CallbackRegistry, OutletChange, Subscribable, SubscriptionId};
use crate::types::{OutletNumber, SwitchValue};

/// Values held by an outlet between requests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutletSnapshot {
    /// Last value read from the device (`0.0` or `1.0`).
    pub value: SwitchValue,
    /// Value the next [`Outlet::set_value`] writes.
    pub target: SwitchValue,
    /// When the value was last read successfully.
    pub last_polled: Option<DateTime<Utc>>,
}

/// A relay outlet with a cached state and a pending target.
///
/// `value` changes only through [`poll`](Self::poll); `target` changes only
/// through [`set_target_value`](Self::set_target_value) and is pushed to
/// the device by [`set_value`](Self::set_value). Neither operation returns
/// an error: failures are logged and reported as `false`.
///
/// An outlet does not depend on the hub that discovered it; it can be
/// created directly from a protocol client and an outlet number.
#[derive(Debug)]
pub struct Outlet<P: Protocol> {
    protocol: Arc<P>,
    name: String,
    number: OutletNumber,
    state: RwLock<OutletSnapshot>,
    callbacks: CallbackRegistry,
}

impl<P: Protocol> Outlet<P> {
    /// Creates an outlet. Both values start at off.
    pub fn new(protocol: Arc<P>, name: impl Into<String>, number: OutletNumber) -> Self {
        Self {
            protocol,
            name: name.into(),
            number,
            state: RwLock::new(OutletSnapshot::default()),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Returns the outlet name as reported by the device.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the one-based outlet number.
    #[must_use]
    pub fn number(&self) -> OutletNumber {
        self.number
    }

    /// Returns the last value read from the device.
    #[must_use]
    pub fn value(&self) -> SwitchValue {
        self.state.read().value
    }

    /// Returns the target value.
    #[must_use]
    pub fn target_value(&self) -> SwitchValue {
        self.state.read().target
    }

    /// Returns when the value was last read successfully.
    #[must_use]
    pub fn last_polled(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_polled
    }

    /// Returns a copy of all cached values.
    #[must_use]
    pub fn snapshot(&self) -> OutletSnapshot {
        *self.state.read()
    }

    /// Lowest switch value.
    #[must_use]
    pub const fn minimum(&self) -> f64 {
        SwitchValue::MINIMUM
    }

    /// Highest switch value.
    #[must_use]
    pub const fn maximum(&self) -> f64 {
        SwitchValue::MAXIMUM
    }

    /// Switch value step.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        SwitchValue::STEP
    }

    /// Assigns the target value, clamped to `[0.0, 1.0]`.
    ///
    /// Nothing is sent to the device until [`set_value`](Self::set_value).
    pub fn set_target_value(&self, value: f64) {
        let value = SwitchValue::clamped(value);
        self.state.write().target = value;
        self.callbacks.dispatch(&OutletChange::Target {
            outlet: self.number,
            value,
        });
    }

    /// Reads the outlet state from the device.
    ///
    /// On success the value becomes `1.0` or `0.0`, observers are notified,
    /// and `true` is returned. On failure or cancellation the value is left
    /// unchanged and `false` is returned.
    pub async fn poll(&self, cancel: &CancellationToken) -> bool {
        match self.protocol.outlet_state(self.number, cancel).await {
            Ok(on) => {
                let value = SwitchValue::from(on);
                {
                    let mut state = self.state.write();
                    state.value = value;
                    state.last_polled = Some(Utc::now());
                }
                self.callbacks.dispatch(&OutletChange::Value {
                    outlet: self.number,
                    value,
                });
                true
            }
            Err(_) => false,
        }
    }

    /// Writes the target value to the device.
    ///
    /// A target within `f64::EPSILON` of `1.0` switches the outlet on,
    /// anything else switches it off. Failures are logged; the target is
    /// kept as assigned and no error is raised.
    ///
    /// Returns `true` if the device accepted the write.
    pub async fn set_value(&self, cancel: &CancellationToken) -> bool {
        let on = self.target_value().is_on();
        match self.protocol.set_outlet_state(self.number, on, cancel).await {
            Ok(()) => {
                tracing::debug!(outlet = self.number.value(), on, "Set value for outlet");
                true
            }
            Err(e) => {
                tracing::error!(
                    outlet = self.number.value(),
                    on,
                    error = %e,
                    "Failed to set value for outlet"
                );
                false
            }
        }
    }
}

impl<P: Protocol> Subscribable for Outlet<P> {
    fn on_value_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(OutletNumber, SwitchValue) + Send + Sync + 'static,
    {
        self.callbacks.on_value_changed(callback)
    }

    fn on_target_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(OutletNumber, SwitchValue) + Send + Sync + 'static,
    {
        self.callbacks.on_target_changed(callback)
    }

    fn on_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OutletChange) + Send + Sync + 'static,
    {
        self.callbacks.on_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

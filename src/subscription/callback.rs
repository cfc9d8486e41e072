// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for outlet observers.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`OutletChange`] - What changed on an outlet
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::types::{OutletNumber, SwitchValue};

/// Unique identifier for a subscription.
///
/// Returned when registering a callback; pass it to `unsubscribe` to remove
/// the callback again. IDs are unique within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// A change observed on an outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutletChange {
    /// The polled value was refreshed from the device.
    Value {
        /// The outlet.
        outlet: OutletNumber,
        /// The value read from the device.
        value: SwitchValue,
    },
    /// The caller assigned a new target value.
    Target {
        /// The outlet.
        outlet: OutletNumber,
        /// The clamped target value.
        value: SwitchValue,
    },
}

impl OutletChange {
    /// Returns the outlet the change belongs to.
    #[must_use]
    pub fn outlet(&self) -> OutletNumber {
        match self {
            Self::Value { outlet, .. } | Self::Target { outlet, .. } => *outlet,
        }
    }
}

type ValueCallback = Arc<dyn Fn(OutletNumber, SwitchValue) + Send + Sync>;

type ChangeCallback = Arc<dyn Fn(&OutletChange) + Send + Sync>;

/// Registry for outlet observer callbacks.
///
/// Thread-safe through `parking_lot::RwLock`. Callbacks run synchronously on
/// the thread that performed the change, after the change is stored.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    value_callbacks: RwLock<HashMap<SubscriptionId, ValueCallback>>,
    target_callbacks: RwLock<HashMap<SubscriptionId, ValueCallback>>,
    changed_callbacks: RwLock<HashMap<SubscriptionId, ChangeCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            value_callbacks: RwLock::new(HashMap::new()),
            target_callbacks: RwLock::new(HashMap::new()),
            changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for polled value changes.
    pub fn on_value_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(OutletNumber, SwitchValue) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.value_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for target value changes.
    pub fn on_target_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(OutletNumber, SwitchValue) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.target_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving every change.
    pub fn on_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&OutletChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.changed_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.value_callbacks.write().remove(&id).is_some()
            || self.target_callbacks.write().remove(&id).is_some()
            || self.changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.value_callbacks.write().clear();
        self.target_callbacks.write().clear();
        self.changed_callbacks.write().clear();
    }

    /// Dispatches a change to the matching callbacks.
    ///
    /// Callbacks are cloned out of the maps first, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn dispatch(&self, change: &OutletChange) {
        let changed: Vec<ChangeCallback> = self.changed_callbacks.read().values().cloned().collect();
        for callback in changed {
            callback(change);
        }

        let (map, outlet, value) = match *change {
            OutletChange::Value { outlet, value } => (&self.value_callbacks, outlet, value),
            OutletChange::Target { outlet, value } => (&self.target_callbacks, outlet, value),
        };
        let callbacks: Vec<ValueCallback> = map.read().values().cloned().collect();
        for callback in callbacks {
            callback(outlet, value);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.value_callbacks.read().len()
            + self.target_callbacks.read().len()
            + self.changed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

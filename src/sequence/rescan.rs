// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host rescan callbacks and the delayed rescan instruction.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::Cancelled;
use crate::types::RescanTarget;

/// A host callback that re-enumerates one device category.
///
/// Implemented for every `Fn() -> impl Future<Output = ()>`, so an async
/// closure can be registered directly.
pub trait RescanHandler: Send + Sync {
    /// Runs the rescan.
    fn rescan(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

impl<F, Fut> RescanHandler for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn rescan(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(self())
    }
}

/// Maps each [`RescanTarget`] to the host callback that rescans it.
///
/// A target without a handler is treated as unknown: dispatching it logs an
/// error and runs nothing.
///
/// # Examples
///
/// ```
/// use dlpdu_lib::sequence::RescanRegistry;
/// use dlpdu_lib::types::RescanTarget;
///
/// let mut rescans = RescanRegistry::new();
/// rescans.register(RescanTarget::Camera, || async {
///     println!("rescanning cameras");
/// });
///
/// assert!(rescans.contains(RescanTarget::Camera));
/// assert!(!rescans.contains(RescanTarget::Dome));
/// ```
#[derive(Default, Clone)]
pub struct RescanRegistry {
    handlers: HashMap<RescanTarget, Arc<dyn RescanHandler>>,
}

impl RescanRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `target`, replacing any previous one.
    ///
    /// Registering [`RescanTarget::None`] is ignored.
    pub fn register<H>(&mut self, target: RescanTarget, handler: H) -> &mut Self
    where
        H: RescanHandler + 'static,
    {
        if target.is_none() {
            tracing::debug!("Ignoring rescan handler registered for None");
        } else {
            self.handlers.insert(target, Arc::new(handler));
        }
        self
    }

    /// Returns `true` if a handler is registered for `target`.
    #[must_use]
    pub fn contains(&self, target: RescanTarget) -> bool {
        self.handlers.contains_key(&target)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the handler for `target`.
    ///
    /// Returns `true` if a handler ran. [`RescanTarget::None`] runs nothing
    /// and is not an error; any other target without a handler is logged.
    pub async fn dispatch(&self, target: RescanTarget) -> bool {
        if target.is_none() {
            return false;
        }

        let Some(handler) = self.handlers.get(&target).cloned() else {
            tracing::error!(rescan = %target, "No rescan handler for target");
            return false;
        };

        tracing::debug!(rescan = %target, "Rescanning devices");
        handler.rescan().await;
        true
    }
}

impl fmt::Debug for RescanRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut targets: Vec<_> = self.handlers.keys().copied().collect();
        targets.sort_by_key(|target| *target as u8);
        f.debug_struct("RescanRegistry")
            .field("targets", &targets)
            .finish()
    }
}

/// Sleeps for `delay_secs` seconds, negative values counting as positive.
///
/// # Errors
///
/// Returns [`Cancelled`] if `cancel` fires first.
pub(crate) async fn wait(delay_secs: i64, cancel: &CancellationToken) -> Result<(), Cancelled> {
    let delay = Duration::from_secs(delay_secs.unsigned_abs());
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Cancelled),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Waits, then asks the host to rescan one device category.
///
/// Used on its own in a sequence, for example after a power action on
/// another device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RescanInstruction {
    /// Seconds to wait before the rescan. The sign is ignored.
    pub delay: i64,
    /// Device category to rescan.
    pub rescan: RescanTarget,
}

impl Default for RescanInstruction {
    fn default() -> Self {
        Self {
            delay: 2,
            rescan: RescanTarget::None,
        }
    }
}

impl RescanInstruction {
    /// Creates an instruction.
    #[must_use]
    pub fn new(delay: i64, rescan: RescanTarget) -> Self {
        Self { delay, rescan }
    }

    /// Waits the delay, then dispatches the rescan.
    ///
    /// Returns the target whose handler ran, or `None` when the target is
    /// [`RescanTarget::None`] or has no handler.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel` fires during the wait. The handler
    /// does not run in that case.
    pub async fn execute(
        &self,
        rescans: &RescanRegistry,
        cancel: &CancellationToken,
    ) -> Result<Option<RescanTarget>, Cancelled> {
        wait(self.delay, cancel).await?;
        let ran = rescans.dispatch(self.rescan).await;
        Ok(ran.then_some(self.rescan))
    }
}

impl fmt::Display for RescanInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Delay: {}, Rescan: {}", self.delay, self.rescan)
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet actions with a read-before-write check.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Cancelled, Error};
use crate::protocol::Protocol;
use crate::sequence::rescan::{self, RescanRegistry};
use crate::types::{OutletAction, OutletNumber, RescanTarget};

/// How an [`OutletInstruction`] ended.
///
/// Every variant is a normal completion; failures are logged and reported
/// here rather than returned as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The outlet number was below 1. Nothing was sent.
    InvalidOutlet,
    /// The current state could not be read. Nothing was written.
    StateUnavailable,
    /// The outlet was already in the requested state. Nothing was written.
    AlreadySatisfied,
    /// The action was sent to the device.
    Triggered {
        /// Whether the device accepted the action.
        success: bool,
        /// The rescan target whose handler ran, if any.
        rescanned: Option<RescanTarget>,
    },
}

/// Drives one outlet to an action, then optionally asks for a rescan.
///
/// The outlet is read first. `On` and `Off` are skipped when the outlet is
/// already in that state, so at most one write is issued; `Cycle` always
/// runs. After a write, failed or not, the instruction waits `delay`
/// seconds and runs the handler for `rescan`.
///
/// # Examples
///
/// ```no_run
/// use dlpdu_lib::protocol::PduConfig;
/// use dlpdu_lib::sequence::{OutletInstruction, RescanRegistry};
/// use dlpdu_lib::types::{OutletAction, RescanTarget};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PduConfig::new("192.168.1.20", "admin", "1234").into_client()?;
///
/// let mut rescans = RescanRegistry::new();
/// rescans.register(RescanTarget::Camera, || async { /* host rescan */ });
///
/// let instruction = OutletInstruction::new(3, OutletAction::On)
///     .with_delay(5)
///     .with_rescan(RescanTarget::Camera);
///
/// let outcome = instruction
///     .execute(&client, &rescans, &CancellationToken::new())
///     .await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutletInstruction {
    /// One-based outlet number. Checked when the instruction runs.
    pub outlet_number: i64,
    /// Action to perform.
    pub action: OutletAction,
    /// Seconds to wait before the rescan. The sign is ignored.
    pub delay: i64,
    /// Device category to rescan after the action.
    pub rescan: RescanTarget,
}

impl Default for OutletInstruction {
    fn default() -> Self {
        Self {
            outlet_number: 1,
            action: OutletAction::On,
            delay: 2,
            rescan: RescanTarget::None,
        }
    }
}

impl OutletInstruction {
    /// Creates an instruction with the default delay and no rescan.
    #[must_use]
    pub fn new(outlet_number: i64, action: OutletAction) -> Self {
        Self {
            outlet_number,
            action,
            ..Self::default()
        }
    }

    /// Sets the delay before the rescan, in seconds.
    #[must_use]
    pub fn with_delay(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the rescan target.
    #[must_use]
    pub fn with_rescan(mut self, rescan: RescanTarget) -> Self {
        self.rescan = rescan;
        self
    }

    /// Runs the instruction.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel` fires during a request or the
    /// delay. A cancelled delay never runs the rescan handler.
    pub async fn execute<P: Protocol>(
        &self,
        protocol: &P,
        rescans: &RescanRegistry,
        cancel: &CancellationToken,
    ) -> Result<ActionOutcome, Cancelled> {
        let outlet = match OutletNumber::new(self.outlet_number) {
            Ok(outlet) => outlet,
            Err(e) => {
                tracing::error!(outlet = self.outlet_number, error = %e, "Invalid outlet number");
                return Ok(ActionOutcome::InvalidOutlet);
            }
        };

        let powered = match protocol.outlet_state(outlet, cancel).await {
            Ok(powered) => powered,
            Err(Error::Cancelled) => return Err(Cancelled),
            Err(e) => {
                tracing::error!(outlet = outlet.value(), error = %e, "Failed to get outlet state");
                return Ok(ActionOutcome::StateUnavailable);
            }
        };

        if self.action.desired_state() == Some(powered) {
            tracing::debug!(
                outlet = outlet.value(),
                action = %self.action,
                "Outlet already in requested state"
            );
            return Ok(ActionOutcome::AlreadySatisfied);
        }

        let success = match protocol.trigger_action(outlet, self.action, cancel).await {
            Ok(()) => {
                tracing::debug!(outlet = outlet.value(), action = %self.action, "Outlet action succeeded");
                true
            }
            Err(Error::Cancelled) => return Err(Cancelled),
            Err(e) => {
                tracing::error!(
                    outlet = outlet.value(),
                    action = %self.action,
                    error = %e,
                    "Outlet action failed"
                );
                false
            }
        };

        if self.rescan.is_none() {
            return Ok(ActionOutcome::Triggered {
                success,
                rescanned: None,
            });
        }

        rescan::wait(self.delay, cancel).await?;
        let ran = rescans.dispatch(self.rescan).await;

        Ok(ActionOutcome::Triggered {
            success,
            rescanned: ran.then_some(self.rescan),
        })
    }
}

impl fmt::Display for OutletInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Outlet: {}, Action: {}, Delay: {}, Rescan: {}",
            self.outlet_number, self.action, self.delay, self.rescan
        )
    }
}

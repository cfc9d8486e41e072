// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet state checks for branching sequences.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{ConditionError, Error};
use crate::protocol::Protocol;
use crate::types::{OutletNumber, OutletState};

/// Checks whether an outlet is in an expected state.
///
/// Unlike [`OutletInstruction`](crate::sequence::OutletInstruction), a
/// failed read is fatal here: reporting `false` would make an unreachable
/// device look like an outlet that is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutletCondition {
    #[serde(deserialize_with = "non_negative")]
    outlet_number: i64,
    state: OutletState,
}

fn non_negative<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    i64::deserialize(deserializer).map(|n| n.max(0))
}

impl OutletCondition {
    /// Creates a condition. Negative outlet numbers are stored as 0.
    #[must_use]
    pub fn new(outlet_number: i64, state: OutletState) -> Self {
        Self {
            outlet_number: outlet_number.max(0),
            state,
        }
    }

    /// Returns the configured outlet number.
    #[must_use]
    pub fn outlet_number(&self) -> i64 {
        self.outlet_number
    }

    /// Sets the outlet number. Negative values are stored as 0.
    pub fn set_outlet_number(&mut self, outlet_number: i64) {
        self.outlet_number = outlet_number.max(0);
    }

    /// Returns the expected state.
    #[must_use]
    pub fn state(&self) -> OutletState {
        self.state
    }

    /// Sets the expected state.
    pub fn set_state(&mut self, state: OutletState) {
        self.state = state;
    }

    /// Reads the outlet and compares it with the expected state.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::StateUnavailable`] if the outlet number is
    /// invalid or the read fails, and [`ConditionError::Cancelled`] if
    /// `cancel` fires. Either should abort the surrounding sequence.
    pub async fn check<P: Protocol>(
        &self,
        protocol: &P,
        cancel: &CancellationToken,
    ) -> Result<bool, ConditionError> {
        let powered = match OutletNumber::new(self.outlet_number) {
            Ok(outlet) => protocol.outlet_state(outlet, cancel).await,
            Err(e) => Err(e.into()),
        };

        match powered {
            Ok(powered) => {
                let satisfied = self.state.matches(powered);
                tracing::debug!(
                    outlet = self.outlet_number,
                    expected = %self.state,
                    powered,
                    satisfied,
                    "Checked outlet state"
                );
                Ok(satisfied)
            }
            Err(Error::Cancelled) => Err(ConditionError::Cancelled),
            Err(source) => {
                tracing::error!(
                    outlet = self.outlet_number,
                    error = %source,
                    "Failed to get outlet state"
                );
                Err(ConditionError::StateUnavailable {
                    outlet: self.outlet_number,
                    source,
                })
            }
        }
    }
}

impl fmt::Display for OutletCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Outlet: {}, State: {}", self.outlet_number, self.state)
    }
}

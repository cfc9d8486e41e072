// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet actions and states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// An action that can be performed on an outlet.
///
/// # Examples
///
/// ```
/// use dlpdu_lib::types::OutletAction;
///
/// assert_eq!(OutletAction::On.desired_state(), Some(true));
/// assert_eq!(OutletAction::Off.desired_state(), Some(false));
///
/// // A power cycle is never "already done"
/// assert_eq!(OutletAction::Cycle.desired_state(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutletAction {
    /// Switch the outlet on.
    #[default]
    On,
    /// Switch the outlet off.
    Off,
    /// Switch the outlet off and on again in one device-side operation.
    Cycle,
}

impl OutletAction {
    /// Returns the on/off state this action leaves the outlet in, or `None`
    /// for [`Cycle`](Self::Cycle).
    #[must_use]
    pub const fn desired_state(&self) -> Option<bool> {
        match self {
            Self::On => Some(true),
            Self::Off => Some(false),
            Self::Cycle => None,
        }
    }

    /// Returns the action name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
            Self::Cycle => "Cycle",
        }
    }
}

impl fmt::Display for OutletAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutletAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "0" => Ok(Self::On),
            "off" | "1" => Ok(Self::Off),
            "cycle" | "2" => Ok(Self::Cycle),
            _ => Err(ValueError::InvalidAction(s.to_string())),
        }
    }
}

impl TryFrom<i32> for OutletAction {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::On),
            1 => Ok(Self::Off),
            2 => Ok(Self::Cycle),
            _ => Err(ValueError::InvalidAction(code.to_string())),
        }
    }
}

/// The state an outlet is expected to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutletState {
    /// Outlet is powered.
    #[default]
    On,
    /// Outlet is not powered.
    Off,
}

impl OutletState {
    /// Returns `true` if a device reading (`true` = powered) matches this
    /// state.
    #[must_use]
    pub const fn matches(&self, powered: bool) -> bool {
        match self {
            Self::On => powered,
            Self::Off => !powered,
        }
    }

    /// Returns the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }
}

impl fmt::Display for OutletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for OutletState {
    fn from(powered: bool) -> Self {
        if powered { Self::On } else { Self::Off }
    }
}

impl FromStr for OutletState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "0" | "true" => Ok(Self::On),
            "off" | "1" | "false" => Ok(Self::Off),
            _ => Err(ValueError::InvalidOutletState(s.to_string())),
        }
    }
}

impl TryFrom<i32> for OutletState {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::On),
            1 => Ok(Self::Off),
            _ => Err(ValueError::InvalidOutletState(code.to_string())),
        }
    }
}

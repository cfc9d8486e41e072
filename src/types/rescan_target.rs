// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device categories the host can re-enumerate after a power action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Which device category the host should rescan.
///
/// Powering an outlet on or off usually makes equipment appear or vanish;
/// the host re-enumerates exactly one category per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RescanTarget {
    /// No rescan.
    #[default]
    None,
    /// Cameras.
    Camera,
    /// Focusers.
    Focuser,
    /// Filter wheels.
    FilterWheel,
    /// Telescope mounts.
    Telescope,
    /// Guiders.
    Guider,
    /// Rotators.
    Rotator,
    /// Domes.
    Dome,
    /// Switches.
    Switch,
    /// Flat panels.
    FlatDevice,
    /// Weather stations.
    WeatherData,
    /// Safety monitors.
    SafetyMonitor,
}

impl RescanTarget {
    /// Every target in declaration order, `None` first.
    pub const ALL: [Self; 12] = [
        Self::None,
        Self::Camera,
        Self::Focuser,
        Self::FilterWheel,
        Self::Telescope,
        Self::Guider,
        Self::Rotator,
        Self::Dome,
        Self::Switch,
        Self::FlatDevice,
        Self::WeatherData,
        Self::SafetyMonitor,
    ];

    /// Returns the category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Camera => "Camera",
            Self::Focuser => "Focuser",
            Self::FilterWheel => "FilterWheel",
            Self::Telescope => "Telescope",
            Self::Guider => "Guider",
            Self::Rotator => "Rotator",
            Self::Dome => "Dome",
            Self::Switch => "Switch",
            Self::FlatDevice => "FlatDevice",
            Self::WeatherData => "WeatherData",
            Self::SafetyMonitor => "SafetyMonitor",
        }
    }

    /// Returns `true` for [`None`](Self::None).
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for RescanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RescanTarget {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValueError::InvalidRescanTarget(s.to_string()))
    }
}

impl TryFrom<i32> for RescanTarget {
    type Error = ValueError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or_else(|| ValueError::InvalidRescanTarget(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_declaration_order() {
        assert_eq!(RescanTarget::try_from(0), Ok(RescanTarget::None));
        assert_eq!(RescanTarget::try_from(1), Ok(RescanTarget::Camera));
        assert_eq!(RescanTarget::try_from(11), Ok(RescanTarget::SafetyMonitor));
        assert!(RescanTarget::try_from(12).is_err());
        assert!(RescanTarget::try_from(-1).is_err());
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!(
            "filterwheel".parse::<RescanTarget>(),
            Ok(RescanTarget::FilterWheel)
        );
        assert_eq!(
            "Printer".parse::<RescanTarget>(),
            Err(ValueError::InvalidRescanTarget("Printer".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for target in RescanTarget::ALL {
            assert_eq!(target.to_string().parse::<RescanTarget>(), Ok(target));
        }
    }
}
